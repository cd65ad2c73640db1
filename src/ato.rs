//! Automatic top-off (ATO) pump control.
//!
//! Grounded on `original_source/ato.h`'s `handleATO`/`resetATOAlarm`.
//! Priority order is preserved exactly: reservoir-empty pre-empts
//! everything (including an in-progress cooldown or fill), then the
//! cooldown gate, then the timeout latch, then the normal low/high float
//! fill cycle. The original never consulted an emergency-stop flag here;
//! `emergency_stop` is threaded through to the gateway so the pump relay
//! line itself can never energize during a stop, even though the state
//! machine above keeps running (and will still time out normally) as if
//! it had.

use crate::actuator_gateway::ActuatorGateway;
use crate::app::events::ControllerEvent;
use crate::app::ports::{EventSink, FloatSwitchPort, RelayId, RelayPort};
use crate::buzzer::BuzzerSequencer;
use crate::config::AquariumConfig;
use crate::error::Result;
use crate::state::AtoState;

#[allow(clippy::too_many_arguments)]
pub fn handle<R: RelayPort>(
    ato: &mut AtoState,
    now_ms: u32,
    config: &AquariumConfig,
    emergency_stop: bool,
    floats: &mut impl FloatSwitchPort,
    gateway: &mut ActuatorGateway<R>,
    buzzer: &mut BuzzerSequencer,
    events: &mut dyn EventSink,
) -> Result<()> {
    let reading = floats.read()?;
    let polarity = config.ato_float_polarity;
    let low_triggered = polarity.is_triggered(reading.low_line_high);
    let high_triggered = polarity.is_triggered(reading.high_line_high);
    let reservoir_empty = polarity.is_triggered(reading.reservoir_line_high);

    if reservoir_empty {
        if !ato.reservoir_alarm {
            buzzer.queue(3);
            events.emit(&ControllerEvent::AtoReservoirEmpty);
            ato.reservoir_alarm = true;
        }
        if ato.running {
            gateway.set_relay(RelayId::AtoPump, false, emergency_stop)?;
            ato.running = false;
        }
        return Ok(());
    } else if ato.reservoir_alarm {
        events.emit(&ControllerEvent::AtoReservoirRefilled);
        ato.reservoir_alarm = false;
        ato.last_run_end_ms = 0;
    }

    let cooldown_elapsed = now_ms.wrapping_sub(ato.last_run_end_ms);
    if cooldown_elapsed < config.ato_cooldown_ms && !ato.running {
        return Ok(());
    }

    if ato.timeout_alarm {
        if ato.running {
            gateway.set_relay(RelayId::AtoPump, false, emergency_stop)?;
            ato.running = false;
        }
        return Ok(());
    }

    if low_triggered {
        if !ato.running {
            gateway.set_relay(RelayId::AtoPump, true, emergency_stop)?;
            ato.running = true;
            ato.start_ms = now_ms;
            events.emit(&ControllerEvent::AtoPumpStarted);
        } else {
            let runtime = now_ms.wrapping_sub(ato.start_ms);
            if runtime > config.ato_timeout_ms {
                gateway.set_relay(RelayId::AtoPump, false, emergency_stop)?;
                ato.running = false;
                ato.timeout_alarm = true;
                events.emit(&ControllerEvent::AtoTimeoutAlarm { runtime_ms: runtime });
                buzzer.queue(5);
            }
        }
    } else if high_triggered && ato.running {
        let runtime = now_ms.wrapping_sub(ato.start_ms);
        if runtime >= config.ato_min_runtime_ms {
            gateway.set_relay(RelayId::AtoPump, false, emergency_stop)?;
            ato.running = false;
            ato.last_run_end_ms = now_ms;
            events.emit(&ControllerEvent::AtoPumpStopped { runtime_ms: runtime });
        }
    }

    Ok(())
}

/// `resetATOAlarm` (operator action — Blue short-press while an ATO alarm
/// is latched).
pub fn reset(ato: &mut AtoState, now_ms: u32, events: &mut dyn EventSink) {
    if ato.timeout_alarm || ato.reservoir_alarm {
        ato.timeout_alarm = false;
        ato.reservoir_alarm = false;
        ato.start_ms = 0;
        ato.last_run_end_ms = now_ms;
        events.emit(&ControllerEvent::AtoAlarmReset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::FloatSwitchReadings;
    use std::cell::RefCell;

    struct RecordingRelay {
        writes: RefCell<Vec<(RelayId, bool)>>,
    }

    impl RelayPort for RecordingRelay {
        fn set_relay(&mut self, id: RelayId, on: bool) -> Result<()> {
            self.writes.borrow_mut().push((id, on));
            Ok(())
        }
    }

    struct FixedFloats(FloatSwitchReadings);
    impl FloatSwitchPort for FixedFloats {
        fn read(&mut self) -> Result<FloatSwitchReadings> {
            Ok(FloatSwitchReadings {
                low_line_high: self.0.low_line_high,
                high_line_high: self.0.high_line_high,
                reservoir_line_high: self.0.reservoir_line_high,
            })
        }
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &ControllerEvent) {}
    }

    // Active-low polarity (default): a triggered float pulls the line low.
    fn floats(low: bool, high: bool, reservoir_empty: bool) -> FixedFloats {
        FixedFloats(FloatSwitchReadings {
            low_line_high: !low,
            high_line_high: !high,
            reservoir_line_high: !reservoir_empty,
        })
    }

    #[test]
    fn low_float_starts_pump() {
        let config = AquariumConfig::default();
        let mut ato = AtoState::default();
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        let mut buzzer = BuzzerSequencer::new();
        let mut sink = NullSink;
        let mut f = floats(true, false, false);

        handle(
            &mut ato,
            config.ato_cooldown_ms + 1,
            &config,
            false,
            &mut f,
            &mut gateway,
            &mut buzzer,
            &mut sink,
        )
        .unwrap();
        assert!(ato.running);
    }

    #[test]
    fn timeout_latches_alarm_and_queues_five_beeps() {
        let config = AquariumConfig::default();
        let mut ato = AtoState {
            running: true,
            start_ms: 0,
            ..AtoState::default()
        };
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        let mut buzzer = BuzzerSequencer::new();
        let mut sink = NullSink;
        let mut f = floats(true, false, false);

        handle(
            &mut ato,
            config.ato_timeout_ms + 1,
            &config,
            false,
            &mut f,
            &mut gateway,
            &mut buzzer,
            &mut sink,
        )
        .unwrap();

        assert!(ato.timeout_alarm);
        assert!(!ato.running);
        assert!(buzzer.is_busy());
    }

    #[test]
    fn reservoir_empty_preempts_fill_and_stops_pump() {
        let config = AquariumConfig::default();
        let mut ato = AtoState {
            running: true,
            start_ms: 0,
            ..AtoState::default()
        };
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        let mut buzzer = BuzzerSequencer::new();
        let mut sink = NullSink;
        let mut f = floats(true, false, true);

        handle(&mut ato, 1_000, &config, false, &mut f, &mut gateway, &mut buzzer, &mut sink).unwrap();
        assert!(ato.reservoir_alarm);
        assert!(!ato.running);
    }

    #[test]
    fn low_float_never_energizes_pump_relay_during_emergency_stop() {
        let config = AquariumConfig::default();
        let mut ato = AtoState::default();
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        let mut buzzer = BuzzerSequencer::new();
        let mut sink = NullSink;
        let mut f = floats(true, false, false);

        handle(
            &mut ato,
            config.ato_cooldown_ms + 1,
            &config,
            true,
            &mut f,
            &mut gateway,
            &mut buzzer,
            &mut sink,
        )
        .unwrap();

        assert!(
            relay.writes.borrow().iter().all(|&(id, on)| id != RelayId::AtoPump || !on),
            "no AtoPump relay write may command the line on while emergency_stop is true"
        );
    }

    #[test]
    fn reset_clears_latched_alarms() {
        let mut ato = AtoState {
            timeout_alarm: true,
            ..AtoState::default()
        };
        let mut sink = NullSink;
        reset(&mut ato, 5_000, &mut sink);
        assert!(!ato.timeout_alarm);
        assert_eq!(ato.last_run_end_ms, 5_000);
    }
}

//! Heater hysteresis control.
//!
//! Grounded on `original_source/temperature.h`'s `controlHeaters`. The
//! backup heater is reserved hardware (see [`crate::state::HeaterState`])
//! and is unconditionally held off here, matching the original's
//! unconditional `setRelay(RELAY_HEATER_BACKUP, false)` tail.

use crate::actuator_gateway::ActuatorGateway;
use crate::app::events::ControllerEvent;
use crate::app::ports::{EventSink, RelayId, RelayPort};
use crate::config::AquariumConfig;
use crate::error::Result;
use crate::state::{HeaterState, TempReadings};

/// `controlHeaters`, called once per control cycle after temperatures are
/// refreshed. Heaters are unconditionally forced off under `emergency_stop`
/// (also enforced again at the gateway, belt-and-suspenders per spec §4.3).
pub fn control<R: RelayPort>(
    heater: &mut HeaterState,
    readings: &TempReadings,
    config: &AquariumConfig,
    emergency_stop: bool,
    gateway: &mut ActuatorGateway<R>,
    events: &mut dyn EventSink,
) -> Result<()> {
    if emergency_stop {
        if heater.primary_on {
            gateway.set_relay(RelayId::HeaterPrimary, false, emergency_stop)?;
            heater.primary_on = false;
            events.emit(&ControllerEvent::HeaterChanged { primary_on: false });
        }
        heater.backup_on = false;
        return Ok(());
    }

    if !readings.sump_valid {
        if heater.primary_on {
            gateway.set_relay(RelayId::HeaterPrimary, false, emergency_stop)?;
            heater.primary_on = false;
            events.emit(&ControllerEvent::HeaterChanged { primary_on: false });
        }
        heater.backup_on = false;
        events.emit(&ControllerEvent::SensorError { probe: "sump" });
        return Ok(());
    }

    let control_temp = readings.sump_f;

    if control_temp < config.target_temp_f - config.temp_hysteresis_f {
        if !heater.primary_on {
            gateway.set_relay(RelayId::HeaterPrimary, true, emergency_stop)?;
            heater.primary_on = true;
            events.emit(&ControllerEvent::HeaterChanged { primary_on: true });
        }
    } else if control_temp > config.target_temp_f + config.temp_hysteresis_f && heater.primary_on {
        gateway.set_relay(RelayId::HeaterPrimary, false, emergency_stop)?;
        heater.primary_on = false;
        events.emit(&ControllerEvent::HeaterChanged { primary_on: false });
    }

    heater.backup_on = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
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

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &ControllerEvent) {}
    }

    struct RecordingSink {
        events: Vec<ControllerEvent>,
    }

    impl EventSink for RecordingSink {
        fn emit(&mut self, event: &ControllerEvent) {
            self.events.push(*event);
        }
    }

    #[test]
    fn stale_sump_reading_forces_heater_off_and_reports_sensor_error() {
        let config = AquariumConfig::default();
        let mut heater = HeaterState {
            primary_on: true,
            backup_on: false,
        };
        let readings = TempReadings {
            sump_valid: false,
            ..TempReadings::default()
        };
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        let mut sink = RecordingSink { events: vec![] };
        control(&mut heater, &readings, &config, false, &mut gateway, &mut sink).unwrap();

        assert!(!heater.primary_on);
        assert_eq!(
            relay.writes.into_inner(),
            vec![(RelayId::HeaterPrimary, false)]
        );
        assert!(sink
            .events
            .iter()
            .any(|e| matches!(e, ControllerEvent::SensorError { probe: "sump" })));
    }

    #[test]
    fn turns_on_below_hysteresis_band() {
        let config = AquariumConfig::default();
        let mut heater = HeaterState::default();
        let readings = TempReadings {
            sump_f: config.target_temp_f - 1.0,
            sump_valid: true,
            ..TempReadings::default()
        };
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        let mut sink = NullSink;
        control(&mut heater, &readings, &config, false, &mut gateway, &mut sink).unwrap();
        assert!(heater.primary_on);
    }

    #[test]
    fn turns_off_above_hysteresis_band() {
        let config = AquariumConfig::default();
        let mut heater = HeaterState {
            primary_on: true,
            backup_on: false,
        };
        let readings = TempReadings {
            sump_f: config.target_temp_f + 1.0,
            sump_valid: true,
            ..TempReadings::default()
        };
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        let mut sink = NullSink;
        control(&mut heater, &readings, &config, false, &mut gateway, &mut sink).unwrap();
        assert!(!heater.primary_on);
    }

    #[test]
    fn emergency_stop_forces_off() {
        let config = AquariumConfig::default();
        let mut heater = HeaterState {
            primary_on: true,
            backup_on: false,
        };
        let readings = TempReadings {
            sump_f: config.target_temp_f - 5.0,
            sump_valid: true,
            ..TempReadings::default()
        };
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        let mut sink = NullSink;
        control(&mut heater, &readings, &config, true, &mut gateway, &mut sink).unwrap();
        assert!(!heater.primary_on);
    }
}

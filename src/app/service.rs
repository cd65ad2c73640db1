//! Application service — the hexagonal core.
//!
//! [`ControllerCore`] owns every subsystem's persistent state and exposes
//! one [`tick`](ControllerCore::tick) entry point. All I/O flows through
//! port traits passed in at the call site, matching the teacher's
//! `AppService::tick(hw, sink)` shape — generalized here to the handful of
//! distinct port traits this system's hardware actually needs instead of
//! one combined `SensorPort + ActuatorPort` bundle.
//!
//! ```text
//!  buttons/temps/floats ──▶ ┌──────────────────┐ ──▶ relays/IR/buzzer
//!                           │   ControllerCore  │
//!                  events ◀─│ ato · heater ·    │
//!                           │ lighting · safety │
//!                           └──────────────────┘
//! ```

use log::warn;

use crate::actuator_gateway::ActuatorGateway;
use crate::app::commands::OperatorCommand;
use crate::app::events::ControllerEvent;
use crate::app::ports::{
    BuzzerPort, EventSink, FloatSwitchPort, IrPort, RelayPort, TemperatureSensorPort,
};
use crate::ato;
use crate::buttons::ButtonPanel;
use crate::buzzer::BuzzerSequencer;
use crate::clock::{RngPort, RtcReading};
use crate::config::AquariumConfig;
use crate::diagnostics::{DiagnosticsSnapshot, FaultHistory};
use crate::error::Result;
use crate::fault::{Fault, FaultFlags};
use crate::heater;
use crate::lighting::{LightMode, LightingController};
use crate::mode_supervisor;
use crate::state::{AtoState, ControllerState, HeaterState, TempReadings};
use crate::temperature;

pub struct ControllerCore {
    config: AquariumConfig,
    state: ControllerState,
    ato: AtoState,
    heater: HeaterState,
    temps: TempReadings,
    buttons: ButtonPanel,
    lighting: LightingController,
    buzzer: BuzzerSequencer,
    fault_history: FaultHistory,
    last_tick_ms: u32,
    boot_ms: u32,
    control_cycles: u64,
}

impl ControllerCore {
    pub fn new(config: AquariumConfig) -> Self {
        Self {
            config,
            state: ControllerState::new(),
            ato: AtoState::default(),
            heater: HeaterState::default(),
            temps: TempReadings::default(),
            buttons: ButtonPanel::new(),
            lighting: LightingController::new(),
            buzzer: BuzzerSequencer::new(),
            fault_history: FaultHistory::new(),
            last_tick_ms: 0,
            boot_ms: 0,
            control_cycles: 0,
        }
    }

    /// `setInitialLightingFromTime`, run once at startup after the RTC is
    /// readable.
    pub fn boot(&mut self, now_ms: u32, rtc: RtcReading, ir: &mut dyn IrPort, events: &mut dyn EventSink) {
        self.lighting
            .set_initial_from_time(now_ms, rtc.minutes_since_midnight(), &self.config, ir, events);
        self.last_tick_ms = now_ms;
        self.boot_ms = now_ms;
    }

    /// Run one full control cycle in spec order: buttons → temperatures →
    /// fault checks → heaters → ATO → lighting schedule → clouds → buzzer.
    #[allow(clippy::too_many_arguments)]
    pub fn tick(
        &mut self,
        now_ms: u32,
        rtc: RtcReading,
        relays: &mut impl RelayPort,
        ir: &mut dyn IrPort,
        buzzer_hw: &mut impl BuzzerPort,
        sump: &mut impl TemperatureSensorPort,
        display: &mut impl TemperatureSensorPort,
        floats: &mut impl FloatSwitchPort,
        button_readings: crate::app::ports::ButtonPanelReadings,
        rng: &mut dyn RngPort,
        events: &mut dyn EventSink,
    ) -> Result<()> {
        self.control_cycles += 1;
        let delta_ms = now_ms.wrapping_sub(self.last_tick_ms);
        self.last_tick_ms = now_ms;

        if self.state.feed_mode_active && now_ms.wrapping_sub(self.state.feed_mode_until_ms) < u32::MAX / 2
        {
            self.state.feed_mode_active = false;
            events.emit(&ControllerEvent::FeedModeChanged { active: false });
        }

        // 1-2. Buttons → operator commands.
        let ato_alarm_active = self.ato.timeout_alarm || self.ato.reservoir_alarm;
        let light_is_daylight = self.lighting.state().mode == LightMode::Daylight;
        let mut commands: heapless::Vec<OperatorCommand, 4> = heapless::Vec::new();
        self.buttons.poll(
            now_ms,
            &self.config,
            button_readings,
            ato_alarm_active,
            light_is_daylight,
            |cmd| {
                let _ = commands.push(cmd);
            },
        );
        for cmd in commands {
            self.handle_command(cmd, now_ms, ir, rng, events);
        }

        // 3. Temperatures.
        let sump_was_valid = self.temps.sump_valid;
        let display_was_valid = self.temps.display_valid;
        temperature::read_all(&mut self.temps, sump, display);
        if (sump_was_valid && !self.temps.sump_valid) || (display_was_valid && !self.temps.display_valid) {
            let probe = if !self.temps.sump_valid { "sump" } else { "display" };
            self.fault_history.record(ControllerEvent::SensorError { probe });
        }

        // 4. Differential check.
        if temperature::check_differential(&mut self.temps, now_ms, &self.config, events) {
            self.state.alarm_silenced = false;
            self.buzzer.queue(2);
        }

        // 5. Over-temperature fault → latch emergency stop.
        if temperature::over_temp_fault_active(&self.temps, &self.config) && !self.state.emergency_stop {
            warn!("over-temperature fault: sump={} display={}", self.temps.sump_f, self.temps.display_f);
            let fault_event = ControllerEvent::OverTemperatureFault {
                sump_f_x10: (self.temps.sump_f * 10.0) as i32,
                display_f_x10: (self.temps.display_f * 10.0) as i32,
            };
            events.emit(&fault_event);
            self.fault_history.record(fault_event);
            self.state.alarm_silenced = false;
            mode_supervisor::trigger_fault_stop(&mut self.state, events);
            self.fault_history.record(ControllerEvent::FaultStopTriggered);
        }

        // 6. Heaters.
        {
            let mut gateway = ActuatorGateway::new(relays, &self.config);
            heater::control(
                &mut self.heater,
                &self.temps,
                &self.config,
                self.state.emergency_stop,
                &mut gateway,
                events,
            )?;
        }

        // 7. ATO.
        let reservoir_was_alarmed = self.ato.reservoir_alarm;
        let timeout_was_alarmed = self.ato.timeout_alarm;
        {
            let mut gateway = ActuatorGateway::new(relays, &self.config);
            ato::handle(
                &mut self.ato,
                now_ms,
                &self.config,
                self.state.emergency_stop,
                floats,
                &mut gateway,
                &mut self.buzzer,
                events,
            )?;
        }
        if !reservoir_was_alarmed && self.ato.reservoir_alarm {
            self.state.alarm_silenced = false;
            self.fault_history.record(ControllerEvent::AtoReservoirEmpty);
        }
        if !timeout_was_alarmed && self.ato.timeout_alarm {
            self.state.alarm_silenced = false;
            self.fault_history.record(ControllerEvent::AtoTimeoutAlarm {
                runtime_ms: now_ms.wrapping_sub(self.ato.start_ms),
            });
        }

        // Sync the aggregate fault bitmask from the live conditions this
        // cycle just established, for diagnostics and external reporting.
        let mut flags = FaultFlags::empty();
        if temperature::over_temp_fault_active(&self.temps, &self.config) {
            flags.set(Fault::OverTemperature);
        }
        if self.ato.timeout_alarm {
            flags.set(Fault::AtoTimeout);
        }
        if self.ato.reservoir_alarm {
            flags.set(Fault::AtoReservoirEmpty);
        }
        if !self.temps.sump_valid || !self.temps.display_valid {
            flags.set(Fault::SensorError);
        }
        self.state.fault_flags = flags;

        // 8. Lighting schedule.
        self.lighting.handle_schedule(
            now_ms,
            rtc.minutes_since_midnight(),
            rtc.day,
            &self.config,
            ir,
            rng,
            events,
        );

        // 9. Clouds.
        self.lighting.handle_clouds(now_ms, &self.config, ir, rng, events);

        // Buzzer sequencer advances every cycle regardless of what fired.
        self.buzzer.tick(delta_ms, buzzer_hw, self.state.alarm_silenced);

        Ok(())
    }

    fn handle_command(
        &mut self,
        cmd: OperatorCommand,
        now_ms: u32,
        ir: &mut dyn IrPort,
        rng: &mut dyn RngPort,
        events: &mut dyn EventSink,
    ) {
        match cmd {
            OperatorCommand::ToggleFeedMode => {
                self.state.feed_mode_active = !self.state.feed_mode_active;
                if self.state.feed_mode_active {
                    self.state.feed_mode_until_ms = now_ms.wrapping_add(self.config.feed_mode_duration_ms);
                }
                events.emit(&ControllerEvent::FeedModeChanged {
                    active: self.state.feed_mode_active,
                });
            }
            OperatorCommand::TogglePhotoMode => {
                self.state.photo_mode_active = !self.state.photo_mode_active;
                if self.state.photo_mode_active {
                    self.lighting.enter_photo_mode(ir);
                } else {
                    self.lighting.exit_photo_mode(ir);
                }
                events.emit(&ControllerEvent::PhotoModeChanged {
                    active: self.state.photo_mode_active,
                });
            }
            OperatorCommand::ToggleLightSchedule => {
                let enabled = !self.lighting.state().schedule_enabled;
                self.lighting.set_schedule_enabled(enabled);
                events.emit(&ControllerEvent::LightScheduleToggled { enabled });
            }
            OperatorCommand::ToggleLightsManual => {
                self.lighting.toggle_lights_manual(ir);
            }
            OperatorCommand::TriggerManualCloud => {
                self.lighting
                    .trigger_manual_cloud(now_ms, &self.config, ir, rng, events);
            }
            OperatorCommand::ResetAtoAlarm => {
                let was_alarmed = self.ato.timeout_alarm || self.ato.reservoir_alarm;
                ato::reset(&mut self.ato, now_ms, events);
                if was_alarmed {
                    self.fault_history.record(ControllerEvent::AtoAlarmReset);
                }
                self.buzzer.queue(1);
            }
            OperatorCommand::SilenceAlarm => {
                self.state.alarm_silenced = true;
                events.emit(&ControllerEvent::AlarmSilenced);
            }
            OperatorCommand::TriggerEmergencyStop => {
                let was_stopped = self.state.emergency_stop;
                mode_supervisor::trigger_emergency_stop(&mut self.state, events);
                if !was_stopped && self.state.emergency_stop {
                    self.fault_history.record(ControllerEvent::EmergencyStopTriggered);
                }
            }
            OperatorCommand::ResetEmergencyStop => {
                let fault_active = temperature::over_temp_fault_active(&self.temps, &self.config)
                    || self.ato.timeout_alarm
                    || self.ato.reservoir_alarm;
                let was_stopped = self.state.emergency_stop;
                mode_supervisor::reset_emergency_stop(&mut self.state, fault_active, events);
                if was_stopped && !self.state.emergency_stop {
                    self.fault_history.record(ControllerEvent::EmergencyStopCleared);
                } else if was_stopped && self.state.emergency_stop {
                    self.fault_history.record(ControllerEvent::EmergencyStopResetRefused);
                }
            }
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn ato_state(&self) -> &AtoState {
        &self.ato
    }

    pub fn lighting_mode(&self) -> LightMode {
        self.lighting.state().mode
    }

    pub fn control_cycles(&self) -> u64 {
        self.control_cycles
    }

    /// `RuntimeMetrics::collect`: a point-in-time snapshot for logging or an
    /// operator query, not pushed anywhere on its own.
    pub fn diagnostics_snapshot(&self, now_ms: u32) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot::collect(
            now_ms.wrapping_sub(self.boot_ms),
            self.control_cycles,
            self.state.fault_flags,
        )
    }

    pub fn fault_history(&self) -> &[ControllerEvent] {
        self.fault_history.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::{ButtonPanelReadings, FloatSwitchReadings, RelayId};
    use crate::clock::SeededRng;

    struct NullRelay;
    impl RelayPort for NullRelay {
        fn set_relay(&mut self, _id: RelayId, _on: bool) -> Result<()> {
            Ok(())
        }
    }
    struct NullIr;
    impl IrPort for NullIr {
        fn send(&mut self, _command: u8) -> Result<()> {
            Ok(())
        }
    }
    struct NullBuzzer;
    impl BuzzerPort for NullBuzzer {
        fn tone(&mut self, _freq_hz: u32, _duration_ms: u32) -> Result<()> {
            Ok(())
        }
    }
    struct FixedTemp(f32);
    impl TemperatureSensorPort for FixedTemp {
        fn read_celsius(&mut self) -> Result<f32> {
            Ok(self.0)
        }
    }
    struct NoFloatTrigger;
    impl FloatSwitchPort for NoFloatTrigger {
        fn read(&mut self) -> Result<FloatSwitchReadings> {
            Ok(FloatSwitchReadings {
                low_line_high: true,
                high_line_high: true,
                reservoir_line_high: true,
            })
        }
    }
    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &ControllerEvent) {}
    }

    fn idle_buttons() -> ButtonPanelReadings {
        ButtonPanelReadings {
            yellow_line_high: true,
            blue_line_high: true,
            green_line_high: true,
            estop_line_high: true,
        }
    }

    fn noon_rtc() -> RtcReading {
        RtcReading {
            year: 2026,
            month: 1,
            day: 1,
            hour: 12,
            minute: 0,
            second: 0,
        }
    }

    #[test]
    fn over_temperature_latches_emergency_stop() {
        let config = AquariumConfig::default();
        let over_temp = config.temp_emergency_high_f;
        let mut core = ControllerCore::new(config);
        let mut relays = NullRelay;
        let mut ir = NullIr;
        let mut buzzer = NullBuzzer;
        let mut sump = FixedTemp((over_temp - 32.0) * 5.0 / 9.0);
        let mut display = FixedTemp(25.0);
        let mut floats = NoFloatTrigger;
        let mut rng = SeededRng::from_seed(1);
        let mut events = NullSink;

        core.tick(
            1_000,
            noon_rtc(),
            &mut relays,
            &mut ir,
            &mut buzzer,
            &mut sump,
            &mut display,
            &mut floats,
            idle_buttons(),
            &mut rng,
            &mut events,
        )
        .unwrap();

        assert!(core.state().emergency_stop);
    }

    #[test]
    fn feed_mode_toggles_on_yellow_press() {
        let debounce_ms = AquariumConfig::default().button_debounce_ms;
        let mut core = ControllerCore::new(AquariumConfig::default());
        let mut relays = NullRelay;
        let mut ir = NullIr;
        let mut buzzer = NullBuzzer;
        let mut sump = FixedTemp(25.5);
        let mut display = FixedTemp(25.5);
        let mut floats = NoFloatTrigger;
        let mut rng = SeededRng::from_seed(1);
        let mut events = NullSink;

        fn yellow_pressed() -> ButtonPanelReadings {
            ButtonPanelReadings {
                yellow_line_high: false,
                ..idle_buttons()
            }
        }

        core.tick(
            0,
            noon_rtc(),
            &mut relays,
            &mut ir,
            &mut buzzer,
            &mut sump,
            &mut display,
            &mut floats,
            idle_buttons(),
            &mut rng,
            &mut events,
        )
        .unwrap();

        // First call with the changed reading only records the transition
        // timestamp; the debounced state flips on a later call made past
        // `button_debounce_ms`, matching the two-call debounce contract in
        // `buttons.rs`.
        core.tick(
            100,
            noon_rtc(),
            &mut relays,
            &mut ir,
            &mut buzzer,
            &mut sump,
            &mut display,
            &mut floats,
            yellow_pressed(),
            &mut rng,
            &mut events,
        )
        .unwrap();

        core.tick(
            100 + debounce_ms + 1,
            noon_rtc(),
            &mut relays,
            &mut ir,
            &mut buzzer,
            &mut sump,
            &mut display,
            &mut floats,
            yellow_pressed(),
            &mut rng,
            &mut events,
        )
        .unwrap();

        assert!(core.state().feed_mode_active);
    }
}

//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured [`ControllerEvent`]s to
//! the `log` facade (ESP-IDF UART in production, `env_logger` on host
//! builds). The domain core never formats text itself (redesign flag,
//! spec §9) — this is the one place event-to-string happens.

use log::{info, warn};

use crate::app::events::ControllerEvent;
use crate::app::ports::EventSink;

pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControllerEvent) {
        match *event {
            ControllerEvent::TemperatureDifferentialWarning { sump_f_x10, display_f_x10 } => {
                warn!(
                    "temp differential: sump={:.1}F display={:.1}F",
                    sump_f_x10 as f32 / 10.0,
                    display_f_x10 as f32 / 10.0
                );
            }
            ControllerEvent::OverTemperatureFault { sump_f_x10, display_f_x10 } => {
                warn!(
                    "OVER-TEMPERATURE: sump={:.1}F display={:.1}F — emergency stop latched",
                    sump_f_x10 as f32 / 10.0,
                    display_f_x10 as f32 / 10.0
                );
            }
            ControllerEvent::HeaterChanged { primary_on } => {
                info!("heater: primary {}", if primary_on { "on" } else { "off" });
            }
            ControllerEvent::AtoPumpStarted => info!("ato: pump started"),
            ControllerEvent::AtoPumpStopped { runtime_ms } => {
                info!("ato: pump stopped after {runtime_ms}ms");
            }
            ControllerEvent::AtoTimeoutAlarm { runtime_ms } => {
                warn!("ato: pump ran {runtime_ms}ms without reaching the high float — alarm");
            }
            ControllerEvent::AtoReservoirEmpty => warn!("ato: reservoir empty"),
            ControllerEvent::AtoReservoirRefilled => info!("ato: reservoir refilled"),
            ControllerEvent::AtoAlarmReset => info!("ato: alarms reset by operator"),
            ControllerEvent::LightModeChanged { from, to } => {
                info!("lighting: {from:?} -> {to:?}");
            }
            ControllerEvent::CloudStarted => info!("lighting: cloud started"),
            ControllerEvent::CloudEnded => info!("lighting: cloud ended"),
            ControllerEvent::EmergencyStopTriggered => warn!("emergency stop: operator triggered"),
            ControllerEvent::FaultStopTriggered => warn!("emergency stop: fault triggered"),
            ControllerEvent::EmergencyStopCleared => info!("emergency stop: cleared"),
            ControllerEvent::EmergencyStopResetRefused => {
                warn!("emergency stop: reset refused, a fault is still active");
            }
            ControllerEvent::FeedModeChanged { active } => {
                info!("feed mode: {}", if active { "entered" } else { "exited" });
            }
            ControllerEvent::PhotoModeChanged { active } => {
                info!("photo mode: {}", if active { "entered" } else { "exited" });
            }
            ControllerEvent::LightScheduleToggled { enabled } => {
                info!("light schedule: {}", if enabled { "enabled" } else { "disabled" });
            }
            ControllerEvent::AlarmSilenced => info!("alarm silenced by operator"),
            ControllerEvent::SensorError { probe } => warn!("sensor error: {probe}"),
        }
    }
}

//! Outbound controller events.
//!
//! [`ControllerCore`](super::service::ControllerCore) emits these through
//! the [`EventSink`](super::ports::EventSink) port instead of printing
//! emoji-tagged strings directly, so tests can assert on events rather than
//! parsing log text (redesign flag, spec §9).

use crate::lighting::LightMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEvent {
    /// `checkTemperatureDifferential()` fired (throttled to 1/min).
    TemperatureDifferentialWarning { sump_f_x10: i32, display_f_x10: i32 },
    /// Over-temperature fault latched emergency stop.
    OverTemperatureFault { sump_f_x10: i32, display_f_x10: i32 },
    /// Primary heater changed state.
    HeaterChanged { primary_on: bool },
    /// ATO pump turned on.
    AtoPumpStarted,
    /// ATO pump turned off (normal high-float stop).
    AtoPumpStopped { runtime_ms: u32 },
    /// ATO pump ran past `ato_timeout_ms`.
    AtoTimeoutAlarm { runtime_ms: u32 },
    /// ATO reservoir empty detected.
    AtoReservoirEmpty,
    /// ATO reservoir refilled.
    AtoReservoirRefilled,
    /// Operator cleared ATO alarms.
    AtoAlarmReset,
    /// Lighting mode transitioned.
    LightModeChanged { from: LightMode, to: LightMode },
    /// A manual or scheduled cloud started.
    CloudStarted,
    /// Cloud cover fully recovered.
    CloudEnded,
    /// Operator-triggered emergency stop.
    EmergencyStopTriggered,
    /// Fault-triggered emergency stop (over-temperature).
    FaultStopTriggered,
    /// Emergency stop cleared via the Blue+E-stop combo.
    EmergencyStopCleared,
    /// Reset refused because a fault condition is still active.
    EmergencyStopResetRefused,
    /// Feed mode entered or exited.
    FeedModeChanged { active: bool },
    /// Photo mode entered or exited.
    PhotoModeChanged { active: bool },
    /// Light schedule enabled/disabled by the operator.
    LightScheduleToggled { enabled: bool },
    /// Alarm silenced by the operator.
    AlarmSilenced,
    /// A temperature probe reading is stale or out of range; dependent
    /// actuators were forced off.
    SensorError { probe: &'static str },
}

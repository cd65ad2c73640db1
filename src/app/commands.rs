//! Inbound commands to the controller core.
//!
//! These represent actions requested by the button/gesture layer (today)
//! or any future front end, interpreted by
//! [`ControllerCore`](super::service::ControllerCore).

/// Commands the button layer (or a future operator interface) feeds into
/// the controller core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Yellow short press.
    ToggleFeedMode,
    /// Green press < 3 s.
    TogglePhotoMode,
    /// Green press ≥ 3 s.
    ToggleLightSchedule,
    /// Blue short press with no active ATO alarm, mode != Daylight.
    ToggleLightsManual,
    /// Blue short press with mode == Daylight, no active ATO alarm.
    TriggerManualCloud,
    /// Blue short press with an active ATO alarm.
    ResetAtoAlarm,
    /// Blue long-press release (silence current alarm).
    SilenceAlarm,
    /// E-stop press without an armed combo.
    TriggerEmergencyStop,
    /// E-stop press while Blue is held and the combo is armed.
    ResetEmergencyStop,
}

//! Aggregate data model.
//!
//! A single mutable struct owned by the event loop and threaded by mutable
//! reference through every subsystem call, generalizing the teacher FSM
//! engine's `FsmContext` aggregate-struct pattern from one state machine's
//! context to the whole controller's shared state. No hidden globals.

use crate::fault::FaultFlags;

/// Process-wide controller state. Constructed at boot, never destroyed.
#[derive(Debug, Clone)]
pub struct ControllerState {
    /// Latched; cleared only by the operator Blue+E-stop combo.
    pub emergency_stop: bool,
    /// Suppresses the buzzer until the next distinct alarm event.
    pub alarm_silenced: bool,
    pub feed_mode_active: bool,
    pub feed_mode_until_ms: u32,
    pub photo_mode_active: bool,
    /// Mirrors the live fault conditions each tick; see [`crate::fault`].
    pub fault_flags: FaultFlags,
}

impl ControllerState {
    pub fn new() -> Self {
        Self {
            emergency_stop: false,
            alarm_silenced: false,
            feed_mode_active: false,
            feed_mode_until_ms: 0,
            photo_mode_active: false,
            fault_flags: FaultFlags::empty(),
        }
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

/// ATO controller state (see [`crate::ato::AtoController`]).
#[derive(Debug, Clone, Default)]
pub struct AtoState {
    pub running: bool,
    pub start_ms: u32,
    pub last_run_end_ms: u32,
    /// Latched; cleared only by operator reset.
    pub timeout_alarm: bool,
    /// Auto-clears on reservoir refill edge.
    pub reservoir_alarm: bool,
}

/// Heater relay state.
#[derive(Debug, Clone, Default)]
pub struct HeaterState {
    pub primary_on: bool,
    /// Backup heater is unconditionally forced off in this design — the
    /// field exists so the contract is explicit. Reserved hardware; not
    /// wired to any control path.
    pub backup_on: bool,
}

/// Latest temperature readings. A reading outside `[-100, 150]` °F is a
/// sensor fault; the previous valid reading is retained and flagged stale.
#[derive(Debug, Clone)]
pub struct TempReadings {
    pub sump_f: f32,
    pub display_f: f32,
    pub sump_valid: bool,
    pub display_valid: bool,
    pub last_diff_alert_ms: u32,
}

impl Default for TempReadings {
    fn default() -> Self {
        Self {
            sump_f: 0.0,
            display_f: 0.0,
            sump_valid: false,
            display_valid: false,
            last_diff_alert_ms: 0,
        }
    }
}

/// Per-button debounce / gesture bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonState {
    pub last_reading: bool,
    pub current_state: bool,
    pub last_change_ms: u32,
    pub press_start_ms: u32,
}

//! Port traits — the hexagonal boundary between domain logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControllerCore (domain)
//! ```
//!
//! Driven adapters (relays, IR, buzzer, sensors, event sinks) implement
//! these traits. [`ControllerCore`](super::service::ControllerCore)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Relay bank
// ───────────────────────────────────────────────────────────────

/// Logical relay identifiers (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayId {
    HeaterPrimary,
    HeaterBackup,
    AtoPump,
    GyreOutlet,
}

/// Write-side port: the gateway is the sole caller of this trait.
pub trait RelayPort {
    fn set_relay(&mut self, id: RelayId, on: bool) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// IR transmitter
// ───────────────────────────────────────────────────────────────

/// Raw NEC command byte dispatch. Each send blocks for the documented
/// worst-case gap (spec §5 design note — accepted blocking, Option (b)).
pub trait IrPort {
    /// Send one NEC command. Blocks ~100 ms (inter-command gap, spec §4.5).
    fn send(&mut self, command: u8) -> Result<()>;

    /// Block for `ms` beyond the per-command gap, for the extra settle
    /// delays the original sequences interleave between sends (e.g. the
    /// 200 ms pause between a sunrise step's two channel adjustments).
    /// Default no-op lets host/test adapters skip real wall-clock waits.
    fn settle(&mut self, _ms: u32) {}
}

// ───────────────────────────────────────────────────────────────
// Buzzer
// ───────────────────────────────────────────────────────────────

pub trait BuzzerPort {
    /// Drive the piezo at `freq_hz` for `duration_ms`, then silence.
    fn tone(&mut self, freq_hz: u32, duration_ms: u32) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Temperature sensors
// ───────────────────────────────────────────────────────────────

pub trait TemperatureSensorPort {
    /// Request a conversion and return the result in °C. Blocks ~750 ms
    /// (1-Wire conversion time, spec §5).
    fn read_celsius(&mut self) -> Result<f32>;
}

// ───────────────────────────────────────────────────────────────
// Float switches (ATO)
// ───────────────────────────────────────────────────────────────

/// Raw digital readings from the three ATO float switches; polarity
/// interpretation happens in [`crate::ato::AtoController`].
pub struct FloatSwitchReadings {
    pub low_line_high: bool,
    pub high_line_high: bool,
    pub reservoir_line_high: bool,
}

pub trait FloatSwitchPort {
    fn read(&mut self) -> Result<FloatSwitchReadings>;
}

// ───────────────────────────────────────────────────────────────
// Panel buttons + e-stop
// ───────────────────────────────────────────────────────────────

/// Raw digital readings from the three panel buttons (on the I²C
/// expander) and the direct-GPIO e-stop line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonPanelReadings {
    pub yellow_line_high: bool,
    pub blue_line_high: bool,
    pub green_line_high: bool,
    pub estop_line_high: bool,
}

pub trait ButtonPanelPort {
    fn read(&mut self) -> Result<ButtonPanelReadings>;
}

// ───────────────────────────────────────────────────────────────
// Event sink
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`ControllerEvent`](super::events::ControllerEvent)s
/// through this port. Adapters decide where they go — serial log today,
/// anything else tomorrow.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControllerEvent);
}

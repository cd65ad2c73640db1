//! Unified error types for the reef controller firmware.
//!
//! A single `Error` enum that every subsystem funnels fallible operations
//! into, keeping the top-level control loop's error handling uniform. All
//! variants are `Copy` so they move through the tick loop without
//! allocation. Latched safety conditions (over-temperature, ATO timeout,
//! operator e-stop, ...) are *not* represented here — they are state on
//! [`crate::state::ControllerState`], observed on the next tick rather than
//! propagated as `Result::Err`. See [`crate::fault`].

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// 1-Wire conversion returned no response or a CRC mismatch.
    ConversionFailed,
    /// Reading is outside the physically plausible window.
    OutOfRange,
    /// I²C transaction with the button/float-switch expander failed.
    ExpanderReadFailed,
    /// RTC read failed (bus error or lost oscillator).
    RtcReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConversionFailed => write!(f, "1-Wire conversion failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::ExpanderReadFailed => write!(f, "I2C expander read failed"),
            Self::RtcReadFailed => write!(f, "RTC read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Relay bank write failed.
    RelayWriteFailed,
    /// IR transmit failed (e.g. LEDC channel busy).
    IrSendFailed,
    /// Buzzer tone primitive failed.
    BuzzerWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RelayWriteFailed => write!(f, "relay write failed"),
            Self::IrSendFailed => write!(f, "IR send failed"),
            Self::BuzzerWriteFailed => write!(f, "buzzer write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

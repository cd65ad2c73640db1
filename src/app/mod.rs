//! Application core — pure domain logic, zero I/O.
//!
//! Control rules for the reef controller: button gesture dispatch, ATO and
//! heater control, lighting schedule/cloud simulation, and emergency-stop
//! supervision. All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;

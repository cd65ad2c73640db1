//! Outer-ring adapters that aren't hardware drivers.
//!
//! Everything that touches silicon lives in [`crate::drivers`]; this module
//! is for the one remaining adapter that doesn't — the log-based event
//! sink. The teacher's `adapters/` also carries BLE/WiFi/mDNS/NVS/RPC
//! adapters; none of those have a counterpart here (no networking, no
//! persistent configuration storage).

pub mod log_sink;

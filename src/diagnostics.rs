//! In-memory fault history and runtime diagnostics snapshot.
//!
//! No persistent storage is wired here (persistence is out of scope for
//! this system) — this is a RAM-only ring buffer that survives a session,
//! not a reboot. Grounded on the teacher's `diagnostics.rs` `CrashLog`
//! ring-buffer shape, stripped of its NVS backing and collapsed to a
//! fixed-capacity `heapless::Vec` the way the rest of this crate avoids
//! the heap.

use crate::app::events::ControllerEvent;
use crate::fault::FaultFlags;

const HISTORY_CAPACITY: usize = 16;

/// Ring buffer of the most recent fault-relevant events.
#[derive(Default)]
pub struct FaultHistory {
    entries: heapless::Vec<ControllerEvent, HISTORY_CAPACITY>,
    write_index: usize,
}

impl FaultHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: ControllerEvent) {
        if self.entries.len() < HISTORY_CAPACITY {
            let _ = self.entries.push(event);
        } else {
            self.entries[self.write_index] = event;
        }
        self.write_index = (self.write_index + 1) % HISTORY_CAPACITY;
    }

    pub fn entries(&self) -> &[ControllerEvent] {
        &self.entries
    }
}

/// On-demand runtime diagnostics, collected the same way each tick rather
/// than pushed, matching the teacher's `RuntimeMetrics::collect`.
#[derive(Debug, Clone)]
pub struct DiagnosticsSnapshot {
    pub uptime_ms: u32,
    pub control_cycles: u64,
    pub fault_flags: FaultFlags,
}

impl DiagnosticsSnapshot {
    pub fn collect(uptime_ms: u32, control_cycles: u64, fault_flags: FaultFlags) -> Self {
        Self {
            uptime_ms,
            control_cycles,
            fault_flags,
        }
    }
}

/// Install a panic hook that logs the panic reason before the device
/// resets. No crash entry is persisted (no storage layer in this system);
/// this only ensures the reason reaches the serial log instead of being
/// silently lost to the reset.
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };
        log::error!("PANIC: {reason}");
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_wraps_after_capacity() {
        let mut history = FaultHistory::new();
        for _ in 0..(HISTORY_CAPACITY + 3) {
            history.record(ControllerEvent::AtoAlarmReset);
        }
        assert_eq!(history.entries().len(), HISTORY_CAPACITY);
    }

    #[test]
    fn records_preserve_order_within_capacity() {
        let mut history = FaultHistory::new();
        history.record(ControllerEvent::AtoReservoirEmpty);
        history.record(ControllerEvent::AtoReservoirRefilled);
        assert_eq!(history.entries()[0], ControllerEvent::AtoReservoirEmpty);
        assert_eq!(history.entries()[1], ControllerEvent::AtoReservoirRefilled);
    }
}

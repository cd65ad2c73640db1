//! Emergency-stop and fault-stop supervision.
//!
//! Grounded on the teacher's `safety.rs` latch-and-require-explicit-clear
//! pattern, generalized from a bitmask-only gate to the explicit
//! `ControllerState::emergency_stop` flag this system exposes to the
//! operator (the teacher never lets an operator clear safety faults by
//! hand; this system does, via the Blue+E-stop combo, but only when every
//! fault condition has actually cleared).

use crate::app::events::ControllerEvent;
use crate::app::ports::EventSink;
use crate::state::ControllerState;

/// Operator-triggered stop (`triggerEmergencyStop` in `main.cpp`).
pub fn trigger_emergency_stop(state: &mut ControllerState, events: &mut dyn EventSink) {
    if !state.emergency_stop {
        state.emergency_stop = true;
        events.emit(&ControllerEvent::EmergencyStopTriggered);
    }
}

/// Fault-triggered stop (`triggerFaultStop`, e.g. over-temperature).
pub fn trigger_fault_stop(state: &mut ControllerState, events: &mut dyn EventSink) {
    if !state.emergency_stop {
        state.emergency_stop = true;
        events.emit(&ControllerEvent::FaultStopTriggered);
    }
}

/// Blue+E-stop combo reset. Refused while `fault_active` reports any
/// latched fault condition still holding, so the operator cannot silence a
/// genuine over-temperature or reservoir condition back into operation.
pub fn reset_emergency_stop(state: &mut ControllerState, fault_active: bool, events: &mut dyn EventSink) {
    if !state.emergency_stop {
        return;
    }
    if fault_active {
        events.emit(&ControllerEvent::EmergencyStopResetRefused);
        return;
    }
    state.emergency_stop = false;
    events.emit(&ControllerEvent::EmergencyStopCleared);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recording(Vec<ControllerEvent>);
    impl EventSink for Recording {
        fn emit(&mut self, event: &ControllerEvent) {
            self.0.push(*event);
        }
    }

    #[test]
    fn reset_refused_while_fault_active() {
        let mut state = ControllerState {
            emergency_stop: true,
            ..ControllerState::new()
        };
        let mut sink = Recording(vec![]);
        reset_emergency_stop(&mut state, true, &mut sink);
        assert!(state.emergency_stop);
        assert_eq!(sink.0, vec![ControllerEvent::EmergencyStopResetRefused]);
    }

    #[test]
    fn reset_clears_when_no_fault_active() {
        let mut state = ControllerState {
            emergency_stop: true,
            ..ControllerState::new()
        };
        let mut sink = Recording(vec![]);
        reset_emergency_stop(&mut state, false, &mut sink);
        assert!(!state.emergency_stop);
        assert_eq!(sink.0, vec![ControllerEvent::EmergencyStopCleared]);
    }

    #[test]
    fn trigger_is_idempotent() {
        let mut state = ControllerState::new();
        let mut sink = Recording(vec![]);
        trigger_emergency_stop(&mut state, &mut sink);
        trigger_emergency_stop(&mut state, &mut sink);
        assert_eq!(sink.0.len(), 1);
    }
}

//! Relay write gateway — the single place emergency-stop masking and
//! NC-wiring polarity inversion happen, so no caller can accidentally
//! energize a relay while the system is stopped.
//!
//! Grounded on the teacher's `safety.rs`, which gates every actuator write
//! behind `SafetyMonitor::is_safe()` before it reaches the driver; this
//! generalizes that single global gate into a per-relay mask (the gyre
//! outlet stays under operator control during an e-stop, the heater and
//! ATO pump do not).

use crate::app::ports::{RelayId, RelayPort};
use crate::config::AquariumConfig;
use crate::error::Result;

pub struct ActuatorGateway<'a, R: RelayPort> {
    relays: &'a mut R,
    config: &'a AquariumConfig,
}

impl<'a, R: RelayPort> ActuatorGateway<'a, R> {
    pub fn new(relays: &'a mut R, config: &'a AquariumConfig) -> Self {
        Self { relays, config }
    }

    /// Write `id`'s relay to `on`, subject to:
    /// - emergency stop forces `HeaterPrimary`/`HeaterBackup`/`AtoPump` off
    /// - `GyreOutlet` is wired normally-closed when `gyre_wired_nc` is set,
    ///   so the logical "on" (flowing) state inverts the line level
    pub fn set_relay(&mut self, id: RelayId, on: bool, emergency_stop: bool) -> Result<()> {
        let effective = match id {
            RelayId::HeaterPrimary | RelayId::HeaterBackup | RelayId::AtoPump => {
                on && !emergency_stop
            }
            RelayId::GyreOutlet => on,
        };

        let line_level = match id {
            RelayId::GyreOutlet if self.config.gyre_wired_nc => !effective,
            _ => effective,
        };

        self.relays.set_relay(id, line_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingRelay {
        writes: RefCell<Vec<(RelayId, bool)>>,
    }

    impl RelayPort for RecordingRelay {
        fn set_relay(&mut self, id: RelayId, on: bool) -> Result<()> {
            self.writes.borrow_mut().push((id, on));
            Ok(())
        }
    }

    #[test]
    fn emergency_stop_forces_heater_off() {
        let config = AquariumConfig::default();
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        gateway.set_relay(RelayId::HeaterPrimary, true, true).unwrap();
        assert_eq!(relay.writes.borrow()[0], (RelayId::HeaterPrimary, false));
    }

    #[test]
    fn gyre_outlet_unaffected_by_emergency_stop() {
        let config = AquariumConfig::default();
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        gateway.set_relay(RelayId::GyreOutlet, true, true).unwrap();
        // NC-wired: logical "on" (flowing) drives the line low.
        assert_eq!(relay.writes.borrow()[0], (RelayId::GyreOutlet, false));
    }

    #[test]
    fn gyre_outlet_non_nc_wiring_passes_through() {
        let mut config = AquariumConfig::default();
        config.gyre_wired_nc = false;
        let mut relay = RecordingRelay {
            writes: RefCell::new(vec![]),
        };
        let mut gateway = ActuatorGateway::new(&mut relay, &config);
        gateway.set_relay(RelayId::GyreOutlet, true, false).unwrap();
        assert_eq!(relay.writes.borrow()[0], (RelayId::GyreOutlet, true));
    }
}

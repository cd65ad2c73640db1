//! Relay bank driver — a 4-bit shift register (CS/CLK/DATA) driving the
//! heater, ATO pump, and gyre outlet relays.
//!
//! Grounded on the teacher's `drivers/pump.rs` dual-target shape (hardware
//! writes delegate to [`hw_init`](crate::drivers::hw_init), host/test
//! builds track state purely in memory) — generalized from one PWM+GPIO
//! actuator to four independently latched bits shifted out serially.

use crate::app::ports::{RelayId, RelayPort};
use crate::drivers::hw_init;
use crate::error::Result;
use crate::pins;

fn relay_bit(id: RelayId) -> u8 {
    match id {
        RelayId::HeaterPrimary => 0,
        RelayId::HeaterBackup => 1,
        RelayId::AtoPump => 2,
        RelayId::GyreOutlet => 3,
    }
}

pub struct RelayBankDriver {
    /// Last-shifted state, one bit per [`RelayId`]; re-sent in full on every
    /// write since the shift register has no per-bit addressing.
    latch: u8,
}

impl RelayBankDriver {
    pub fn new() -> Self {
        Self { latch: 0 }
    }

    fn shift_out(&self) {
        hw_init::gpio_write(pins::RELAY_CS_GPIO, false);
        for bit in (0..4).rev() {
            let high = (self.latch >> bit) & 1 != 0;
            hw_init::gpio_write(pins::RELAY_DATA_GPIO, high);
            hw_init::gpio_write(pins::RELAY_CLK_GPIO, true);
            hw_init::delay_us(1);
            hw_init::gpio_write(pins::RELAY_CLK_GPIO, false);
        }
        hw_init::gpio_write(pins::RELAY_CS_GPIO, true);
    }
}

impl Default for RelayBankDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayPort for RelayBankDriver {
    fn set_relay(&mut self, id: RelayId, on: bool) -> Result<()> {
        let bit = relay_bit(id);
        if on {
            self.latch |= 1 << bit;
        } else {
            self.latch &= !(1 << bit);
        }
        self.shift_out();
        Ok(())
    }
}

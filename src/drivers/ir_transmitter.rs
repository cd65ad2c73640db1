//! NEC-protocol IR transmitter driver.
//!
//! Bit-bangs the 38 kHz carrier via LEDC (duty toggled on/off to approximate
//! the mark/space timing) rather than a dedicated RMT channel, matching the
//! rest of this tree's preference for the simpler peripheral over a more
//! capable one when either gets the job done. Grounded on the teacher's
//! `drivers/pump.rs` LEDC usage for the carrier and `drivers/hw_init.rs`
//! for the raw timing primitives; the NEC frame format itself comes from
//! `original_source/lighting.h`'s `IR_ADDRESS` and command table.

use crate::app::ports::IrPort;
use crate::drivers::hw_init;
use crate::error::Result;
use crate::lighting::ir::IR_ADDRESS;

const CARRIER_FREQ_HZ: u32 = 38_000;

pub struct IrTransmitterDriver;

impl IrTransmitterDriver {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "espidf")]
    fn mark(&self, us: u32) {
        hw_init::ledc_set(hw_init::LEDC_CH_IR, 128);
        hw_init::delay_us(us);
    }

    #[cfg(target_os = "espidf")]
    fn space(&self, us: u32) {
        hw_init::ledc_set(hw_init::LEDC_CH_IR, 0);
        hw_init::delay_us(us);
    }

    #[cfg(target_os = "espidf")]
    fn send_bit(&self, bit: bool) {
        self.mark(560);
        self.space(if bit { 1_690 } else { 560 });
    }

    #[cfg(target_os = "espidf")]
    fn send_byte(&self, byte: u8) {
        for i in 0..8 {
            self.send_bit((byte >> i) & 1 != 0);
        }
    }
}

impl Default for IrTransmitterDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl IrPort for IrTransmitterDriver {
    fn send(&mut self, command: u8) -> Result<()> {
        #[cfg(target_os = "espidf")]
        {
            let addr_lo = (IR_ADDRESS & 0xFF) as u8;
            let addr_hi = (IR_ADDRESS >> 8) as u8;

            self.mark(9_000);
            self.space(4_500);
            self.send_byte(addr_lo);
            self.send_byte(addr_hi);
            self.send_byte(command);
            self.send_byte(!command);
            self.mark(560);
            hw_init::ledc_set(hw_init::LEDC_CH_IR, 0);

            // Inter-command gap: the fixture's IR receiver needs this much
            // quiet time before it will decode the next frame.
            hw_init::delay_us(100_000);
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let _ = (command, CARRIER_FREQ_HZ);
        }

        Ok(())
    }

    fn settle(&mut self, ms: u32) {
        hw_init::delay_us(ms * 1_000);
    }
}

//! DS18B20 1-Wire temperature probe driver.
//!
//! Each probe gets its own GPIO and its own [`OneWireTempSensor`] instance
//! (sump and display tank); `original_source/temperature.h` talks to both
//! over a shared bus keyed by ROM address, but this board wires one probe
//! per pin so no ROM search/match is needed. Grounded on the teacher's
//! dual-target driver shape (`drivers/pump.rs`): real bit-bang timing
//! behind `target_os = "espidf"`, a fixed stub reading otherwise.

use crate::app::ports::TemperatureSensorPort;
use crate::drivers::hw_init;
use crate::error::{Error, Result, SensorError};

const SKIP_ROM: u8 = 0xCC;
const CONVERT_T: u8 = 0x44;
const READ_SCRATCHPAD: u8 = 0xBE;

pub struct OneWireTempSensor {
    gpio: i32,
}

impl OneWireTempSensor {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    #[cfg(target_os = "espidf")]
    fn reset_pulse(&self) -> bool {
        hw_init::gpio_write(self.gpio, false);
        hw_init::delay_us(480);
        hw_init::gpio_write(self.gpio, true);
        hw_init::delay_us(70);
        let present = !hw_init::gpio_read(self.gpio);
        hw_init::delay_us(410);
        present
    }

    #[cfg(target_os = "espidf")]
    fn write_byte(&self, mut byte: u8) {
        for _ in 0..8 {
            let bit = byte & 1;
            hw_init::gpio_write(self.gpio, false);
            hw_init::delay_us(if bit == 1 { 6 } else { 60 });
            hw_init::gpio_write(self.gpio, true);
            hw_init::delay_us(if bit == 1 { 64 } else { 10 });
            byte >>= 1;
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_byte(&self) -> u8 {
        let mut byte = 0u8;
        for i in 0..8 {
            hw_init::gpio_write(self.gpio, false);
            hw_init::delay_us(6);
            hw_init::gpio_write(self.gpio, true);
            hw_init::delay_us(9);
            if hw_init::gpio_read(self.gpio) {
                byte |= 1 << i;
            }
            hw_init::delay_us(55);
        }
        byte
    }
}

impl TemperatureSensorPort for OneWireTempSensor {
    fn read_celsius(&mut self) -> Result<f32> {
        #[cfg(target_os = "espidf")]
        {
            if !self.reset_pulse() {
                return Err(Error::Sensor(SensorError::ConversionFailed));
            }
            self.write_byte(SKIP_ROM);
            self.write_byte(CONVERT_T);
            hw_init::delay_us(750_000); // 12-bit conversion, worst case.

            if !self.reset_pulse() {
                return Err(Error::Sensor(SensorError::ConversionFailed));
            }
            self.write_byte(SKIP_ROM);
            self.write_byte(READ_SCRATCHPAD);
            let lsb = self.read_byte();
            let msb = self.read_byte();
            let raw = i16::from_le_bytes([lsb, msb]);
            Ok(f32::from(raw) / 16.0)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let _ = (SKIP_ROM, CONVERT_T, READ_SCRATCHPAD, self.gpio);
            Ok(25.0)
        }
    }
}

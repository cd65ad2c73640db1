//! Panel buttons, ATO float switches, and the direct-GPIO e-stop line.
//!
//! The three panel buttons and three float switches share one PCF8574-style
//! I²C expander; the e-stop is wired to its own GPIO so a wedged I²C bus
//! can never mask an emergency stop. Grounded on the teacher's
//! `drivers/button.rs` for the overall "raw reading in, driver owns the
//! wire format" shape, generalized from one ISR-debounced GPIO button to a
//! whole expander port byte (debouncing itself lives in
//! [`crate::buttons`], which only ever sees plain booleans).

use crate::app::ports::{ButtonPanelPort, ButtonPanelReadings, FloatSwitchPort, FloatSwitchReadings};
use crate::drivers::hw_init;
use crate::error::{Error, Result, SensorError};
use crate::pins;

fn bit_set(byte: u8, pin: u8) -> bool {
    (byte >> pin) & 1 != 0
}

fn read_expander_byte() -> Result<u8> {
    let mut in_buf = [0u8; 1];
    hw_init::i2c_write_read(pins::I2C_EXPANDER_ADDR, &[], &mut in_buf)
        .map_err(|_| Error::Sensor(SensorError::ExpanderReadFailed))?;
    Ok(in_buf[0])
}

pub struct ButtonExpanderDriver;

impl ButtonExpanderDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ButtonExpanderDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonPanelPort for ButtonExpanderDriver {
    fn read(&mut self) -> Result<ButtonPanelReadings> {
        let byte = read_expander_byte()?;
        Ok(ButtonPanelReadings {
            yellow_line_high: bit_set(byte, pins::EXP_PIN_BUTTON_YELLOW),
            blue_line_high: bit_set(byte, pins::EXP_PIN_BUTTON_BLUE),
            green_line_high: bit_set(byte, pins::EXP_PIN_BUTTON_GREEN),
            estop_line_high: hw_init::gpio_read(pins::ESTOP_GPIO),
        })
    }
}

pub struct FloatExpanderDriver;

impl FloatExpanderDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FloatExpanderDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FloatSwitchPort for FloatExpanderDriver {
    fn read(&mut self) -> Result<FloatSwitchReadings> {
        let byte = read_expander_byte()?;
        Ok(FloatSwitchReadings {
            low_line_high: bit_set(byte, pins::EXP_PIN_FLOAT_LOW),
            high_line_high: bit_set(byte, pins::EXP_PIN_FLOAT_HIGH),
            reservoir_line_high: bit_set(byte, pins::EXP_PIN_FLOAT_RESERVOIR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_set_reads_individual_pins() {
        let byte = 0b0000_0101;
        assert!(bit_set(byte, 0));
        assert!(!bit_set(byte, 1));
        assert!(bit_set(byte, 2));
    }
}

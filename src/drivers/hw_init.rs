//! One-shot hardware peripheral initialization plus the raw GPIO/I²C/LEDC
//! helpers every other driver in this module builds on.
//!
//! Grounded on the teacher's `drivers/hw_init.rs`: same dual-target shape
//! (real ESP-IDF sys calls behind `target_os = "espidf"`, no-op stand-ins
//! otherwise), trimmed to the peripherals this board actually carries —
//! no ADC channel table beyond the single floating pin used to seed the
//! cloud simulator's RNG, no ULP.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::pins;

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    I2cInitFailed(i32),
    LedcInitFailed,
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
            Self::I2cInitFailed(rc) => write!(f, "I2C bus init failed (rc={rc})"),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel config failed"),
        }
    }
}

pub const LEDC_CH_BUZZER: u32 = 0;
pub const LEDC_CH_IR: u32 = 1;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: called once from main() before the control loop starts.
    unsafe {
        init_gpio_outputs()?;
        init_gpio_inputs()?;
        init_i2c()?;
        init_ledc()?;
    }
    log::info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::RELAY_CS_GPIO,
        pins::RELAY_CLK_GPIO,
        pins::RELAY_DATA_GPIO,
    ];
    for pin in output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ESTOP_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_i2c() -> Result<(), HwInitError> {
    let cfg = i2c_config_t {
        mode: i2c_mode_t_I2C_MODE_MASTER,
        sda_io_num: pins::I2C_SDA_GPIO,
        scl_io_num: pins::I2C_SCL_GPIO,
        sda_pullup_en: true,
        scl_pullup_en: true,
        __bindgen_anon_1: i2c_config_t__bindgen_ty_1 {
            master: i2c_config_t__bindgen_ty_1__bindgen_ty_1 {
                clk_speed: 100_000,
            },
        },
        clk_flags: 0,
    };
    let ret = unsafe { i2c_param_config(I2C_NUM_0 as i32, &cfg) };
    if ret != ESP_OK {
        return Err(HwInitError::I2cInitFailed(ret));
    }
    let ret = unsafe { i2c_driver_install(I2C_NUM_0 as i32, cfg.mode, 0, 0, 0) };
    if ret != ESP_OK {
        return Err(HwInitError::I2cInitFailed(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timer_cfg = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        freq_hz: 2_000,
        clk_cfg: ledc_clk_cfg_t_LEDC_AUTO_CLK,
        deconfigure: false,
    };
    if unsafe { ledc_timer_config(&timer_cfg) } != ESP_OK {
        return Err(HwInitError::LedcInitFailed);
    }

    for (channel, gpio) in [
        (LEDC_CH_BUZZER, pins::BUZZER_GPIO),
        (LEDC_CH_IR, pins::IR_LED_GPIO),
    ] {
        let chan_cfg = ledc_channel_config_t {
            gpio_num: gpio,
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            intr_type: ledc_intr_type_t_LEDC_INTR_DISABLE,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        if unsafe { ledc_channel_config(&chan_cfg) } != ESP_OK {
            return Err(HwInitError::LedcInitFailed);
        }
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(gpio: i32, high: bool) {
    // SAFETY: `gpio` was configured as an output by `init_gpio_outputs`.
    unsafe {
        gpio_set_level(gpio, high as u32);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_gpio: i32, _high: bool) {}

#[cfg(target_os = "espidf")]
pub fn gpio_read(gpio: i32) -> bool {
    // SAFETY: `gpio` was configured as an input by `init_gpio_inputs`.
    unsafe { gpio_get_level(gpio) != 0 }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_gpio: i32) -> bool {
    true
}

/// Set a PWM channel's duty cycle (0-255, 8-bit resolution).
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: the timer/channel pair was configured by `init_ledc`.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}

/// Read a raw digital sample of the floating entropy pin used to seed the
/// cloud simulator's RNG at boot.
#[cfg(target_os = "espidf")]
pub fn entropy_sample() -> u32 {
    // SAFETY: reads the hardware RNG register, always valid on ESP32.
    unsafe { esp_random() }
}

#[cfg(not(target_os = "espidf"))]
pub fn entropy_sample() -> u32 {
    0x5EED_1234
}

/// Blocking busy-wait, used by the IR and 1-Wire bit-bang protocols where
/// FreeRTOS tick granularity (1 ms) is too coarse.
#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    unsafe {
        ets_delay_us(us);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_us(_us: u32) {}

/// Write `out`, then read `in_buf.len()` bytes back from `device_addr`, in
/// one I²C transaction (register-pointer read idiom the expander and RTC
/// both use).
#[cfg(target_os = "espidf")]
pub fn i2c_write_read(device_addr: u8, out: &[u8], in_buf: &mut [u8]) -> Result<(), HwInitError> {
    const TIMEOUT_TICKS: u32 = 1_000;
    // SAFETY: the I2C_NUM_0 bus was installed by `init_i2c`.
    let ret = unsafe {
        i2c_master_write_read_device(
            I2C_NUM_0 as i32,
            device_addr,
            out.as_ptr(),
            out.len(),
            in_buf.as_mut_ptr(),
            in_buf.len(),
            TIMEOUT_TICKS,
        )
    };
    if ret != ESP_OK {
        return Err(HwInitError::I2cInitFailed(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn i2c_write_read(_device_addr: u8, _out: &[u8], in_buf: &mut [u8]) -> Result<(), HwInitError> {
    in_buf.fill(0xFF);
    Ok(())
}

/// Write-only I²C transaction (expander output port, RTC register set).
#[cfg(target_os = "espidf")]
pub fn i2c_write(device_addr: u8, out: &[u8]) -> Result<(), HwInitError> {
    const TIMEOUT_TICKS: u32 = 1_000;
    // SAFETY: the I2C_NUM_0 bus was installed by `init_i2c`.
    let ret =
        unsafe { i2c_master_write_to_device(I2C_NUM_0 as i32, device_addr, out.as_ptr(), out.len(), TIMEOUT_TICKS) };
    if ret != ESP_OK {
        return Err(HwInitError::I2cInitFailed(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn i2c_write(_device_addr: u8, _out: &[u8]) -> Result<(), HwInitError> {
    Ok(())
}

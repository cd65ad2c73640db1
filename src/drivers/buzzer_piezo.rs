//! Piezo buzzer driver — LEDC PWM tone generation.
//!
//! Grounded on the teacher's `drivers/pump.rs` LEDC usage, narrowed from
//! variable-duty motor drive to a fixed 50% duty square wave at a caller-
//! chosen frequency (a piezo buzzes loudest near resonance, not at a fixed
//! PWM carrier, so frequency is the parameter that matters here instead of
//! duty).
//!
//! `tone()` must not block: [`crate::buzzer::BuzzerSequencer`] was
//! rewritten specifically around the original firmware's non-blocking
//! `tone()` semantics (the hardware timer silences the piezo on its own),
//! so this driver starts the PWM and arms a one-shot `esp_timer` to zero
//! the duty after `duration_ms` instead of busy-waiting.

use crate::app::ports::BuzzerPort;
use crate::drivers::hw_init;
use crate::error::Result;
use crate::pins;

pub struct BuzzerDriver;

impl BuzzerDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BuzzerDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
extern "C" fn silence_callback(_arg: *mut core::ffi::c_void) {
    hw_init::ledc_set(hw_init::LEDC_CH_BUZZER, 0);
}

impl BuzzerPort for BuzzerDriver {
    fn tone(&mut self, freq_hz: u32, duration_ms: u32) -> Result<()> {
        let _ = pins::BUZZER_GPIO;

        #[cfg(target_os = "espidf")]
        {
            use esp_idf_svc::sys::*;
            // The LEDC timer is retuned per tone since each alarm cadence
            // asks for a different frequency; duty is fixed at 50%.
            let timer_cfg = ledc_timer_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
                timer_num: ledc_timer_t_LEDC_TIMER_0,
                freq_hz,
                clk_cfg: ledc_clk_cfg_t_LEDC_AUTO_CLK,
                deconfigure: false,
            };
            // SAFETY: the LEDC peripheral was already installed by
            // `hw_init::init_peripherals`; this only retunes its frequency.
            unsafe {
                ledc_timer_config(&timer_cfg);
            }
            hw_init::ledc_set(hw_init::LEDC_CH_BUZZER, 128);

            let timer_args = esp_timer_create_args_t {
                callback: Some(silence_callback),
                arg: core::ptr::null_mut(),
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: c"buzzer_silence".as_ptr(),
                skip_unhandled_events: true,
            };
            let mut handle: esp_timer_handle_t = core::ptr::null_mut();
            // SAFETY: a fresh one-shot timer per call; ESP-IDF frees it once fired.
            unsafe {
                if esp_timer_create(&timer_args, &mut handle) == ESP_OK {
                    esp_timer_start_once(handle, u64::from(duration_ms) * 1_000);
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            let _ = (freq_hz, duration_ms);
        }

        Ok(())
    }
}

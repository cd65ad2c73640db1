//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the main loop stalls.
//! The control loop calls `feed()` once per tick — a stall long enough to
//! miss a float-switch or over-temperature check should reboot the board
//! rather than run open-loop. Grounded on the teacher's `drivers/watchdog.rs`,
//! unchanged in shape.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const TIMEOUT_MS: u32 = 5_000;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: one-time TWDT subscription from the main task at boot.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: TIMEOUT_MS,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!("TWDT reconfigure returned {ret} (may already be configured)");
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    log::info!("watchdog: subscribed ({TIMEOUT_MS}ms timeout, panic on trigger)");
                } else {
                    log::warn!("watchdog: failed to subscribe ({ret})");
                }
                Self { subscribed }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("watchdog(sim): no-op");
            Self {}
        }
    }

    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}

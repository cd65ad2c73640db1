//! Hardware drivers — the only layer in this crate that touches real
//! peripherals. Each driver implements one of [`crate::app::ports`]'s
//! traits; on `not(target_os = "espidf")` builds they fall back to inert
//! or fixed-value stand-ins so the domain logic and its tests never need
//! real silicon.

pub mod button_expander;
pub mod buzzer_piezo;
pub mod hw_init;
pub mod ir_transmitter;
pub mod onewire_temp;
pub mod relay_bank;
pub mod rtc_ds3231;
pub mod watchdog;

//! System configuration parameters.
//!
//! All tunable parameters for the reef controller. No persistence layer is
//! wired to this struct (persistent configuration storage is out of scope);
//! it exists so tests and diagnostics can construct and vary configuration
//! without recompiling.

use serde::{Deserialize, Serialize};

/// Float-switch / digital-input polarity, runtime configurable instead of a
/// compile-time `#define` (redesign flag, spec §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    ActiveLow,
    ActiveHigh,
}

impl Polarity {
    /// Interpret a raw digital reading (`true` = line high) under this polarity.
    pub fn is_triggered(self, line_high: bool) -> bool {
        match self {
            Self::ActiveLow => !line_high,
            Self::ActiveHigh => line_high,
        }
    }
}

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AquariumConfig {
    // --- Temperature ---
    pub target_temp_f: f32,
    pub temp_hysteresis_f: f32,
    pub temp_differential_alert_f: f32,
    pub temp_emergency_high_f: f32,
    pub temp_diff_alert_throttle_ms: u32,

    // --- ATO ---
    pub ato_timeout_ms: u32,
    pub ato_cooldown_ms: u32,
    pub ato_min_runtime_ms: u32,
    pub ato_float_polarity: Polarity,

    // --- Lighting schedule (minutes since midnight) ---
    pub sunrise_start_min: u16,
    pub sunrise_end_min: u16,
    pub sunset_start_min: u16,
    pub sunset_end_min: u16,
    pub ramp_steps: i32,
    pub ramp_duration_ms: u32,

    // --- Clouds ---
    pub cloud_min_interval_ms: u32,
    pub cloud_max_interval_ms: u32,
    pub cloud_min_dim_steps: i32,
    pub cloud_max_dim_steps: i32,
    pub cloud_min_duration_ms: u32,
    pub cloud_max_duration_ms: u32,
    pub cloud_fade_time_ms: u32,

    // --- Feed / mode ---
    pub feed_mode_duration_ms: u32,
    pub gyre_wired_nc: bool,

    // --- Buttons ---
    pub button_debounce_ms: u32,
    pub blue_arm_hold_ms: u32,
    pub blue_long_press_ms: u32,
    pub green_long_press_ms: u32,
}

impl AquariumConfig {
    /// `STEP_INTERVAL` derived from `ramp_duration_ms / ramp_steps`, as in
    /// the original `config.h`.
    pub fn step_interval_ms(&self) -> u32 {
        self.ramp_duration_ms / self.ramp_steps as u32
    }
}

impl Default for AquariumConfig {
    fn default() -> Self {
        Self {
            target_temp_f: 78.0,
            temp_hysteresis_f: 0.5,
            temp_differential_alert_f: 1.0,
            temp_emergency_high_f: 82.0,
            temp_diff_alert_throttle_ms: 60_000,

            ato_timeout_ms: 300_000,
            ato_cooldown_ms: 60_000,
            ato_min_runtime_ms: 2_000,
            ato_float_polarity: Polarity::ActiveLow,

            sunrise_start_min: 9 * 60 + 30,
            sunrise_end_min: 10 * 60,
            sunset_start_min: 21 * 60 + 30,
            sunset_end_min: 22 * 60,
            ramp_steps: 20,
            ramp_duration_ms: 1_800_000,

            cloud_min_interval_ms: 600_000,
            cloud_max_interval_ms: 1_800_000,
            cloud_min_dim_steps: 3,
            cloud_max_dim_steps: 6,
            cloud_min_duration_ms: 20_000,
            cloud_max_duration_ms: 60_000,
            cloud_fade_time_ms: 15_000,

            feed_mode_duration_ms: 600_000,
            gyre_wired_nc: true,

            button_debounce_ms: 50,
            blue_arm_hold_ms: 2_000,
            blue_long_press_ms: 2_000,
            green_long_press_ms: 3_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_interval_matches_spec() {
        let cfg = AquariumConfig::default();
        assert_eq!(cfg.step_interval_ms(), 90_000);
    }

    #[test]
    fn polarity_interprets_active_low() {
        assert!(Polarity::ActiveLow.is_triggered(false));
        assert!(!Polarity::ActiveLow.is_triggered(true));
        assert!(Polarity::ActiveHigh.is_triggered(true));
        assert!(!Polarity::ActiveHigh.is_triggered(false));
    }
}

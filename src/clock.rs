//! Monotonic clock, wall clock, and uniform RNG ports.
//!
//! - **`target_os = "espidf"`** wraps `esp_timer_get_time()` for monotonic
//!   time and the DS3231 RTC over I²C for wall time.
//! - **`not(target_os = "espidf"))`** uses `std::time::Instant` and an
//!   injectable simulated wall clock, for host-side testing.
//!
//! Randomness uses a uniform integer source seeded at boot (spec §5);
//! determinism is not required in production, but tests inject a
//! fixed-seed [`SeededRng`] for reproducibility.

use rand::{RngExt, SeedableRng, rngs::SmallRng};

/// Monotonic millisecond counter. Wraps at `u32::MAX` (~49.7 days); all
/// comparisons elsewhere are written `now - last >= interval` so unsigned
/// wraparound is handled correctly.
pub trait MonotonicClockPort {
    fn now_ms(&self) -> u32;
}

/// A reading from the real-time clock. Only `day`/`hour`/`minute` are
/// consumed by the controller core (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcReading {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl RtcReading {
    pub fn minutes_since_midnight(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

pub trait WallClockPort {
    fn now(&self) -> RtcReading;
}

/// Uniform integer draws for the cloud simulator's interval/step/duration
/// choices (spec §4.5).
pub trait RngPort {
    /// Inclusive-exclusive uniform draw over `[low, high)`.
    fn uniform(&mut self, low: u32, high: u32) -> u32;
    /// Inclusive-inclusive uniform draw over `[low, high]`.
    fn uniform_inclusive(&mut self, low: i32, high: i32) -> i32;
}

// ---------------------------------------------------------------------------
// Monotonic clock adapters
// ---------------------------------------------------------------------------

#[cfg(target_os = "espidf")]
pub struct Esp32Clock;

#[cfg(target_os = "espidf")]
impl MonotonicClockPort for Esp32Clock {
    fn now_ms(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1_000) as u32
    }
}

#[cfg(not(target_os = "espidf"))]
pub struct HostClock {
    start: std::time::Instant,
}

#[cfg(not(target_os = "espidf"))]
impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl HostClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl MonotonicClockPort for HostClock {
    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }
}

/// A clock driven entirely by the caller — used by tests and by the
/// property-based simulator to step time deterministically.
pub struct SimClock {
    now_ms: u32,
}

impl SimClock {
    pub fn new() -> Self {
        Self { now_ms: 0 }
    }

    pub fn advance(&mut self, delta_ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(delta_ms);
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClockPort for SimClock {
    fn now_ms(&self) -> u32 {
        self.now_ms
    }
}

// ---------------------------------------------------------------------------
// RNG adapter
// ---------------------------------------------------------------------------

/// `rand`-backed RNG, seedable for reproducible tests.
pub struct SeededRng(SmallRng);

impl SeededRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Seed from an open analog pin reading (spec §5: "determinism is not
    /// required"); callers on real hardware pass a noisy ADC sample.
    pub fn from_entropy_sample(sample: u32) -> Self {
        Self(SmallRng::seed_from_u64(u64::from(sample)))
    }
}

impl RngPort for SeededRng {
    fn uniform(&mut self, low: u32, high: u32) -> u32 {
        self.0.random_range(low..high)
    }

    fn uniform_inclusive(&mut self, low: i32, high: i32) -> i32 {
        self.0.random_range(low..=high)
    }
}

//! Reef Controller Firmware — Main Entry Point
//!
//! Hexagonal architecture, cooperative superloop, no interrupts in the
//! control path (spec.md §5 — every input is polled once per tick).
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     Drivers (outer ring)                      │
//! │                                                                │
//! │  RelayBankDriver   IrTransmitterDriver   BuzzerDriver          │
//! │  OneWireTempSensor ButtonExpanderDriver  FloatExpanderDriver   │
//! │  Ds3231Rtc          LogEventSink          SeededRng            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ──────────────────      │
//! │                                                                │
//! │  ┌─────────────────────────────────────────────────────────┐  │
//! │  │               ControllerCore (pure logic)                │  │
//! │  │  buttons · heater · ato · lighting · buzzer · safety     │  │
//! │  └─────────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
mod error;
mod pins;

pub mod actuator_gateway;
pub mod adapters;
pub mod app;
pub mod ato;
pub mod buttons;
pub mod buzzer;
pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod fault;
pub mod heater;
pub mod lighting;
pub mod mode_supervisor;
pub mod state;
pub mod temperature;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use adapters::log_sink::LogEventSink;
use app::ports::ButtonPanelPort;
use app::service::ControllerCore;
use clock::{MonotonicClockPort, SeededRng, WallClockPort};
use config::AquariumConfig;
use drivers::button_expander::{ButtonExpanderDriver, FloatExpanderDriver};
use drivers::buzzer_piezo::BuzzerDriver;
use drivers::ir_transmitter::IrTransmitterDriver;
use drivers::onewire_temp::OneWireTempSensor;
use drivers::relay_bank::RelayBankDriver;
use drivers::rtc_ds3231::Ds3231Rtc;
use drivers::watchdog::Watchdog;

/// How often the superloop runs one full control cycle. Fast enough that
/// the e-stop GPIO and float switches are never more than this far stale;
/// slow enough that the blocking IR/1-Wire/I²C transactions inside one
/// tick don't starve the watchdog (`Watchdog::TIMEOUT_MS` is 5 s).
const CONTROL_LOOP_INTERVAL_MS: u32 = 250;

/// How many control cycles between diagnostics log lines (~10 s at the
/// default loop interval) — frequent enough to catch a fault window, rare
/// enough not to spam the serial console.
const DIAGNOSTICS_LOG_INTERVAL_CYCLES: u64 = 40;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    diagnostics::install_panic_handler();

    info!("reef-controller v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripheral bring-up ─────────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt; the watchdog
        // resets the board after TIMEOUT_MS since nothing feeds it.
        log::error!("peripheral init failed: {e} — halting");
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new();

    // ── 3. Configuration ───────────────────────────────────────
    // No persistent configuration storage (spec.md §1 Non-goals) — the
    // controller always boots with the compiled-in defaults.
    let config = AquariumConfig::default();

    // ── 4. Construct drivers ────────────────────────────────────
    let mut relays = RelayBankDriver::new();
    let mut ir = IrTransmitterDriver::new();
    let mut buzzer_hw = BuzzerDriver::new();
    let mut sump_probe = OneWireTempSensor::new(pins::ONEWIRE_SUMP_GPIO);
    let mut display_probe = OneWireTempSensor::new(pins::ONEWIRE_DISPLAY_GPIO);
    let mut buttons = ButtonExpanderDriver::new();
    let mut floats = FloatExpanderDriver::new();
    let rtc = Ds3231Rtc::new();
    #[cfg(target_os = "espidf")]
    let clock = clock::Esp32Clock;
    #[cfg(not(target_os = "espidf"))]
    let clock = clock::HostClock::new();
    let mut rng = SeededRng::from_entropy_sample(drivers::hw_init::entropy_sample());
    let mut sink = LogEventSink::new();

    // ── 5. Construct the controller core and boot lighting ────
    let mut core = ControllerCore::new(config);
    let boot_now_ms = clock.now_ms();
    let boot_rtc = rtc.now();
    info!(
        "boot: RTC reads {:02}:{:02}:{:02} ({}-{:02}-{:02})",
        boot_rtc.hour, boot_rtc.minute, boot_rtc.second, boot_rtc.year, boot_rtc.month, boot_rtc.day
    );
    core.boot(boot_now_ms, boot_rtc, &mut ir, &mut sink);

    info!("reef-controller ready, control cycle target {CONTROL_LOOP_INTERVAL_MS}ms");

    // ── 6. Superloop ─────────────────────────────────────────
    loop {
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(std::time::Duration::from_millis(u64::from(CONTROL_LOOP_INTERVAL_MS)));

        let now_ms = clock.now_ms();
        let rtc_reading = rtc.now();

        let button_readings = match buttons.read() {
            Ok(r) => r,
            Err(e) => {
                warn!("button panel read failed: {e} — treating as all-released");
                app::ports::ButtonPanelReadings {
                    yellow_line_high: true,
                    blue_line_high: true,
                    green_line_high: true,
                    estop_line_high: true,
                }
            }
        };

        if let Err(e) = core.tick(
            now_ms,
            rtc_reading,
            &mut relays,
            &mut ir,
            &mut buzzer_hw,
            &mut sump_probe,
            &mut display_probe,
            &mut floats,
            button_readings,
            &mut rng,
            &mut sink,
        ) {
            warn!("control cycle error: {e}");
        }

        if core.control_cycles() % DIAGNOSTICS_LOG_INTERVAL_CYCLES == 0 {
            let snapshot = core.diagnostics_snapshot(now_ms);
            info!(
                "diagnostics: uptime={}ms cycles={} fault_bits={:#04x}",
                snapshot.uptime_ms,
                snapshot.control_cycles,
                snapshot.fault_flags.bits()
            );
        }

        watchdog.feed();
    }
}

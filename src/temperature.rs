//! Temperature acquisition and the differential/over-temperature checks
//! that gate heater control and emergency stop.
//!
//! Grounded on `original_source/temperature.h`'s `readTemperatures`,
//! `checkTemperatureDifferential`, and `overTempFaultActive`.

use crate::app::events::ControllerEvent;
use crate::app::ports::{EventSink, TemperatureSensorPort};
use crate::config::AquariumConfig;
use crate::state::TempReadings;

fn celsius_to_fahrenheit(c: f32) -> f32 {
    (c * 9.0 / 5.0) + 32.0
}

/// A reading outside this window is treated as a sensor fault; the
/// previous valid reading is retained (`readTemperatures`'s bounds check).
const VALID_RANGE_F: (f32, f32) = (-100.0, 150.0);

fn is_valid_f(value: f32) -> bool {
    value >= VALID_RANGE_F.0 && value <= VALID_RANGE_F.1
}

/// `readTemperatures`: poll both 1-Wire probes and update `readings` in
/// place, leaving stale values (and the `*_valid` flag cleared) on a
/// conversion failure or out-of-range reading.
pub fn read_all(
    readings: &mut TempReadings,
    sump: &mut impl TemperatureSensorPort,
    display: &mut impl TemperatureSensorPort,
) {
    match sump.read_celsius() {
        Ok(c) => {
            let f = celsius_to_fahrenheit(c);
            readings.sump_valid = is_valid_f(f);
            if readings.sump_valid {
                readings.sump_f = f;
            }
        }
        Err(_) => readings.sump_valid = false,
    }

    match display.read_celsius() {
        Ok(c) => {
            let f = celsius_to_fahrenheit(c);
            readings.display_valid = is_valid_f(f);
            if readings.display_valid {
                readings.display_f = f;
            }
        }
        Err(_) => readings.display_valid = false,
    }
}

/// `checkTemperatureDifferential`, throttled to one alert per
/// `temp_diff_alert_throttle_ms`. Returns `true` if an alert fired this
/// call (caller queues the 2-beep alarm).
pub fn check_differential(
    readings: &mut TempReadings,
    now_ms: u32,
    config: &AquariumConfig,
    events: &mut dyn EventSink,
) -> bool {
    if !readings.sump_valid || !readings.display_valid {
        return false;
    }

    let diff = (readings.sump_f - readings.display_f).abs();
    if diff <= config.temp_differential_alert_f {
        return false;
    }

    if now_ms.wrapping_sub(readings.last_diff_alert_ms) <= config.temp_diff_alert_throttle_ms
        && readings.last_diff_alert_ms != 0
    {
        return false;
    }

    readings.last_diff_alert_ms = now_ms;
    events.emit(&ControllerEvent::TemperatureDifferentialWarning {
        sump_f_x10: (readings.sump_f * 10.0) as i32,
        display_f_x10: (readings.display_f * 10.0) as i32,
    });
    true
}

/// `overTempFaultActive`.
pub fn over_temp_fault_active(readings: &TempReadings, config: &AquariumConfig) -> bool {
    (readings.sump_valid && readings.sump_f >= config.temp_emergency_high_f)
        || (readings.display_valid && readings.display_f >= config.temp_emergency_high_f)
}

//! Per-mode step functions for the lighting schedule and cloud machine.
//!
//! Same split of responsibility as the teacher's `fsm/states.rs` — one
//! function per mode, called on each tick — but dispatched through a
//! `match` in [`handle_schedule`] rather than the teacher's
//! `StateDescriptor` fn-pointer table: each step here needs a different
//! mix of side inputs (IR port, RNG, or neither) that a single
//! `fn(&mut Context) -> Option<StateId>` signature can't express without
//! widening `Context` into a god-object. The state transitions themselves
//! are unchanged: enter/exit actions fire exactly once, update runs every
//! tick.

use super::ir;
use super::{CloudState, LightMode, LightingState};
use crate::app::events::ControllerEvent;
use crate::app::ports::{EventSink, IrPort};
use crate::clock::RngPort;
use crate::config::AquariumConfig;

fn emit_mode_change(state: &LightingState, to: LightMode, events: &mut dyn EventSink) {
    events.emit(&ControllerEvent::LightModeChanged {
        from: state.mode,
        to,
    });
}

/// `setInitialLightingFromTime`.
pub fn set_initial_from_time(
    state: &mut LightingState,
    now_ms: u32,
    now_minutes: u16,
    config: &AquariumConfig,
    ir: &mut dyn IrPort,
    events: &mut dyn EventSink,
) {
    if now_minutes >= config.sunrise_end_min && now_minutes < config.sunset_start_min {
        emit_mode_change(state, LightMode::Daylight, events);
        lights_full_bright(state, ir);
        state.mode = LightMode::Daylight;
    } else if now_minutes >= config.sunrise_start_min && now_minutes < config.sunrise_end_min {
        start_sunrise(state, now_ms, events);
    } else if now_minutes >= config.sunset_start_min && now_minutes < config.sunset_end_min {
        start_sunset(state, now_ms, events);
    } else {
        emit_mode_change(state, LightMode::Night, events);
        set_night_mode(state, ir);
        state.mode = LightMode::Night;
    }
}

/// `handleLightingSchedule`.
pub fn handle_schedule(
    state: &mut LightingState,
    now_ms: u32,
    now_minutes: u16,
    day: u8,
    config: &AquariumConfig,
    ir: &mut dyn IrPort,
    rng: &mut dyn RngPort,
    events: &mut dyn EventSink,
) {
    if state.last_day != Some(day) {
        state.last_day = Some(day);
        state.sunrise_started_today = false;
        state.sunset_started_today = false;
    }

    if !state.schedule_enabled {
        return;
    }

    match state.mode {
        LightMode::Night => {
            if !state.sunrise_started_today && now_minutes >= config.sunrise_start_min {
                state.sunrise_started_today = true;
                start_sunrise(state, now_ms, events);
            }
        }
        LightMode::SunriseRamping => {
            update_sunrise(state, now_ms, config, ir);
            if now_minutes >= config.sunrise_end_min {
                complete_sunrise(state, now_ms, config, ir, rng, events);
            }
        }
        LightMode::Daylight => {
            if !state.sunset_started_today && now_minutes >= config.sunset_start_min {
                state.sunset_started_today = true;
                start_sunset(state, now_ms, events);
            }
        }
        LightMode::SunsetRamping => {
            update_sunset(state, now_ms, config, ir);
            if now_minutes >= config.sunset_end_min {
                complete_sunset(state, ir, events);
            }
        }
    }
}

fn start_sunrise(state: &mut LightingState, now_ms: u32, events: &mut dyn EventSink) {
    emit_mode_change(state, LightMode::SunriseRamping, events);
    state.mode = LightMode::SunriseRamping;
    state.ramp_start_ms = now_ms;
    state.ramp_step = 0;
}

fn update_sunrise(state: &mut LightingState, now_ms: u32, config: &AquariumConfig, ir: &mut dyn IrPort) {
    let elapsed = now_ms.wrapping_sub(state.ramp_start_ms);
    let target_step = (elapsed / config.step_interval_ms()) as i32;

    if target_step > state.ramp_step && target_step <= config.ramp_steps {
        state.ramp_step = target_step;
        ir::adjust_channel(ir, 3, 1);
        ir.settle(200);
        ir::adjust_channel(ir, 1, 1);
    }
}

fn complete_sunrise(
    state: &mut LightingState,
    now_ms: u32,
    config: &AquariumConfig,
    ir: &mut dyn IrPort,
    rng: &mut dyn RngPort,
    events: &mut dyn EventSink,
) {
    emit_mode_change(state, LightMode::Daylight, events);
    lights_full_bright(state, ir);
    state.mode = LightMode::Daylight;
    state.next_cloud_ms =
        now_ms.wrapping_add(rng.uniform(config.cloud_min_interval_ms, config.cloud_max_interval_ms));
}

fn start_sunset(state: &mut LightingState, now_ms: u32, events: &mut dyn EventSink) {
    emit_mode_change(state, LightMode::SunsetRamping, events);
    state.mode = LightMode::SunsetRamping;
    state.ramp_start_ms = now_ms;
    state.ramp_step = 0;
}

fn update_sunset(state: &mut LightingState, now_ms: u32, config: &AquariumConfig, ir: &mut dyn IrPort) {
    let elapsed = now_ms.wrapping_sub(state.ramp_start_ms);
    let target_step = (elapsed / config.step_interval_ms()) as i32;

    if target_step > state.ramp_step && target_step <= config.ramp_steps {
        state.ramp_step = target_step;
        ir::adjust_channel(ir, 1, -1);
        ir.settle(200);
        ir::adjust_channel(ir, 3, -1);
    }
}

fn complete_sunset(state: &mut LightingState, ir: &mut dyn IrPort, events: &mut dyn EventSink) {
    emit_mode_change(state, LightMode::Night, events);
    set_night_mode(state, ir);
    state.mode = LightMode::Night;
}

// ---------------------------------------------------------------------------
// Power/mode helpers (setNightMode / lightsFullBright / lightsPhotoMode)
// ---------------------------------------------------------------------------

pub(super) fn set_night_mode(state: &mut LightingState, ir: &mut dyn IrPort) {
    if !state.lights_on {
        ir::set_light_power(ir);
        state.lights_on = true;
    }
    ir::set_night(ir);
}

pub(super) fn lights_full_bright(state: &mut LightingState, ir: &mut dyn IrPort) {
    if !state.lights_on {
        ir::set_light_power(ir);
        state.lights_on = true;
        ir.settle(500);
    }
    ir::set_full_bright(ir);
}

pub(super) fn lights_photo_mode(state: &mut LightingState, ir: &mut dyn IrPort) {
    if !state.lights_on {
        ir::set_light_power(ir);
        state.lights_on = true;
        ir.settle(500);
    }
    ir::set_full_bright(ir);
    ir.settle(1000);
    ir::adjust_channel(ir, 3, -10);
}

// ---------------------------------------------------------------------------
// Cloud simulation
// ---------------------------------------------------------------------------

/// `handleClouds`.
pub fn handle_clouds(
    state: &mut LightingState,
    now_ms: u32,
    config: &AquariumConfig,
    ir: &mut dyn IrPort,
    rng: &mut dyn RngPort,
    events: &mut dyn EventSink,
) {
    if state.mode != LightMode::Daylight {
        state.cloud_state = CloudState::None;
        return;
    }

    match state.cloud_state {
        CloudState::None => {
            if now_ms >= state.next_cloud_ms {
                start_cloud(state, config, ir, rng, events);
            }
        }
        CloudState::Dimming => {
            state.cloud_state = CloudState::Holding;
            state.cloud_start_ms = now_ms;
        }
        CloudState::Holding => {
            if now_ms.wrapping_sub(state.cloud_start_ms) >= state.cloud_duration_ms {
                start_cloud_brighten(state, now_ms);
            }
        }
        CloudState::Brightening => {
            update_cloud_brighten(state, now_ms, config, ir, rng, events);
        }
    }
}

fn start_cloud(
    state: &mut LightingState,
    config: &AquariumConfig,
    ir: &mut dyn IrPort,
    rng: &mut dyn RngPort,
    events: &mut dyn EventSink,
) {
    state.cloud_dim_steps = rng.uniform_inclusive(config.cloud_min_dim_steps, config.cloud_max_dim_steps);
    state.cloud_duration_ms = rng.uniform(config.cloud_min_duration_ms, config.cloud_max_duration_ms);

    for _ in 0..state.cloud_dim_steps {
        ir::adjust_channel(ir, 1, -1);
        ir.settle(100);
        ir::adjust_channel(ir, 3, -1);
        ir.settle(100);
    }

    state.cloud_state = CloudState::Dimming;
    events.emit(&ControllerEvent::CloudStarted);
}

fn start_cloud_brighten(state: &mut LightingState, now_ms: u32) {
    state.cloud_state = CloudState::Brightening;
    state.cloud_brighten_steps = 0;
    state.last_cloud_step_ms = now_ms;
}

fn update_cloud_brighten(
    state: &mut LightingState,
    now_ms: u32,
    config: &AquariumConfig,
    ir: &mut dyn IrPort,
    rng: &mut dyn RngPort,
    events: &mut dyn EventSink,
) {
    let step_interval = config.cloud_fade_time_ms / state.cloud_dim_steps.max(1) as u32;

    if now_ms.wrapping_sub(state.last_cloud_step_ms) >= step_interval
        && state.cloud_brighten_steps < state.cloud_dim_steps
    {
        ir::adjust_channel(ir, 1, 1);
        ir.settle(100);
        ir::adjust_channel(ir, 3, 1);
        state.cloud_brighten_steps += 1;
        state.last_cloud_step_ms = now_ms;
    }

    if state.cloud_brighten_steps >= state.cloud_dim_steps {
        state.cloud_state = CloudState::None;
        state.next_cloud_ms =
            now_ms.wrapping_add(rng.uniform(config.cloud_min_interval_ms, config.cloud_max_interval_ms));
        events.emit(&ControllerEvent::CloudEnded);
    }
}

/// `triggerManualCloud`.
pub fn trigger_manual_cloud(
    state: &mut LightingState,
    now_ms: u32,
    config: &AquariumConfig,
    ir: &mut dyn IrPort,
    rng: &mut dyn RngPort,
    events: &mut dyn EventSink,
) {
    if state.mode == LightMode::Daylight && state.cloud_state == CloudState::None {
        start_cloud(state, config, ir, rng, events);
    }
}

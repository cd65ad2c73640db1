//! Lighting schedule, sunrise/sunset ramps, and cloud simulation.
//!
//! Facade over [`fsm`], following the same shape as the teacher's
//! `app::service::ControllerCore` sitting over its FSM engine: callers
//! drive the schedule and cloud machines through a handful of methods and
//! never touch the per-mode step functions directly.

pub mod fsm;
pub mod ir;

use crate::app::events::ControllerEvent;
use crate::app::ports::{EventSink, IrPort};
use crate::clock::RngPort;
use crate::config::AquariumConfig;

/// `LightMode` in `original_source/lighting.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightMode {
    Night,
    SunriseRamping,
    Daylight,
    SunsetRamping,
}

/// `CloudState` in `original_source/lighting.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudState {
    None,
    Dimming,
    Holding,
    Brightening,
}

/// Everything the lighting subsystem needs to persist between ticks.
#[derive(Debug, Clone)]
pub struct LightingState {
    pub mode: LightMode,
    pub cloud_state: CloudState,
    pub schedule_enabled: bool,
    pub lights_on: bool,
    pub ramp_start_ms: u32,
    pub ramp_step: i32,
    pub next_cloud_ms: u32,
    pub cloud_start_ms: u32,
    pub cloud_duration_ms: u32,
    pub cloud_dim_steps: i32,
    pub cloud_brighten_steps: i32,
    pub last_cloud_step_ms: u32,
    pub sunrise_started_today: bool,
    pub sunset_started_today: bool,
    pub last_day: Option<u8>,
}

impl LightingState {
    pub fn new() -> Self {
        Self {
            mode: LightMode::Night,
            cloud_state: CloudState::None,
            schedule_enabled: true,
            lights_on: false,
            ramp_start_ms: 0,
            ramp_step: 0,
            next_cloud_ms: 0,
            cloud_start_ms: 0,
            cloud_duration_ms: 0,
            cloud_dim_steps: 0,
            cloud_brighten_steps: 0,
            last_cloud_step_ms: 0,
            sunrise_started_today: false,
            sunset_started_today: false,
            last_day: None,
        }
    }
}

impl Default for LightingState {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives [`LightingState`] from wall-clock minutes-since-midnight and the
/// monotonic tick clock. Holds no port handles itself — those are passed
/// into each call, matching the rest of the controller's port-as-parameter
/// style.
pub struct LightingController {
    state: LightingState,
}

impl LightingController {
    pub fn new() -> Self {
        Self {
            state: LightingState::new(),
        }
    }

    pub fn state(&self) -> &LightingState {
        &self.state
    }

    pub fn set_schedule_enabled(&mut self, enabled: bool) {
        self.state.schedule_enabled = enabled;
    }

    /// `setInitialLightingFromTime`: choose the correct mode at boot from
    /// the RTC's current minutes-since-midnight, without waiting for a
    /// schedule boundary to cross.
    pub fn set_initial_from_time(
        &mut self,
        now_ms: u32,
        now_minutes: u16,
        config: &AquariumConfig,
        ir: &mut dyn IrPort,
        events: &mut dyn EventSink,
    ) {
        fsm::set_initial_from_time(&mut self.state, now_ms, now_minutes, config, ir, events);
    }

    /// `handleLightingSchedule`, called once per control cycle.
    pub fn handle_schedule(
        &mut self,
        now_ms: u32,
        now_minutes: u16,
        day: u8,
        config: &AquariumConfig,
        ir: &mut dyn IrPort,
        rng: &mut dyn RngPort,
        events: &mut dyn EventSink,
    ) {
        fsm::handle_schedule(
            &mut self.state,
            now_ms,
            now_minutes,
            day,
            config,
            ir,
            rng,
            events,
        );
    }

    /// `handleClouds`, called once per control cycle (after the schedule).
    pub fn handle_clouds(
        &mut self,
        now_ms: u32,
        config: &AquariumConfig,
        ir: &mut dyn IrPort,
        rng: &mut dyn RngPort,
        events: &mut dyn EventSink,
    ) {
        fsm::handle_clouds(&mut self.state, now_ms, config, ir, rng, events);
    }

    /// `triggerManualCloud` (Blue short-press while in Daylight, no ATO alarm).
    pub fn trigger_manual_cloud(
        &mut self,
        now_ms: u32,
        config: &AquariumConfig,
        ir: &mut dyn IrPort,
        rng: &mut dyn RngPort,
        events: &mut dyn EventSink,
    ) {
        fsm::trigger_manual_cloud(&mut self.state, now_ms, config, ir, rng, events);
    }

    /// `toggleLightsManual` (Blue short-press, no ATO alarm, mode !=
    /// Daylight). Drives the fixture directly without touching `mode` —
    /// the schedule keeps running underneath exactly as the original does,
    /// so a manual override during Night can still be overtaken by the
    /// next scheduled sunrise.
    pub fn toggle_lights_manual(&mut self, ir: &mut dyn IrPort) {
        if self.state.mode == LightMode::Night {
            fsm::lights_full_bright(&mut self.state, ir);
        } else {
            fsm::set_night_mode(&mut self.state, ir);
        }
    }

    pub fn enter_photo_mode(&mut self, ir: &mut dyn IrPort) {
        fsm::lights_photo_mode(&mut self.state, ir);
    }

    pub fn exit_photo_mode(&mut self, ir: &mut dyn IrPort) {
        ir::set_full_bright(ir);
    }
}

impl Default for LightingController {
    fn default() -> Self {
        Self::new()
    }
}

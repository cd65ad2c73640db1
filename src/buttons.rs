//! Panel button polling, debouncing, and gesture classification.
//!
//! Grounded on `original_source/buttons.h`'s `DebouncedButton::read()` and
//! `handleButtons()`, and on the teacher's `drivers/button.rs` for the
//! overall button-driver shape — generalized from the teacher's
//! ISR-atomic edge capture to pure polling, since the spec rules out
//! interrupts for this input (no ISR-safe float/button wiring on the
//! target board).
//!
//! All lines are active-low (pull-up wiring): a `false` (line low) means
//! pressed.

use crate::app::commands::OperatorCommand;
use crate::app::ports::ButtonPanelReadings;
use crate::config::AquariumConfig;
use crate::state::ButtonState;

/// `DebouncedButton::read()`: sample-and-hold across `debounce_ms`,
/// restarting the hold timer on every raw change.
fn debounce(state: &mut ButtonState, reading_high: bool, now_ms: u32, debounce_ms: u32) -> bool {
    if reading_high != state.last_reading {
        state.last_change_ms = now_ms;
    }
    if now_ms.wrapping_sub(state.last_change_ms) > debounce_ms {
        state.current_state = reading_high;
    }
    state.last_reading = reading_high;
    state.current_state
}

pub struct ButtonPanel {
    yellow: ButtonState,
    blue: ButtonState,
    green: ButtonState,
    estop_last_high: bool,
    blue_press_start_ms: u32,
    blue_reset_armed: bool,
    green_press_start_ms: u32,
}

impl ButtonPanel {
    pub fn new() -> Self {
        Self {
            yellow: ButtonState {
                last_reading: true,
                current_state: true,
                ..ButtonState::default()
            },
            blue: ButtonState {
                last_reading: true,
                current_state: true,
                ..ButtonState::default()
            },
            green: ButtonState {
                last_reading: true,
                current_state: true,
                ..ButtonState::default()
            },
            estop_last_high: true,
            blue_press_start_ms: 0,
            blue_reset_armed: false,
            green_press_start_ms: 0,
        }
    }

    /// `handleButtons`, called once per control cycle. Emits zero or more
    /// [`OperatorCommand`]s through `on_command`, in the same left-to-right
    /// order the original checks them (e-stop, yellow, blue, green).
    pub fn poll(
        &mut self,
        now_ms: u32,
        config: &AquariumConfig,
        reading: ButtonPanelReadings,
        ato_alarm_active: bool,
        light_mode_is_daylight: bool,
        mut on_command: impl FnMut(OperatorCommand),
    ) {
        let debounce_ms = config.button_debounce_ms;

        let yellow_was_high = self.yellow.current_state;
        let yellow_is_high = debounce(&mut self.yellow, reading.yellow_line_high, now_ms, debounce_ms);

        let blue_was_high = self.blue.current_state;
        let blue_is_high = debounce(&mut self.blue, reading.blue_line_high, now_ms, debounce_ms);

        let green_was_high = self.green.current_state;
        let green_is_high = debounce(&mut self.green, reading.green_line_high, now_ms, debounce_ms);

        // E-stop: direct GPIO, no debounce — trigger instantly on the
        // falling edge.
        let estop_is_high = reading.estop_line_high;
        if self.estop_last_high && !estop_is_high {
            let blue_held = !blue_is_high;
            if self.blue_reset_armed && blue_held {
                on_command(OperatorCommand::ResetEmergencyStop);
                self.blue_reset_armed = false;
            } else {
                on_command(OperatorCommand::TriggerEmergencyStop);
            }
        }
        self.estop_last_high = estop_is_high;

        // Yellow: feed mode toggle on press.
        if !yellow_is_high && yellow_was_high {
            on_command(OperatorCommand::ToggleFeedMode);
        }

        // Blue: hold-to-arm reset combo; short-press dispatches contextually.
        if !blue_is_high && blue_was_high {
            self.blue_press_start_ms = now_ms;
            self.blue_reset_armed = false;
        }

        if !blue_is_high && !blue_was_high {
            if !self.blue_reset_armed
                && now_ms.wrapping_sub(self.blue_press_start_ms) >= config.blue_arm_hold_ms
            {
                self.blue_reset_armed = true;
            }
        }

        if blue_is_high && !blue_was_high {
            let press_duration = now_ms.wrapping_sub(self.blue_press_start_ms);

            if press_duration < config.blue_long_press_ms {
                if ato_alarm_active {
                    on_command(OperatorCommand::ResetAtoAlarm);
                } else if light_mode_is_daylight {
                    on_command(OperatorCommand::TriggerManualCloud);
                } else {
                    on_command(OperatorCommand::ToggleLightsManual);
                }
            } else {
                on_command(OperatorCommand::SilenceAlarm);
            }

            self.blue_reset_armed = false;
        }

        // Green: photo mode on short press, schedule toggle on long press.
        if !green_is_high && green_was_high {
            self.green_press_start_ms = now_ms;
        }
        if green_is_high && !green_was_high {
            let press_duration = now_ms.wrapping_sub(self.green_press_start_ms);
            if press_duration < config.green_long_press_ms {
                on_command(OperatorCommand::TogglePhotoMode);
            } else {
                on_command(OperatorCommand::ToggleLightSchedule);
            }
        }
    }
}

impl Default for ButtonPanel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(yellow: bool, blue: bool, green: bool, estop: bool) -> ButtonPanelReadings {
        ButtonPanelReadings {
            yellow_line_high: yellow,
            blue_line_high: blue,
            green_line_high: green,
            estop_line_high: estop,
        }
    }

    fn settle(panel: &mut ButtonPanel, config: &AquariumConfig, now_ms: u32, r: ButtonPanelReadings) {
        panel.poll(now_ms, config, r, false, false, |_| {});
    }

    #[test]
    fn yellow_press_edge_fires_exactly_once() {
        let config = AquariumConfig::default();
        let mut panel = ButtonPanel::new();
        settle(&mut panel, &config, 0, reading(true, true, true, true));

        settle(&mut panel, &config, 100, reading(false, true, true, true));
        let mut fired = vec![];
        panel.poll(
            100 + config.button_debounce_ms + 1,
            &config,
            reading(false, true, true, true),
            false,
            false,
            |cmd| fired.push(cmd),
        );
        assert_eq!(fired, vec![OperatorCommand::ToggleFeedMode]);
    }

    #[test]
    fn estop_press_triggers_emergency_stop() {
        let config = AquariumConfig::default();
        let mut panel = ButtonPanel::new();
        settle(&mut panel, &config, 0, reading(true, true, true, true));

        let mut fired = vec![];
        panel.poll(
            10,
            &config,
            reading(true, true, true, false),
            false,
            false,
            |cmd| fired.push(cmd),
        );
        assert_eq!(fired, vec![OperatorCommand::TriggerEmergencyStop]);
    }

    #[test]
    fn blue_hold_then_estop_resets_instead_of_stopping() {
        let config = AquariumConfig::default();
        let mut panel = ButtonPanel::new();
        settle(&mut panel, &config, 0, reading(true, true, true, true));

        // Press blue and let the debounced transition land.
        settle(&mut panel, &config, 100, reading(true, false, true, true));
        let pressed_ms = 200;
        settle(&mut panel, &config, pressed_ms, reading(true, false, true, true));

        // Keep holding past the arm threshold.
        let armed_ms = pressed_ms + config.blue_arm_hold_ms;
        settle(&mut panel, &config, armed_ms, reading(true, false, true, true));

        // E-stop falls while blue is still held and armed.
        let mut fired = vec![];
        panel.poll(
            armed_ms + 10,
            &config,
            reading(true, false, true, false),
            false,
            false,
            |cmd| fired.push(cmd),
        );
        assert_eq!(fired, vec![OperatorCommand::ResetEmergencyStop]);
    }

    #[test]
    fn blue_short_press_in_daylight_triggers_cloud() {
        let config = AquariumConfig::default();
        let mut panel = ButtonPanel::new();
        settle(&mut panel, &config, 0, reading(true, true, true, true));

        settle(&mut panel, &config, 100, reading(true, false, true, true));
        let pressed_ms = 200;
        settle(&mut panel, &config, pressed_ms, reading(true, false, true, true));

        // Release well within the short-press window.
        settle(&mut panel, &config, pressed_ms + 50, reading(true, true, true, true));
        let mut fired = vec![];
        panel.poll(
            pressed_ms + 50 + config.button_debounce_ms + 1,
            &config,
            reading(true, true, true, true),
            false,
            true,
            |cmd| fired.push(cmd),
        );
        assert_eq!(fired, vec![OperatorCommand::TriggerManualCloud]);
    }
}

//! NEC IR command table for the aquarium light fixture.
//!
//! Grounded on `original_source/lighting.h`'s `sendIRCommand`/`adjustChannel`
//! and spec §6's command table. One repeater board, one fixture, fixed
//! NEC address — no channel auto-discovery.

use crate::app::ports::IrPort;

/// Fixed NEC address for the light fixture's IR receiver.
pub const IR_ADDRESS: u16 = 0xEF00;

pub mod cmd {
    pub const POWER: u8 = 0x00;
    pub const FULL_BRIGHT: u8 = 0x02;
    pub const NIGHT: u8 = 0x03;
    pub const CH1_UP: u8 = 0x08;
    pub const CH1_DOWN: u8 = 0x10;
    pub const CH2_UP: u8 = 0x09;
    pub const CH2_DOWN: u8 = 0x11;
    pub const CH3_UP: u8 = 0x0A;
    pub const CH3_DOWN: u8 = 0x12;
    pub const CH4_UP: u8 = 0x0B;
    pub const CH4_DOWN: u8 = 0x13;
}

/// `(up_command, down_command)` for a 1-indexed channel, or `None` for an
/// out-of-range channel (`adjustChannel`'s `default: return`).
fn channel_commands(channel: u8) -> Option<(u8, u8)> {
    match channel {
        1 => Some((cmd::CH1_UP, cmd::CH1_DOWN)),
        2 => Some((cmd::CH2_UP, cmd::CH2_DOWN)),
        3 => Some((cmd::CH3_UP, cmd::CH3_DOWN)),
        4 => Some((cmd::CH4_UP, cmd::CH4_DOWN)),
        _ => None,
    }
}

/// Step `channel` by `steps` (negative = down). Each step is one blocking
/// `IrPort::send` (the 100 ms inter-command gap lives in the adapter).
pub fn adjust_channel(ir: &mut dyn IrPort, channel: u8, steps: i32) {
    let Some((up, down)) = channel_commands(channel) else {
        return;
    };
    let command = if steps > 0 { up } else { down };
    for _ in 0..steps.unsigned_abs() {
        let _ = ir.send(command);
    }
}

/// `setLightPower`: toggles fixture power and reports the new on/off state
/// back to the caller, who updates `LightingState::lights_on`.
pub fn set_light_power(ir: &mut dyn IrPort) {
    let _ = ir.send(cmd::POWER);
}

pub fn set_full_bright(ir: &mut dyn IrPort) {
    let _ = ir.send(cmd::FULL_BRIGHT);
}

pub fn set_night(ir: &mut dyn IrPort) {
    let _ = ir.send(cmd::NIGHT);
}

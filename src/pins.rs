//! GPIO / peripheral pin assignments for the reef controller main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Relay bank
// ---------------------------------------------------------------------------

/// Relay bank shift register / driver chip-select.
pub const RELAY_CS_GPIO: i32 = 1;
/// Relay bank serial clock.
pub const RELAY_CLK_GPIO: i32 = 2;
/// Relay bank serial data.
pub const RELAY_DATA_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// IR transmitter (NEC protocol, address 0xEF00)
// ---------------------------------------------------------------------------

/// IR LED driver transistor base, PWM-carrier modulated at 38 kHz.
pub const IR_LED_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Piezo buzzer
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// 1-Wire temperature probes
// ---------------------------------------------------------------------------

/// Sump probe (control variable for heater hysteresis).
pub const ONEWIRE_SUMP_GPIO: i32 = 6;
/// Display-tank probe (differential check only).
pub const ONEWIRE_DISPLAY_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Emergency stop (direct GPIO, not on the expander)
// ---------------------------------------------------------------------------

/// Active-low, external pull-up; debounced in software with zero delay
/// (spec requires e-stop to be evaluated every tick without debounce lag).
pub const ESTOP_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// I²C bus — panel buttons + float switches on a PCF8574-style expander
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 9;
pub const I2C_SCL_GPIO: i32 = 10;
pub const I2C_EXPANDER_ADDR: u8 = 0x20;

/// Expander pin numbers (not GPIO numbers — these are I²C expander bits).
pub const EXP_PIN_BUTTON_YELLOW: u8 = 0;
pub const EXP_PIN_BUTTON_BLUE: u8 = 1;
pub const EXP_PIN_BUTTON_GREEN: u8 = 2;
pub const EXP_PIN_FLOAT_LOW: u8 = 3;
pub const EXP_PIN_FLOAT_HIGH: u8 = 4;
pub const EXP_PIN_FLOAT_RESERVOIR: u8 = 5;

// ---------------------------------------------------------------------------
// RTC (DS3231 over I²C)
// ---------------------------------------------------------------------------

pub const RTC_I2C_ADDR: u8 = 0x68;

// ---------------------------------------------------------------------------
// UART debug console
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;

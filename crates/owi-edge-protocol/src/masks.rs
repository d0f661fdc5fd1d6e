//! Bit masks for every field of the command buffer.
//!
//! Each `STOP_*` mask covers every active bit of its field, so clearing with
//! it returns the field to the stopped value while leaving neighbours alone.
//!
//! ```text
//! byte 0:  S S E E W W H H     S = shoulder, E = elbow, W = wrist, H = hand
//! byte 1:  - - - - - - B B     B = base
//! byte 2:  - - - - - - - L     L = LED
//! ```

pub const STOP_HAND: u8 = 0b0000_0011;
pub const OPEN_HAND: u8 = 0b0000_0010;
pub const CLOSE_HAND: u8 = 0b0000_0001;

pub const STOP_WRIST: u8 = 0b0000_1100;
pub const WRIST_UP: u8 = 0b0000_0100;
pub const WRIST_DOWN: u8 = 0b0000_1000;

pub const STOP_ELBOW: u8 = 0b0011_0000;
pub const ELBOW_UP: u8 = 0b0001_0000;
pub const ELBOW_DOWN: u8 = 0b0010_0000;

pub const STOP_SHOULDER: u8 = 0b1100_0000;
pub const SHOULDER_UP: u8 = 0b1000_0000;
pub const SHOULDER_DOWN: u8 = 0b0100_0000;

pub const STOP_BASE: u8 = 0b0000_0011;
pub const BASE_CLOCKWISE: u8 = 0b0000_0001;
pub const BASE_COUNTER_CLOCKWISE: u8 = 0b0000_0010;

pub const LED_ON: u8 = 0b0000_0001;
/// No off-bit exists: turning the LED off clears the on-bit.
pub const LED_OFF: u8 = LED_ON;

/// Neutral value for a whole byte.
pub const CLEAR: u8 = 0x00;

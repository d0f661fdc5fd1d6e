//! The 3-byte command register.
//!
//! All mutations are masked read-modify-write operations on a single byte.
//! A directional command always clears the whole field before OR-ing in the
//! new direction bit, so a field never holds two directions at once.

use core::fmt;

use crate::ids::COMMAND_LEN;
use crate::masks;
use crate::types::{
    ArmCommand, CommandByte, Direction, FieldDescriptor, FieldState, MotionError, Segment,
};

/// Current motion/LED state of the arm, exactly as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CommandRegister {
    bytes: [u8; COMMAND_LEN],
}

impl CommandRegister {
    /// All segments stopped, LED off.
    pub const fn new() -> Self {
        Self {
            bytes: [masks::CLEAR; COMMAND_LEN],
        }
    }

    /// Wrap a buffer as received or recorded.
    pub const fn from_bytes(bytes: [u8; COMMAND_LEN]) -> Self {
        Self { bytes }
    }

    /// The buffer as sent on the wire.
    pub const fn as_bytes(&self) -> [u8; COMMAND_LEN] {
        self.bytes
    }

    /// Value of one buffer byte.
    pub const fn byte(&self, byte: CommandByte) -> u8 {
        let [motion, base, led] = self.bytes;
        match byte {
            CommandByte::Motion => motion,
            CommandByte::Base => base,
            CommandByte::Led => led,
        }
    }

    fn byte_mut(&mut self, byte: CommandByte) -> &mut u8 {
        let [motion, base, led] = &mut self.bytes;
        match byte {
            CommandByte::Motion => motion,
            CommandByte::Base => base,
            CommandByte::Led => led,
        }
    }

    /// Zero the bits covered by `stop_mask`; every other bit is untouched.
    pub fn clear_field(&mut self, byte: CommandByte, stop_mask: u8) {
        *self.byte_mut(byte) &= !stop_mask;
    }

    /// Set the bits covered by `value_mask`; every other bit is untouched.
    pub fn set_field(&mut self, byte: CommandByte, value_mask: u8) {
        *self.byte_mut(byte) |= value_mask;
    }

    /// Clear the field, then set the requested direction bit.
    pub fn apply_directional(&mut self, byte: CommandByte, stop_mask: u8, value_mask: u8) {
        self.clear_field(byte, stop_mask);
        self.set_field(byte, value_mask);
    }

    /// Return the field to its stopped value.
    pub fn stop_field(&mut self, byte: CommandByte, stop_mask: u8) {
        self.clear_field(byte, stop_mask);
    }

    /// Reset the whole buffer in one write.
    pub fn stop_all(&mut self) {
        self.bytes = [masks::CLEAR; COMMAND_LEN];
    }

    /// Apply a looked-up field descriptor.
    pub fn apply_field(&mut self, field: FieldDescriptor) {
        self.apply_directional(field.byte, field.stop_mask, field.value_mask);
    }

    /// Start `segment` moving in `direction`.
    ///
    /// An unsupported pairing leaves the register untouched.
    pub fn move_segment(
        &mut self,
        segment: Segment,
        direction: Direction,
    ) -> Result<(), MotionError> {
        let field = FieldDescriptor::for_motion(segment, direction)?;
        self.apply_field(field);
        Ok(())
    }

    /// Stop `segment`, leaving every other field as is.
    pub fn stop_segment(&mut self, segment: Segment) {
        self.stop_field(segment.byte(), segment.stop_mask());
    }

    /// Switch the LED on.
    pub fn led_on(&mut self) {
        self.apply_directional(CommandByte::Led, masks::LED_OFF, masks::LED_ON);
    }

    /// Switch the LED off. The off mask is the LED bit itself.
    pub fn led_off(&mut self) {
        self.clear_field(CommandByte::Led, masks::LED_OFF);
    }

    /// Apply one command value.
    pub fn apply(&mut self, command: ArmCommand) -> Result<(), MotionError> {
        match command {
            ArmCommand::Move { segment, direction } => self.move_segment(segment, direction)?,
            ArmCommand::Stop { segment } => self.stop_segment(segment),
            ArmCommand::LedOn => self.led_on(),
            ArmCommand::LedOff => self.led_off(),
            ArmCommand::StopAll => self.stop_all(),
        }
        Ok(())
    }

    /// Decode the current state of one segment's field.
    pub fn field_state(&self, segment: Segment) -> FieldState {
        let bits = self.byte(segment.byte()) & segment.stop_mask();
        segment
            .directions()
            .iter()
            .copied()
            .find(|&direction| segment.value_mask(direction) == Ok(bits))
            .map_or(FieldState::Stopped, FieldState::Active)
    }

    /// `true` when every field is stopped and the LED is off.
    pub const fn is_idle(&self) -> bool {
        let [motion, base, led] = self.bytes;
        motion == masks::CLEAR && base == masks::CLEAR && led == masks::CLEAR
    }
}

impl From<CommandRegister> for [u8; COMMAND_LEN] {
    fn from(register: CommandRegister) -> Self {
        register.bytes
    }
}

/// Formats as upper-case hex, e.g. `94 02 01`.
impl fmt::Display for CommandRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [motion, base, led] = self.bytes;
        write!(f, "{motion:02X} {base:02X} {led:02X}")
    }
}

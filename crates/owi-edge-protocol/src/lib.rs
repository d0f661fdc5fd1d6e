//! OWI Robotic Arm Edge protocol: identifiers, field masks and the command
//! register.
//!
//! This crate is intentionally I/O-free and allocation-free on the command
//! path. It describes *what* bytes the arm expects; sending them is the job
//! of the `owi-edge` driver crate.
//!
//! # Wire format
//!
//! Every command is the full 3-byte buffer:
//!
//! | Byte | Bits 7..6 | Bits 5..4 | Bits 3..2 | Bits 1..0 |
//! |------|-----------|-----------|-----------|-----------|
//! | 0    | shoulder  | elbow     | wrist     | hand      |
//! | 1    | -         | -         | -         | base      |
//! | 2    | -         | -         | -         | LED (bit 0) |
//!
//! Within a 2-bit field `00` is stopped and exactly one of the two bits is set
//! while moving.

#![deny(static_mut_refs)]

pub mod ids;
pub mod masks;
pub mod register;
pub mod types;

pub use ids::{
    is_owi_edge, ControlRequest, COMMAND_LEN, OWI_COMMAND_REQUEST, PRODUCT_ID, VENDOR_ID,
};
pub use register::CommandRegister;
pub use types::{
    ArmCommand, CommandByte, Direction, FieldDescriptor, FieldState, MotionError,
    ParseCommandError, ParseNameError, Segment,
};

//! Host-side driver for the OWI Robotic Arm Edge.
//!
//! The arm is driven by a 3-byte command buffer sent as a USB vendor control
//! transfer. [`OwiEdge`] keeps that buffer, updates one segment's bit-field
//! per call, and sends the whole buffer after every change. All move commands
//! are continuous: a segment keeps moving until it, or the whole arm, is
//! stopped.
//!
//! # Example
//!
//! ```
//! use owi_edge::mock::MockTransport;
//! use owi_edge::OwiEdge;
//!
//! # fn main() -> Result<(), owi_edge::ArmError> {
//! let transport = MockTransport::new();
//! let mut arm = OwiEdge::new(transport.clone());
//! arm.move_shoulder_up()?;
//! arm.move_elbow_up()?;
//! arm.turn_led_on()?;
//! assert_eq!(transport.last_payload(), Some([0x90, 0x00, 0x01]));
//! arm.stop_all()?;
//! # Ok(())
//! # }
//! ```
//!
//! With the default `usb` feature, [`usb::UsbLocator`] finds and opens the
//! real device through libusb.

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod arm;
pub mod choreography;
pub mod config;
pub mod device_info;
pub mod error;
pub mod shared;
pub mod transport;
#[cfg(feature = "usb")]
pub mod usb;

pub use arm::OwiEdge;
pub use choreography::{perform, perform_with, Routine, Step};
pub use config::ArmConfig;
pub use device_info::UsbDeviceInfo;
pub use error::{ArmError, ConfigError, TransportError};
pub use shared::SharedArm;
pub use transport::{mock, ControlTransport, DeviceLocator};

pub use owi_edge_protocol as protocol;
pub use owi_edge_protocol::{ArmCommand, Direction, FieldState, Segment};

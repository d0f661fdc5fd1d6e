//! The arm driver: a command register plus a transport.
//!
//! Every command mutates the register and then issues exactly one control
//! transfer carrying the full 3-byte buffer. Motions are continuous: the arm
//! keeps moving a segment until that segment (or everything) is stopped.

use owi_edge_protocol::masks;
use owi_edge_protocol::{
    ArmCommand, CommandByte, CommandRegister, Direction, FieldState, Segment, COMMAND_LEN,
    OWI_COMMAND_REQUEST,
};
use tracing::{debug, error, info};

use crate::{ArmConfig, ArmError, ControlTransport, DeviceLocator};

/// Driver for one OWI Robotic Arm Edge.
#[derive(Debug)]
pub struct OwiEdge<T> {
    register: CommandRegister,
    transport: T,
}

impl<T: ControlTransport> OwiEdge<T> {
    /// Wrap an already-open transport. Nothing is sent until the first
    /// command.
    pub fn new(transport: T) -> Self {
        Self {
            register: CommandRegister::new(),
            transport,
        }
    }

    /// Discover and open the arm named by `config`.
    ///
    /// Fails with [`ArmError::DeviceNotFound`] before any command is sent
    /// when no matching device is attached.
    pub fn open<L>(locator: &L, config: &ArmConfig) -> Result<Self, ArmError>
    where
        L: DeviceLocator<Transport = T>,
    {
        let transport = locator
            .locate(config.vendor_id, config.product_id)?
            .ok_or_else(|| ArmError::not_found(config.vendor_id, config.product_id))?;
        info!(
            "robot arm {:04x}:{:04x} ready",
            config.vendor_id, config.product_id
        );
        Ok(Self::new(transport))
    }

    /// The buffer most recently built, whether or not it reached the device.
    pub fn command(&self) -> [u8; COMMAND_LEN] {
        self.register.as_bytes()
    }

    /// The command register behind [`OwiEdge::command`].
    pub fn register(&self) -> &CommandRegister {
        &self.register
    }

    /// Decoded state of one segment's field.
    pub fn field_state(&self, segment: Segment) -> FieldState {
        self.register.field_state(segment)
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Zero the bits under `stop_mask` in `byte`, then send.
    pub fn clear_field(&mut self, byte: CommandByte, stop_mask: u8) -> Result<(), ArmError> {
        self.register.clear_field(byte, stop_mask);
        self.send()
    }

    /// OR `value_mask` into `byte`, then send.
    pub fn set_field(&mut self, byte: CommandByte, value_mask: u8) -> Result<(), ArmError> {
        self.register.set_field(byte, value_mask);
        self.send()
    }

    /// Clear the field, set one direction bit, then send.
    pub fn apply_directional(
        &mut self,
        byte: CommandByte,
        stop_mask: u8,
        value_mask: u8,
    ) -> Result<(), ArmError> {
        self.register.apply_directional(byte, stop_mask, value_mask);
        self.send()
    }

    /// Stop one field, then send.
    pub fn stop_field(&mut self, byte: CommandByte, stop_mask: u8) -> Result<(), ArmError> {
        self.register.stop_field(byte, stop_mask);
        self.send()
    }

    /// Stop every segment and switch the LED off.
    pub fn stop_all(&mut self) -> Result<(), ArmError> {
        self.register.stop_all();
        self.send()
    }

    /// Run one command value. An unsupported segment/direction pair fails
    /// without touching the register or the device.
    pub fn execute(&mut self, command: ArmCommand) -> Result<(), ArmError> {
        self.register.apply(command)?;
        self.send()
    }

    /// Start `segment` moving in `direction`.
    pub fn move_segment(&mut self, segment: Segment, direction: Direction) -> Result<(), ArmError> {
        self.execute(ArmCommand::moving(segment, direction))
    }

    /// Stop `segment`.
    pub fn stop_segment(&mut self, segment: Segment) -> Result<(), ArmError> {
        self.execute(ArmCommand::stop(segment))
    }

    /// Switch the LED on.
    pub fn turn_led_on(&mut self) -> Result<(), ArmError> {
        self.apply_directional(CommandByte::Led, masks::LED_OFF, masks::LED_ON)
    }

    /// Switch the LED off.
    pub fn turn_led_off(&mut self) -> Result<(), ArmError> {
        self.stop_field(CommandByte::Led, masks::LED_OFF)
    }

    /// Stop the gripper.
    pub fn stop_hand(&mut self) -> Result<(), ArmError> {
        self.stop_field(CommandByte::Motion, masks::STOP_HAND)
    }

    /// Open the gripper.
    pub fn open_hand(&mut self) -> Result<(), ArmError> {
        self.apply_directional(CommandByte::Motion, masks::STOP_HAND, masks::OPEN_HAND)
    }

    /// Close the gripper.
    pub fn close_hand(&mut self) -> Result<(), ArmError> {
        self.apply_directional(CommandByte::Motion, masks::STOP_HAND, masks::CLOSE_HAND)
    }

    /// Stop the wrist.
    pub fn stop_wrist(&mut self) -> Result<(), ArmError> {
        self.stop_field(CommandByte::Motion, masks::STOP_WRIST)
    }

    /// Raise the wrist.
    pub fn move_wrist_up(&mut self) -> Result<(), ArmError> {
        self.apply_directional(CommandByte::Motion, masks::STOP_WRIST, masks::WRIST_UP)
    }

    /// Lower the wrist.
    pub fn move_wrist_down(&mut self) -> Result<(), ArmError> {
        self.apply_directional(CommandByte::Motion, masks::STOP_WRIST, masks::WRIST_DOWN)
    }

    /// Stop the elbow.
    pub fn stop_elbow(&mut self) -> Result<(), ArmError> {
        self.stop_field(CommandByte::Motion, masks::STOP_ELBOW)
    }

    /// Raise the elbow.
    pub fn move_elbow_up(&mut self) -> Result<(), ArmError> {
        self.apply_directional(CommandByte::Motion, masks::STOP_ELBOW, masks::ELBOW_UP)
    }

    /// Lower the elbow.
    pub fn move_elbow_down(&mut self) -> Result<(), ArmError> {
        self.apply_directional(CommandByte::Motion, masks::STOP_ELBOW, masks::ELBOW_DOWN)
    }

    /// Stop the shoulder.
    pub fn stop_shoulder(&mut self) -> Result<(), ArmError> {
        self.stop_field(CommandByte::Motion, masks::STOP_SHOULDER)
    }

    /// Raise the shoulder.
    pub fn move_shoulder_up(&mut self) -> Result<(), ArmError> {
        self.apply_directional(CommandByte::Motion, masks::STOP_SHOULDER, masks::SHOULDER_UP)
    }

    /// Lower the shoulder.
    pub fn move_shoulder_down(&mut self) -> Result<(), ArmError> {
        self.apply_directional(
            CommandByte::Motion,
            masks::STOP_SHOULDER,
            masks::SHOULDER_DOWN,
        )
    }

    /// Stop the base.
    pub fn stop_base(&mut self) -> Result<(), ArmError> {
        self.stop_field(CommandByte::Base, masks::STOP_BASE)
    }

    /// Rotate the base clockwise.
    pub fn move_base_clockwise(&mut self) -> Result<(), ArmError> {
        self.apply_directional(CommandByte::Base, masks::STOP_BASE, masks::BASE_CLOCKWISE)
    }

    /// Rotate the base counter-clockwise.
    pub fn move_base_counter_clockwise(&mut self) -> Result<(), ArmError> {
        self.apply_directional(
            CommandByte::Base,
            masks::STOP_BASE,
            masks::BASE_COUNTER_CLOCKWISE,
        )
    }

    /// End the session: stop everything and release the transport.
    pub fn close(mut self) -> Result<(), ArmError> {
        self.stop_all()?;
        info!("robot arm session closed");
        Ok(())
    }

    fn send(&mut self) -> Result<(), ArmError> {
        let payload = self.register.as_bytes();
        debug!(command = %self.register, "control transfer");
        self.transport
            .send_control(OWI_COMMAND_REQUEST, &payload)
            .map_err(|e| {
                // the register keeps the new state even though the device may not
                error!(command = %self.register, "command error: {e}");
                ArmError::Transport(e)
            })
    }
}

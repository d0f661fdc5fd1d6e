//! Opening an arm session for a single CLI invocation.

use std::sync::Arc;

use owi_edge::protocol::{CommandRegister, ControlRequest, COMMAND_LEN};
use owi_edge::usb::UsbLocator;
use owi_edge::{
    ArmConfig, ArmError, ControlTransport, DeviceLocator, OwiEdge, TransportError, UsbDeviceInfo,
};
use parking_lot::Mutex;
use tracing::debug;

/// The arm as seen by commands: real USB or dry-run.
pub type Arm = OwiEdge<Box<dyn ControlTransport>>;

/// Frames captured by a dry run, reported with the command's JSON result.
#[derive(Debug, Clone, Default)]
pub struct FrameLog(Arc<Mutex<Vec<String>>>);

impl FrameLog {
    pub fn push(&self, frame: String) {
        self.0.lock().push(frame);
    }

    pub fn frames(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Prints each frame instead of sending it, or captures it for JSON output.
pub struct DryRunTransport {
    capture: Option<FrameLog>,
}

impl DryRunTransport {
    /// One frame per stdout line.
    pub fn printing() -> Self {
        Self { capture: None }
    }

    /// Frames go to `log` and stdout stays untouched.
    pub fn capturing(log: FrameLog) -> Self {
        Self { capture: Some(log) }
    }
}

impl ControlTransport for DryRunTransport {
    fn send_control(
        &mut self,
        request: ControlRequest,
        payload: &[u8; COMMAND_LEN],
    ) -> Result<(), TransportError> {
        let frame = CommandRegister::from_bytes(*payload).to_string();
        debug!(
            "dry run: request_type={:#04x} request={} value={:#06x} index={}",
            request.request_type, request.request, request.value, request.index
        );
        match &self.capture {
            Some(log) => log.push(frame),
            None => println!("{frame}"),
        }
        Ok(())
    }
}

/// Erases the transport type of any locator.
struct BoxedLocator<L>(L);

impl<L> DeviceLocator for BoxedLocator<L>
where
    L: DeviceLocator,
    L::Transport: 'static,
{
    type Transport = Box<dyn ControlTransport>;

    fn locate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Option<Self::Transport>, TransportError> {
        Ok(self
            .0
            .locate(vendor_id, product_id)?
            .map(|t| Box::new(t) as Box<dyn ControlTransport>))
    }

    fn list_devices(&self) -> Result<Vec<UsbDeviceInfo>, TransportError> {
        self.0.list_devices()
    }
}

/// Open the configured arm, or use `dry_run` in its place.
pub fn open_arm(config: &ArmConfig, dry_run: Option<DryRunTransport>) -> Result<Arm, ArmError> {
    if let Some(transport) = dry_run {
        return Ok(OwiEdge::new(Box::new(transport)));
    }
    OwiEdge::open(&BoxedLocator(UsbLocator::from_config(config)), config)
}

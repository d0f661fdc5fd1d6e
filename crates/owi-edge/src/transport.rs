//! Transport traits for delivering command buffers to the arm.

use owi_edge_protocol::{ControlRequest, COMMAND_LEN};

use crate::{TransportError, UsbDeviceInfo};

/// Sends one control transfer carrying a full command buffer.
pub trait ControlTransport {
    fn send_control(
        &mut self,
        request: ControlRequest,
        payload: &[u8; COMMAND_LEN],
    ) -> Result<(), TransportError>;
}

impl<T: ControlTransport + ?Sized> ControlTransport for Box<T> {
    fn send_control(
        &mut self,
        request: ControlRequest,
        payload: &[u8; COMMAND_LEN],
    ) -> Result<(), TransportError> {
        (**self).send_control(request, payload)
    }
}

/// Finds and opens a device by vendor/product ID.
pub trait DeviceLocator {
    type Transport: ControlTransport;

    /// Open the first matching device, or `None` if nothing matches.
    fn locate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Option<Self::Transport>, TransportError>;

    fn list_devices(&self) -> Result<Vec<UsbDeviceInfo>, TransportError>;
}

pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// One recorded control transfer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Transfer {
        pub request: ControlRequest,
        pub payload: [u8; COMMAND_LEN],
    }

    /// In-memory transport recording every transfer.
    ///
    /// Clones share history and connection state, so a test can keep one
    /// clone while the driver owns another.
    #[derive(Debug, Clone)]
    pub struct MockTransport {
        history: Arc<Mutex<Vec<Transfer>>>,
        connected: Arc<Mutex<bool>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                history: Arc::new(Mutex::new(Vec::new())),
                connected: Arc::new(Mutex::new(true)),
            }
        }

        pub fn transfers(&self) -> Vec<Transfer> {
            self.history.lock().clone()
        }

        /// Payloads of every transfer, oldest first.
        pub fn payloads(&self) -> Vec<[u8; COMMAND_LEN]> {
            self.history.lock().iter().map(|t| t.payload).collect()
        }

        pub fn last_payload(&self) -> Option<[u8; COMMAND_LEN]> {
            self.history.lock().last().map(|t| t.payload)
        }

        pub fn transfer_count(&self) -> usize {
            self.history.lock().len()
        }

        pub fn disconnect(&self) {
            *self.connected.lock() = false;
        }

        pub fn reconnect(&self) {
            *self.connected.lock() = true;
        }

        pub fn is_connected(&self) -> bool {
            *self.connected.lock()
        }
    }

    impl Default for MockTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ControlTransport for MockTransport {
        fn send_control(
            &mut self,
            request: ControlRequest,
            payload: &[u8; COMMAND_LEN],
        ) -> Result<(), TransportError> {
            if !self.is_connected() {
                return Err(TransportError::Disconnected);
            }
            self.history.lock().push(Transfer {
                request,
                payload: *payload,
            });
            Ok(())
        }
    }

    /// Locator over a fixed set of mock devices.
    #[derive(Debug, Default)]
    pub struct MockLocator {
        devices: Vec<(UsbDeviceInfo, MockTransport)>,
    }

    impl MockLocator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_device(&mut self, info: UsbDeviceInfo, transport: MockTransport) {
            self.devices.push((info, transport));
        }

        pub fn device_count(&self) -> usize {
            self.devices.len()
        }
    }

    impl DeviceLocator for MockLocator {
        type Transport = MockTransport;

        fn locate(
            &self,
            vendor_id: u16,
            product_id: u16,
        ) -> Result<Option<MockTransport>, TransportError> {
            Ok(self
                .devices
                .iter()
                .find(|(info, _)| info.matches(vendor_id, product_id))
                .map(|(_, transport)| transport.clone()))
        }

        fn list_devices(&self) -> Result<Vec<UsbDeviceInfo>, TransportError> {
            Ok(self.devices.iter().map(|(info, _)| info.clone()).collect())
        }
    }
}

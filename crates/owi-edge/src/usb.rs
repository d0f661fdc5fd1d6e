//! `rusb` (libusb) transport and discovery.

use std::time::Duration;

use owi_edge_protocol::{ControlRequest, COMMAND_LEN};
use rusb::{Device, DeviceHandle, GlobalContext};
use tracing::{debug, info};

use crate::{ArmConfig, ControlTransport, DeviceLocator, TransportError, UsbDeviceInfo};

/// An opened arm, sending commands as vendor control transfers.
pub struct UsbTransport {
    handle: DeviceHandle<GlobalContext>,
    timeout: Duration,
}

impl std::fmt::Debug for UsbTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ControlTransport for UsbTransport {
    fn send_control(
        &mut self,
        request: ControlRequest,
        payload: &[u8; COMMAND_LEN],
    ) -> Result<(), TransportError> {
        let written = self.handle.write_control(
            request.request_type,
            request.request,
            request.value,
            request.index,
            payload,
            self.timeout,
        )?;
        if written != payload.len() {
            return Err(TransportError::ShortWrite {
                written,
                expected: payload.len(),
            });
        }
        Ok(())
    }
}

/// Enumerates devices on the global libusb context.
#[derive(Debug, Clone, Copy)]
pub struct UsbLocator {
    timeout: Duration,
}

impl UsbLocator {
    /// Locator whose transports use `timeout` for every transfer.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Locator using the configured timeout.
    pub fn from_config(config: &ArmConfig) -> Self {
        Self::new(config.timeout())
    }
}

/// Pair each device with its `(vendor_id, product_id)`, skipping devices
/// whose descriptor cannot be read.
fn readable_ids<D>(
    devices: impl IntoIterator<Item = (D, Result<(u16, u16), rusb::Error>)>,
) -> impl Iterator<Item = (D, u16, u16)> {
    devices.into_iter().filter_map(|(device, ids)| match ids {
        Ok((vendor_id, product_id)) => Some((device, vendor_id, product_id)),
        Err(e) => {
            debug!("skipping device with unreadable descriptor: {e}");
            None
        }
    })
}

fn descriptor_ids(device: &Device<GlobalContext>) -> Result<(u16, u16), rusb::Error> {
    device
        .device_descriptor()
        .map(|d| (d.vendor_id(), d.product_id()))
}

impl DeviceLocator for UsbLocator {
    type Transport = UsbTransport;

    fn locate(
        &self,
        vendor_id: u16,
        product_id: u16,
    ) -> Result<Option<UsbTransport>, TransportError> {
        let devices = rusb::devices()?;
        let found = readable_ids(devices.iter().map(|d| {
            let ids = descriptor_ids(&d);
            (d, ids)
        }))
        .find(|&(_, vid, pid)| vid == vendor_id && pid == product_id);

        let Some((device, _, _)) = found else {
            debug!("no device matching {vendor_id:04x}:{product_id:04x}");
            return Ok(None);
        };
        let handle = device.open()?;
        info!(
            bus = device.bus_number(),
            address = device.address(),
            "opened {vendor_id:04x}:{product_id:04x}"
        );
        Ok(Some(UsbTransport {
            handle,
            timeout: self.timeout,
        }))
    }

    fn list_devices(&self) -> Result<Vec<UsbDeviceInfo>, TransportError> {
        let devices = rusb::devices()?;
        Ok(readable_ids(devices.iter().map(|d| {
            let ids = descriptor_ids(&d);
            (d, ids)
        }))
        .map(|(device, vid, pid)| {
            UsbDeviceInfo::new(vid, pid, device.bus_number(), device.address())
        })
        .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_descriptor_does_not_hide_the_arm() {
        let bus = [
            ("hub", Ok((0x1d6b, 0x0002))),
            ("faulty", Err(rusb::Error::Io)),
            ("arm", Ok((0x1267, 0x0000))),
        ];
        let found = readable_ids(bus)
            .find(|&(_, vid, pid)| vid == 0x1267 && pid == 0x0000)
            .map(|(name, _, _)| name);
        assert_eq!(found, Some("arm"));
    }

    #[test]
    fn unreadable_descriptors_are_left_out_of_listings() {
        let bus = [
            (1u8, Err(rusb::Error::Access)),
            (2u8, Ok((0x046d, 0xc24f))),
            (3u8, Err(rusb::Error::NoDevice)),
        ];
        let listed: Vec<_> = readable_ids(bus).collect();
        assert_eq!(listed, vec![(2, 0x046d, 0xc24f)]);
    }

    #[test]
    fn no_readable_match_is_none() {
        let bus = [("faulty", Err::<(u16, u16), _>(rusb::Error::Io))];
        assert_eq!(readable_ids(bus).count(), 0);
    }
}

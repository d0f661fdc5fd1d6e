//! Device information for enumerated USB devices

use owi_edge_protocol::is_owi_edge;
use serde::{Deserialize, Serialize};

/// One enumerated USB device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus_number: u8,
    pub address: u8,
    pub product_name: Option<String>,
}

impl UsbDeviceInfo {
    /// Describe a device; the arm's ids get the arm's product name.
    pub fn new(vendor_id: u16, product_id: u16, bus_number: u8, address: u8) -> Self {
        let product_name =
            is_owi_edge(vendor_id, product_id).then(|| "OWI Robotic Arm Edge".to_string());
        Self {
            vendor_id,
            product_id,
            bus_number,
            address,
            product_name,
        }
    }

    /// Override the product name.
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Whether this device has the given ids.
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }

    /// Product name, or `vid:pid` when unknown.
    pub fn display_name(&self) -> String {
        self.product_name
            .clone()
            .unwrap_or_else(|| format!("{:04x}:{:04x}", self.vendor_id, self.product_id))
    }

    /// Bus location in `bus:address` form, e.g. `001:014`.
    pub fn location(&self) -> String {
        format!("{:03}:{:03}", self.bus_number, self.address)
    }
}

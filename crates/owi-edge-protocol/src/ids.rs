//! OWI Robotic Arm Edge USB identifiers and control-transfer header.
//!
//! The arm's USB interface enumerates as a vendor-specific device with no
//! HID descriptor; commands are delivered as host-to-device vendor control
//! transfers carrying a fixed 3-byte payload.
//!
//! | Field           | Value    | Notes                                   |
//! |-----------------|----------|-----------------------------------------|
//! | `bmRequestType` | `0x40`   | host-to-device, vendor, device recipient |
//! | `bRequest`      | `0x06`   |                                         |
//! | `wValue`        | `0x0100` |                                         |
//! | `wIndex`        | `0x0000` |                                         |
//! | payload         | 3 bytes  | full command buffer, never a diff       |

/// OWI (Movit) USB vendor ID.
pub const VENDOR_ID: u16 = 0x1267;

/// Robotic Arm Edge USB interface product ID.
pub const PRODUCT_ID: u16 = 0x0000;

/// Length of every command payload in bytes.
pub const COMMAND_LEN: usize = 3;

/// Control-transfer request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlRequest {
    /// `bmRequestType`.
    pub request_type: u8,
    /// `bRequest`.
    pub request: u8,
    /// `wValue`.
    pub value: u16,
    /// `wIndex`.
    pub index: u16,
}

/// Header used for every arm command.
pub const OWI_COMMAND_REQUEST: ControlRequest = ControlRequest {
    request_type: 0x40,
    request: 0x06,
    value: 0x0100,
    index: 0x0000,
};

/// Returns `true` if the VID/PID pair identifies the Robotic Arm Edge.
pub fn is_owi_edge(vid: u16, pid: u16) -> bool {
    vid == VENDOR_ID && pid == PRODUCT_ID
}

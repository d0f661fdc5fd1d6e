//! Device discovery commands

use anyhow::Result;
use owi_edge::usb::UsbLocator;
use owi_edge::{ArmError, DeviceLocator};

use crate::commands::{DeviceCommands, Session};
use crate::output;

/// Execute device command
pub fn execute(cmd: &DeviceCommands, session: &Session) -> Result<()> {
    match cmd {
        DeviceCommands::List { all } => list_devices(session, *all),
    }
}

fn list_devices(session: &Session, all: bool) -> Result<()> {
    let config = &session.config;
    let devices = UsbLocator::from_config(config)
        .list_devices()
        .map_err(ArmError::from)?;
    let shown: Vec<_> = devices
        .into_iter()
        .filter(|d| all || d.matches(config.vendor_id, config.product_id))
        .collect();
    output::print_device_list(&shown, config.vendor_id, config.product_id, session.json);
    Ok(())
}

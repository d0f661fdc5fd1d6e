//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use owi_edge::protocol::{CommandRegister, COMMAND_LEN};
use owi_edge::{ArmCommand, UsbDeviceInfo};
use serde_json::json;

use crate::error::error_type_name;

fn print_json(value: &serde_json::Value, what: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format {} as JSON: {}", what, e),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error)
        }
    });
    print_json(&error_json, "error");
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Attach dry-run frames to a JSON result, when there are any.
fn with_frames(mut output: serde_json::Value, frames: &[String]) -> serde_json::Value {
    if !frames.is_empty() {
        output["frames"] = json!(frames);
    }
    output
}

/// Print the command that ran and the buffer the arm was left with.
pub fn print_command_result(
    command: &ArmCommand,
    buffer: [u8; COMMAND_LEN],
    frames: &[String],
    json: bool,
) {
    let register = CommandRegister::from_bytes(buffer);
    if json {
        let output = json!({
            "success": true,
            "command": command.to_string(),
            "buffer": register.to_string()
        });
        print_json(&with_frames(output, frames), "command result");
    } else {
        println!(
            "{} {} {}",
            "✓".green(),
            command.to_string().bold(),
            format!("[{}]", register).dimmed()
        );
    }
}

pub fn print_device_list(devices: &[UsbDeviceInfo], vendor_id: u16, product_id: u16, json: bool) {
    if json {
        let output = json!({
            "success": true,
            "devices": devices
        });
        print_json(&output, "device list");
        return;
    }

    if devices.is_empty() {
        println!("{}", "No robot arm found".yellow());
        return;
    }

    println!("{}", "USB Devices:".bold());
    for device in devices {
        let marker = if device.matches(vendor_id, product_id) {
            "●".green()
        } else {
            "○".dimmed()
        };
        println!(
            "  {} {} ({} {:04x}:{:04x})",
            marker,
            device.display_name().bold(),
            device.location().dimmed(),
            device.vendor_id,
            device.product_id
        );
    }
}

/// Print success message
pub fn print_success(message: &str, frames: &[String], json: bool) {
    if json {
        let output = json!({
            "success": true,
            "message": message
        });
        print_json(&with_frames(output, frames), "success message");
    } else {
        println!("{} {}", "✓".green(), message);
    }
}

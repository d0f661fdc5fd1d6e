//! Command implementations for owictl CLI

pub mod device;
pub mod motion;
pub mod routine;

use clap::{Subcommand, ValueEnum};
use owi_edge::{ArmConfig, ArmError};

use crate::session::{open_arm, Arm, DryRunTransport, FrameLog};

#[derive(Subcommand)]
pub enum DeviceCommands {
    /// List USB devices, marking the robot arm
    List {
        /// Include devices that are not a robot arm
        #[arg(short, long)]
        all: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LedState {
    On,
    Off,
}

/// Settings shared by every command that talks to the arm.
pub struct Session {
    pub config: ArmConfig,
    pub dry_run: bool,
    pub json: bool,
    frames: FrameLog,
}

impl Session {
    pub fn new(config: ArmConfig, dry_run: bool, json: bool) -> Self {
        Self {
            config,
            dry_run,
            json,
            frames: FrameLog::default(),
        }
    }

    /// Open the arm. A JSON dry run captures frames for [`Session::frames`];
    /// a plain one prints them.
    pub fn open(&self) -> Result<Arm, ArmError> {
        let dry_run = self.dry_run.then(|| {
            if self.json {
                DryRunTransport::capturing(self.frames.clone())
            } else {
                DryRunTransport::printing()
            }
        });
        open_arm(&self.config, dry_run)
    }

    /// Frames captured so far by a JSON dry run.
    pub fn frames(&self) -> Vec<String> {
        self.frames.frames()
    }
}

//! owictl - OWI Robotic Arm Edge control CLI
//!
//! Drives the arm's motors and LED over USB, plays back routines, and lists
//! attached devices.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod error;
mod output;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owi_edge::{ArmConfig, Direction, Segment};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::*;

#[derive(Parser)]
#[command(name = "owictl")]
#[command(about = "OWI Robotic Arm Edge control CLI - move joints, toggle the LED, play routines")]
#[command(version)]
#[command(long_about = "
owictl drives an OWI Robotic Arm Edge attached over USB.

Every motion is continuous: a segment keeps moving until it is stopped.
`move` stops the segment again after --duration-ms. Use --dry-run to print the
3-byte command frames instead of sending them, and --json for machine-readable
output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Driver configuration file (YAML)
    #[arg(long, global = true, env = "OWICTL_CONFIG")]
    config: Option<PathBuf>,

    /// Print command frames instead of sending them to the device
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move one segment, then stop it
    Move {
        /// hand, wrist, elbow, shoulder or base
        segment: Segment,
        /// open, close, up, down, clockwise (cw) or counter-clockwise (ccw)
        direction: Direction,
        /// How long to keep moving before stopping
        #[arg(short, long, default_value_t = 1000)]
        duration_ms: u64,
    },

    /// Stop one segment, or the whole arm
    Stop {
        /// Segment to stop; omit to stop everything
        segment: Option<Segment>,
    },

    /// Switch the LED on or off
    Led {
        #[arg(value_enum)]
        state: LedState,
    },

    /// Play the built-in demo routine
    Dance {
        /// Pause between steps
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Play a routine from a YAML file
    Run {
        /// Routine file
        file: PathBuf,
    },

    /// Device discovery commands
    #[command(subcommand)]
    Device(DeviceCommands),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("owictl={log_level},owi_edge={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn load_config(cli: &Cli) -> Result<ArmConfig> {
    Ok(match &cli.config {
        Some(path) => ArmConfig::load(path)?,
        None => ArmConfig::default(),
    })
}

fn execute_command(cli: &Cli) -> Result<()> {
    if let Commands::Completion { shell } = &cli.command {
        completion::generate_completion(*shell);
        return Ok(());
    }

    let session = Session::new(load_config(cli)?, cli.dry_run, cli.json);

    match &cli.command {
        Commands::Move {
            segment,
            direction,
            duration_ms,
        } => commands::motion::move_segment(
            &session,
            *segment,
            *direction,
            Duration::from_millis(*duration_ms),
        ),
        Commands::Stop { segment } => commands::motion::stop(&session, *segment),
        Commands::Led { state } => commands::motion::led(&session, *state),
        Commands::Dance { delay_ms } => {
            commands::routine::dance(&session, delay_ms.map(Duration::from_millis))
        }
        Commands::Run { file } => commands::routine::run(&session, file),
        Commands::Device(cmd) => commands::device::execute(cmd, &session),
        Commands::Completion { .. } => Ok(()),
    }
}

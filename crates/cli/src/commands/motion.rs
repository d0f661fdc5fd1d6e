//! Single-motion commands: move, stop, led

use std::time::Duration;

use anyhow::Result;
use owi_edge::choreography::pause;
use owi_edge::{ArmCommand, Direction, Segment};
use tracing::info;

use crate::commands::{LedState, Session};
use crate::error::CliError;
use crate::output;

/// Move one segment for `duration`, then stop it.
pub fn move_segment(
    session: &Session,
    segment: Segment,
    direction: Direction,
    duration: Duration,
) -> Result<()> {
    segment
        .value_mask(direction)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let mut arm = session.open()?;
    arm.move_segment(segment, direction)?;
    info!(%segment, %direction, ?duration, "moving");
    pause(duration);
    arm.stop_segment(segment)?;

    output::print_command_result(
        &ArmCommand::moving(segment, direction),
        arm.command(),
        &session.frames(),
        session.json,
    );
    Ok(())
}

/// Stop one segment, or the whole arm when none is given.
pub fn stop(session: &Session, segment: Option<Segment>) -> Result<()> {
    let mut arm = session.open()?;
    let command = segment.map_or(ArmCommand::StopAll, ArmCommand::stop);
    arm.execute(command)?;
    output::print_command_result(
        &command,
        arm.command(),
        &session.frames(),
        session.json,
    );
    Ok(())
}

pub fn led(session: &Session, state: LedState) -> Result<()> {
    let mut arm = session.open()?;
    let command = match state {
        LedState::On => ArmCommand::LedOn,
        LedState::Off => ArmCommand::LedOff,
    };
    arm.execute(command)?;
    output::print_command_result(
        &command,
        arm.command(),
        &session.frames(),
        session.json,
    );
    Ok(())
}

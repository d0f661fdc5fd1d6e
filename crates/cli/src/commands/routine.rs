//! Routine playback: the built-in dance and YAML routines

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use owi_edge::{perform, ArmError, ControlTransport, OwiEdge, Routine};
use tracing::warn;

use crate::commands::Session;
use crate::output;

pub fn dance(session: &Session, delay: Option<Duration>) -> Result<()> {
    let mut routine = Routine::dance();
    if let Some(delay) = delay {
        routine = routine.with_step_delay(delay);
    }
    play(session, &routine)
}

pub fn run(session: &Session, path: &Path) -> Result<()> {
    let routine = Routine::load(path)
        .with_context(|| format!("failed to load routine from {}", path.display()))?;
    play(session, &routine)
}

fn play(session: &Session, routine: &Routine) -> Result<()> {
    let mut arm = session.open()?;
    perform_or_stop(&mut arm, routine, session.config.step_delay())?;
    arm.close()?;

    output::print_success(
        &format!(
            "Routine '{}' finished ({} steps, {} commands)",
            routine.name,
            routine.steps.len(),
            routine.command_count()
        ),
        &session.frames(),
        session.json,
    );
    Ok(())
}

/// Run `routine`; if a command fails, try once to stop the arm and return the
/// original error.
fn perform_or_stop<T: ControlTransport>(
    arm: &mut OwiEdge<T>,
    routine: &Routine,
    default_delay: Duration,
) -> Result<(), ArmError> {
    let Err(err) = perform(arm, routine, default_delay) else {
        return Ok(());
    };
    if let Err(stop_err) = arm.stop_all() {
        warn!("could not stop the arm after a failed routine: {stop_err}");
    }
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owi_edge::protocol::{ControlRequest, COMMAND_LEN};
    use owi_edge::{ArmCommand, Direction, Segment, TransportError};
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Fails the transfer numbered `fail_at` (zero-based) and accepts the rest.
    struct FlakyTransport {
        fail_at: usize,
        calls: usize,
        sent: Arc<Mutex<Vec<[u8; COMMAND_LEN]>>>,
    }

    impl ControlTransport for FlakyTransport {
        fn send_control(
            &mut self,
            _request: ControlRequest,
            payload: &[u8; COMMAND_LEN],
        ) -> Result<(), TransportError> {
            let call = self.calls;
            self.calls += 1;
            if call == self.fail_at {
                return Err(TransportError::Disconnected);
            }
            self.sent.lock().push(*payload);
            Ok(())
        }
    }

    fn routine() -> Routine {
        Routine::new("reach")
            .with_step_delay(Duration::ZERO)
            .then(ArmCommand::moving(Segment::Shoulder, Direction::Up))
            .then(ArmCommand::moving(Segment::Elbow, Direction::Up))
            .then(ArmCommand::LedOn)
    }

    #[test]
    fn failed_routine_stops_the_arm() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut arm = OwiEdge::new(FlakyTransport {
            fail_at: 1,
            calls: 0,
            sent: Arc::clone(&sent),
        });

        let result = perform_or_stop(&mut arm, &routine(), Duration::ZERO);

        assert!(matches!(
            result,
            Err(ArmError::Transport(TransportError::Disconnected))
        ));
        assert_eq!(*sent.lock(), vec![[0x80, 0, 0], [0, 0, 0]]);
        assert_eq!(arm.command(), [0, 0, 0]);
    }

    #[test]
    fn successful_routine_is_left_running() -> Result<(), Box<dyn std::error::Error>> {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut arm = OwiEdge::new(FlakyTransport {
            fail_at: usize::MAX,
            calls: 0,
            sent: Arc::clone(&sent),
        });

        perform_or_stop(&mut arm, &routine(), Duration::ZERO)?;

        assert_eq!(arm.command(), [0x90, 0, 0x01]);
        assert_eq!(sent.lock().len(), 3);
        Ok(())
    }
}

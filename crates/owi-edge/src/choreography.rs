//! Timed command routines ("dances").
//!
//! A routine is an ordered list of steps. Each step runs one or more commands
//! back-to-back and is followed by a blocking pause. Routines can be built in
//! code or loaded from YAML:
//!
//! ```yaml
//! name: nod
//! step_delay_ms: 400
//! steps:
//!   - led on
//!   - shoulder up
//!   - shoulder down
//!   - [stop shoulder, led off]
//! ```

use std::path::Path;
use std::time::Duration;

use owi_edge_protocol::{ArmCommand, CommandRegister, Direction, Segment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{ArmError, ConfigError, ControlTransport, OwiEdge};

/// Pause used when neither the routine nor the caller picks one.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(500);

/// Pause between the steps of [`Routine::dance`].
pub const DANCE_PAUSE: Duration = Duration::from_millis(750);

/// Block the current thread for `duration`.
pub fn pause(duration: Duration) {
    std::thread::sleep(duration);
}

/// Commands run together, with no pause between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StepRepr", into = "StepRepr")]
pub struct Step {
    commands: Vec<ArmCommand>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StepRepr {
    One(ArmCommand),
    Many(Vec<ArmCommand>),
}

impl From<StepRepr> for Step {
    fn from(repr: StepRepr) -> Self {
        match repr {
            StepRepr::One(command) => Step::single(command),
            StepRepr::Many(commands) => Step::chain(commands),
        }
    }
}

impl From<Step> for StepRepr {
    fn from(step: Step) -> Self {
        match step.commands.as_slice() {
            [command] => StepRepr::One(*command),
            _ => StepRepr::Many(step.commands),
        }
    }
}

impl Step {
    /// A step running one command.
    pub fn single(command: ArmCommand) -> Self {
        Self {
            commands: vec![command],
        }
    }

    /// A step running `commands` back-to-back.
    pub fn chain(commands: impl IntoIterator<Item = ArmCommand>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }

    /// Commands in execution order.
    pub fn commands(&self) -> &[ArmCommand] {
        &self.commands
    }
}

impl From<ArmCommand> for Step {
    fn from(command: ArmCommand) -> Self {
        Step::single(command)
    }
}

/// Named, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Routine {
    pub name: String,
    /// Overrides the caller's default pause when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_delay_ms: Option<u64>,
    pub steps: Vec<Step>,
}

impl Routine {
    /// An empty routine with no delay override.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            step_delay_ms: None,
            steps: Vec::new(),
        }
    }

    /// Pause `delay` after every step, whatever the caller's default.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay_ms = Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Append a step.
    pub fn then(mut self, step: impl Into<Step>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Pause after each step, falling back to `default`.
    pub fn step_delay(&self, default: Duration) -> Duration {
        self.step_delay_ms.map_or(default, Duration::from_millis)
    }

    /// The demo wiggle: blink the LED, swing the base, then nod every joint
    /// from the shoulder down to the hand, ending with everything stopped.
    pub fn dance() -> Self {
        use ArmCommand::{LedOff, LedOn, StopAll};
        let mv = ArmCommand::moving;
        let stop = ArmCommand::stop;

        let mut routine = Routine::new("dance").with_step_delay(DANCE_PAUSE);
        for _ in 0..3 {
            routine = routine.then(LedOn).then(LedOff);
        }
        for _ in 0..2 {
            routine = routine
                .then(mv(Segment::Base, Direction::Clockwise))
                .then(mv(Segment::Base, Direction::CounterClockwise));
        }

        let joints = [
            (Segment::Base, Segment::Shoulder, Direction::Up, Direction::Down),
            (Segment::Shoulder, Segment::Elbow, Direction::Up, Direction::Down),
            (Segment::Elbow, Segment::Wrist, Direction::Up, Direction::Down),
            (Segment::Wrist, Segment::Hand, Direction::Open, Direction::Close),
        ];
        for (previous, joint, first, second) in joints {
            routine = routine
                .then(Step::chain([stop(previous), mv(joint, first)]))
                .then(mv(joint, second))
                .then(mv(joint, first))
                .then(mv(joint, second));
        }
        routine.then(StopAll)
    }

    /// Parse and validate a routine.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let routine: Self = serde_yaml::from_str(yaml)?;
        routine.validate()?;
        Ok(routine)
    }

    /// Read and validate a routine file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Reject empty routines, empty steps and unsupported motions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps.is_empty() {
            return Err(ConfigError::invalid("steps", "routine has no steps"));
        }
        if let Some(index) = self.steps.iter().position(|s| s.commands.is_empty()) {
            return Err(ConfigError::invalid(
                "steps",
                format!("step {index} has no commands"),
            ));
        }
        // dry run on a scratch register
        let mut scratch = CommandRegister::new();
        for command in self.steps.iter().flat_map(|s| s.commands.iter()) {
            scratch
                .apply(*command)
                .map_err(|e| ConfigError::invalid("steps", e.to_string()))?;
        }
        Ok(())
    }

    /// Total commands across all steps.
    pub fn command_count(&self) -> usize {
        self.steps.iter().map(|s| s.commands.len()).sum()
    }
}

/// Run `routine` on `arm`, sleeping between steps.
pub fn perform<T: ControlTransport>(
    arm: &mut OwiEdge<T>,
    routine: &Routine,
    default_delay: Duration,
) -> Result<(), ArmError> {
    perform_with(arm, routine, default_delay, pause)
}

/// Run `routine`, calling `wait` after every step instead of sleeping.
///
/// The first failing command aborts the routine and is returned.
pub fn perform_with<T, W>(
    arm: &mut OwiEdge<T>,
    routine: &Routine,
    default_delay: Duration,
    mut wait: W,
) -> Result<(), ArmError>
where
    T: ControlTransport,
    W: FnMut(Duration),
{
    let delay = routine.step_delay(default_delay);
    info!(
        routine = %routine.name,
        steps = routine.steps.len(),
        "performing routine"
    );
    for (index, step) in routine.steps.iter().enumerate() {
        for &command in step.commands() {
            debug!(step = index, %command, "routine command");
            arm.execute(command)?;
        }
        wait(delay);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn dance_matches_the_demo_sequence() {
        let dance = Routine::dance();
        assert_eq!(dance.name, "dance");
        assert_eq!(dance.step_delay(DEFAULT_PAUSE), DANCE_PAUSE);
        assert_eq!(dance.steps.len(), 27);
        assert_eq!(dance.command_count(), 31);
        assert_eq!(dance.steps.last(), Some(&Step::single(ArmCommand::StopAll)));
        assert!(dance.validate().is_ok());
    }

    #[test]
    fn dance_sends_one_transfer_per_command() -> TestResult {
        let transport = MockTransport::new();
        let mut arm = OwiEdge::new(transport.clone());
        let mut waits = Vec::new();
        perform_with(&mut arm, &Routine::dance(), DEFAULT_PAUSE, |d| waits.push(d))?;

        assert_eq!(waits.len(), 27);
        assert!(waits.iter().all(|&d| d == DANCE_PAUSE));
        assert_eq!(transport.transfer_count(), 31);
        assert_eq!(transport.last_payload(), Some([0, 0, 0]));

        let payloads = transport.payloads();
        assert_eq!(
            &payloads[..6],
            &[[0, 0, 1], [0, 0, 0], [0, 0, 1], [0, 0, 0], [0, 0, 1], [0, 0, 0]]
        );
        // shoulder transition: stop base, then shoulder up
        assert_eq!(payloads[10], [0x00, 0x00, 0x00]);
        assert_eq!(payloads[11], [0x80, 0x00, 0x00]);
        Ok(())
    }

    #[test]
    fn failing_command_aborts_routine() {
        let transport = MockTransport::new();
        let mut arm = OwiEdge::new(transport.clone());
        transport.disconnect();
        let mut waits = 0;
        let result = perform_with(&mut arm, &Routine::dance(), DEFAULT_PAUSE, |_| waits += 1);
        assert!(matches!(result, Err(ArmError::Transport(_))));
        assert_eq!(waits, 0);
    }

    #[test]
    fn routine_uses_default_delay_when_unset() -> TestResult {
        let routine = Routine::new("blink")
            .then(ArmCommand::LedOn)
            .then(ArmCommand::LedOff);
        let mut arm = OwiEdge::new(MockTransport::new());
        let mut waits = Vec::new();
        perform_with(&mut arm, &routine, Duration::from_millis(20), |d| waits.push(d))?;
        assert_eq!(waits, vec![Duration::from_millis(20); 2]);
        Ok(())
    }

    #[test]
    fn load_routine_from_yaml() -> TestResult {
        let yaml = "\
name: nod
step_delay_ms: 400
steps:
  - led on
  - shoulder up
  - shoulder down
  - [stop shoulder, led off]
";
        let routine = Routine::from_yaml_str(yaml)?;
        assert_eq!(routine.name, "nod");
        assert_eq!(routine.step_delay(DEFAULT_PAUSE), Duration::from_millis(400));
        assert_eq!(routine.steps.len(), 4);
        assert_eq!(
            routine.steps[3].commands(),
            &[ArmCommand::stop(Segment::Shoulder), ArmCommand::LedOff]
        );
        Ok(())
    }

    #[test]
    fn yaml_round_trip_keeps_steps() -> TestResult {
        let dance = Routine::dance();
        let yaml = serde_yaml::to_string(&dance)?;
        let decoded = Routine::from_yaml_str(&yaml)?;
        assert_eq!(decoded, dance);
        Ok(())
    }

    #[test]
    fn invalid_routines_rejected() {
        assert!(matches!(
            Routine::from_yaml_str("name: empty\nsteps: []\n"),
            Err(ConfigError::Invalid { field: "steps", .. })
        ));
        assert!(matches!(
            Routine::from_yaml_str("name: bad\nsteps:\n  - hand up\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Routine::from_yaml_str("name: bad\nsteps:\n  - []\n"),
            Err(ConfigError::Invalid { field: "steps", .. })
        ));
    }
}

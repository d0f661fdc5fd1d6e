//! Segment, direction and field descriptor types.

use core::fmt;
use core::str::FromStr;

use crate::masks;

/// Position of a byte inside the 3-byte command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CommandByte {
    /// Byte 0: hand, wrist, elbow and shoulder.
    Motion = 0,
    /// Byte 1: base rotation.
    Base = 1,
    /// Byte 2: LED.
    Led = 2,
}

impl CommandByte {
    /// Index of the byte inside the buffer.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One independently addressable part of the arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Segment {
    Hand,
    Wrist,
    Elbow,
    Shoulder,
    Base,
    Led,
}

/// Direction (or state) requested for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Direction {
    Open,
    Close,
    Up,
    Down,
    Clockwise,
    CounterClockwise,
    On,
}

impl Segment {
    /// Every segment, in buffer order.
    pub const ALL: [Segment; 6] = [
        Segment::Hand,
        Segment::Wrist,
        Segment::Elbow,
        Segment::Shoulder,
        Segment::Base,
        Segment::Led,
    ];

    /// Byte that holds this segment's field.
    pub const fn byte(self) -> CommandByte {
        match self {
            Segment::Hand | Segment::Wrist | Segment::Elbow | Segment::Shoulder => {
                CommandByte::Motion
            }
            Segment::Base => CommandByte::Base,
            Segment::Led => CommandByte::Led,
        }
    }

    /// Mask covering every bit of this segment's field.
    pub const fn stop_mask(self) -> u8 {
        match self {
            Segment::Hand => masks::STOP_HAND,
            Segment::Wrist => masks::STOP_WRIST,
            Segment::Elbow => masks::STOP_ELBOW,
            Segment::Shoulder => masks::STOP_SHOULDER,
            Segment::Base => masks::STOP_BASE,
            Segment::Led => masks::LED_OFF,
        }
    }

    /// Directions this segment accepts. The LED has a single active state.
    pub const fn directions(self) -> &'static [Direction] {
        match self {
            Segment::Hand => &[Direction::Open, Direction::Close],
            Segment::Wrist | Segment::Elbow | Segment::Shoulder => {
                &[Direction::Up, Direction::Down]
            }
            Segment::Base => &[Direction::Clockwise, Direction::CounterClockwise],
            Segment::Led => &[Direction::On],
        }
    }

    /// Value mask for `direction`, or an error if the segment cannot move
    /// that way.
    pub const fn value_mask(self, direction: Direction) -> Result<u8, MotionError> {
        let mask = match (self, direction) {
            (Segment::Hand, Direction::Open) => masks::OPEN_HAND,
            (Segment::Hand, Direction::Close) => masks::CLOSE_HAND,
            (Segment::Wrist, Direction::Up) => masks::WRIST_UP,
            (Segment::Wrist, Direction::Down) => masks::WRIST_DOWN,
            (Segment::Elbow, Direction::Up) => masks::ELBOW_UP,
            (Segment::Elbow, Direction::Down) => masks::ELBOW_DOWN,
            (Segment::Shoulder, Direction::Up) => masks::SHOULDER_UP,
            (Segment::Shoulder, Direction::Down) => masks::SHOULDER_DOWN,
            (Segment::Base, Direction::Clockwise) => masks::BASE_CLOCKWISE,
            (Segment::Base, Direction::CounterClockwise) => masks::BASE_COUNTER_CLOCKWISE,
            (Segment::Led, Direction::On) => masks::LED_ON,
            (segment, direction) => {
                return Err(MotionError::UnsupportedDirection { segment, direction });
            }
        };
        Ok(mask)
    }

    /// Lower-case name, as accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            Segment::Hand => "hand",
            Segment::Wrist => "wrist",
            Segment::Elbow => "elbow",
            Segment::Shoulder => "shoulder",
            Segment::Base => "base",
            Segment::Led => "led",
        }
    }
}

impl Direction {
    /// Lower-case name, as accepted by `FromStr`.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Open => "open",
            Direction::Close => "close",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Clockwise => "clockwise",
            Direction::CounterClockwise => "counter-clockwise",
            Direction::On => "on",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Segment {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::ALL
            .into_iter()
            .find(|segment| segment.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError::new("segment", s))
    }
}

impl FromStr for Direction {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Direction::Open),
            "close" => Ok(Direction::Close),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "clockwise" | "cw" => Ok(Direction::Clockwise),
            "counter-clockwise" | "counterclockwise" | "ccw" => Ok(Direction::CounterClockwise),
            "on" => Ok(Direction::On),
            _ => Err(ParseNameError::new("direction", s)),
        }
    }
}

/// A `(byte, stop mask, value mask)` triple for one segment-direction pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub byte: CommandByte,
    pub stop_mask: u8,
    pub value_mask: u8,
}

impl FieldDescriptor {
    /// Look up the descriptor for moving `segment` in `direction`.
    pub const fn for_motion(segment: Segment, direction: Direction) -> Result<Self, MotionError> {
        match segment.value_mask(direction) {
            Ok(value_mask) => Ok(Self {
                byte: segment.byte(),
                stop_mask: segment.stop_mask(),
                value_mask,
            }),
            Err(e) => Err(e),
        }
    }
}

/// Decoded state of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FieldState {
    Stopped,
    Active(Direction),
}

impl fmt::Display for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldState::Stopped => f.write_str("stopped"),
            FieldState::Active(direction) => write!(f, "{direction}"),
        }
    }
}

/// One arm operation, as a value.
///
/// The text form (`Display`/`FromStr`, and serde when enabled) is
/// `"<segment> <direction>"`, `"stop <segment>"`, `"led on"`, `"led off"` or
/// `"stop all"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmCommand {
    Move {
        segment: Segment,
        direction: Direction,
    },
    Stop {
        segment: Segment,
    },
    LedOn,
    LedOff,
    StopAll,
}

impl ArmCommand {
    /// Start `segment` moving in `direction`.
    pub const fn moving(segment: Segment, direction: Direction) -> Self {
        ArmCommand::Move { segment, direction }
    }

    /// Stop one segment.
    pub const fn stop(segment: Segment) -> Self {
        ArmCommand::Stop { segment }
    }
}

impl fmt::Display for ArmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmCommand::Move { segment, direction } => write!(f, "{segment} {direction}"),
            ArmCommand::Stop { segment } => write!(f, "stop {segment}"),
            ArmCommand::LedOn => f.write_str("led on"),
            ArmCommand::LedOff => f.write_str("led off"),
            ArmCommand::StopAll => f.write_str("stop all"),
        }
    }
}

impl FromStr for ArmCommand {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();
        match words.as_slice() {
            ["stop", "all"] => Ok(ArmCommand::StopAll),
            ["stop", segment] => Ok(ArmCommand::Stop {
                segment: segment.parse()?,
            }),
            ["led", "on"] => Ok(ArmCommand::LedOn),
            ["led", "off"] => Ok(ArmCommand::LedOff),
            [segment, direction] => {
                let segment: Segment = segment.parse()?;
                let direction: Direction = direction.parse()?;
                segment.value_mask(direction)?;
                Ok(ArmCommand::Move { segment, direction })
            }
            _ => Err(ParseCommandError::Malformed(s.to_owned())),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ArmCommand {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ArmCommand {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors returned when a motion cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionError {
    /// The segment has no field value for this direction (e.g. "hand up").
    UnsupportedDirection {
        segment: Segment,
        direction: Direction,
    },
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::UnsupportedDirection { segment, direction } => {
                write!(f, "{segment} cannot move {direction}")
            }
        }
    }
}

impl core::error::Error for MotionError {}

/// Error returned by the `FromStr` impls of [`Segment`] and [`Direction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNameError {
    kind: &'static str,
    name: String,
}

impl ParseNameError {
    fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
        }
    }
}

impl fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.kind, self.name)
    }
}

impl core::error::Error for ParseNameError {}

/// Error returned by `ArmCommand::from_str`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    Name(ParseNameError),
    Motion(MotionError),
    Malformed(String),
}

impl From<ParseNameError> for ParseCommandError {
    fn from(e: ParseNameError) -> Self {
        ParseCommandError::Name(e)
    }
}

impl From<MotionError> for ParseCommandError {
    fn from(e: MotionError) -> Self {
        ParseCommandError::Motion(e)
    }
}

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCommandError::Name(e) => write!(f, "{e}"),
            ParseCommandError::Motion(e) => write!(f, "{e}"),
            ParseCommandError::Malformed(text) => write!(
                f,
                "malformed command '{text}': expected '<segment> <direction>', \
                 'stop <segment>', 'led on|off' or 'stop all'"
            ),
        }
    }
}

impl core::error::Error for ParseCommandError {}

//! End-to-end tests of the driver against the mock transport.
//!
//! Each scenario checks the exact sequence of buffers the device would see.

use insta::assert_snapshot;
use owi_edge::mock::{MockLocator, MockTransport};
use owi_edge::protocol::OWI_COMMAND_REQUEST;
use owi_edge::{
    ArmCommand, ArmConfig, ArmError, Direction, OwiEdge, Segment, SharedArm, UsbDeviceInfo,
};
use proptest::prelude::*;

type TestResult = Result<(), ArmError>;

fn frames(transport: &MockTransport) -> String {
    transport
        .payloads()
        .iter()
        .map(|[a, b, c]| format!("{a:02X} {b:02X} {c:02X}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn connected_arm() -> Result<(OwiEdge<MockTransport>, MockTransport), ArmError> {
    let transport = MockTransport::new();
    let mut locator = MockLocator::new();
    locator.add_device(UsbDeviceInfo::new(0x1267, 0x0000, 3, 7), transport.clone());
    let arm = OwiEdge::open(&locator, &ArmConfig::default())?;
    Ok((arm, transport))
}

#[test]
fn test_missing_device_is_reported_before_any_command() {
    let mut locator = MockLocator::new();
    locator.add_device(UsbDeviceInfo::new(0x046D, 0xC24F, 1, 2), MockTransport::new());
    let err = OwiEdge::open(&locator, &ArmConfig::default())
        .err()
        .map(|e| e.to_string());
    assert_eq!(
        err.as_deref(),
        Some("Unable to connect to your robot arm (1267:0000)! Check power and connection.")
    );
}

#[test]
fn test_full_pose_sequence() -> TestResult {
    let (mut arm, transport) = connected_arm()?;
    arm.move_shoulder_up()?;
    arm.move_elbow_up()?;
    arm.move_wrist_up()?;
    arm.move_base_counter_clockwise()?;
    arm.turn_led_on()?;
    arm.turn_led_off()?;
    arm.stop_all()?;
    assert_snapshot!(frames(&transport), @r"
    80 00 00
    90 00 00
    94 00 00
    94 02 00
    94 02 01
    94 02 00
    00 00 00
    ");
    assert!(transport
        .transfers()
        .iter()
        .all(|t| t.request == OWI_COMMAND_REQUEST));
    Ok(())
}

#[test]
fn test_direction_reversals() -> TestResult {
    let (mut arm, transport) = connected_arm()?;
    arm.close_hand()?;
    arm.open_hand()?;
    arm.move_base_clockwise()?;
    arm.move_base_counter_clockwise()?;
    arm.move_shoulder_down()?;
    arm.move_shoulder_up()?;
    arm.stop_hand()?;
    arm.stop_base()?;
    arm.stop_shoulder()?;
    assert_snapshot!(frames(&transport), @r"
    01 00 00
    02 00 00
    02 01 00
    02 02 00
    42 02 00
    82 02 00
    80 02 00
    80 00 00
    00 00 00
    ");
    Ok(())
}

#[test]
fn test_session_teardown_stops_the_arm() -> TestResult {
    let (mut arm, transport) = connected_arm()?;
    arm.move_elbow_down()?;
    arm.turn_led_on()?;
    arm.close()?;
    assert_eq!(transport.last_payload(), Some([0, 0, 0]));
    Ok(())
}

#[test]
fn test_transport_error_surfaces_to_caller() -> TestResult {
    let (mut arm, transport) = connected_arm()?;
    arm.move_wrist_down()?;
    transport.disconnect();
    let err = arm.move_elbow_up().err();
    assert!(matches!(err, Some(ArmError::Transport(_))));
    assert!(err.is_some_and(|e| e.is_device_unavailable()));
    // mutation is kept even though the device never saw it
    assert_eq!(arm.command(), [0x18, 0, 0]);
    assert_eq!(transport.payloads(), vec![[0x08, 0, 0]]);
    Ok(())
}

#[test]
fn test_shared_arm_from_many_threads() -> TestResult {
    let (arm, transport) = connected_arm()?;
    let shared = SharedArm::new(arm);
    let workers: Vec<_> = [
        ArmCommand::moving(Segment::Shoulder, Direction::Down),
        ArmCommand::moving(Segment::Hand, Direction::Open),
        ArmCommand::moving(Segment::Base, Direction::Clockwise),
        ArmCommand::LedOn,
    ]
    .into_iter()
    .map(|command| {
        let shared = shared.clone();
        std::thread::spawn(move || shared.execute(command))
    })
    .collect();
    for worker in workers {
        worker
            .join()
            .unwrap_or_else(|_| Err(ArmError::not_found(0, 0)))?;
    }
    assert_eq!(shared.command(), [0x42, 0x01, 0x01]);
    assert_eq!(transport.transfer_count(), 4);
    Ok(())
}

fn any_command() -> impl Strategy<Value = ArmCommand> {
    prop_oneof![
        proptest::sample::select(Segment::ALL.to_vec()).prop_flat_map(|segment| {
            proptest::sample::select(segment.directions().to_vec())
                .prop_map(move |direction| ArmCommand::moving(segment, direction))
        }),
        proptest::sample::select(Segment::ALL.to_vec()).prop_map(ArmCommand::stop),
        Just(ArmCommand::LedOn),
        Just(ArmCommand::LedOff),
        Just(ArmCommand::StopAll),
    ]
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(200))]

    /// Every command sends exactly one transfer carrying the full current state.
    #[test]
    fn prop_one_transfer_per_command(commands in proptest::collection::vec(any_command(), 1..40)) {
        let transport = MockTransport::new();
        let mut arm = OwiEdge::new(transport.clone());
        for (i, command) in commands.iter().enumerate() {
            arm.execute(*command).map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert_eq!(transport.transfer_count(), i + 1);
            prop_assert_eq!(transport.last_payload(), Some(arm.command()));
        }
    }

    /// stop_all always leaves the device with an all-zero buffer.
    #[test]
    fn prop_stop_all_after_anything(commands in proptest::collection::vec(any_command(), 0..40)) {
        let transport = MockTransport::new();
        let mut arm = OwiEdge::new(transport.clone());
        for command in commands {
            arm.execute(command).map_err(|e| TestCaseError::fail(e.to_string()))?;
        }
        arm.stop_all().map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(transport.last_payload(), Some([0, 0, 0]));
    }
}

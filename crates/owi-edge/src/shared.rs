//! Thread-safe handle over one arm.
//!
//! A command is a read-modify-write of a shared byte followed by a transfer.
//! Both run under one lock so concurrent callers never lose each other's
//! field updates.

use std::sync::Arc;

use owi_edge_protocol::{ArmCommand, COMMAND_LEN};
use parking_lot::Mutex;

use crate::{ArmError, ControlTransport, OwiEdge};

/// Cloneable handle sharing one [`OwiEdge`] between threads.
///
/// Each command holds the lock across the register update and the transfer.
pub struct SharedArm<T> {
    inner: Arc<Mutex<OwiEdge<T>>>,
}

impl<T> Clone for SharedArm<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ControlTransport> SharedArm<T> {
    /// Move `arm` behind a lock.
    pub fn new(arm: OwiEdge<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(arm)),
        }
    }

    /// Run `f` with exclusive access to the arm.
    pub fn with<R>(&self, f: impl FnOnce(&mut OwiEdge<T>) -> R) -> R {
        let mut arm = self.inner.lock();
        f(&mut arm)
    }

    /// Run one command under the lock.
    pub fn execute(&self, command: ArmCommand) -> Result<(), ArmError> {
        self.with(|arm| arm.execute(command))
    }

    /// Stop everything under the lock.
    pub fn stop_all(&self) -> Result<(), ArmError> {
        self.with(OwiEdge::stop_all)
    }

    /// Snapshot of the current buffer.
    pub fn command(&self) -> [u8; COMMAND_LEN] {
        self.inner.lock().command()
    }

    /// Take the arm back once every other handle has been dropped.
    pub fn into_inner(self) -> Option<OwiEdge<T>> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use owi_edge_protocol::{Direction, Segment};

    #[test]
    fn concurrent_fields_are_all_kept() -> Result<(), ArmError> {
        let transport = MockTransport::new();
        let arm = SharedArm::new(OwiEdge::new(transport.clone()));

        let motions = [
            (Segment::Hand, Direction::Close),
            (Segment::Wrist, Direction::Up),
            (Segment::Elbow, Direction::Up),
            (Segment::Shoulder, Direction::Up),
            (Segment::Base, Direction::CounterClockwise),
        ];

        let results: Vec<Result<(), ArmError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = motions
                .iter()
                .map(|&(segment, direction)| {
                    let arm = arm.clone();
                    scope.spawn(move || -> Result<(), ArmError> {
                        for _ in 0..50 {
                            arm.execute(ArmCommand::moving(segment, direction))?;
                        }
                        Ok(())
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|_| Err(ArmError::not_found(0, 0))))
                .collect()
        });
        for result in results {
            result?;
        }

        assert_eq!(arm.command(), [0x95, 0x02, 0x00]);
        assert_eq!(transport.transfer_count(), 250);
        assert_eq!(transport.last_payload(), Some([0x95, 0x02, 0x00]));
        Ok(())
    }

    #[test]
    fn with_gives_exclusive_access() -> Result<(), ArmError> {
        let arm = SharedArm::new(OwiEdge::new(MockTransport::new()));
        arm.with(|arm| {
            arm.move_shoulder_up()?;
            arm.turn_led_on()
        })?;
        assert_eq!(arm.command(), [0x80, 0, 0x01]);
        arm.stop_all()?;
        assert_eq!(arm.command(), [0, 0, 0]);
        Ok(())
    }

    #[test]
    fn into_inner_requires_last_handle() {
        let arm = SharedArm::new(OwiEdge::new(MockTransport::new()));
        let other = arm.clone();
        drop(other);
        assert!(arm.into_inner().is_some());
    }
}

//! Particulate read with a single reset-and-retry
//!
//! ## State Machine
//!
//! ```text
//!            read ok
//! ┌────────┐ ───────────────────────────────▶ reading
//! │ Normal │
//! └────────┘ ── transient error ──▶ warn, reset ──┐
//!      │                                          ▼
//!      │ other error                        ┌─────────┐  read ok   ▶ reading
//!      ▼                                    │ Retried │
//!    error                                  └─────────┘  any error ▶ error
//! ```
//!
//! The sensor streams frames over a UART; a frame that arrives late or
//! damaged is common after the device has been idle. One reset usually
//! resynchronises it. A second failure in the same sub-sample means the
//! sensor is genuinely unwell, and the error escalates to the caller
//! unchanged.
//!
//! At most one reset is issued per call.

use crate::errors::SensorError;
use crate::readings::ParticulateReading;
use crate::traits::ParticulateSensor;

/// Where a particulate read currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// First attempt, transient faults recoverable
    Normal,
    /// Device has been reset once; nothing more is caught
    Retried,
}

/// Outcome of one step of the machine
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Done(ParticulateReading),
    Escalate(SensorError),
    Next(RetryState),
}

impl RetryState {
    fn step<P: ParticulateSensor + ?Sized>(self, device: &mut P) -> Step {
        match (self, device.read()) {
            (_, Ok(reading)) => Step::Done(reading),
            (RetryState::Normal, Err(err)) if err.is_transient() => {
                log_warn!("Failed to read PMS5003 ({}). Resetting and retrying.", err);
                match device.reset() {
                    Ok(()) => Step::Next(RetryState::Retried),
                    Err(reset_err) => Step::Escalate(reset_err),
                }
            }
            (_, Err(err)) => Step::Escalate(err),
        }
    }
}

/// Read one particulate sample, resetting and retrying once on a transient fault
///
/// Returns the error of the last attempt made: a non-transient first failure,
/// a failed reset, or the second read's failure.
pub fn read_with_retry<P: ParticulateSensor + ?Sized>(
    device: &mut P,
) -> Result<ParticulateReading, SensorError> {
    let mut state = RetryState::Normal;
    loop {
        match state.step(device) {
            Step::Done(reading) => return Ok(reading),
            Step::Escalate(err) => return Err(err),
            Step::Next(next) => state = next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DeviceKind;

    /// Plays back a fixed script of read results
    struct Scripted<const N: usize> {
        reads: [Option<Result<ParticulateReading, SensorError>>; N],
        next: usize,
        resets: usize,
        reset_result: Result<(), SensorError>,
    }

    impl<const N: usize> Scripted<N> {
        fn new(reads: [Result<ParticulateReading, SensorError>; N]) -> Self {
            Self {
                reads: reads.map(Some),
                next: 0,
                resets: 0,
                reset_result: Ok(()),
            }
        }
    }

    impl<const N: usize> ParticulateSensor for Scripted<N> {
        fn read(&mut self) -> Result<ParticulateReading, SensorError> {
            let result = self.reads[self.next]
                .take()
                .unwrap_or(Err(SensorError::BadFrame { reason: "script exhausted" }));
            self.next += 1;
            result
        }

        fn reset(&mut self) -> Result<(), SensorError> {
            self.resets += 1;
            self.reset_result
        }
    }

    const GOOD: ParticulateReading = ParticulateReading::from_pm(7, 12);
    const BAD_SUM: SensorError = SensorError::ChecksumMismatch {
        expected: 0x0100,
        computed: 0x0101,
    };

    #[test]
    fn first_read_succeeds_without_reset() {
        let mut device = Scripted::new([Ok(GOOD)]);
        assert_eq!(read_with_retry(&mut device), Ok(GOOD));
        assert_eq!(device.resets, 0);
    }

    #[test]
    fn timeout_then_success_resets_once() {
        let second = ParticulateReading::from_pm(3, 5);
        let mut device = Scripted::new([Err(SensorError::ReadTimeout), Ok(second)]);

        assert_eq!(read_with_retry(&mut device), Ok(second));
        assert_eq!(device.resets, 1);
        assert_eq!(device.next, 2);
    }

    #[test]
    fn double_checksum_failure_escalates_second_error() {
        let second = SensorError::ChecksumMismatch {
            expected: 0x0200,
            computed: 0x0201,
        };
        let mut device = Scripted::new([Err(BAD_SUM), Err(second), Ok(GOOD)]);

        assert_eq!(read_with_retry(&mut device), Err(second));
        assert_eq!(device.resets, 1);
        assert_eq!(device.next, 2);
    }

    #[test]
    fn non_transient_error_is_not_retried() {
        let fatal = SensorError::Bus {
            device: DeviceKind::Particulate,
            reason: "serial read failed",
        };
        let mut device = Scripted::new([Err(fatal), Ok(GOOD)]);

        assert_eq!(read_with_retry(&mut device), Err(fatal));
        assert_eq!(device.resets, 0);
    }

    #[test]
    fn failed_reset_escalates() {
        let reset_err = SensorError::Bus {
            device: DeviceKind::Particulate,
            reason: "reset pin write failed",
        };
        let mut device = Scripted::new([Err(SensorError::ReadTimeout), Ok(GOOD)]);
        device.reset_result = Err(reset_err);

        assert_eq!(read_with_retry(&mut device), Err(reset_err));
        assert_eq!(device.resets, 1);
        assert_eq!(device.next, 1);
    }
}

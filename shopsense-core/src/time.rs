//! Pacers for the sampling loop
//!
//! - [`ThreadPacer`] sleeps the calling thread (requires `std`)
//! - [`RecordingPacer`] counts pauses without waiting, for tests and dry runs

use core::time::Duration;

use crate::traits::Pacer;

/// Real-time pacer backed by `std::thread::sleep`
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

#[cfg(feature = "std")]
impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Pacer that only records what it was asked to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingPacer {
    pauses: usize,
    total: Duration,
    last: Option<Duration>,
}

impl RecordingPacer {
    /// Fresh pacer with nothing recorded
    pub const fn new() -> Self {
        Self {
            pauses: 0,
            total: Duration::ZERO,
            last: None,
        }
    }

    /// Number of pauses requested so far
    pub fn pauses(&self) -> usize {
        self.pauses
    }

    /// Sum of all requested pauses
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Most recent pause, if any
    pub fn last(&self) -> Option<Duration> {
        self.last
    }
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, duration: Duration) {
        self.pauses += 1;
        self.total = self.total.saturating_add(duration);
        self.last = Some(duration);
    }
}

//! Pacing Abstraction
//!
//! The sampler pauses after every sub-sample. Hiding the pause behind a trait
//! lets tests run whole cycles instantly while production really sleeps.
//!
//! ## Implementations
//!
//! - [`ThreadPacer`](crate::time::ThreadPacer): blocks the thread (`std`)
//! - [`RecordingPacer`](crate::time::RecordingPacer): records requested
//!   pauses and returns immediately

use core::time::Duration;

/// Blocking pause between sub-samples
///
/// ## Implementation Requirements
///
/// - Must not busy-wait in production implementations
/// - A zero duration is legal and should return promptly
pub trait Pacer {
    /// Suspend the caller for `duration`
    fn pause(&mut self, duration: Duration);
}

impl<T: Pacer + ?Sized> Pacer for &mut T {
    fn pause(&mut self, duration: Duration) {
        (**self).pause(duration)
    }
}

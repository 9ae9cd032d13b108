//! Error Types for Sampling Failures
//!
//! ## Design Philosophy
//!
//! The sampler's failure policy is deliberately small, and the error types
//! mirror it:
//!
//! 1. **Copy Semantics**: every error is `Copy` with `&'static str` reasons, so
//!    the core stays `no_std` and errors can be compared in tests.
//!
//! 2. **Transient vs. Fatal**: exactly two faults are transient, a particulate
//!    read timeout and a particulate checksum mismatch. [`SensorError::is_transient`]
//!    is the single place that decides this; everything else escalates.
//!
//! 3. **Adapters Keep the Detail**: hardware adapters log the underlying OS or
//!    bus error before folding it into a [`SensorError`]; the core only needs
//!    to know which device failed and roughly how.
//!
//! ## Error Categories
//!
//! ### Transient (recovered once)
//! - `ReadTimeout`: no particulate frame arrived before the read deadline
//! - `ChecksumMismatch`: a particulate frame arrived damaged
//!
//! ### Fatal
//! - `BadFrame`, `Bus`, `InvalidReading`, `ThermalZone`: device level
//! - [`PublishError`]: the metrics registry refused a value
//! - [`SampleError::IncompleteWindow`]: averaging asked for before the window
//!   filled (a programming error, never a partial mean)
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use shopsense_core::errors::{SampleError, SensorError};
//!
//! fn handle(result: Result<(), SampleError>) {
//!     match result {
//!         Ok(()) => {}
//!         Err(SampleError::Sensor(e)) if e.is_transient() => {
//!             // Only reachable if the retry itself failed again
//!         }
//!         Err(e) => {
//!             // Log and exit; the supervisor restarts the process
//!             let _ = e;
//!         }
//!     }
//! }
//! ```

use core::fmt;

use thiserror_no_std::Error;

use crate::readings::Metric;

/// Result type for device reads
pub type SensorResult<T> = Result<T, SensorError>;

/// Which collaborator produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceKind {
    /// Temperature / humidity / pressure sensor
    Environment,
    /// Gas sensor and its ADC
    Gas,
    /// Particulate matter sensor
    Particulate,
    /// Host CPU thermal zone
    CpuThermal,
}

impl DeviceKind {
    /// Short lowercase name used in log lines
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Gas => "gas",
            Self::Particulate => "particulate",
            Self::CpuThermal => "cpu-thermal",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device read failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No complete particulate frame before the read deadline
    #[error("Read timed out waiting for a particulate frame")]
    ReadTimeout,

    /// Particulate frame checksum did not match its payload
    #[error("Checksum mismatch: frame carries {expected:#06x}, computed {computed:#06x}")]
    ChecksumMismatch {
        /// Checksum carried in the frame trailer
        expected: u16,
        /// Checksum computed over the received bytes
        computed: u16,
    },

    /// Particulate frame was structurally wrong (not a checksum problem)
    #[error("Malformed particulate frame: {reason}")]
    BadFrame {
        /// What was wrong with the frame
        reason: &'static str,
    },

    /// Bus or transport failure talking to a device
    #[error("{device} bus error: {reason}")]
    Bus {
        /// Failing device
        device: DeviceKind,
        /// Operation that failed
        reason: &'static str,
    },

    /// Device answered, but with a value that cannot be converted
    #[error("{device} returned an unusable reading: {reason}")]
    InvalidReading {
        /// Failing device
        device: DeviceKind,
        /// Why the value was rejected
        reason: &'static str,
    },

    /// CPU thermal zone could not be read or parsed
    #[error("CPU thermal zone unreadable: {reason}")]
    ThermalZone {
        /// Read or parse failure
        reason: &'static str,
    },
}

impl SensorError {
    /// True for faults that earn one reset-and-retry
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ReadTimeout | Self::ChecksumMismatch { .. })
    }
}

/// The metrics registry refused a value
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Failed to publish {metric}: {reason}")]
pub struct PublishError {
    /// Metric being published
    pub metric: Metric,
    /// Why the sink refused it
    pub reason: &'static str,
}

/// Failures that end a sampling cycle
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SampleError {
    /// A device read failed (after any retry it was entitled to)
    #[error("Sensor failure: {0}")]
    Sensor(#[from] SensorError),

    /// The sink refused a value
    #[error("Publish failure: {0}")]
    Publish(#[from] PublishError),

    /// Averaging was attempted before every sequence was full
    #[error("Incomplete window for {metric}: need {required}, have {available}")]
    IncompleteWindow {
        /// First sequence found short
        metric: Metric,
        /// Sub-samples per cycle
        required: usize,
        /// Values actually present
        available: usize,
    },

    /// More sub-samples were pushed than a window holds
    #[error("Window for {metric} already holds {capacity} values")]
    WindowFull {
        /// Sequence that overflowed
        metric: Metric,
        /// Fixed window capacity
        capacity: usize,
    },
}

/// Rejected sampler configuration
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Temperature factor is the divisor of the correction term
    #[error("Temperature factor must be finite and non-zero, got {0}")]
    InvalidTemperatureFactor(f64),

    /// Humidity offset must be a real number
    #[error("Humidity offset must be finite, got {0}")]
    InvalidHumidityOffset(f64),
}

//! Core sampling engine for ShopSense
//!
//! Turns bursts of raw environmental readings into one averaged, compensated
//! value per metric and hands the result to a metrics sink.
//!
//! Key constraints:
//! - One thread, one blocking read at a time
//! - No heap allocation per cycle (windows are fixed-capacity)
//! - Any unexpected device failure ends the loop; only the particulate
//!   sensor's transient faults are retried, once
//!
//! ```no_run
//! use shopsense_core::{Sampler, SamplerConfig, SensorSuite, ThreadPacer};
//! # use shopsense_core::{traits::*, readings::*, errors::*, Metric};
//! # struct Bme; struct Gas; struct Pms; struct Cpu; struct Sink;
//! # impl EnvironmentSensor for Bme {
//! #     fn temperature(&mut self) -> Result<f64, SensorError> { Ok(20.0) }
//! #     fn humidity(&mut self) -> Result<f64, SensorError> { Ok(40.0) }
//! #     fn pressure(&mut self) -> Result<f64, SensorError> { Ok(1013.0) }
//! # }
//! # impl GasSensor for Gas {
//! #     fn read_all(&mut self) -> Result<GasReading, SensorError> { Ok(GasReading::default()) }
//! # }
//! # impl ParticulateSensor for Pms {
//! #     fn read(&mut self) -> Result<ParticulateReading, SensorError> { Ok(ParticulateReading::default()) }
//! #     fn reset(&mut self) -> Result<(), SensorError> { Ok(()) }
//! # }
//! # impl CpuThermometer for Cpu {
//! #     fn cpu_temperature(&mut self) -> Result<f64, SensorError> { Ok(45.0) }
//! # }
//! # impl MetricsSink for Sink {
//! #     fn publish(&mut self, _: Metric, _: f64) -> Result<(), PublishError> { Ok(()) }
//! # }
//!
//! let devices = SensorSuite::new(Bme, Gas, Pms, Cpu);
//! let mut sampler = Sampler::new(devices, ThreadPacer, Sink, SamplerConfig::default())?;
//!
//! // Never returns Ok; only a fatal device or sink error stops it.
//! let err = sampler.run();
//! # Ok::<(), shopsense_core::errors::ConfigError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Macro for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod compensation;
pub mod config;
pub mod constants;
pub mod errors;
pub mod readings;
pub mod retry;
pub mod sampler;
pub mod time;
pub mod traits;
pub mod window;

// Public API
pub use config::SamplerConfig;
pub use errors::{ConfigError, PublishError, SampleError, SensorError};
pub use readings::{CycleAverages, GasReading, Metric, ParticulateReading, SubSample};
pub use sampler::{Sampler, SensorSuite};
pub use time::RecordingPacer;
#[cfg(feature = "std")]
pub use time::ThreadPacer;
pub use traits::{
    CpuThermometer, EnvironmentSensor, GasSensor, MetricsSink, Pacer, ParticulateSensor,
};
pub use window::SampleWindow;

/// Crate version, as published in the exporter's start-up log line.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

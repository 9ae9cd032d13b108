//! Ports Between the Sampler and the Outside World
//!
//! The sampler never touches hardware, clocks or the metrics registry
//! directly. Each collaborator sits behind one narrow trait:
//!
//! - [`sensors`] - the four device ports read during a sub-sample
//! - [`time`] - the pause between sub-samples
//! - [`sink`] - where cycle averages are published
//!
//! ## Design Philosophy
//!
//! - **Static Dispatch**: the sampler is generic over every port, so the
//!   production binary pays nothing for the indirection
//! - **Blocking**: every call may block; the loop is single-threaded
//! - **Mockable**: tests swap in scripted devices and a pacer that records
//!   pauses instead of sleeping
//!
//! ## Usage Example
//!
//! ```rust
//! use shopsense_core::traits::CpuThermometer;
//! use shopsense_core::errors::SensorError;
//!
//! struct FixedCpu(f64);
//!
//! impl CpuThermometer for FixedCpu {
//!     fn cpu_temperature(&mut self) -> Result<f64, SensorError> {
//!         Ok(self.0)
//!     }
//! }
//!
//! let mut cpu = FixedCpu(48.5);
//! assert_eq!(cpu.cpu_temperature(), Ok(48.5));
//! ```

pub mod sensors;
pub mod sink;
pub mod time;

pub use sensors::{CpuThermometer, EnvironmentSensor, GasSensor, ParticulateSensor};
pub use sink::MetricsSink;
pub use time::Pacer;

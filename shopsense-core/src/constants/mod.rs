//! Constants for ShopSense Core
//!
//! Every tuning value the sampler uses lives here with its unit, where it
//! came from and what changing it does. Nothing is read from disk; these
//! are the configuration.
//!
//! ## Organization
//!
//! - **Sampling**: window size, pacing, unit conversions
//! - **Compensation**: self-heating and humidity corrections
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Name constants with their unit
//! 3. Record where an empirical value came from

/// Window size, pacing and unit conversion factors.
pub mod sampling;

/// Temperature and humidity correction defaults.
pub mod compensation;

pub use sampling::{
    GAS_OHMS_PER_KILOHM, PA_PER_HPA, SUB_SAMPLES, SUB_SAMPLE_PAUSE_MS,
};

pub use compensation::{DEFAULT_HUMIDITY_OFFSET_PCT, DEFAULT_TEMPERATURE_FACTOR};

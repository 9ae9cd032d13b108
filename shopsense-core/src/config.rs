//! Sampler configuration
//!
//! Defaults come straight from [`constants`](crate::constants). There is no
//! file or flag parsing; the builder methods exist for tests and for anyone
//! embedding the sampler with different hardware.

use core::time::Duration;

use crate::constants::{
    DEFAULT_HUMIDITY_OFFSET_PCT, DEFAULT_TEMPERATURE_FACTOR, SUB_SAMPLE_PAUSE_MS,
};
use crate::errors::ConfigError;

/// Tuning values for one [`Sampler`](crate::Sampler)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplerConfig {
    /// Self-heating correction divisor
    pub temperature_factor: f64,
    /// Additive humidity correction (%RH)
    pub humidity_offset: f64,
    /// Pause after each sub-sample
    pub pause: Duration,
    /// Also set the gas gauges each cycle (off: accumulate only)
    pub publish_gas: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            temperature_factor: DEFAULT_TEMPERATURE_FACTOR,
            humidity_offset: DEFAULT_HUMIDITY_OFFSET_PCT,
            pause: Duration::from_millis(SUB_SAMPLE_PAUSE_MS),
            publish_gas: false,
        }
    }
}

impl SamplerConfig {
    /// Set the self-heating correction divisor
    pub fn temperature_factor(mut self, factor: f64) -> Self {
        self.temperature_factor = factor;
        self
    }

    /// Set the additive humidity correction
    pub fn humidity_offset(mut self, offset: f64) -> Self {
        self.humidity_offset = offset;
        self
    }

    /// Set the pause between sub-samples
    pub fn pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Publish the accumulated gas means as well
    pub fn publish_gas(mut self, publish: bool) -> Self {
        self.publish_gas = publish;
        self
    }

    /// Reject values the compensation formulas are undefined for
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.temperature_factor.is_finite() || self.temperature_factor == 0.0 {
            return Err(ConfigError::InvalidTemperatureFactor(self.temperature_factor));
        }
        if !self.humidity_offset.is_finite() {
            return Err(ConfigError::InvalidHumidityOffset(self.humidity_offset));
        }
        Ok(())
    }
}

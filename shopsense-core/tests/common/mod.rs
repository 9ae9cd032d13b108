//! Common test utilities for sampler integration tests
//!
//! This module provides:
//! - Scripted mock devices that replay canned readings and count calls
//! - A recording metrics sink
//! - Builders for a ready-to-run sampler over the mocks

#![allow(dead_code)]

use std::collections::VecDeque;

use shopsense_core::{
    errors::{PublishError, SensorError},
    readings::{GasReading, Metric, ParticulateReading},
    traits::{CpuThermometer, EnvironmentSensor, GasSensor, MetricsSink, ParticulateSensor},
    RecordingPacer, Sampler, SamplerConfig, SensorSuite,
};

/// Environment sensor replaying per-call temperatures; humidity and
/// pressure repeat their last scripted value
#[derive(Debug, Default)]
pub struct ScriptedEnvironment {
    pub temperatures: VecDeque<Result<f64, SensorError>>,
    pub humidities: VecDeque<f64>,
    pub pressures: VecDeque<f64>,
    last_humidity: f64,
    last_pressure: f64,
    pub temperature_reads: usize,
}

impl ScriptedEnvironment {
    pub fn new(temperatures: &[f64], humidity: f64, pressure_hpa: f64) -> Self {
        Self {
            temperatures: temperatures.iter().copied().map(Ok).collect(),
            last_humidity: humidity,
            last_pressure: pressure_hpa,
            ..Self::default()
        }
    }

    pub fn with_humidities(mut self, values: &[f64]) -> Self {
        self.humidities = values.iter().copied().collect();
        self
    }

    pub fn with_pressures(mut self, values: &[f64]) -> Self {
        self.pressures = values.iter().copied().collect();
        self
    }
}

impl EnvironmentSensor for ScriptedEnvironment {
    fn temperature(&mut self) -> Result<f64, SensorError> {
        self.temperature_reads += 1;
        self.temperatures.pop_front().unwrap_or(Err(SensorError::Bus {
            device: shopsense_core::errors::DeviceKind::Environment,
            reason: "script exhausted",
        }))
    }

    fn humidity(&mut self) -> Result<f64, SensorError> {
        if let Some(value) = self.humidities.pop_front() {
            self.last_humidity = value;
        }
        Ok(self.last_humidity)
    }

    fn pressure(&mut self) -> Result<f64, SensorError> {
        if let Some(value) = self.pressures.pop_front() {
            self.last_pressure = value;
        }
        Ok(self.last_pressure)
    }
}

/// Gas sensor returning the same resistances every time
#[derive(Debug, Clone, Copy)]
pub struct FixedGas(pub GasReading);

impl GasSensor for FixedGas {
    fn read_all(&mut self) -> Result<GasReading, SensorError> {
        Ok(self.0)
    }
}

/// Particulate sensor replaying a script, counting reads and resets
#[derive(Debug, Default)]
pub struct ScriptedParticulate {
    pub script: VecDeque<Result<ParticulateReading, SensorError>>,
    pub fallback: Option<ParticulateReading>,
    pub reads: usize,
    pub resets: usize,
}

impl ScriptedParticulate {
    /// Always returns `reading`
    pub fn steady(reading: ParticulateReading) -> Self {
        Self {
            fallback: Some(reading),
            ..Self::default()
        }
    }

    /// Plays `script` first, then falls back to `reading`
    pub fn scripted(
        script: Vec<Result<ParticulateReading, SensorError>>,
        reading: ParticulateReading,
    ) -> Self {
        Self {
            script: script.into(),
            fallback: Some(reading),
            ..Self::default()
        }
    }
}

impl ParticulateSensor for ScriptedParticulate {
    fn read(&mut self) -> Result<ParticulateReading, SensorError> {
        self.reads += 1;
        match self.script.pop_front() {
            Some(result) => result,
            None => self.fallback.ok_or(SensorError::ReadTimeout),
        }
    }

    fn reset(&mut self) -> Result<(), SensorError> {
        self.resets += 1;
        Ok(())
    }
}

/// CPU thermometer with a fixed value, or a permanent failure
#[derive(Debug, Clone, Copy)]
pub enum FixedCpu {
    Celsius(f64),
    Unreadable,
}

impl CpuThermometer for FixedCpu {
    fn cpu_temperature(&mut self) -> Result<f64, SensorError> {
        match self {
            FixedCpu::Celsius(c) => Ok(*c),
            FixedCpu::Unreadable => Err(SensorError::ThermalZone {
                reason: "failed to open thermal zone",
            }),
        }
    }
}

/// Sink keeping every publish in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub published: Vec<(Metric, f64)>,
    pub refuse: Option<Metric>,
}

impl RecordingSink {
    /// Last value set for `metric`
    pub fn last(&self, metric: Metric) -> Option<f64> {
        self.published
            .iter()
            .rev()
            .find(|(m, _)| *m == metric)
            .map(|(_, v)| *v)
    }

    /// How many times `metric` was set
    pub fn count(&self, metric: Metric) -> usize {
        self.published.iter().filter(|(m, _)| *m == metric).count()
    }
}

impl MetricsSink for RecordingSink {
    fn publish(&mut self, metric: Metric, value: f64) -> Result<(), PublishError> {
        if self.refuse == Some(metric) {
            return Err(PublishError {
                metric,
                reason: "registry rejected value",
            });
        }
        self.published.push((metric, value));
        Ok(())
    }
}

pub type MockSampler =
    Sampler<ScriptedEnvironment, FixedGas, ScriptedParticulate, FixedCpu, RecordingPacer, RecordingSink>;

/// Typical indoor gas resistances (ohms)
pub const GAS: GasReading = GasReading {
    oxidising: 1500.0,
    reducing: 250_000.0,
    nh3: 80_000.0,
};

/// Sampler over the given mocks with the default configuration
pub fn sampler(
    environment: ScriptedEnvironment,
    particulate: ScriptedParticulate,
    cpu: FixedCpu,
    config: SamplerConfig,
) -> MockSampler {
    let devices = SensorSuite::new(environment, FixedGas(GAS), particulate, cpu);
    Sampler::new(devices, RecordingPacer::new(), RecordingSink::default(), config)
        .expect("test config is valid")
}

/// Mean of `values`
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to one decimal digit the same way the sampler does
pub fn tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

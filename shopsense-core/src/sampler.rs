//! The Sampling Loop
//!
//! ## Cycle
//!
//! ```text
//! ┌──────────────────────── one cycle ────────────────────────┐
//! │  5 × sub-sample:                                          │
//! │    gas.read_all()          ÷1000  → oxidised/reducing/nh3 │
//! │    cpu + raw temperature   comp   → temperature           │
//! │    raw humidity            +off   → humidity              │
//! │    pressure                ×100   → pressure              │
//! │    particulate (retry ×1)         → pm10, pm2.5           │
//! │    pause                                                  │
//! │  averages → sink (temperature/humidity rounded to 1 dp)   │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads happen in exactly that order, on the calling thread, one at a
//! time. The device handles are owned by a [`SensorSuite`] for the life of
//! the sampler; nothing is global.
//!
//! ## Failure Policy
//!
//! Any error other than a particulate fault that the retry machine absorbed
//! ends the cycle and is returned. [`Sampler::run`] passes it straight up;
//! the process is expected to exit and be restarted by its supervisor.

use core::convert::Infallible;

use crate::compensation::{compensate_humidity, compensate_temperature};
use crate::config::SamplerConfig;
use crate::constants::{GAS_OHMS_PER_KILOHM, PA_PER_HPA, SUB_SAMPLES};
use crate::errors::{ConfigError, SampleError};
use crate::readings::{CycleAverages, Metric, ParticleSize, SubSample};
use crate::retry::read_with_retry;
use crate::traits::{
    CpuThermometer, EnvironmentSensor, GasSensor, MetricsSink, Pacer, ParticulateSensor,
};
use crate::window::SampleWindow;

/// Every device handle the loop reads from
///
/// Constructed once at start-up and handed to the [`Sampler`].
#[derive(Debug)]
pub struct SensorSuite<E, G, P, C> {
    /// Temperature / humidity / pressure
    pub environment: E,
    /// Gas channels
    pub gas: G,
    /// Particulate matter
    pub particulate: P,
    /// CPU thermal zone
    pub cpu: C,
}

impl<E, G, P, C> SensorSuite<E, G, P, C>
where
    E: EnvironmentSensor,
    G: GasSensor,
    P: ParticulateSensor,
    C: CpuThermometer,
{
    /// Bundle the four device handles
    pub fn new(environment: E, gas: G, particulate: P, cpu: C) -> Self {
        Self {
            environment,
            gas,
            particulate,
            cpu,
        }
    }
}

/// Sampling loop over a device suite, a pacer and a metrics sink
pub struct Sampler<E, G, P, C, K, M> {
    devices: SensorSuite<E, G, P, C>,
    pacer: K,
    sink: M,
    config: SamplerConfig,
    cycles: u64,
}

impl<E, G, P, C, K, M> Sampler<E, G, P, C, K, M>
where
    E: EnvironmentSensor,
    G: GasSensor,
    P: ParticulateSensor,
    C: CpuThermometer,
    K: Pacer,
    M: MetricsSink,
{
    /// Build a sampler, rejecting configurations the formulas can't handle
    pub fn new(
        devices: SensorSuite<E, G, P, C>,
        pacer: K,
        sink: M,
        config: SamplerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            devices,
            pacer,
            sink,
            config,
            cycles: 0,
        })
    }

    /// Run cycles until something fails
    ///
    /// Only ever returns an error.
    pub fn run(&mut self) -> Result<Infallible, SampleError> {
        loop {
            self.run_cycle()?;
        }
    }

    /// Take [`SUB_SAMPLES`] sub-samples, average them and publish
    pub fn run_cycle(&mut self) -> Result<CycleAverages, SampleError> {
        let mut window = SampleWindow::new();
        for _ in 0..SUB_SAMPLES {
            let sample = self.sub_sample()?;
            window.push(&sample)?;
            self.pacer.pause(self.config.pause);
        }

        let averages = window.averages()?;
        self.publish(&averages)?;
        self.cycles += 1;
        log_debug!(
            "cycle {} published: temperature={} humidity={} pressure={} pm2.5={} pm10={}",
            self.cycles,
            averages.published(Metric::Temperature),
            averages.published(Metric::Humidity),
            averages.published(Metric::Pressure),
            averages.published(Metric::Pm2_5),
            averages.published(Metric::Pm10),
        );
        Ok(averages)
    }

    /// Read every source once, in the fixed order
    pub fn sub_sample(&mut self) -> Result<SubSample, SampleError> {
        let devices = &mut self.devices;

        let gas = devices.gas.read_all()?;

        let cpu = devices.cpu.cpu_temperature()?;
        let raw_temperature = devices.environment.temperature()?;
        let temperature =
            compensate_temperature(raw_temperature, cpu, self.config.temperature_factor);

        let humidity =
            compensate_humidity(devices.environment.humidity()?, self.config.humidity_offset);

        let pressure = devices.environment.pressure()? * PA_PER_HPA;

        let particulate = read_with_retry(&mut devices.particulate)?;

        Ok(SubSample {
            temperature,
            humidity,
            pressure,
            pm10: particulate.pm_ug_per_m3(ParticleSize::Pm10, false),
            pm2_5: particulate.pm_ug_per_m3(ParticleSize::Pm2_5, false),
            oxidised: gas.oxidising / GAS_OHMS_PER_KILOHM,
            reducing: gas.reducing / GAS_OHMS_PER_KILOHM,
            nh3: gas.nh3 / GAS_OHMS_PER_KILOHM,
        })
    }

    fn publish(&mut self, averages: &CycleAverages) -> Result<(), SampleError> {
        for metric in Metric::PUBLISHED {
            self.sink.publish(metric, averages.published(metric))?;
        }
        if self.config.publish_gas {
            for metric in Metric::GAS {
                self.sink.publish(metric, averages.published(metric))?;
            }
        }
        Ok(())
    }

    /// Cycles published so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Active configuration
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Borrow the device handles
    pub fn devices(&self) -> &SensorSuite<E, G, P, C> {
        &self.devices
    }

    /// Borrow the pacer
    pub fn pacer(&self) -> &K {
        &self.pacer
    }

    /// Borrow the sink
    pub fn sink(&self) -> &M {
        &self.sink
    }

    /// Take the parts back
    pub fn into_parts(self) -> (SensorSuite<E, G, P, C>, K, M) {
        (self.devices, self.pacer, self.sink)
    }
}

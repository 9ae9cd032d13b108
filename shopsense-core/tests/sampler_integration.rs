//! Integration tests for the sampling loop
//!
//! Drives whole cycles over scripted devices: ordering, unit conversions,
//! averaging, rounding, pacing and the failure policy.

mod common;

use std::time::Duration;

use shopsense_core::{
    errors::{ConfigError, DeviceKind, PublishError, SampleError, SensorError},
    readings::{Metric, ParticulateReading},
    RecordingPacer, Sampler, SamplerConfig, SensorSuite,
};

use common::{
    mean, sampler, tenth, FixedCpu, FixedGas, RecordingSink, ScriptedEnvironment,
    ScriptedParticulate, GAS,
};

const STEADY_PM: ParticulateReading = ParticulateReading::from_pm(2, 4);

#[test]
fn test_end_to_end_temperature_average() {
    let raw = [20.0, 21.0, 20.0, 22.0, 21.0];
    let mut sampler = sampler(
        ScriptedEnvironment::new(&raw, 40.0, 1013.0),
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Celsius(30.0),
        SamplerConfig::default(),
    );

    sampler.run_cycle().unwrap();

    let compensated: Vec<f64> = raw.iter().map(|t| tenth(t - (30.0 - t) / 4.5)).collect();
    let expected = tenth(mean(&compensated));
    assert_eq!(expected, 18.8);
    assert_eq!(sampler.sink().last(Metric::Temperature), Some(expected));
}

#[test]
fn test_humidity_offset_and_rounding() {
    let env = ScriptedEnvironment::new(&[20.0; 5], 0.0, 1013.0)
        .with_humidities(&[40.0, 41.0, 42.0, 43.0, 44.04]);
    let mut sampler = sampler(
        env,
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Celsius(20.0),
        SamplerConfig::default(),
    );

    let averages = sampler.run_cycle().unwrap();

    assert_eq!(averages.mean(Metric::Humidity), 62.0);
    assert_eq!(sampler.sink().last(Metric::Humidity), Some(62.0));
}

#[test]
fn test_pressure_and_pm_published_unrounded() {
    let pressures = [1013.251, 1013.27, 1013.22, 1013.31, 1013.26];
    let env = ScriptedEnvironment::new(&[20.0; 5], 40.0, 0.0).with_pressures(&pressures);
    let pm = ScriptedParticulate::scripted(
        vec![
            Ok(ParticulateReading::from_pm(1, 3)),
            Ok(ParticulateReading::from_pm(1, 4)),
            Ok(ParticulateReading::from_pm(2, 4)),
            Ok(ParticulateReading::from_pm(2, 4)),
            Ok(ParticulateReading::from_pm(2, 4)),
        ],
        STEADY_PM,
    );
    let mut sampler = sampler(env, pm, FixedCpu::Celsius(20.0), SamplerConfig::default());

    sampler.run_cycle().unwrap();

    let pascals: Vec<f64> = pressures.iter().map(|p| p * 100.0).collect();
    let published = sampler.sink().last(Metric::Pressure).unwrap();
    assert_eq!(published, mean(&pascals));
    assert!((published - 101_326.22).abs() < 1e-6);

    assert_eq!(sampler.sink().last(Metric::Pm2_5), Some(1.6));
    assert_eq!(sampler.sink().last(Metric::Pm10), Some(3.8));
}

#[test]
fn test_sub_sample_unit_conversions() {
    let mut sampler = sampler(
        ScriptedEnvironment::new(&[20.0], 40.0, 1013.25),
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Celsius(20.0),
        SamplerConfig::default(),
    );

    let sample = sampler.sub_sample().unwrap();

    assert_eq!(sample.oxidised, 1.5);
    assert_eq!(sample.reducing, 250.0);
    assert_eq!(sample.nh3, 80.0);
    assert_eq!(sample.pressure, 101_325.0);
    assert_eq!(sample.pm2_5, 2.0);
    assert_eq!(sample.pm10, 4.0);
}

#[test]
fn test_gas_accumulated_but_not_published() {
    let mut sampler = sampler(
        ScriptedEnvironment::new(&[20.0; 5], 40.0, 1013.0),
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Celsius(20.0),
        SamplerConfig::default(),
    );

    let averages = sampler.run_cycle().unwrap();

    assert_eq!(averages.mean(Metric::Oxidised), 1.5);
    for gas in Metric::GAS {
        assert_eq!(sampler.sink().count(gas), 0);
    }
    for metric in Metric::PUBLISHED {
        assert_eq!(sampler.sink().count(metric), 1, "{metric} published once");
    }
    assert_eq!(sampler.sink().published.len(), 5);
}

#[test]
fn test_gas_published_when_enabled() {
    let mut sampler = sampler(
        ScriptedEnvironment::new(&[20.0; 5], 40.0, 1013.0),
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Celsius(20.0),
        SamplerConfig::default().publish_gas(true),
    );

    sampler.run_cycle().unwrap();

    assert_eq!(sampler.sink().last(Metric::Oxidised), Some(1.5));
    assert_eq!(sampler.sink().last(Metric::Reducing), Some(250.0));
    assert_eq!(sampler.sink().last(Metric::Nh3), Some(80.0));
}

#[test]
fn test_cycle_pauses_once_per_sub_sample() {
    let mut sampler = sampler(
        ScriptedEnvironment::new(&[20.0; 10], 40.0, 1013.0),
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Celsius(20.0),
        SamplerConfig::default(),
    );

    sampler.run_cycle().unwrap();
    assert_eq!(sampler.pacer().pauses(), 5);
    assert_eq!(sampler.pacer().total(), Duration::from_secs(5));

    sampler.run_cycle().unwrap();
    assert_eq!(sampler.pacer().pauses(), 10);
    assert_eq!(sampler.cycles(), 2);
}

#[test]
fn test_gauges_overwritten_each_cycle() {
    let raw = [20.0, 20.0, 20.0, 20.0, 20.0, 25.0, 25.0, 25.0, 25.0, 25.0];
    let mut sampler = sampler(
        ScriptedEnvironment::new(&raw, 40.0, 1013.0),
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Celsius(25.0),
        SamplerConfig::default(),
    );

    sampler.run_cycle().unwrap();
    sampler.run_cycle().unwrap();

    // 20 - (25 - 20) / 4.5 = 18.888..
    let first = tenth(mean(&[tenth(20.0 - 5.0 / 4.5); 5]));
    assert_eq!(sampler.sink().published[0], (Metric::Temperature, first));
    assert_eq!(sampler.sink().last(Metric::Temperature), Some(25.0));
}

#[test]
fn test_particulate_retry_inside_cycle() {
    let pm = ScriptedParticulate::scripted(vec![Err(SensorError::ReadTimeout)], STEADY_PM);
    let mut sampler = sampler(
        ScriptedEnvironment::new(&[20.0; 5], 40.0, 1013.0),
        pm,
        FixedCpu::Celsius(20.0),
        SamplerConfig::default(),
    );

    sampler.run_cycle().unwrap();

    let (devices, _, sink) = sampler.into_parts();
    assert_eq!(devices.particulate.resets, 1);
    assert_eq!(devices.particulate.reads, 6);
    assert_eq!(sink.last(Metric::Pm10), Some(4.0));
}

#[test]
fn test_particulate_double_failure_aborts_cycle() {
    let second = SensorError::ChecksumMismatch {
        expected: 0x0123,
        computed: 0x0124,
    };
    let pm = ScriptedParticulate::scripted(
        vec![
            Err(SensorError::ChecksumMismatch {
                expected: 0x0100,
                computed: 0x0101,
            }),
            Err(second),
        ],
        STEADY_PM,
    );
    let mut sampler = sampler(
        ScriptedEnvironment::new(&[20.0; 5], 40.0, 1013.0),
        pm,
        FixedCpu::Celsius(20.0),
        SamplerConfig::default(),
    );

    let result = sampler.run_cycle();

    assert_eq!(result, Err(SampleError::Sensor(second)));
    assert!(sampler.sink().published.is_empty());
    assert_eq!(sampler.pacer().pauses(), 0);
    assert_eq!(sampler.devices().particulate.resets, 1);
}

#[test]
fn test_unreadable_cpu_is_fatal() {
    let mut sampler = sampler(
        ScriptedEnvironment::new(&[20.0; 5], 40.0, 1013.0),
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Unreadable,
        SamplerConfig::default(),
    );

    let err = sampler.run_cycle().unwrap_err();

    assert!(matches!(err, SampleError::Sensor(SensorError::ThermalZone { .. })));
    // CPU is read before the raw temperature
    assert_eq!(sampler.devices().environment.temperature_reads, 0);
    assert_eq!(sampler.devices().particulate.reads, 0);
}

#[test]
fn test_sink_failure_is_fatal() {
    let devices = SensorSuite::new(
        ScriptedEnvironment::new(&[20.0; 5], 40.0, 1013.0),
        FixedGas(GAS),
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Celsius(20.0),
    );
    let sink = RecordingSink {
        refuse: Some(Metric::Pressure),
        ..RecordingSink::default()
    };
    let mut sampler =
        Sampler::new(devices, RecordingPacer::new(), sink, SamplerConfig::default()).unwrap();

    let err = sampler.run_cycle().unwrap_err();

    assert_eq!(
        err,
        SampleError::Publish(PublishError {
            metric: Metric::Pressure,
            reason: "registry rejected value",
        })
    );
    assert_eq!(sampler.cycles(), 0);
}

#[test]
fn test_run_returns_first_fatal_error() {
    // Ten temperatures: two full cycles, then the environment sensor fails
    let mut sampler = sampler(
        ScriptedEnvironment::new(&[20.0; 10], 40.0, 1013.0),
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Celsius(20.0),
        SamplerConfig::default(),
    );

    let err = match sampler.run() {
        Ok(never) => match never {},
        Err(err) => err,
    };

    assert_eq!(
        err,
        SampleError::Sensor(SensorError::Bus {
            device: DeviceKind::Environment,
            reason: "script exhausted",
        })
    );
    assert_eq!(sampler.cycles(), 2);
    assert_eq!(sampler.sink().count(Metric::Temperature), 2);
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let devices = SensorSuite::new(
        ScriptedEnvironment::new(&[], 40.0, 1013.0),
        FixedGas(GAS),
        ScriptedParticulate::steady(STEADY_PM),
        FixedCpu::Celsius(20.0),
    );

    let result = Sampler::new(
        devices,
        RecordingPacer::new(),
        RecordingSink::default(),
        SamplerConfig::default().temperature_factor(0.0),
    );

    assert!(matches!(result, Err(ConfigError::InvalidTemperatureFactor(_))));
}

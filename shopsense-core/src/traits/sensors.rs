//! Device Ports
//!
//! One trait per physical collaborator. Implementations live in
//! `shopsense-devices` (Linux) and in the integration test mocks.
//!
//! ## Units
//!
//! | Port | Method | Unit |
//! |------|--------|------|
//! | [`EnvironmentSensor`] | `temperature` | °C |
//! | [`EnvironmentSensor`] | `humidity` | %RH |
//! | [`EnvironmentSensor`] | `pressure` | hPa |
//! | [`GasSensor`] | `read_all` | Ω per channel |
//! | [`ParticulateSensor`] | `read` | µg/m³ |
//! | [`CpuThermometer`] | `cpu_temperature` | °C |
//!
//! ## Failure Contract
//!
//! Only [`ParticulateSensor::read`] may return transient errors
//! ([`SensorError::ReadTimeout`], [`SensorError::ChecksumMismatch`]). Any
//! error from any other method ends the sampling loop.

use crate::errors::SensorError;
use crate::readings::{GasReading, ParticulateReading};

/// Temperature, humidity and pressure sensor (BME280 class)
pub trait EnvironmentSensor {
    /// Raw air temperature in °C
    fn temperature(&mut self) -> Result<f64, SensorError>;

    /// Raw relative humidity in %RH
    fn humidity(&mut self) -> Result<f64, SensorError>;

    /// Barometric pressure in hPa
    fn pressure(&mut self) -> Result<f64, SensorError>;
}

/// Three-channel metal-oxide gas sensor
pub trait GasSensor {
    /// Read oxidising, reducing and NH3 resistances in ohms
    fn read_all(&mut self) -> Result<GasReading, SensorError>;
}

/// Laser particulate sensor (PMS5003 class)
pub trait ParticulateSensor {
    /// Wait for and decode one frame
    ///
    /// May fail transiently with a timeout or checksum mismatch.
    fn read(&mut self) -> Result<ParticulateReading, SensorError>;

    /// Hardware reset, leaving the device ready for a fresh read
    fn reset(&mut self) -> Result<(), SensorError>;
}

/// Host CPU temperature, used to estimate self-heating
pub trait CpuThermometer {
    /// CPU temperature in °C
    fn cpu_temperature(&mut self) -> Result<f64, SensorError>;
}

impl<T: EnvironmentSensor + ?Sized> EnvironmentSensor for &mut T {
    fn temperature(&mut self) -> Result<f64, SensorError> {
        (**self).temperature()
    }

    fn humidity(&mut self) -> Result<f64, SensorError> {
        (**self).humidity()
    }

    fn pressure(&mut self) -> Result<f64, SensorError> {
        (**self).pressure()
    }
}

impl<T: GasSensor + ?Sized> GasSensor for &mut T {
    fn read_all(&mut self) -> Result<GasReading, SensorError> {
        (**self).read_all()
    }
}

impl<T: ParticulateSensor + ?Sized> ParticulateSensor for &mut T {
    fn read(&mut self) -> Result<ParticulateReading, SensorError> {
        (**self).read()
    }

    fn reset(&mut self) -> Result<(), SensorError> {
        (**self).reset()
    }
}

impl<T: CpuThermometer + ?Sized> CpuThermometer for &mut T {
    fn cpu_temperature(&mut self) -> Result<f64, SensorError> {
        (**self).cpu_temperature()
    }
}

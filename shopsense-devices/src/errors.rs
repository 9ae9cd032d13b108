//! Device-level errors
//!
//! [`DeviceError`] is what opening and configuring hardware can fail with.
//! Reads fail with the core's `SensorError` instead; [`bus_fault`] is the
//! single place where an underlying error is logged and folded.

use std::fmt::Display;
use std::io;

use shopsense_core::errors::{DeviceKind, SensorError};
use thiserror::Error;

/// Errors raised while opening or configuring a device
#[derive(Debug, Error)]
pub enum DeviceError {
    /// An i2c transaction failed during set-up
    #[error("{device} i2c error: {message}")]
    I2c {
        /// Device being configured
        device: DeviceKind,
        /// Underlying bus error, rendered
        message: String,
    },

    /// Something answered at the address, but it isn't a BME280
    #[error("unexpected chip id {found:#04x} (expected {expected:#04x})")]
    UnknownChip {
        /// Chip id register contents
        found: u8,
        /// Id the driver supports
        expected: u8,
    },

    /// The serial port could not be opened
    #[error("failed to open serial port {path}: {source}")]
    Serial {
        /// Device path
        path: String,
        /// Underlying error
        #[source]
        source: serialport::Error,
    },

    /// A sysfs GPIO line could not be exported or driven
    #[error("gpio {pin}: {source}")]
    Gpio {
        /// BCM pin number
        pin: u32,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// A read or reset performed during set-up failed
    #[error(transparent)]
    Sensor(#[from] SensorError),
}

impl DeviceError {
    pub(crate) fn i2c(device: DeviceKind, err: impl Display) -> Self {
        Self::I2c {
            device,
            message: err.to_string(),
        }
    }
}

/// Log `err` and fold it into a static [`SensorError::Bus`]
pub(crate) fn bus_fault(device: DeviceKind, reason: &'static str, err: impl Display) -> SensorError {
    log::error!("{device}: {reason}: {err}");
    SensorError::Bus { device, reason }
}

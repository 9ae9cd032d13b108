//! Output lines through the sysfs GPIO interface
//!
//! Used for the particulate sensor's enable and reset lines and the gas
//! sensor heater.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::DeviceError;

const SYSFS_GPIO: &str = "/sys/class/gpio";

/// A single GPIO output driven through its sysfs `value` file
#[derive(Debug)]
pub struct SysfsGpio {
    pin: u32,
    value: PathBuf,
}

impl SysfsGpio {
    /// Export `pin` (if not already exported) and configure it as an output
    pub fn export_output(pin: u32) -> Result<Self, DeviceError> {
        let base = Path::new(SYSFS_GPIO);
        let line = base.join(format!("gpio{pin}"));
        let gpio_err = |source| DeviceError::Gpio { pin, source };

        if !line.exists() {
            fs::write(base.join("export"), pin.to_string()).map_err(gpio_err)?;
        }
        fs::write(line.join("direction"), "out").map_err(gpio_err)?;

        Ok(Self::from_value_file(pin, line.join("value")))
    }

    /// Drive an already configured line through an explicit `value` file
    pub fn from_value_file(pin: u32, value: impl Into<PathBuf>) -> Self {
        Self {
            pin,
            value: value.into(),
        }
    }

    /// BCM pin number
    pub fn pin(&self) -> u32 {
        self.pin
    }

    /// Drive the line high or low
    pub fn set(&mut self, high: bool) -> io::Result<()> {
        fs::write(&self.value, if high { "1" } else { "0" })
    }
}

//! CPU temperature from a sysfs thermal zone

use std::fs;
use std::path::{Path, PathBuf};

use shopsense_core::errors::SensorError;
use shopsense_core::traits::CpuThermometer;

/// Default thermal zone on a Raspberry Pi
pub const DEFAULT_THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";

const MILLIDEGREES_PER_DEGREE: f64 = 1000.0;

/// Reads a thermal zone `temp` file (millidegrees Celsius)
#[derive(Debug, Clone)]
pub struct ThermalZone {
    path: PathBuf,
}

impl ThermalZone {
    /// Read from the given `temp` file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path being read
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ThermalZone {
    fn default() -> Self {
        Self::new(DEFAULT_THERMAL_ZONE)
    }
}

impl CpuThermometer for ThermalZone {
    fn cpu_temperature(&mut self) -> Result<f64, SensorError> {
        let contents = fs::read_to_string(&self.path).map_err(|err| {
            log::error!("cannot read {}: {err}", self.path.display());
            SensorError::ThermalZone {
                reason: "read failed",
            }
        })?;
        parse_millidegrees(&contents)
    }
}

/// Parse the contents of a thermal zone file into degrees Celsius
pub fn parse_millidegrees(contents: &str) -> Result<f64, SensorError> {
    let millidegrees: i64 = contents.trim().parse().map_err(|_| {
        log::error!("thermal zone returned {:?}", contents.trim());
        SensorError::ThermalZone {
            reason: "value is not an integer",
        }
    })?;
    Ok(millidegrees as f64 / MILLIDEGREES_PER_DEGREE)
}

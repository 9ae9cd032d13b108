//! Fixed deployment settings
//!
//! There is no config file and no command line: the exporter runs on one
//! known board. Everything the binary wires up is a named constant here,
//! gathered into [`ExporterSettings`] so tests can point it elsewhere.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use log::LevelFilter;
use shopsense_core::SamplerConfig;
use shopsense_devices::{bme280, gas, pms5003, thermal};

/// Port the scrape listener binds on all interfaces
pub const METRICS_PORT: u16 = 8000;

/// i2c bus carrying the BME280 and the ADS1015
pub const I2C_BUS: &str = "/dev/i2c-1";

/// PMS5003 enable line (BCM numbering)
pub const PMS5003_ENABLE_GPIO: u32 = 22;
/// PMS5003 reset line (BCM numbering)
pub const PMS5003_RESET_GPIO: u32 = 27;
/// MICS6814 heater enable (BCM numbering)
pub const GAS_HEATER_GPIO: u32 = 24;

/// Everything the exporter needs to find its hardware
#[derive(Debug, Clone)]
pub struct ExporterSettings {
    /// Scrape listener address
    pub listen_addr: SocketAddr,
    /// i2c character device
    pub i2c_bus: PathBuf,
    /// BME280 address on `i2c_bus`
    pub bme280_address: u16,
    /// ADS1015 address on `i2c_bus`
    pub gas_address: u16,
    /// UART the PMS5003 is attached to
    pub serial_port: String,
    /// PMS5003 enable line
    pub pms5003_enable_gpio: Option<u32>,
    /// PMS5003 reset line
    pub pms5003_reset_gpio: Option<u32>,
    /// Gas sensor heater line
    pub gas_heater_gpio: Option<u32>,
    /// CPU thermal zone `temp` file
    pub thermal_zone: PathBuf,
    /// Most verbose level emitted
    pub log_level: LevelFilter,
    /// Compensation and pacing
    pub sampler: SamplerConfig,
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, METRICS_PORT)),
            i2c_bus: PathBuf::from(I2C_BUS),
            bme280_address: bme280::DEFAULT_ADDRESS,
            gas_address: gas::DEFAULT_ADDRESS,
            serial_port: pms5003::DEFAULT_PORT.to_owned(),
            pms5003_enable_gpio: Some(PMS5003_ENABLE_GPIO),
            pms5003_reset_gpio: Some(PMS5003_RESET_GPIO),
            gas_heater_gpio: Some(GAS_HEATER_GPIO),
            thermal_zone: PathBuf::from(thermal::DEFAULT_THERMAL_ZONE),
            log_level: LevelFilter::Info,
            sampler: SamplerConfig::default(),
        }
    }
}

impl ExporterSettings {
    /// Scrape listener address
    pub fn listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// i2c character device
    pub fn i2c_bus(mut self, path: impl Into<PathBuf>) -> Self {
        self.i2c_bus = path.into();
        self
    }

    /// UART device
    pub fn serial_port(mut self, path: impl Into<String>) -> Self {
        self.serial_port = path.into();
        self
    }

    /// Run without GPIO control of the PMS5003 or the heater
    pub fn without_gpio(mut self) -> Self {
        self.pms5003_enable_gpio = None;
        self.pms5003_reset_gpio = None;
        self.gas_heater_gpio = None;
        self
    }

    /// CPU thermal zone file
    pub fn thermal_zone(mut self, path: impl Into<PathBuf>) -> Self {
        self.thermal_zone = path.into();
        self
    }

    /// Log verbosity
    pub fn log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// Sampler tuning
    pub fn sampler(mut self, config: SamplerConfig) -> Self {
        self.sampler = config;
        self
    }
}

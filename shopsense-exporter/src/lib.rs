//! ShopSense Prometheus Exporter
//!
//! Wires the real devices into the core sampler, publishes through
//! prometheus gauges and serves them for scraping:
//!
//! ```text
//!  BME280 ─┐
//!  ADS1015 ┤                                  ┌────────────────┐
//!  PMS5003 ┼──▶ Sampler (main thread) ──▶ PrometheusSink ──▶ Registry ◀── scrape listener
//!  thermal ┘                                  └────────────────┘       (own thread, :8000)
//! ```
//!
//! [`run`] only returns on a fatal error; the binary logs it and exits
//! non-zero so the service manager restarts it.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod errors;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod settings;

use i2cdev::linux::LinuxI2CDevice;
use serialport::SerialPort;
use shopsense_core::errors::DeviceKind;
use shopsense_core::{Sampler, SensorSuite, ThreadPacer};
use shopsense_devices::{Bme280, DeviceError, GasSensorAdc, Pms5003, SysfsGpio, ThermalZone};

pub use errors::ExporterError;
pub use metrics::PrometheusSink;
pub use settings::ExporterSettings;

/// Open the devices, start the listener and sample until something fails
pub fn run(settings: &ExporterSettings) -> Result<(), ExporterError> {
    let devices = open_devices(settings)?;
    let sink = PrometheusSink::new()?;

    let listener = server::bind(settings.listen_addr)?;
    server::spawn(listener, sink.registry().clone())?;
    log::info!("Serving sensor metrics on :{}", settings.listen_addr.port());

    let mut sampler = Sampler::new(devices, ThreadPacer, sink, settings.sampler)?;
    loop {
        let averages = sampler.run_cycle()?;
        match serde_json::to_string(&averages) {
            Ok(json) => log::debug!("cycle {}: {json}", sampler.cycles()),
            Err(err) => log::debug!("cycle {}: {averages:?} ({err})", sampler.cycles()),
        }
    }
}

type Devices = SensorSuite<
    Bme280<LinuxI2CDevice>,
    GasSensorAdc<LinuxI2CDevice>,
    Pms5003<Box<dyn SerialPort>>,
    ThermalZone,
>;

fn open_devices(settings: &ExporterSettings) -> Result<Devices, ExporterError> {
    let i2c = |device: DeviceKind, address: u16| {
        LinuxI2CDevice::new(&settings.i2c_bus, address).map_err(|err| DeviceError::I2c {
            device,
            message: format!("{} @ {address:#04x}: {err}", settings.i2c_bus.display()),
        })
    };
    let gpio = |pin: Option<u32>| pin.map(SysfsGpio::export_output).transpose();

    let environment = Bme280::new(i2c(DeviceKind::Environment, settings.bme280_address)?)?;

    let mut gas = GasSensorAdc::new(i2c(DeviceKind::Gas, settings.gas_address)?);
    if let Some(heater) = gpio(settings.gas_heater_gpio)? {
        gas = gas.with_heater(heater)?;
    }

    let particulate = Pms5003::open(
        &settings.serial_port,
        gpio(settings.pms5003_enable_gpio)?,
        gpio(settings.pms5003_reset_gpio)?,
    )?;

    let cpu = ThermalZone::new(&settings.thermal_zone);

    log::info!(
        "Sensors ready: BME280 @ {:#04x}, ADS1015 @ {:#04x}, PMS5003 on {}",
        settings.bme280_address,
        settings.gas_address,
        settings.serial_port
    );
    Ok(SensorSuite::new(environment, gas, particulate, cpu))
}

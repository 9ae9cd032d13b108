//! Linux Hardware Adapters for ShopSense
//!
//! ## Overview
//!
//! `shopsense-core` only knows its sensors through four narrow traits. This
//! crate provides the implementations that run on a Raspberry Pi with an
//! enviro board attached:
//!
//! | Trait | Adapter | Bus |
//! |-------|---------|-----|
//! | `EnvironmentSensor` | [`Bme280`] | i2c, address `0x76` |
//! | `GasSensor` | [`GasSensorAdc`] (MICS6814 behind an ADS1015) | i2c, address `0x49` |
//! | `ParticulateSensor` | [`Pms5003`] | UART, 9600 8N1 |
//! | `CpuThermometer` | [`ThermalZone`] | sysfs |
//!
//! ## Error Handling
//!
//! Opening a device returns a [`DeviceError`] that keeps the underlying OS or
//! bus error, so start-up failures are reported in full. Once running, every
//! read returns the core's `SensorError`; the adapter logs the underlying
//! cause at error level before folding it, since `SensorError` only carries
//! static reasons.
//!
//! ## Example Usage
//!
//! ```no_run
//! use i2cdev::linux::LinuxI2CDevice;
//! use shopsense_devices::{Bme280, ThermalZone};
//! use shopsense_core::traits::{CpuThermometer, EnvironmentSensor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bus = LinuxI2CDevice::new("/dev/i2c-1", 0x76)?;
//! let mut bme280 = Bme280::new(bus)?;
//! let mut cpu = ThermalZone::new("/sys/class/thermal/thermal_zone0/temp");
//!
//! println!("{:.1} °C (cpu {:.1} °C)", bme280.temperature()?, cpu.cpu_temperature()?);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod bme280;
pub mod errors;
pub mod gas;
pub mod gpio;
pub mod pms5003;
pub mod thermal;

pub use bme280::Bme280;
pub use errors::DeviceError;
pub use gas::GasSensorAdc;
pub use gpio::SysfsGpio;
pub use pms5003::{Pms5003, SerialLine};
pub use thermal::ThermalZone;

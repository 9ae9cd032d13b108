//! BME280 temperature / humidity / pressure sensor over i2c
//!
//! ## Operating Mode
//!
//! The sensor is put in normal mode at start-up: it measures continuously,
//! ×16 oversampling on every channel, IIR filter coefficient 16 and 500 ms
//! standby between bursts. Each read fetches the latest burst from the data
//! registers and compensates it with the factory calibration, so the three
//! trait methods never block on a conversion.
//!
//! ## Register Map (subset)
//!
//! | Register | Contents |
//! |----------|----------|
//! | `0x88..=0xA1` | calibration block 0 (T1..T3, P1..P9, H1) |
//! | `0xD0` | chip id (`0x60`) |
//! | `0xE0` | soft reset |
//! | `0xE1..=0xE7` | calibration block 1 (H2..H6) |
//! | `0xF2` | `ctrl_hum` |
//! | `0xF4` | `ctrl_meas` |
//! | `0xF5` | `config` |
//! | `0xF7..=0xFE` | pressure, temperature, humidity ADC values |
//!
//! `ctrl_hum` only takes effect after a write to `ctrl_meas`, so it is
//! always written first.
//!
//! ## Compensation
//!
//! The floating point formulas from the Bosch datasheet (section 8.1). They
//! produce °C, Pa and %RH; pressure is handed out in hPa.

use std::thread;
use std::time::Duration;

use i2cdev::core::I2CDevice;
use shopsense_core::errors::{DeviceKind, SensorError};
use shopsense_core::traits::EnvironmentSensor;

use crate::errors::{bus_fault, DeviceError};

/// Value of the chip id register
pub const CHIP_ID: u8 = 0x60;

/// Default i2c address on the enviro board (SDO low)
pub const DEFAULT_ADDRESS: u16 = 0x76;

mod reg {
    pub const CALIB_00: u8 = 0x88;
    pub const CHIP_ID: u8 = 0xD0;
    pub const RESET: u8 = 0xE0;
    pub const CALIB_26: u8 = 0xE1;
    pub const CTRL_HUM: u8 = 0xF2;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const CONFIG: u8 = 0xF5;
    pub const DATA: u8 = 0xF7;
}

const SOFT_RESET: u8 = 0xB6;
/// osrs_h = ×16
const CTRL_HUM_X16: u8 = 0b101;
/// osrs_t = ×16, osrs_p = ×16, mode = normal
const CTRL_MEAS_NORMAL_X16: u8 = 0b101_101_11;
/// t_sb = 500 ms, filter = 16
const CONFIG_STANDBY_500MS_FILTER_16: u8 = 0b100_100_00;

/// Start-up time after a soft reset
const RESET_DELAY: Duration = Duration::from_millis(2);
/// Long enough for the first ×16 burst to land in the data registers
const FIRST_MEASUREMENT_DELAY: Duration = Duration::from_millis(150);

/// ADC value reported for a channel that has not been measured yet
const SKIPPED_20BIT: i32 = 0x80000;
const SKIPPED_16BIT: i32 = 0x8000;

const PA_PER_HPA: f64 = 100.0;

/// Factory trim values read once at start-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub struct Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
    pub h1: u8,
    pub h2: i16,
    pub h3: u8,
    pub h4: i16,
    pub h5: i16,
    pub h6: i8,
}

impl Calibration {
    /// Decode the two calibration blocks (`0x88..=0xA1`, `0xE1..=0xE7`)
    pub fn from_registers(block0: &[u8; 26], block1: &[u8; 7]) -> Self {
        let u16_at = |i: usize| u16::from_le_bytes([block0[i], block0[i + 1]]);
        let i16_at = |i: usize| i16::from_le_bytes([block0[i], block0[i + 1]]);

        // H4 and H5 are 12-bit signed values sharing the nibbles of 0xE5
        let h4 = (i16::from(block1[3] as i8) << 4) | i16::from(block1[4] & 0x0F);
        let h5 = (i16::from(block1[5] as i8) << 4) | i16::from(block1[4] >> 4);

        Self {
            t1: u16_at(0),
            t2: i16_at(2),
            t3: i16_at(4),
            p1: u16_at(6),
            p2: i16_at(8),
            p3: i16_at(10),
            p4: i16_at(12),
            p5: i16_at(14),
            p6: i16_at(16),
            p7: i16_at(18),
            p8: i16_at(20),
            p9: i16_at(22),
            h1: block0[25],
            h2: i16::from_le_bytes([block1[0], block1[1]]),
            h3: block1[2],
            h4,
            h5,
            h6: block1[6] as i8,
        }
    }

    /// Compensate one burst of raw ADC values
    pub fn compensate(&self, raw: RawMeasurement) -> Result<Measurement, SensorError> {
        if raw.temperature == SKIPPED_20BIT
            || raw.pressure == SKIPPED_20BIT
            || raw.humidity == SKIPPED_16BIT
        {
            return Err(SensorError::InvalidReading {
                device: DeviceKind::Environment,
                reason: "measurement not ready",
            });
        }

        let (temperature_c, t_fine) = self.temperature(f64::from(raw.temperature));
        let pressure_pa = self.pressure(f64::from(raw.pressure), t_fine).ok_or(
            SensorError::InvalidReading {
                device: DeviceKind::Environment,
                reason: "pressure calibration yields division by zero",
            },
        )?;
        let humidity_pct = self.humidity(f64::from(raw.humidity), t_fine);

        Ok(Measurement {
            temperature_c,
            pressure_hpa: pressure_pa / PA_PER_HPA,
            humidity_pct,
        })
    }

    fn temperature(&self, adc: f64) -> (f64, f64) {
        let t1 = f64::from(self.t1);
        let var1 = (adc / 16384.0 - t1 / 1024.0) * f64::from(self.t2);
        let delta = adc / 131072.0 - t1 / 8192.0;
        let var2 = delta * delta * f64::from(self.t3);
        let t_fine = var1 + var2;
        (t_fine / 5120.0, t_fine)
    }

    fn pressure(&self, adc: f64, t_fine: f64) -> Option<f64> {
        let mut var1 = t_fine / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * f64::from(self.p6) / 32768.0;
        var2 += var1 * f64::from(self.p5) * 2.0;
        var2 = var2 / 4.0 + f64::from(self.p4) * 65536.0;
        var1 = (f64::from(self.p3) * var1 * var1 / 524288.0 + f64::from(self.p2) * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * f64::from(self.p1);
        if var1 == 0.0 {
            return None;
        }

        let mut p = 1048576.0 - adc;
        p = (p - var2 / 4096.0) * 6250.0 / var1;
        let var1 = f64::from(self.p9) * p * p / 2147483648.0;
        let var2 = p * f64::from(self.p8) / 32768.0;
        Some(p + (var1 + var2 + f64::from(self.p7)) / 16.0)
    }

    fn humidity(&self, adc: f64, t_fine: f64) -> f64 {
        let var = t_fine - 76800.0;
        let var = (adc - (f64::from(self.h4) * 64.0 + f64::from(self.h5) / 16384.0 * var))
            * (f64::from(self.h2) / 65536.0
                * (1.0
                    + f64::from(self.h6) / 67108864.0
                        * var
                        * (1.0 + f64::from(self.h3) / 67108864.0 * var)));
        let var = var * (1.0 - f64::from(self.h1) * var / 524288.0);
        var.clamp(0.0, 100.0)
    }
}

/// Raw ADC values from one data burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMeasurement {
    /// 20-bit temperature
    pub temperature: i32,
    /// 20-bit pressure
    pub pressure: i32,
    /// 16-bit humidity
    pub humidity: i32,
}

impl RawMeasurement {
    /// Unpack the eight data registers `0xF7..=0xFE`
    pub fn from_registers(data: &[u8; 8]) -> Self {
        let twenty_bit =
            |msb: u8, lsb: u8, xlsb: u8| (i32::from(msb) << 12) | (i32::from(lsb) << 4) | (i32::from(xlsb) >> 4);
        Self {
            pressure: twenty_bit(data[0], data[1], data[2]),
            temperature: twenty_bit(data[3], data[4], data[5]),
            humidity: (i32::from(data[6]) << 8) | i32::from(data[7]),
        }
    }
}

/// One compensated burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Degrees Celsius
    pub temperature_c: f64,
    /// Hectopascals
    pub pressure_hpa: f64,
    /// Relative humidity, 0–100 %
    pub humidity_pct: f64,
}

/// BME280 driver over any i2c device handle
pub struct Bme280<D> {
    device: D,
    calibration: Calibration,
}

impl<D: I2CDevice> Bme280<D> {
    /// Verify the chip id, reset, load calibration and start normal mode
    pub fn new(mut device: D) -> Result<Self, DeviceError> {
        let i2c_err = |err: D::Error| DeviceError::i2c(DeviceKind::Environment, err);

        let mut id = [0u8; 1];
        read_registers(&mut device, reg::CHIP_ID, &mut id).map_err(i2c_err)?;
        if id[0] != CHIP_ID {
            return Err(DeviceError::UnknownChip {
                found: id[0],
                expected: CHIP_ID,
            });
        }

        device.write(&[reg::RESET, SOFT_RESET]).map_err(i2c_err)?;
        thread::sleep(RESET_DELAY);

        let mut block0 = [0u8; 26];
        let mut block1 = [0u8; 7];
        read_registers(&mut device, reg::CALIB_00, &mut block0).map_err(i2c_err)?;
        read_registers(&mut device, reg::CALIB_26, &mut block1).map_err(i2c_err)?;
        let calibration = Calibration::from_registers(&block0, &block1);

        device.write(&[reg::CTRL_HUM, CTRL_HUM_X16]).map_err(i2c_err)?;
        device.write(&[reg::CONFIG, CONFIG_STANDBY_500MS_FILTER_16]).map_err(i2c_err)?;
        device.write(&[reg::CTRL_MEAS, CTRL_MEAS_NORMAL_X16]).map_err(i2c_err)?;
        thread::sleep(FIRST_MEASUREMENT_DELAY);

        log::debug!("BME280 calibration loaded: {calibration:?}");
        Ok(Self {
            device,
            calibration,
        })
    }

    /// Calibration read at start-up
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Fetch and compensate the latest burst
    pub fn measure(&mut self) -> Result<Measurement, SensorError> {
        let mut data = [0u8; 8];
        read_registers(&mut self.device, reg::DATA, &mut data)
            .map_err(|err| bus_fault(DeviceKind::Environment, "i2c read failed", err))?;
        self.calibration
            .compensate(RawMeasurement::from_registers(&data))
    }

    /// Give the bus handle back
    pub fn release(self) -> D {
        self.device
    }
}

impl<D: I2CDevice> EnvironmentSensor for Bme280<D> {
    fn temperature(&mut self) -> Result<f64, SensorError> {
        Ok(self.measure()?.temperature_c)
    }

    fn humidity(&mut self) -> Result<f64, SensorError> {
        Ok(self.measure()?.humidity_pct)
    }

    fn pressure(&mut self) -> Result<f64, SensorError> {
        Ok(self.measure()?.pressure_hpa)
    }
}

/// Burst read starting at `start`; the sensor auto-increments the address
fn read_registers<D: I2CDevice>(device: &mut D, start: u8, buf: &mut [u8]) -> Result<(), D::Error> {
    device.write(&[start])?;
    device.read(buf)
}

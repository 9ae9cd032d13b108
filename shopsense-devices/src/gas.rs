//! MICS6814 gas sensor read through an ADS1015 ADC
//!
//! Each of the sensor's three elements sits in a divider with a 56 kΩ load
//! resistor across a 3.3 V supply. The ADC measures the divider voltage in
//! single-shot mode and the element's resistance is recovered from it:
//!
//! ```text
//! R = V × 56000 / (3.3 − V)
//! ```
//!
//! An open or saturated element drives the divider to the rail. The
//! formula's result is still reported (0 Ω exactly at the rail) so a bad
//! gas element never stops the other measurements.
//!
//! | ADC channel | Element |
//! |-------------|---------|
//! | AIN0 | oxidising (NO2) |
//! | AIN1 | reducing (CO) |
//! | AIN2 | NH3 |

use std::thread;
use std::time::Duration;

use i2cdev::core::I2CDevice;
use shopsense_core::errors::{DeviceKind, SensorError};
use shopsense_core::readings::GasReading;
use shopsense_core::traits::GasSensor;

use crate::errors::{bus_fault, DeviceError};
use crate::gpio::SysfsGpio;

/// ADS1015 address on the enviro board
pub const DEFAULT_ADDRESS: u16 = 0x49;

/// Divider supply voltage
pub const SUPPLY_VOLTS: f64 = 3.3;
/// Load resistor in series with each element
pub const LOAD_RESISTOR_OHMS: f64 = 56_000.0;
/// ADC full-scale range at the configured gain
pub const FULL_SCALE_VOLTS: f64 = 6.144;

const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

const OS_START: u16 = 1 << 15;
const MUX_SINGLE_ENDED: u16 = 0b100 << 12;
const PGA_6_144V: u16 = 0b000 << 9;
const MODE_SINGLE_SHOT: u16 = 1 << 8;
const DR_1600_SPS: u16 = 0b100 << 5;
const COMP_DISABLED: u16 = 0b11;

/// Counts per full scale on the 12-bit signed result
const FULL_SCALE_COUNTS: f64 = 2048.0;

/// One conversion takes ~0.7 ms at 1600 SPS
const CONVERSION_POLL: Duration = Duration::from_millis(1);
const CONVERSION_ATTEMPTS: u32 = 10;

#[derive(Debug, Clone, Copy)]
enum Channel {
    Oxidising = 0,
    Reducing = 1,
    Nh3 = 2,
}

/// Config register word starting a single-shot conversion on `channel`
fn config_word(channel: Channel) -> u16 {
    OS_START
        | MUX_SINGLE_ENDED
        | ((channel as u16) << 12)
        | PGA_6_144V
        | MODE_SINGLE_SHOT
        | DR_1600_SPS
        | COMP_DISABLED
}

/// Conversion register contents to volts
pub fn raw_to_volts(raw: [u8; 2]) -> f64 {
    // 12-bit result, left aligned
    let counts = i16::from_be_bytes(raw) >> 4;
    f64::from(counts) * FULL_SCALE_VOLTS / FULL_SCALE_COUNTS
}

/// Divider voltage to sensor element resistance
pub fn volts_to_ohms(volts: f64) -> f64 {
    let headroom = SUPPLY_VOLTS - volts;
    if headroom <= 0.0 {
        log::warn!("gas divider at {volts:.3} V, supply is {SUPPLY_VOLTS} V");
    }
    if headroom == 0.0 {
        return 0.0;
    }
    volts * LOAD_RESISTOR_OHMS / headroom
}

/// Gas sensor adapter over any i2c device handle
pub struct GasSensorAdc<D> {
    device: D,
    heater: Option<SysfsGpio>,
}

impl<D: I2CDevice> GasSensorAdc<D> {
    /// Wrap the ADC handle; the heater (if any) is left as is
    pub fn new(device: D) -> Self {
        Self {
            device,
            heater: None,
        }
    }

    /// Switch the sensor heater on through `heater` and keep hold of the line
    pub fn with_heater(mut self, mut heater: SysfsGpio) -> Result<Self, DeviceError> {
        heater.set(true).map_err(|source| DeviceError::Gpio {
            pin: heater.pin(),
            source,
        })?;
        log::info!("Gas sensor heater enabled on GPIO {}", heater.pin());
        self.heater = Some(heater);
        Ok(self)
    }

    fn read_volts(&mut self, channel: Channel) -> Result<f64, SensorError> {
        let [hi, lo] = config_word(channel).to_be_bytes();
        self.device
            .write(&[REG_CONFIG, hi, lo])
            .map_err(|err| bus_fault(DeviceKind::Gas, "i2c write failed", err))?;

        self.wait_for_conversion()?;

        let mut raw = [0u8; 2];
        self.device
            .write(&[REG_CONVERSION])
            .and_then(|()| self.device.read(&mut raw))
            .map_err(|err| bus_fault(DeviceKind::Gas, "i2c read failed", err))?;
        Ok(raw_to_volts(raw))
    }

    fn wait_for_conversion(&mut self) -> Result<(), SensorError> {
        let mut config = [0u8; 2];
        for _ in 0..CONVERSION_ATTEMPTS {
            thread::sleep(CONVERSION_POLL);
            self.device
                .write(&[REG_CONFIG])
                .and_then(|()| self.device.read(&mut config))
                .map_err(|err| bus_fault(DeviceKind::Gas, "i2c read failed", err))?;
            if u16::from_be_bytes(config) & OS_START != 0 {
                return Ok(());
            }
        }
        Err(SensorError::Bus {
            device: DeviceKind::Gas,
            reason: "conversion did not complete",
        })
    }
}

impl<D: I2CDevice> GasSensor for GasSensorAdc<D> {
    fn read_all(&mut self) -> Result<GasReading, SensorError> {
        let oxidising = volts_to_ohms(self.read_volts(Channel::Oxidising)?);
        let reducing = volts_to_ohms(self.read_volts(Channel::Reducing)?);
        let nh3 = volts_to_ohms(self.read_volts(Channel::Nh3)?);
        Ok(GasReading {
            oxidising,
            reducing,
            nh3,
        })
    }
}

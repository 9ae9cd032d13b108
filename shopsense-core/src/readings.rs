//! Reading types flowing through one sampling cycle
//!
//! Everything here is cycle-scoped except [`Metric`], which names the
//! process-lifetime gauges the averages end up in.

use core::fmt;

use crate::compensation::round_to_tenth;

/// One published (or publishable) series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    /// Compensated air temperature (°C)
    Temperature,
    /// Compensated relative humidity (%RH)
    Humidity,
    /// Barometric pressure (Pa)
    Pressure,
    /// PM2.5 mass concentration (µg/m³)
    Pm2_5,
    /// PM10 mass concentration (µg/m³)
    Pm10,
    /// Oxidising gas sensor resistance (kΩ)
    Oxidised,
    /// Reducing gas sensor resistance (kΩ)
    Reducing,
    /// NH3 gas sensor resistance (kΩ)
    Nh3,
}

impl Metric {
    /// Number of metrics accumulated per cycle
    pub const COUNT: usize = 8;

    /// Every accumulated metric, in window order
    pub const ALL: [Metric; Self::COUNT] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Pressure,
        Metric::Pm10,
        Metric::Pm2_5,
        Metric::Oxidised,
        Metric::Reducing,
        Metric::Nh3,
    ];

    /// Metrics set on the registry every cycle
    pub const PUBLISHED: [Metric; 5] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Pressure,
        Metric::Pm2_5,
        Metric::Pm10,
    ];

    /// Gas metrics: accumulated every cycle, published only on request
    pub const GAS: [Metric; 3] = [Metric::Oxidised, Metric::Reducing, Metric::Nh3];

    /// Gauge name on the scrape endpoint
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Temperature => "shop_temperature",
            Self::Humidity => "shop_humidity",
            Self::Pressure => "shop_pressure",
            Self::Pm2_5 => "shop_PM2",
            Self::Pm10 => "shop_PM10",
            Self::Oxidised => "shop_oxidised",
            Self::Reducing => "shop_reduced",
            Self::Nh3 => "shop_nh3",
        }
    }

    /// Gauge help text on the scrape endpoint
    pub const fn help(&self) -> &'static str {
        match self {
            Self::Temperature => "Temperature measured by the BME280 Sensor",
            Self::Humidity => "Humidity measured by the BME280 Sensor",
            Self::Pressure => "Pressure measured by the BME280 Sensor",
            Self::Pm2_5 => "PM2.5 ug/m3 (combustion particles, organic compounds, metals)",
            Self::Pm10 => "PM10 ug/m3",
            Self::Oxidised => "ko (gas oxidised)",
            Self::Reducing => "ko (gas reduced)",
            Self::Nh3 => "ko (gas nh3)",
        }
    }

    /// Position of this metric's sequence inside a window
    pub const fn index(&self) -> usize {
        match self {
            Self::Temperature => 0,
            Self::Humidity => 1,
            Self::Pressure => 2,
            Self::Pm10 => 3,
            Self::Pm2_5 => 4,
            Self::Oxidised => 5,
            Self::Reducing => 6,
            Self::Nh3 => 7,
        }
    }

    /// Temperature and humidity averages are published to one decimal digit
    pub const fn rounds_to_tenth(&self) -> bool {
        matches!(self, Self::Temperature | Self::Humidity)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Particle sizes the particulate sensor reports mass concentrations for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleSize {
    /// PM1.0
    Pm1_0,
    /// PM2.5
    Pm2_5,
    /// PM10
    Pm10,
}

/// One frame's worth of particulate data
///
/// Mass concentrations come in two flavours: "standard particle" (CF=1,
/// factory calibration) and "atmospheric environment". The sampler uses the
/// standard set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticulateReading {
    /// PM1.0/PM2.5/PM10 (µg/m³), standard particle
    pub standard: [u16; 3],
    /// PM1.0/PM2.5/PM10 (µg/m³), atmospheric environment
    pub atmospheric: [u16; 3],
    /// Particles per 0.1 L above 0.3, 0.5, 1.0, 2.5, 5.0 and 10 µm
    pub counts_per_dl: [u16; 6],
}

impl ParticulateReading {
    /// Reading with only the standard PM2.5 and PM10 set
    pub const fn from_pm(pm2_5: u16, pm10: u16) -> Self {
        Self {
            standard: [0, pm2_5, pm10],
            atmospheric: [0, pm2_5, pm10],
            counts_per_dl: [0; 6],
        }
    }

    /// Mass concentration for `size` in µg/m³
    pub fn pm_ug_per_m3(&self, size: ParticleSize, atmospheric: bool) -> f64 {
        let set = if atmospheric { &self.atmospheric } else { &self.standard };
        let idx = match size {
            ParticleSize::Pm1_0 => 0,
            ParticleSize::Pm2_5 => 1,
            ParticleSize::Pm10 => 2,
        };
        f64::from(set[idx])
    }
}

/// Gas sensor resistances in ohms
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GasReading {
    /// Oxidising channel (NO2 and friends)
    pub oxidising: f64,
    /// Reducing channel (CO and friends)
    pub reducing: f64,
    /// Ammonia channel
    pub nh3: f64,
}

/// One instant across every source, already compensated and converted
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubSample {
    /// Compensated temperature (°C, 1 dp)
    pub temperature: f64,
    /// Compensated humidity (%RH, 1 dp)
    pub humidity: f64,
    /// Pressure (Pa)
    pub pressure: f64,
    /// PM10 (µg/m³)
    pub pm10: f64,
    /// PM2.5 (µg/m³)
    pub pm2_5: f64,
    /// Oxidising resistance (kΩ)
    pub oxidised: f64,
    /// Reducing resistance (kΩ)
    pub reducing: f64,
    /// NH3 resistance (kΩ)
    pub nh3: f64,
}

impl SubSample {
    /// Value this sub-sample contributes to `metric`'s sequence
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Pressure => self.pressure,
            Metric::Pm10 => self.pm10,
            Metric::Pm2_5 => self.pm2_5,
            Metric::Oxidised => self.oxidised,
            Metric::Reducing => self.reducing,
            Metric::Nh3 => self.nh3,
        }
    }
}

/// Arithmetic means of one full window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CycleAverages {
    /// Mean compensated temperature (°C)
    pub temperature: f64,
    /// Mean compensated humidity (%RH)
    pub humidity: f64,
    /// Mean pressure (Pa)
    pub pressure: f64,
    /// Mean PM10 (µg/m³)
    pub pm10: f64,
    /// Mean PM2.5 (µg/m³)
    pub pm2_5: f64,
    /// Mean oxidising resistance (kΩ)
    pub oxidised: f64,
    /// Mean reducing resistance (kΩ)
    pub reducing: f64,
    /// Mean NH3 resistance (kΩ)
    pub nh3: f64,
}

impl CycleAverages {
    pub(crate) const fn from_means(means: [f64; Metric::COUNT]) -> Self {
        Self {
            temperature: means[0],
            humidity: means[1],
            pressure: means[2],
            pm10: means[3],
            pm2_5: means[4],
            oxidised: means[5],
            reducing: means[6],
            nh3: means[7],
        }
    }

    /// Unrounded mean of `metric`'s sequence
    pub fn mean(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::Pressure => self.pressure,
            Metric::Pm10 => self.pm10,
            Metric::Pm2_5 => self.pm2_5,
            Metric::Oxidised => self.oxidised,
            Metric::Reducing => self.reducing,
            Metric::Nh3 => self.nh3,
        }
    }

    /// Value as it is set on the gauge
    pub fn published(&self, metric: Metric) -> f64 {
        let mean = self.mean(metric);
        if metric.rounds_to_tenth() {
            round_to_tenth(mean)
        } else {
            mean
        }
    }
}

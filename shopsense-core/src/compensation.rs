//! Self-Heating Compensation for Enclosure-Mounted Sensors
//!
//! ## Physics Background
//!
//! The environment sensor sits a few millimetres above the host board. The
//! CPU and regulators warm the air around it, so the raw temperature reads
//! high. The excess is roughly proportional to how much hotter the CPU is
//! than the sensor:
//!
//! ```text
//! compensated = raw - (cpu - raw) / factor
//! ```
//!
//! `factor` is an empirical tuning knob:
//! - smaller factor → larger correction → lower compensated temperature
//! - larger factor  → weaker correction
//!
//! With raw = 20°C, cpu = 30°C and the default factor 4.5 the correction is
//! 10 / 4.5 ≈ 2.2°C, giving 17.8°C.
//!
//! ### Humidity
//!
//! Relative humidity is reported against the sensor's own (warm) temperature,
//! so it reads low once the temperature has been corrected. The proper fix
//! recomputes RH from the compensated temperature and the dew point. This
//! module applies a flat additive offset instead, calibrated against an
//! external hygrometer. It is an approximation and is kept as one.
//!
//! ## Rounding
//!
//! Both corrections are rounded to one decimal digit before they enter a
//! window. Rounding goes through `libm::round` (half away from zero) on the
//! value scaled by ten, so the same code runs without `std`. Ties, and
//! values the scaling multiply pushes onto a tie, round away from zero.

use crate::constants::compensation::TENTHS_PER_UNIT;

/// Round to one decimal digit
#[inline]
pub fn round_to_tenth(value: f64) -> f64 {
    libm::round(value * TENTHS_PER_UNIT) / TENTHS_PER_UNIT
}

/// Correct a raw temperature for heat from the CPU, to one decimal digit
///
/// `factor` must be non-zero; [`SamplerConfig::validate`](crate::SamplerConfig::validate)
/// rejects zero before a sampler is built.
#[inline]
pub fn compensate_temperature(raw_c: f64, cpu_c: f64, factor: f64) -> f64 {
    round_to_tenth(raw_c - (cpu_c - raw_c) / factor)
}

/// Shift a raw relative humidity by a fixed offset, to one decimal digit
#[inline]
pub fn compensate_humidity(raw_pct: f64, offset_pct: f64) -> f64 {
    round_to_tenth(raw_pct + offset_pct)
}

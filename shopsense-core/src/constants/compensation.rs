//! Compensation Defaults

/// Default self-heating tuning factor (dimensionless).
///
/// Divisor of the CPU-to-sensor temperature gradient. Decrease to pull the
/// compensated temperature further down, increase to correct less.
///
/// Source: the Pimoroni Enviro+ compensation example, confirmed against a
/// reference thermometer in the enclosure.
pub const DEFAULT_TEMPERATURE_FACTOR: f64 = 4.5;

/// Default additive humidity offset (%RH).
///
/// Raw RH reads low once the sensor's warm temperature is corrected away.
///
/// Source: side-by-side comparison with an external hygrometer.
pub const DEFAULT_HUMIDITY_OFFSET_PCT: f64 = 20.0;

/// Scale used to round to one decimal digit.
pub const TENTHS_PER_UNIT: f64 = 10.0;

//! Sampling Window and Unit Conversions

// ===== WINDOW =====

/// Sub-samples averaged into one published value.
///
/// Five one-second sub-samples give a 5 s average: enough to smooth the
/// particulate sensor's jitter without hiding short events.
///
/// Also the fixed capacity of every window sequence, so it can never be zero.
pub const SUB_SAMPLES: usize = 5;

/// Pause between sub-samples (milliseconds).
///
/// Paces the loop at roughly one reading per second and gives the
/// particulate sensor time to push its next frame (it streams about one
/// frame per second in active mode).
pub const SUB_SAMPLE_PAUSE_MS: u64 = 1000;

// ===== UNIT CONVERSIONS =====

/// Pascals per hectopascal.
///
/// The environment sensor reports hPa; the pressure gauge is published in Pa.
pub const PA_PER_HPA: f64 = 100.0;

/// Ohms per kilo-ohm.
///
/// Gas channel resistances are read in ohms and accumulated in kΩ.
pub const GAS_OHMS_PER_KILOHM: f64 = 1000.0;

const _: () = assert!(SUB_SAMPLES > 0);

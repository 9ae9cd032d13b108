//! Fixed-capacity per-cycle sample window
//!
//! One `heapless::Vec` per metric, each holding exactly
//! [`SUB_SAMPLES`] values once the cycle is done. The window refuses to
//! average until every sequence is full, so a partial mean can never reach
//! the registry.

use heapless::Vec;

use crate::constants::SUB_SAMPLES;
use crate::errors::SampleError;
use crate::readings::{CycleAverages, Metric, SubSample};

/// Sequences accumulated during one cycle
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    series: [Vec<f64, SUB_SAMPLES>; Metric::COUNT],
}

impl SampleWindow {
    /// Empty window: eight empty sequences
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value to `metric`'s sequence
    pub fn push_value(&mut self, metric: Metric, value: f64) -> Result<(), SampleError> {
        self.series[metric.index()]
            .push(value)
            .map_err(|_| SampleError::WindowFull {
                metric,
                capacity: SUB_SAMPLES,
            })
    }

    /// Append every value of a sub-sample
    ///
    /// Checks capacity first, so a full window is left untouched.
    pub fn push(&mut self, sample: &SubSample) -> Result<(), SampleError> {
        if let Some(metric) = Metric::ALL
            .into_iter()
            .find(|m| self.series[m.index()].is_full())
        {
            return Err(SampleError::WindowFull {
                metric,
                capacity: SUB_SAMPLES,
            });
        }

        for metric in Metric::ALL {
            self.push_value(metric, sample.value(metric))?;
        }
        Ok(())
    }

    /// Values accumulated so far for `metric`, oldest first
    pub fn series(&self, metric: Metric) -> &[f64] {
        &self.series[metric.index()]
    }

    /// Number of complete sub-samples held (shortest sequence)
    pub fn len(&self) -> usize {
        self.series.iter().map(|s| s.len()).min().unwrap_or(0)
    }

    /// True when no values have been pushed
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.is_empty())
    }

    /// True when every sequence holds [`SUB_SAMPLES`] values
    pub fn is_complete(&self) -> bool {
        self.series.iter().all(|s| s.is_full())
    }

    /// Arithmetic mean of every sequence
    ///
    /// Fails with [`SampleError::IncompleteWindow`] naming the first short
    /// sequence if the window is not yet full.
    pub fn averages(&self) -> Result<CycleAverages, SampleError> {
        let mut means = [0.0; Metric::COUNT];
        for metric in Metric::ALL {
            let series = &self.series[metric.index()];
            if !series.is_full() {
                return Err(SampleError::IncompleteWindow {
                    metric,
                    required: SUB_SAMPLES,
                    available: series.len(),
                });
            }
            means[metric.index()] = series.iter().sum::<f64>() / SUB_SAMPLES as f64;
        }
        Ok(CycleAverages::from_means(means))
    }

    /// Drop every value, ready for the next cycle
    pub fn clear(&mut self) {
        for series in self.series.iter_mut() {
            series.clear();
        }
    }
}

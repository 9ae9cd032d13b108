//! Metrics Sink Port

use crate::errors::PublishError;
use crate::readings::Metric;

/// Destination for cycle averages (a Prometheus registry in production)
///
/// `publish` overwrites the gauge; it never accumulates.
pub trait MetricsSink {
    /// Set `metric`'s gauge to `value`
    fn publish(&mut self, metric: Metric, value: f64) -> Result<(), PublishError>;
}

impl<T: MetricsSink + ?Sized> MetricsSink for &mut T {
    fn publish(&mut self, metric: Metric, value: f64) -> Result<(), PublishError> {
        (**self).publish(metric, value)
    }
}

//! Prometheus gauges behind the core's `MetricsSink`
//!
//! One gauge per [`Metric`], created and registered once at start-up. The
//! gas gauges are registered even when the sampler doesn't publish them, so
//! the exposition always lists the same eight series.

use prometheus::{Encoder, Gauge, Opts, Registry, TextEncoder};
use shopsense_core::errors::PublishError;
use shopsense_core::traits::MetricsSink;
use shopsense_core::Metric;

/// Registry plus the gauges the sampler writes to
#[derive(Clone)]
pub struct PrometheusSink {
    registry: Registry,
    gauges: Vec<Gauge>,
}

impl PrometheusSink {
    /// Create a fresh registry holding every gauge
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Register every gauge in an existing registry
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let mut gauges = Vec::with_capacity(Metric::COUNT);
        for metric in Metric::ALL {
            let gauge = Gauge::with_opts(Opts::new(metric.name(), metric.help()))?;
            registry.register(Box::new(gauge.clone()))?;
            gauges.push(gauge);
        }
        Ok(Self { registry, gauges })
    }

    /// The registry the scrape listener renders
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Current value of one gauge
    pub fn value(&self, metric: Metric) -> f64 {
        self.gauges[metric.index()].get()
    }
}

impl MetricsSink for PrometheusSink {
    fn publish(&mut self, metric: Metric, value: f64) -> Result<(), PublishError> {
        if !value.is_finite() {
            return Err(PublishError {
                metric,
                reason: "value is not finite",
            });
        }
        self.gauges[metric.index()].set(value);
        Ok(())
    }
}

/// Render the registry in the text exposition format
pub fn render(registry: &Registry) -> Result<Vec<u8>, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(buffer)
}

/// `Content-Type` of [`render`]'s output
pub fn content_type() -> String {
    TextEncoder::new().format_type().to_owned()
}

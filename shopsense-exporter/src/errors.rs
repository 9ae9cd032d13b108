//! Exporter error type

use std::io;
use std::net::SocketAddr;

use shopsense_core::{ConfigError, SampleError};
use shopsense_devices::DeviceError;
use thiserror::Error;

/// Anything that stops the exporter
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Port already taken, or not permitted
    #[error("failed to bind metrics listener on {addr}: {source}")]
    Bind {
        /// Requested address
        addr: SocketAddr,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The listener thread or its runtime could not be started
    #[error("metrics listener: {0}")]
    Listener(#[source] io::Error),

    /// Gauge creation, registration or encoding failed
    #[error("metrics registry: {0}")]
    Registry(#[from] prometheus::Error),

    /// A device could not be opened or configured
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// The sampler rejected its configuration
    #[error("invalid sampler configuration: {0}")]
    Config(#[from] ConfigError),

    /// The sampling loop hit a fatal error
    #[error("sampling failed: {0}")]
    Sample(#[from] SampleError),

    /// No logger could be installed
    #[error("logger: {0}")]
    Logger(String),
}

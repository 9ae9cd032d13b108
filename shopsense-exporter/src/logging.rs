//! Logger bootstrap
//!
//! Under systemd, records go straight to the journal with their priority
//! mapped from the `log` level. Anywhere else (a terminal, a container)
//! they go to stderr through `env_logger`. The level is fixed by
//! [`ExporterSettings::log_level`](crate::settings::ExporterSettings).

use log::LevelFilter;
use systemd_journal_logger::{connected_to_journal, JournalLog};

use crate::errors::ExporterError;

/// Install the process-wide logger
pub fn init(level: LevelFilter) -> Result<(), ExporterError> {
    if connected_to_journal() {
        JournalLog::new()
            .map_err(|err| ExporterError::Logger(err.to_string()))?
            .install()
            .map_err(|err| ExporterError::Logger(err.to_string()))?;
    } else {
        env_logger::Builder::new()
            .filter_level(level)
            .format_timestamp_secs()
            .try_init()
            .map_err(|err| ExporterError::Logger(err.to_string()))?;
    }
    log::set_max_level(level);
    Ok(())
}

//! `shopsense`: sample the enviro board and serve the readings to Prometheus

use shopsense_exporter::{logging, ExporterSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = ExporterSettings::default();
    logging::init(settings.log_level)?;
    log::info!("shopsense {} starting", env!("CARGO_PKG_VERSION"));

    if let Err(err) = shopsense_exporter::run(&settings) {
        log::error!("{err}");
        return Err(err.into());
    }
    Ok(())
}

use mobility_core::error::MobilityError;
use mobility_core::extraction::mutool::MutoolReader;
use mobility_core::settings::ConnectorConfig;
use std::path::PathBuf;

use crate::output;

pub fn run(
    config: &ConnectorConfig,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), MobilityError> {
    if !MutoolReader::is_available() {
        return Err(MobilityError::MutoolNotFound);
    }
    let reader = MutoolReader::new();
    let dataset = mobility_core::run_connector(config, &reader)?;
    tracing::info!(rows = dataset.rows.len(), "connector finished");
    output::emit_dataset(&dataset, output_format, output_file)
}

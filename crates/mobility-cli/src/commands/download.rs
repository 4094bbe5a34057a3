use mobility_core::discovery::{download_reports, fetch_report_links};
use mobility_core::error::MobilityError;
use mobility_core::settings::ConnectorConfig;

pub fn run(config: &ConnectorConfig) -> Result<(), MobilityError> {
    let links = fetch_report_links(config)?;
    let summary = download_reports(&links, config.skip_downloaded)?;
    eprintln!(
        "Downloaded {} report(s), {} already present in {}",
        summary.downloaded,
        summary.skipped,
        config.download_folder.display()
    );
    Ok(())
}

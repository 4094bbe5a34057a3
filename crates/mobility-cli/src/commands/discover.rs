use mobility_core::discovery::fetch_report_links;
use mobility_core::error::MobilityError;
use mobility_core::settings::ConnectorConfig;

use crate::output;

pub fn run(config: &ConnectorConfig, output_format: &str) -> Result<(), MobilityError> {
    let links = fetch_report_links(config)?;
    match output_format {
        "json" => output::json::print(&links)?,
        _ => println!("{}", output::table::format_links(&links)),
    }
    Ok(())
}

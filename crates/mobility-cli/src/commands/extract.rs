use chrono::NaiveDate;
use mobility_core::error::MobilityError;
use mobility_core::extraction::mutool::MutoolReader;
use mobility_core::model::ReportLink;
use mobility_core::template::ChartTemplate;
use std::path::PathBuf;

use crate::output;

/// Describe a local report from the command-line arguments. The country
/// code is used as given.
fn local_report(
    pdf_file: PathBuf,
    country: &str,
    date: &str,
    region: Option<&str>,
) -> Result<ReportLink, MobilityError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| MobilityError::InvalidDate(date.to_string()))?;
    Ok(ReportLink::local(pdf_file, country, region, date))
}

pub fn run(
    pdf_file: PathBuf,
    country: &str,
    date: &str,
    region: Option<&str>,
    template: &ChartTemplate,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), MobilityError> {
    let report = local_report(pdf_file, country, date, region)?;

    let reader = MutoolReader::new();
    let dataset = mobility_core::extract_documents(&reader, &[report], template)?;
    output::emit_dataset(&dataset, output_format, output_file)
}

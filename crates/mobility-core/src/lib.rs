pub mod discovery;
pub mod document;
pub mod error;
pub mod extraction;
pub mod graph;
pub mod labels;
pub mod model;
pub mod settings;
pub mod template;

use document::{group_by_region, merge_region, relabel_sub_regions};
use error::MobilityError;
use extraction::DocumentReader;
use model::{DocumentExtraction, MobilityDataset, ReportLink, SourcedWarning};
use settings::ConnectorConfig;
use template::ChartTemplate;

/// Main API entry point: recover the daily rows of one report.
///
/// Every chart page is read, its charts calibrated and grouped by region,
/// and each region laid out over the calendar from the epoch to the report
/// date. Sub-national reports get their `region`/`sub_region` relabelled.
pub fn extract_document(
    reader: &dyn DocumentReader,
    report: &ReportLink,
    template: &ChartTemplate,
) -> Result<DocumentExtraction, MobilityError> {
    let document = reader.open(&report.path)?;
    let chart_pages = document
        .page_count()?
        .saturating_sub(template.trailing_pages);

    let mut warnings = Vec::new();
    let mut charts = Vec::new();
    for page in 0..chart_pages {
        charts.extend(document::extract_page(
            document.as_ref(),
            page,
            &report.country_iso,
            template,
            &mut warnings,
        )?);
    }

    let rows = group_by_region(charts)
        .iter()
        .flat_map(|region| merge_region(region, &report.country_iso, report.date, template))
        .collect();
    let rows = relabel_sub_regions(rows, report.region.as_deref());

    tracing::info!(
        path = %report.path.display(),
        backend = reader.backend_name(),
        pages = chart_pages,
        rows = rows.len(),
        warnings = warnings.len(),
        "extracted report"
    );

    Ok(DocumentExtraction { rows, warnings })
}

/// Extract several reports and concatenate their rows.
///
/// The first failing report aborts the run.
pub fn extract_documents(
    reader: &dyn DocumentReader,
    reports: &[ReportLink],
    template: &ChartTemplate,
) -> Result<MobilityDataset, MobilityError> {
    let mut dataset = MobilityDataset::default();
    for report in reports {
        let extraction = extract_document(reader, report, template)?;
        dataset.rows.extend(extraction.rows);
        dataset
            .warnings
            .extend(extraction.warnings.into_iter().map(|warning| SourcedWarning {
                source: report.path.clone(),
                warning,
            }));
    }
    Ok(dataset)
}

/// Discover, optionally download, and extract every published report.
pub fn run_connector(
    config: &ConnectorConfig,
    reader: &dyn DocumentReader,
) -> Result<MobilityDataset, MobilityError> {
    let reports = discovery::fetch_report_links(config)?;

    if config.download {
        let summary = discovery::download_reports(&reports, config.skip_downloaded)?;
        tracing::info!(
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            "reports ready"
        );
    }

    extract_documents(reader, &reports, &config.template)
}

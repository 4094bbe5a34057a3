//! Turns the pages of one report into per-region daily rows.

use crate::error::MobilityError;
use crate::extraction::{ObjectKind, PageObject, ReportDocument};
use crate::graph::{extract_graph, parse_stream, CalibratedSeries};
use crate::labels::locate_labels;
use crate::model::{CategoryValues, ExtractionWarning, MobilityRow};
use crate::template::{ChartTemplate, PairingMode};
use chrono::NaiveDate;

/// Calibrated charts of one region, in page order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCharts {
    pub region: String,
    pub series: Vec<CalibratedSeries>,
}

/// Extract every chart of a page together with the region it belongs to.
pub fn extract_page(
    document: &dyn ReportDocument,
    page: usize,
    country_iso: &str,
    template: &ChartTemplate,
    warnings: &mut Vec<ExtractionWarning>,
) -> Result<Vec<(String, CalibratedSeries)>, MobilityError> {
    let lines = document.page_text(page)?;
    let labels = locate_labels(&lines, page, country_iso, template);
    let objects = chart_objects(document.page_objects(page)?, page, warnings);

    if labels.len() != objects.len() {
        match template.pairing {
            PairingMode::Strict => {
                return Err(MobilityError::LabelMismatch {
                    page,
                    labels: labels.len(),
                    objects: objects.len(),
                });
            }
            PairingMode::Truncate => {
                tracing::warn!(
                    page,
                    labels = labels.len(),
                    objects = objects.len(),
                    "chart labels and chart objects differ, pairing the shorter side"
                );
                warnings.push(ExtractionWarning::LabelMismatch {
                    page,
                    labels: labels.len(),
                    objects: objects.len(),
                });
            }
        }
    }

    let mut charts = Vec::new();
    for (label, object) in labels.into_iter().zip(objects.iter()) {
        let stream = document.content_stream(object)?;
        let parsed = parse_stream(&stream);
        let calibration = extract_graph(&parsed, label.category, template);

        if calibration.degenerate_axis {
            tracing::warn!(
                page,
                region = %label.region,
                category = %label.category,
                "chart baseline is at y = 0, values left unscaled"
            );
            warnings.push(ExtractionWarning::DegenerateAxis {
                page,
                region: label.region.clone(),
                category: label.category,
            });
        }

        tracing::debug!(
            page,
            object = %object.name,
            line = label.line_index,
            region = %label.region,
            category = %label.category,
            points = calibration.series.points.len(),
            "calibrated chart"
        );
        charts.push((label.region, calibration.series));
    }

    Ok(charts)
}

/// Keep a page's form objects, ordered by the number in their names.
fn chart_objects(
    objects: Vec<PageObject>,
    page: usize,
    warnings: &mut Vec<ExtractionWarning>,
) -> Vec<PageObject> {
    let mut ordered: Vec<(u64, PageObject)> = Vec::with_capacity(objects.len());
    for object in objects {
        if object.kind != ObjectKind::Form {
            tracing::debug!(page, name = %object.name, kind = ?object.kind, "skipping non-form object");
            continue;
        }
        match object.ordinal() {
            Some(n) => ordered.push((n, object)),
            None => {
                tracing::warn!(page, name = %object.name, "skipping object without numeric suffix");
                warnings.push(ExtractionWarning::UnorderedObject {
                    page,
                    name: object.name,
                });
            }
        }
    }
    ordered.sort_by_key(|(n, _)| *n);
    ordered.into_iter().map(|(_, o)| o).collect()
}

/// Group charts by region, keeping regions in first-seen order.
pub fn group_by_region(charts: Vec<(String, CalibratedSeries)>) -> Vec<RegionCharts> {
    let mut groups: Vec<RegionCharts> = Vec::new();
    for (region, series) in charts {
        match groups.iter_mut().find(|g| g.region == region) {
            Some(group) => group.series.push(series),
            None => groups.push(RegionCharts {
                region,
                series: vec![series],
            }),
        }
    }
    groups
}

/// One row per day from the epoch to `report_date`, with each series
/// joined on its date.
///
/// The first value seen for a (date, category) cell wins; points outside
/// the calendar are dropped.
pub fn merge_region(
    charts: &RegionCharts,
    country_iso: &str,
    report_date: NaiveDate,
    template: &ChartTemplate,
) -> Vec<MobilityRow> {
    let days = (report_date - template.epoch).num_days() + 1;
    let mut rows: Vec<MobilityRow> = template
        .epoch
        .iter_days()
        .take(days.max(0) as usize)
        .map(|date| MobilityRow {
            country_iso: country_iso.to_string(),
            date,
            region: charts.region.clone(),
            sub_region: None,
            values: CategoryValues::default(),
        })
        .collect();

    for series in &charts.series {
        for point in &series.points {
            let offset = (point.date - template.epoch).num_days();
            if let Some(row) = usize::try_from(offset).ok().and_then(|i| rows.get_mut(i)) {
                row.values.fill(series.category, point.value);
            }
        }
    }

    rows
}

/// Move the region of sub-national rows into `sub_region` and drop the
/// country-level rows, which the country-wide report already covers.
pub fn relabel_sub_regions(rows: Vec<MobilityRow>, declared_region: Option<&str>) -> Vec<MobilityRow> {
    let Some(declared) = declared_region else {
        return rows;
    };

    rows.into_iter()
        .map(|row| MobilityRow {
            sub_region: Some(row.region),
            region: declared.to_string(),
            ..row
        })
        .filter(|row| row.sub_region.as_deref() != Some(row.country_iso.as_str()))
        .collect()
}

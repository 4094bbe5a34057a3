//! Integration tests for the extract_document() end-to-end pipeline.
//!
//! Uses a MockReader that serves pre-built pages and content streams
//! without invoking mutool, so these tests run without MuPDF installed.

use chrono::NaiveDate;
use mobility_core::error::MobilityError;
use mobility_core::extraction::{DocumentReader, ObjectKind, PageObject, ReportDocument};
use mobility_core::model::{Category, ExtractionWarning, MobilityRow, ReportLink};
use mobility_core::template::{ChartTemplate, PairingMode};
use mobility_core::{extract_document, extract_documents};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Clone, Default)]
struct MockPage {
    lines: Vec<String>,
    /// (resource name, content stream)
    objects: Vec<(String, String)>,
}

#[derive(Clone)]
struct MockDocument {
    pages: Vec<MockPage>,
}

impl ReportDocument for MockDocument {
    fn page_count(&self) -> Result<usize, MobilityError> {
        Ok(self.pages.len())
    }

    fn page_text(&self, page: usize) -> Result<Vec<String>, MobilityError> {
        Ok(self.pages[page].lines.clone())
    }

    fn page_objects(&self, page: usize) -> Result<Vec<PageObject>, MobilityError> {
        Ok(self.pages[page]
            .objects
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                // Mock images are the objects named `Im*`.
                let kind = if name.starts_with("Im") {
                    ObjectKind::Image
                } else {
                    ObjectKind::Form
                };
                PageObject::with_kind(name.clone(), (page * 100 + i) as u32, kind)
            })
            .collect())
    }

    fn content_stream(&self, object: &PageObject) -> Result<String, MobilityError> {
        let page = object.xref as usize / 100;
        let index = object.xref as usize % 100;
        Ok(self.pages[page].objects[index].1.clone())
    }
}

#[derive(Default)]
struct MockReader {
    documents: HashMap<PathBuf, MockDocument>,
}

impl MockReader {
    fn with(mut self, path: &str, pages: Vec<MockPage>) -> Self {
        self.documents
            .insert(PathBuf::from(path), MockDocument { pages });
        self
    }
}

impl DocumentReader for MockReader {
    fn open(&self, path: &Path) -> Result<Box<dyn ReportDocument>, MobilityError> {
        match self.documents.get(path) {
            Some(doc) => Ok(Box::new(doc.clone())),
            None => Err(MobilityError::Reader {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            }),
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

const CATEGORIES: [&str; 6] = [
    "Retail & recreation",
    "Grocery & pharmacy",
    "Parks",
    "Transit stations",
    "Workplaces",
    "Residential",
];

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, m, d).unwrap()
}

/// A chart path as the report generator draws it: the x axis at `baseline`
/// over every day, then the data line back to the origin.
fn chart_stream(baseline: f64, dx: f64, values: &[f64]) -> String {
    let mut out = String::from("q\n1 0 0 -1 56 610 cm\n0.26 0.52 0.96 rg\n");
    for i in 0..values.len() {
        let op = if i == 0 { "m" } else { "l" };
        out.push_str(&format!("{} {} {}\n", i as f64 * dx, baseline, op));
    }
    for (i, v) in values.iter().enumerate().rev() {
        out.push_str(&format!("{} {} l\n", i as f64 * dx, baseline - v));
    }
    out.push_str(&format!("0 {} l\nS\nQ\n", baseline));
    out
}

/// A chart with baseline 40, so every pixel above it reads as 2%.
fn chart(values: &[f64]) -> String {
    chart_stream(40.0, 5.0, values)
}

fn summary_page(title: &str, first_object: usize) -> MockPage {
    let mut lines = vec![title.to_string(), "Mobility changes".to_string()];
    let mut objects = Vec::new();
    for (i, cat) in CATEGORIES.iter().enumerate() {
        lines.push(cat.to_string());
        lines.push("+0% compared to baseline".to_string());
        objects.push((format!("X{}", first_object + i), chart(&[1.0, 2.0, 3.0])));
    }
    MockPage { lines, objects }
}

/// Two regions of six charts each. Object names are listed in reverse to
/// check that charts are ordered by their number, not their listing.
fn detail_page(first: &str, second: &str, first_object: usize) -> MockPage {
    let mut lines = Vec::new();
    let mut objects = Vec::new();
    for (r, region) in [first, second].iter().enumerate() {
        lines.push(region.to_string());
        for (i, cat) in CATEGORIES.iter().enumerate() {
            lines.push(cat.to_string());
            lines.push("-10% compared to baseline".to_string());
            let n = first_object + r * 6 + i;
            let base = (r * 10 + i) as f64;
            objects.push((format!("X{n}"), chart(&[base + 1.0, base + 2.0])));
        }
    }
    objects.reverse();
    MockPage { lines, objects }
}

fn notes_page() -> MockPage {
    MockPage {
        lines: vec!["About this data".to_string(), "Parks".to_string()],
        objects: vec![("X99".to_string(), chart(&[9.0, 9.0]))],
    }
}

fn rows_for<'a>(rows: &'a [MobilityRow], region: &str) -> Vec<&'a MobilityRow> {
    rows.iter().filter(|r| r.region == region).collect()
}

// ---------------------------------------------------------------------------
// Degenerate single chart: baseline at y = 0
// ---------------------------------------------------------------------------
#[test]
fn single_chart_with_zero_baseline() {
    let reader = MockReader::default().with(
        "us.pdf",
        vec![
            MockPage {
                lines: vec!["United States".into(), "Retail & recreation".into()],
                objects: vec![(
                    "X1".into(),
                    "0 0 m\n10 0 l\n20 0 l\n20 -5 l\n10 -5 l\n0 0 l\n".into(),
                )],
            },
            notes_page(),
        ],
    );
    let report = ReportLink::local("us.pdf", "us", None, date(4, 11));

    let result = extract_document(&reader, &report, &ChartTemplate::default()).unwrap();

    assert_eq!(result.rows.len(), 49);
    assert_eq!(result.rows[0].date, date(2, 23));
    assert_eq!(result.rows[48].date, date(4, 11));
    assert!(result.rows.iter().all(|r| r.region == "us" && r.country_iso == "us"));
    assert!(result.rows.iter().all(|r| r.sub_region.is_none()));

    let retail: Vec<Option<f64>> = result
        .rows
        .iter()
        .map(|r| r.values.retail_and_recreation)
        .collect();
    assert_eq!(retail[0], Some(5.0));
    assert_eq!(retail[1], Some(5.0));
    assert!(retail[2..].iter().all(|v| v.is_none()));

    assert_eq!(
        result.warnings,
        vec![ExtractionWarning::DegenerateAxis {
            page: 0,
            region: "us".into(),
            category: Category::RetailAndRecreation,
        }]
    );
}

// ---------------------------------------------------------------------------
// Country report: summary pages plus a two-region detail page
// ---------------------------------------------------------------------------
#[test]
fn country_report_regions_and_values() {
    let reader = MockReader::default().with(
        "ro.pdf",
        vec![
            summary_page("Romania", 1),
            MockPage::default(),
            detail_page("Alba", "Arad", 20),
            notes_page(),
        ],
    );
    let report = ReportLink::local("ro.pdf", "RO", None, date(3, 1));

    let result = extract_document(&reader, &report, &ChartTemplate::default()).unwrap();

    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    assert_eq!(result.rows.len(), 3 * 8);

    let country = rows_for(&result.rows, "RO");
    assert_eq!(country.len(), 8);
    assert_eq!(country[0].values.parks, Some(2.0));
    assert_eq!(country[2].values.residential, Some(6.0));
    assert!(country[3].values.is_empty());

    let alba = rows_for(&result.rows, "Alba");
    assert_eq!(alba[0].values.retail_and_recreation, Some(2.0));
    assert_eq!(alba[1].values.retail_and_recreation, Some(4.0));
    assert_eq!(alba[0].values.residential, Some(12.0));

    let arad = rows_for(&result.rows, "Arad");
    assert_eq!(arad[0].values.retail_and_recreation, Some(22.0));
    assert_eq!(arad[1].values.workplaces, Some(32.0));
    assert!(arad[2].values.is_empty());
}

#[test]
fn image_objects_do_not_shift_pairing() {
    let mut page = detail_page("Alba", "Arad", 20);
    page.objects.push(("Im0".to_string(), "BI /W 1 /H 1 ID x EI".to_string()));
    let reader = MockReader::default().with(
        "ro.pdf",
        vec![summary_page("Romania", 1), MockPage::default(), page, notes_page()],
    );
    let report = ReportLink::local("ro.pdf", "RO", None, date(2, 24));

    let result = extract_document(&reader, &report, &ChartTemplate::default()).unwrap();

    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    let alba = rows_for(&result.rows, "Alba");
    assert_eq!(alba[0].values.retail_and_recreation, Some(2.0));
    assert_eq!(alba[1].values.residential, Some(14.0));
    let arad = rows_for(&result.rows, "Arad");
    assert_eq!(arad[0].values.retail_and_recreation, Some(22.0));
    assert_eq!(arad[1].values.residential, Some(34.0));
}

#[test]
fn notes_page_is_not_read() {
    let reader = MockReader::default().with("ro.pdf", vec![summary_page("Romania", 1), notes_page()]);
    let report = ReportLink::local("ro.pdf", "RO", None, date(2, 25));

    let result = extract_document(&reader, &report, &ChartTemplate::default()).unwrap();

    // The notes page mentions "Parks" next to a chart; it must not overwrite.
    assert_eq!(result.rows.len(), 3);
    assert_eq!(result.rows[0].values.parks, Some(2.0));
}

// ---------------------------------------------------------------------------
// Sub-national report: relabelling and country-row removal
// ---------------------------------------------------------------------------
#[test]
fn sub_national_report_is_relabelled() {
    let reader = MockReader::default().with(
        "us_texas.pdf",
        vec![
            summary_page("Texas", 1),
            MockPage::default(),
            detail_page("Travis County", "Harris County", 20),
            notes_page(),
        ],
    );
    let report = ReportLink::local("us_texas.pdf", "US", Some("Texas"), date(2, 29));

    let result = extract_document(&reader, &report, &ChartTemplate::default()).unwrap();

    assert_eq!(result.rows.len(), 2 * 7);
    assert!(result.rows.iter().all(|r| r.region == "Texas"));
    assert!(result
        .rows
        .iter()
        .all(|r| r.sub_region.as_deref() != Some("US")));
    let travis: Vec<&MobilityRow> = result
        .rows
        .iter()
        .filter(|r| r.sub_region.as_deref() == Some("Travis County"))
        .collect();
    assert_eq!(travis.len(), 7);
    assert_eq!(travis[0].values.parks, Some(6.0));
}

// ---------------------------------------------------------------------------
// Label / object pairing
// ---------------------------------------------------------------------------
fn mismatched_document() -> MockReader {
    MockReader::default().with(
        "fr.pdf",
        vec![
            MockPage {
                lines: vec![
                    "France".into(),
                    "Retail & recreation".into(),
                    "Parks".into(),
                ],
                objects: vec![("X4".into(), chart(&[1.0, 1.0]))],
            },
            notes_page(),
        ],
    )
}

#[test]
fn mismatch_is_truncated_with_warning() {
    let reader = mismatched_document();
    let report = ReportLink::local("fr.pdf", "FR", None, date(2, 24));

    let result = extract_document(&reader, &report, &ChartTemplate::default()).unwrap();

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0].values.retail_and_recreation, Some(2.0));
    assert!(result.rows.iter().all(|r| r.values.parks.is_none()));
    assert_eq!(
        result.warnings,
        vec![ExtractionWarning::LabelMismatch {
            page: 0,
            labels: 2,
            objects: 1
        }]
    );
}

#[test]
fn mismatch_fails_in_strict_mode() {
    let reader = mismatched_document();
    let report = ReportLink::local("fr.pdf", "FR", None, date(2, 24));
    let template = ChartTemplate {
        pairing: PairingMode::Strict,
        ..ChartTemplate::default()
    };

    let err = extract_document(&reader, &report, &template).unwrap_err();

    assert!(matches!(
        err,
        MobilityError::LabelMismatch {
            page: 0,
            labels: 2,
            objects: 1
        }
    ));
}

// ---------------------------------------------------------------------------
// Empty charts and failures
// ---------------------------------------------------------------------------
#[test]
fn empty_chart_yields_null_column() {
    let reader = MockReader::default().with(
        "be.pdf",
        vec![
            MockPage {
                lines: vec!["Belgium".into(), "Parks".into(), "Residential".into()],
                objects: vec![
                    ("X1".into(), "q\n0.9 0.9 0.9 rg\nQ\n".into()),
                    ("X2".into(), chart(&[4.0, 5.0])),
                ],
            },
            notes_page(),
        ],
    );
    let report = ReportLink::local("be.pdf", "BE", None, date(2, 26));

    let result = extract_document(&reader, &report, &ChartTemplate::default()).unwrap();

    assert_eq!(result.rows.len(), 4);
    assert!(result.rows.iter().all(|r| r.values.parks.is_none()));
    assert_eq!(result.rows[1].values.residential, Some(10.0));
    assert!(result.warnings.is_empty());
}

#[test]
fn missing_document_aborts() {
    let reader = MockReader::default();
    let report = ReportLink::local("missing.pdf", "DE", None, date(3, 1));
    let err = extract_document(&reader, &report, &ChartTemplate::default()).unwrap_err();
    assert!(matches!(err, MobilityError::Reader { .. }));
}

#[test]
fn documents_are_concatenated() {
    let reader = mismatched_document()
        .with("ro.pdf", vec![summary_page("Romania", 1), notes_page()]);
    let reports = vec![
        ReportLink::local("ro.pdf", "RO", None, date(2, 25)),
        ReportLink::local("fr.pdf", "FR", None, date(2, 24)),
    ];

    let dataset = extract_documents(&reader, &reports, &ChartTemplate::default()).unwrap();

    assert_eq!(dataset.rows.len(), 3 + 2);
    assert_eq!(dataset.rows[0].country_iso, "RO");
    assert_eq!(dataset.rows[4].country_iso, "FR");
    assert_eq!(dataset.warnings.len(), 1);
    assert_eq!(dataset.warnings[0].source, PathBuf::from("fr.pdf"));
}

#[test]
fn failing_document_aborts_the_batch() {
    let reader = MockReader::default().with("ro.pdf", vec![summary_page("Romania", 1), notes_page()]);
    let reports = vec![
        ReportLink::local("ro.pdf", "RO", None, date(2, 25)),
        ReportLink::local("gone.pdf", "FR", None, date(2, 24)),
    ];
    assert!(extract_documents(&reader, &reports, &ChartTemplate::default()).is_err());
}

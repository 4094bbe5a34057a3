use crate::model::Category;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day 0 of every chart's x axis.
pub const EPOCH: (i32, u32, u32) = (2020, 2, 23);

/// Percentage spanned by the chart axis between the baseline and the top.
pub const AXIS_MAX_PERCENT: f64 = 80.0;

/// How chart labels are paired with chart objects when their counts differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingMode {
    /// Pair up to the shorter side and record a warning.
    #[default]
    Truncate,
    /// Fail the document.
    Strict,
}

/// A literal page text that introduces a chart of `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    pub text: String,
    pub category: Category,
}

impl CategoryLabel {
    fn new(text: &str, category: Category) -> Self {
        CategoryLabel {
            text: text.to_string(),
            category,
        }
    }
}

/// Layout constants of the report generator's chart pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartTemplate {
    pub epoch: NaiveDate,
    pub axis_max_percent: f64,
    /// Leading pages that summarize the whole country.
    pub summary_pages: usize,
    /// Text-line indices holding region titles on detail pages.
    pub region_anchors: Vec<usize>,
    /// Trailing pages without charts.
    pub trailing_pages: usize,
    pub pairing: PairingMode,
    pub labels: Vec<CategoryLabel>,
}

impl Default for ChartTemplate {
    fn default() -> Self {
        let (y, m, d) = EPOCH;
        ChartTemplate {
            epoch: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            axis_max_percent: AXIS_MAX_PERCENT,
            summary_pages: 2,
            // 1 title line + 6 x (category, caption) lines puts the second
            // region's title at index 13.
            region_anchors: vec![0, 13],
            trailing_pages: 1,
            pairing: PairingMode::Truncate,
            labels: vec![
                CategoryLabel::new("Retail & recreation", Category::RetailAndRecreation),
                CategoryLabel::new("Grocery & pharmacy", Category::GroceryAndPharmacy),
                CategoryLabel::new("Parks", Category::Parks),
                CategoryLabel::new("Transit stations", Category::TransitStations),
                // Early reports say "Workplaces", later ones "Workplace".
                CategoryLabel::new("Workplace", Category::Workplaces),
                CategoryLabel::new("Workplaces", Category::Workplaces),
                CategoryLabel::new("Residential", Category::Residential),
            ],
        }
    }
}

impl ChartTemplate {
    /// Category introduced by a page line, matched on the exact text.
    pub fn category_for(&self, line: &str) -> Option<Category> {
        self.labels
            .iter()
            .find(|l| l.text == line)
            .map(|l| l.category)
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Semantic chart category. Each category becomes one output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RetailAndRecreation,
    GroceryAndPharmacy,
    Parks,
    TransitStations,
    Workplaces,
    Residential,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::RetailAndRecreation,
        Category::GroceryAndPharmacy,
        Category::Parks,
        Category::TransitStations,
        Category::Workplaces,
        Category::Residential,
    ];

    /// Column name used in table output and JSON.
    pub fn column(&self) -> &'static str {
        match self {
            Category::RetailAndRecreation => "retail_and_recreation",
            Category::GroceryAndPharmacy => "grocery_and_pharmacy",
            Category::Parks => "parks",
            Category::TransitStations => "transit_stations",
            Category::Workplaces => "workplaces",
            Category::Residential => "residential",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::RetailAndRecreation => write!(f, "Retail & recreation"),
            Category::GroceryAndPharmacy => write!(f, "Grocery & pharmacy"),
            Category::Parks => write!(f, "Parks"),
            Category::TransitStations => write!(f, "Transit stations"),
            Category::Workplaces => write!(f, "Workplaces"),
            Category::Residential => write!(f, "Residential"),
        }
    }
}

/// One report published on the index page.
///
/// `region` is `None` for country-wide reports and holds the declared
/// top-level area (e.g. a US state) for sub-national reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLink {
    pub date: NaiveDate,
    pub country_iso: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub url: String,
    pub path: PathBuf,
}

impl ReportLink {
    /// Describe a report that is already on disk.
    pub fn local(
        path: impl Into<PathBuf>,
        country_iso: &str,
        region: Option<&str>,
        date: NaiveDate,
    ) -> Self {
        ReportLink {
            date,
            country_iso: country_iso.to_string(),
            region: region.map(str::to_string),
            url: String::new(),
            path: path.into(),
        }
    }
}

/// Per-category values of one output row. `None` means no data point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryValues {
    pub retail_and_recreation: Option<f64>,
    pub grocery_and_pharmacy: Option<f64>,
    pub parks: Option<f64>,
    pub transit_stations: Option<f64>,
    pub workplaces: Option<f64>,
    pub residential: Option<f64>,
}

impl CategoryValues {
    pub fn get(&self, category: Category) -> Option<f64> {
        *self.slot(category)
    }

    /// Fill the slot for `category` unless it already holds a value.
    pub fn fill(&mut self, category: Category, value: f64) {
        let slot = self.slot_mut(category);
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c).is_none())
    }

    fn slot(&self, category: Category) -> &Option<f64> {
        match category {
            Category::RetailAndRecreation => &self.retail_and_recreation,
            Category::GroceryAndPharmacy => &self.grocery_and_pharmacy,
            Category::Parks => &self.parks,
            Category::TransitStations => &self.transit_stations,
            Category::Workplaces => &self.workplaces,
            Category::Residential => &self.residential,
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut Option<f64> {
        match category {
            Category::RetailAndRecreation => &mut self.retail_and_recreation,
            Category::GroceryAndPharmacy => &mut self.grocery_and_pharmacy,
            Category::Parks => &mut self.parks,
            Category::TransitStations => &mut self.transit_stations,
            Category::Workplaces => &mut self.workplaces,
            Category::Residential => &mut self.residential,
        }
    }
}

/// One (region, date) row of the extracted dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobilityRow {
    pub country_iso: String,
    pub date: NaiveDate,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_region: Option<String>,
    #[serde(flatten)]
    pub values: CategoryValues,
}

/// Non-fatal findings raised while extracting a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionWarning {
    /// Label and chart-object counts differ on a page; extras were dropped.
    LabelMismatch {
        page: usize,
        labels: usize,
        objects: usize,
    },
    /// The chart baseline sits at y = 0 so values could not be scaled.
    DegenerateAxis {
        page: usize,
        region: String,
        category: Category,
    },
    /// A page object whose name has no numeric suffix was skipped.
    UnorderedObject { page: usize, name: String },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::LabelMismatch {
                page,
                labels,
                objects,
            } => write!(
                f,
                "page {page}: {labels} label(s) paired with {objects} chart object(s), extras dropped"
            ),
            ExtractionWarning::DegenerateAxis {
                page,
                region,
                category,
            } => write!(
                f,
                "page {page}: '{category}' chart for '{region}' has a zero-height axis, values left unscaled"
            ),
            ExtractionWarning::UnorderedObject { page, name } => {
                write!(f, "page {page}: skipped object '{name}' without numeric suffix")
            }
        }
    }
}

/// Rows and warnings produced from a single report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentExtraction {
    pub rows: Vec<MobilityRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ExtractionWarning>,
}

/// A warning tagged with the report it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedWarning {
    pub source: PathBuf,
    pub warning: ExtractionWarning,
}

/// Concatenated rows of every extracted report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobilityDataset {
    pub rows: Vec<MobilityRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SourcedWarning>,
}

pub mod mutool;

use crate::error::MobilityError;
use std::path::Path;

/// `/Subtype` of an XObject. Charts are always drawn into forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Form,
    Image,
    Other,
}

impl ObjectKind {
    pub fn from_subtype(subtype: &str) -> Self {
        match subtype {
            "Form" => ObjectKind::Form,
            "Image" => ObjectKind::Image,
            _ => ObjectKind::Other,
        }
    }
}

/// A drawable object referenced from a page's resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageObject {
    /// Resource name, e.g. `X12`.
    pub name: String,
    /// Object number of the stream.
    pub xref: u32,
    pub kind: ObjectKind,
}

impl PageObject {
    /// A form object, the kind charts are drawn into.
    pub fn new(name: impl Into<String>, xref: u32) -> Self {
        Self::with_kind(name, xref, ObjectKind::Form)
    }

    pub fn with_kind(name: impl Into<String>, xref: u32, kind: ObjectKind) -> Self {
        PageObject {
            name: name.into(),
            xref,
            kind,
        }
    }

    /// Numeric suffix of the resource name. Charts are drawn into objects
    /// numbered in page order.
    pub fn ordinal(&self) -> Option<u64> {
        let digits = self.name.len()
            - self
                .name
                .trim_end_matches(|c: char| c.is_ascii_digit())
                .len();
        if digits == 0 {
            return None;
        }
        self.name[self.name.len() - digits..].parse().ok()
    }
}

/// An opened report.
pub trait ReportDocument {
    fn page_count(&self) -> Result<usize, MobilityError>;

    /// Text of a page (0-based), one entry per line.
    fn page_text(&self, page: usize) -> Result<Vec<String>, MobilityError>;

    /// Drawable objects of a page (0-based), in any order. Non-form
    /// objects may be included; callers filter on `kind`.
    fn page_objects(&self, page: usize) -> Result<Vec<PageObject>, MobilityError>;

    /// Decoded drawing operators of an object.
    fn content_stream(&self, object: &PageObject) -> Result<String, MobilityError>;
}

/// Trait for PDF reading backends.
pub trait DocumentReader: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn ReportDocument>, MobilityError>;

    /// Name of this reading backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

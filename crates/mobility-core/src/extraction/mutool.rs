use crate::error::MobilityError;
use crate::extraction::{DocumentReader, ObjectKind, PageObject, ReportDocument};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

static PAGE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^page\s+(\d+)\s*=\s*(\d+)\s+\d+\s+R").expect("valid page regex")
});

static XOBJECT_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([A-Za-z0-9_.\-]+)\s+(\d+)\s+\d+\s+R").expect("valid xobject regex")
});

static SUBTYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/Subtype\s*/([A-Za-z0-9]+)").expect("valid subtype regex"));

/// PDF reading backend using `mutool` (from MuPDF).
///
/// Page trees, resources and decoded streams come from `mutool show`, page
/// text from `mutool draw -F txt`.
pub struct MutoolReader;

impl MutoolReader {
    pub fn new() -> Self {
        MutoolReader
    }

    /// Check if mutool is available on the system.
    pub fn is_available() -> bool {
        Command::new("mutool")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for MutoolReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentReader for MutoolReader {
    fn open(&self, path: &Path) -> Result<Box<dyn ReportDocument>, MobilityError> {
        if !path.is_file() {
            return Err(MobilityError::Reader {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            });
        }
        let listing = run_mutool(&["show", "-g"], path, &["pages"])?;
        let pages = parse_page_list(&String::from_utf8_lossy(&listing));
        if pages.is_empty() {
            return Err(MobilityError::Reader {
                path: path.to_path_buf(),
                reason: "document has no pages".into(),
            });
        }
        tracing::debug!(path = %path.display(), pages = pages.len(), "opened report");
        Ok(Box::new(MutoolDocument {
            path: path.to_path_buf(),
            pages,
        }))
    }

    fn backend_name(&self) -> &str {
        "mutool"
    }
}

struct MutoolDocument {
    path: PathBuf,
    /// Object number of each page dictionary.
    pages: Vec<u32>,
}

impl MutoolDocument {
    fn page_ref(&self, page: usize) -> Result<u32, MobilityError> {
        self.pages
            .get(page)
            .copied()
            .ok_or_else(|| MobilityError::Reader {
                path: self.path.clone(),
                reason: format!("page {page} out of range ({} pages)", self.pages.len()),
            })
    }
}

impl ReportDocument for MutoolDocument {
    fn page_count(&self) -> Result<usize, MobilityError> {
        Ok(self.pages.len())
    }

    fn page_text(&self, page: usize) -> Result<Vec<String>, MobilityError> {
        self.page_ref(page)?;
        let page_arg = (page + 1).to_string();
        let out = run_mutool(&["draw", "-q", "-F", "txt", "-o", "-"], &self.path, &[&page_arg])?;
        Ok(split_page_text(&String::from_utf8_lossy(&out)))
    }

    fn page_objects(&self, page: usize) -> Result<Vec<PageObject>, MobilityError> {
        let page_ref = self.page_ref(page)?;
        let dict_path = format!("{page_ref}/Resources/XObject");
        let out = run_mutool(&["show", "-g"], &self.path, &[&dict_path])?;
        let mut objects = parse_xobject_dict(&String::from_utf8_lossy(&out));
        for object in &mut objects {
            let xref = object.xref.to_string();
            let dict = run_mutool(&["show", "-g"], &self.path, &[&xref])?;
            object.kind = parse_subtype(&String::from_utf8_lossy(&dict));
        }
        Ok(objects)
    }

    fn content_stream(&self, object: &PageObject) -> Result<String, MobilityError> {
        let xref = object.xref.to_string();
        let out = run_mutool(&["show", "-b"], &self.path, &[&xref])?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

fn run_mutool(args: &[&str], pdf_path: &Path, trailing: &[&str]) -> Result<Vec<u8>, MobilityError> {
    let output = Command::new("mutool")
        .args(args)
        .arg(pdf_path)
        .args(trailing)
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MobilityError::MutoolNotFound
            } else {
                MobilityError::Reader {
                    path: pdf_path.to_path_buf(),
                    reason: format!("mutool {} failed: {}", args.join(" "), e),
                }
            }
        })?;

    if !output.status.success() {
        return Err(MobilityError::MutoolFailed {
            command: args.join(" "),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}

/// Page object numbers from `mutool show <file> pages`, ordered by page.
fn parse_page_list(listing: &str) -> Vec<u32> {
    let mut pages: Vec<(u32, u32)> = PAGE_REF
        .captures_iter(listing)
        .filter_map(|c| Some((c[1].parse().ok()?, c[2].parse().ok()?)))
        .collect();
    pages.sort_by_key(|(number, _)| *number);
    pages.into_iter().map(|(_, obj)| obj).collect()
}

/// Named references of an `/XObject` resource dictionary. Their kind is
/// unknown until the referenced object is read.
fn parse_xobject_dict(dict: &str) -> Vec<PageObject> {
    XOBJECT_REF
        .captures_iter(dict)
        .filter_map(|c| {
            Some(PageObject::with_kind(
                &c[1],
                c[2].parse().ok()?,
                ObjectKind::Other,
            ))
        })
        .collect()
}

/// Kind of an object from its dictionary as printed by `mutool show`.
fn parse_subtype(dict: &str) -> ObjectKind {
    SUBTYPE
        .captures(dict)
        .map(|c| ObjectKind::from_subtype(&c[1]))
        .unwrap_or(ObjectKind::Other)
}

/// Text lines of a page, without the blank separator lines between blocks
/// and the trailing form feed.
fn split_page_text(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim_matches(|c: char| c == '\x0c' || c.is_whitespace()))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

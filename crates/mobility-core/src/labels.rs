//! Assigns a (category, region) label to every chart heading on a page.
//!
//! Summary pages describe the whole country. Detail pages hold up to two
//! regions, each introduced by a title line at a fixed text index.

use crate::model::Category;
use crate::template::ChartTemplate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabel {
    pub category: Category,
    pub region: String,
    /// Index of the category line in the page text.
    pub line_index: usize,
}

/// Region titles of a detail page keyed by their text-line index.
///
/// Titles are taken verbatim, like category lines; whitespace cleanup is
/// left to the document reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionAnchors(BTreeMap<usize, String>);

impl RegionAnchors {
    pub fn from_page(lines: &[String], anchors: &[usize]) -> Self {
        RegionAnchors(
            anchors
                .iter()
                .filter_map(|&i| lines.get(i).map(|title| (i, title.clone())))
                .collect(),
        )
    }

    /// Title of the closest anchor at or before `index`.
    pub fn region_at(&self, index: usize) -> Option<&str> {
        self.0
            .range(..=index)
            .next_back()
            .map(|(_, title)| title.as_str())
    }
}

/// Find the chart labels of one page, in page order.
pub fn locate_labels(
    lines: &[String],
    page_number: usize,
    country_iso: &str,
    template: &ChartTemplate,
) -> Vec<ChartLabel> {
    let anchors = if page_number < template.summary_pages {
        None
    } else {
        Some(RegionAnchors::from_page(lines, &template.region_anchors))
    };

    lines
        .iter()
        .enumerate()
        .filter_map(|(line_index, line)| {
            let category = template.category_for(line)?;
            let region = match &anchors {
                None => country_iso.to_string(),
                Some(anchors) => anchors.region_at(line_index)?.to_string(),
            };
            Some(ChartLabel {
                category,
                region,
                line_index,
            })
        })
        .collect()
}

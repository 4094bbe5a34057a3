//! Finds report links on the index page and keeps a local download cache.

use crate::error::MobilityError;
use crate::model::ReportLink;
use crate::settings::ConnectorConfig;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use std::path::Path;
use std::sync::LazyLock;

/// `<base>/<YYYY-MM-DD>_<CC>[_<Region_Slug>]_Mobility_Report_en.pdf`
static REPORT_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<base>.*/)(?P<date>\d{4}-\d{2}-\d{2})_(?P<country>[A-Za-z]{2})(?:_(?P<slug>[^/]+?))?_Mobility_Report_en\.pdf$",
    )
    .expect("valid report href regex")
});

const REPORT_EXTENSION: &str = ".pdf";

/// Decode a report URL into its link descriptor.
///
/// Returns `None` for URLs that do not follow the report naming template.
pub fn decode_report_href(href: &str, download_folder: &Path) -> Option<ReportLink> {
    let caps = REPORT_HREF.captures(href)?;
    let date = NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d").ok()?;
    let country = &caps["country"];

    let (region, file_name) = match caps.name("slug") {
        Some(slug) => (
            Some(slug.as_str().replace('_', " ")),
            format!("{}_{}_{}.pdf", &caps["date"], country, slug.as_str()),
        ),
        None => (None, format!("{}_{}.pdf", &caps["date"], country)),
    };

    Some(ReportLink {
        date,
        country_iso: country.to_string(),
        region,
        url: href.to_string(),
        path: download_folder.join(file_name),
    })
}

/// Report links of an index page, in document order.
pub fn find_report_links(html: &str, download_folder: &Path) -> Vec<ReportLink> {
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&anchor)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.ends_with(REPORT_EXTENSION))
        .filter_map(|href| {
            let link = decode_report_href(href, download_folder);
            if link.is_none() {
                tracing::warn!(href, "skipping PDF link that does not match the report template");
            }
            link
        })
        .collect()
}

fn http_client() -> Result<reqwest::blocking::Client, MobilityError> {
    Ok(reqwest::blocking::Client::builder()
        .user_agent(concat!("mobility/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

fn get_bytes(client: &reqwest::blocking::Client, url: &str) -> Result<Vec<u8>, MobilityError> {
    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(MobilityError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.bytes()?.to_vec())
}

/// Fetch the index page and list the reports it links to.
pub fn fetch_report_links(config: &ConnectorConfig) -> Result<Vec<ReportLink>, MobilityError> {
    tracing::info!(url = %config.index_url, "fetching report index");
    let client = http_client()?;
    let body = get_bytes(&client, &config.index_url)?;
    let links = find_report_links(&String::from_utf8_lossy(&body), &config.download_folder);
    tracing::info!(reports = links.len(), "found reports");
    Ok(links)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
}

/// Download every report to its destination path.
///
/// With `skip_downloaded`, an existing file is trusted as is.
pub fn download_reports(
    links: &[ReportLink],
    skip_downloaded: bool,
) -> Result<DownloadSummary, MobilityError> {
    let mut summary = DownloadSummary::default();
    let client = http_client()?;

    for link in links {
        if skip_downloaded && link.path.exists() {
            tracing::debug!(path = %link.path.display(), "already downloaded");
            summary.skipped += 1;
            continue;
        }

        if let Some(parent) = link.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = get_bytes(&client, &link.url)?;
        std::fs::write(&link.path, body)?;
        tracing::info!(url = %link.url, path = %link.path.display(), "downloaded report");
        summary.downloaded += 1;
    }

    Ok(summary)
}

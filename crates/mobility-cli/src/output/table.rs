use mobility_core::graph::ParsedStream;
use mobility_core::model::{Category, MobilityRow, ReportLink};

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

fn short_header(category: Category) -> &'static str {
    match category {
        Category::RetailAndRecreation => "retail",
        Category::GroceryAndPharmacy => "grocery",
        Category::Parks => "parks",
        Category::TransitStations => "transit",
        Category::Workplaces => "work",
        Category::Residential => "home",
    }
}

pub fn format_rows(rows: &[MobilityRow]) -> String {
    if rows.is_empty() {
        return "No rows extracted.".to_string();
    }

    let region_width = rows
        .iter()
        .map(|r| r.region.len())
        .max()
        .unwrap_or(6)
        .max("region".len());
    let sub_width = rows
        .iter()
        .filter_map(|r| r.sub_region.as_ref().map(String::len))
        .max();

    let mut out = String::new();
    out.push_str(&format!("{:<10}  {:<2}  {:<region_width$}", "date", "cc", "region"));
    if let Some(w) = sub_width {
        let w = w.max("sub_region".len());
        out.push_str(&format!("  {:<w$}", "sub_region"));
    }
    for category in Category::ALL {
        out.push_str(&format!("  {:>8}", short_header(category)));
    }
    out.push('\n');

    for row in rows {
        out.push_str(&format!(
            "{:<10}  {:<2}  {:<region_width$}",
            row.date.to_string(),
            row.country_iso,
            row.region
        ));
        if let Some(w) = sub_width {
            let w = w.max("sub_region".len());
            out.push_str(&format!("  {:<w$}", row.sub_region.as_deref().unwrap_or("")));
        }
        for category in Category::ALL {
            out.push_str(&format!("  {:>8}", cell(row.values.get(category))));
        }
        out.push('\n');
    }

    out.push_str(&format!("\n{} row(s)", rows.len()));
    out
}

pub fn format_links(links: &[ReportLink]) -> String {
    if links.is_empty() {
        return "No reports found.".to_string();
    }

    let mut out = String::new();
    for link in links {
        let region = link.region.as_deref().unwrap_or("");
        out.push_str(&format!(
            "{}  {:<2}  {:<24}  {}\n",
            link.date,
            link.country_iso,
            region,
            link.path.display()
        ));
    }
    out.push_str(&format!("\n{} report(s)", links.len()));
    out
}

pub fn format_stream(parsed: &ParsedStream) -> String {
    let mut out = String::new();
    out.push_str(&format!("day width:   {}\n", parsed.day_width));
    out.push_str(&format!("axis height: {}\n", parsed.axis_height));
    if let Some(t) = parsed.transform {
        let coeffs: Vec<String> = t.0.iter().map(|c| c.to_string()).collect();
        out.push_str(&format!("transform:   {}\n", coeffs.join(" ")));
    }
    if parsed.is_empty() {
        out.push_str("\nNo data points.");
        return out;
    }

    out.push('\n');
    for (i, p) in parsed.points.iter().enumerate() {
        out.push_str(&format!("{i:>4}  {:>10.3}  {:>10.3}\n", p.x, p.y));
    }
    out.push_str(&format!("\n{} point(s)", parsed.points.len()));
    out
}

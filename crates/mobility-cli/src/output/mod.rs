pub mod json;
pub mod table;

use mobility_core::error::MobilityError;
use mobility_core::model::MobilityDataset;
use std::path::PathBuf;

/// Print a dataset in the requested format, or save it as JSON.
pub fn emit_dataset(
    dataset: &MobilityDataset,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), MobilityError> {
    match output_file {
        Some(path) => {
            // Files always get JSON
            json::write(dataset, &path)?;
            eprintln!(
                "Extracted {} row(s), written to {}",
                dataset.rows.len(),
                path.display()
            );
        }
        None => match output_format {
            "json" => json::print(dataset)?,
            _ => println!("{}", table::format_rows(&dataset.rows)),
        },
    }

    for w in &dataset.warnings {
        eprintln!("  warning: {}: {}", w.source.display(), w.warning);
    }
    Ok(())
}

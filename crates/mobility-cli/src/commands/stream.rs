use mobility_core::error::MobilityError;
use mobility_core::graph::parse_stream;
use std::path::PathBuf;

use crate::output;

pub fn run(stream_file: PathBuf, output_format: &str) -> Result<(), MobilityError> {
    let text = std::fs::read_to_string(&stream_file)?;
    let parsed = parse_stream(&text);
    match output_format {
        "json" => output::json::print(&parsed)?,
        _ => println!("{}", output::table::format_stream(&parsed)),
    }
    Ok(())
}

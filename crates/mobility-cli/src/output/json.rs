use mobility_core::error::MobilityError;
use serde::Serialize;
use std::path::Path;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), MobilityError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn write<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), MobilityError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

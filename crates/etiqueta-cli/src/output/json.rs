use etiqueta_core::error::EtiquetaError;
use serde::Serialize;
use std::path::Path;

pub fn print<T: Serialize>(value: &T) -> Result<(), EtiquetaError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn write<T: Serialize>(path: &Path, value: &T) -> Result<(), EtiquetaError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

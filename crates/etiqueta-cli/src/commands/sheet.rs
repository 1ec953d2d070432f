use etiqueta_core::error::EtiquetaError;
use etiqueta_core::profiles::builtin;
use std::path::PathBuf;

use crate::output;

pub fn run(xlsx_file: PathBuf, preset: &str, output_format: &str) -> Result<(), EtiquetaError> {
    let profile = builtin::load_preset(preset)?;
    let bytes = std::fs::read(&xlsx_file)?;
    let table = etiqueta_core::prepare_workbook(&bytes, profile.kind)?;

    match output_format {
        "json" => output::json::print(&table)?,
        _ => {
            println!("{}", output::table::format_rows(&table.columns, &table.rows));
            eprintln!("{} canonical row(s)", table.rows.len());
        }
    }
    Ok(())
}

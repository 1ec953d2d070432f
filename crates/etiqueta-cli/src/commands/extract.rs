use etiqueta_core::error::EtiquetaError;
use etiqueta_core::extraction::lines::DEFAULT_LINE_TOLERANCE;
use etiqueta_core::extraction::pdftotext::PdftotextExtractor;
use std::path::PathBuf;

use crate::output;

pub fn run(
    pdf_files: Vec<PathBuf>,
    line_tolerance: Option<f32>,
    output_format: &str,
    output_file: Option<PathBuf>,
) -> Result<(), EtiquetaError> {
    let contents = read_all(&pdf_files)?;
    let pdfs: Vec<&[u8]> = contents.iter().map(Vec::as_slice).collect();

    let extractor = PdftotextExtractor::new();
    let tolerance = line_tolerance.unwrap_or(DEFAULT_LINE_TOLERANCE);
    let parsed = etiqueta_core::extract_records(&pdfs, &extractor, tolerance)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            output::json::write(&path, &parsed)?;
            eprintln!(
                "Extracted {} UPC record(s) from {} document(s), written to {}",
                parsed.records.len(),
                parsed.documents.len(),
                path.display()
            );
            if !parsed.skipped_lines.is_empty() {
                eprintln!(
                    "  {} line(s) skipped during parsing",
                    parsed.skipped_lines.len()
                );
            }
        }
        None => match output_format {
            "json" => output::json::print(&parsed)?,
            _ => println!("{}", output::table::format_parsed(&parsed, &pdf_files)),
        },
    }

    Ok(())
}

/// Read every file up front so a missing path fails before extraction starts.
pub fn read_all(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>, EtiquetaError> {
    paths
        .iter()
        .map(|p| std::fs::read(p).map_err(EtiquetaError::from))
        .collect()
}

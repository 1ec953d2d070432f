use etiqueta_core::error::EtiquetaError;
use etiqueta_core::extraction::pdftotext::PdftotextExtractor;
use etiqueta_core::model::Market;
use etiqueta_core::profiles::{builtin, load_profile};
use std::path::PathBuf;

use super::extract::read_all;
use crate::output;

pub struct BuildArgs {
    pub xlsx_file: PathBuf,
    pub pdf_files: Vec<PathBuf>,
    pub preset: Option<String>,
    pub profile_file: Option<PathBuf>,
    pub markets: Vec<Market>,
    pub output_format: String,
    pub output_file: Option<PathBuf>,
}

pub fn run(args: BuildArgs) -> Result<(), EtiquetaError> {
    let profile = match (&args.profile_file, &args.preset) {
        (Some(path), _) => load_profile(path)?,
        (None, Some(name)) => builtin::load_preset(name)?,
        (None, None) => builtin::load_preset("upc-sticker")?,
    };

    let xlsx = std::fs::read(&args.xlsx_file)?;
    let contents = read_all(&args.pdf_files)?;
    let pdfs: Vec<&[u8]> = contents.iter().map(Vec::as_slice).collect();

    let extractor = PdftotextExtractor::new();
    let outcome = etiqueta_core::build_report(&xlsx, &pdfs, &extractor, &profile, &args.markets)?;
    let report = &outcome.report;

    if !outcome.parsed.skipped_lines.is_empty() {
        eprintln!(
            "  {} PDF line(s) skipped during parsing (run `etiqueta extract` for details)",
            outcome.parsed.skipped_lines.len()
        );
    }

    match args.output_file {
        Some(path) => {
            output::json::write(&path, report)?;
            eprintln!(
                "{}: {} row(s), written to {}",
                report.kind,
                report.rows.len(),
                path.display()
            );
        }
        None => match args.output_format.as_str() {
            "json" => output::json::print(report)?,
            _ => println!("{}", output::table::format_rows(&report.columns, &report.rows)),
        },
    }

    Ok(())
}

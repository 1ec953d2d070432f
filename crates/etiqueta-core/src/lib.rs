pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod profiles;
pub mod reconcile;
pub mod sheet;
pub mod text;

use error::EtiquetaError;
use extraction::lines::assemble_lines;
use extraction::PdfExtractor;
use model::{Market, Report, Table};
use parsing::ParsedRecords;
use profiles::schema::ReportProfile;
use sheet::schema;

pub use model::ReportKind;

/// Extract UPC records from a batch of PDF documents.
///
/// Each document's pages are assembled into logical lines with
/// `line_tolerance`, then handed to the parser its layout calls for.
/// Records keep document order.
pub fn extract_records(
    pdfs: &[&[u8]],
    extractor: &dyn PdfExtractor,
    line_tolerance: f32,
) -> Result<ParsedRecords, EtiquetaError> {
    let mut documents = Vec::with_capacity(pdfs.len());
    for pdf in pdfs {
        let pages = extractor.extract_pages(pdf)?;
        documents.push(assemble_lines(&pages, line_tolerance));
    }
    Ok(parsing::parse_documents(&documents))
}

/// Read a planning workbook and normalize it to the canonical long-form rows
/// of the given report kind.
pub fn prepare_workbook(xlsx_bytes: &[u8], kind: ReportKind) -> Result<Table, EtiquetaError> {
    let workbook = extraction::xlsx::read_workbook(xlsx_bytes)?;
    sheet::prepare_sheet(&workbook, schema::for_kind(kind))
}

/// A built report together with the PDF diagnostics gathered on the way.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub report: Report,
    pub parsed: ParsedRecords,
}

/// Main API entry point: reconcile a planning workbook with UPC documents.
///
/// `extra_markets` are added to the profile's own market options.
pub fn build_report(
    xlsx_bytes: &[u8],
    pdfs: &[&[u8]],
    extractor: &dyn PdfExtractor,
    profile: &ReportProfile,
    extra_markets: &[Market],
) -> Result<BuildOutcome, EtiquetaError> {
    let parsed = extract_records(pdfs, extractor, profile.line_tolerance())?;
    // Fail before decoding the workbook.
    if parsed.records.is_empty() {
        return Err(EtiquetaError::NoPdfRecords);
    }

    let table = prepare_workbook(xlsx_bytes, profile.kind)?;
    let options = profile.options(extra_markets);
    let report = reconcile::build_report(profile.kind, &parsed.records, &table, &options)?;

    Ok(BuildOutcome { report, parsed })
}

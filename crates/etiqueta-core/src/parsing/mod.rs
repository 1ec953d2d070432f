pub mod barras;
pub mod detect;
pub mod matricial;

use serde::Serialize;
use tracing::info;

use crate::model::UpcRecord;
pub use detect::{detect_format, PdfFormat};

/// A line a layout parser looked at and rejected, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    /// Zero-based position of the document in its batch.
    pub document: usize,
    pub line_text: String,
    pub reason: String,
}

/// Records and rejected lines produced by one layout parser over one document.
#[derive(Debug, Clone, Default)]
pub struct LayoutParse {
    pub records: Vec<UpcRecord>,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub index: usize,
    pub format: PdfFormat,
    pub lines: usize,
    pub records: usize,
}

/// UPC records for a batch of documents, in document order, plus diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedRecords {
    pub records: Vec<UpcRecord>,
    pub documents: Vec<DocumentSummary>,
    pub skipped_lines: Vec<SkippedLine>,
}

/// Parse one document's assembled lines with the parser its layout calls for.
///
/// Documents without a recognizable marker are tried as multi-line first,
/// then as pipe-delimited if that yields nothing.
pub fn parse_document<S: AsRef<str>>(lines: &[S]) -> (PdfFormat, LayoutParse) {
    let format = detect_format(lines);
    let parsed = match format {
        PdfFormat::Barras => barras::parse(lines),
        PdfFormat::Matricial => matricial::parse(lines),
        PdfFormat::Unknown => {
            let parsed = matricial::parse(lines);
            if parsed.records.is_empty() {
                barras::parse(lines)
            } else {
                parsed
            }
        }
    };
    (format, parsed)
}

/// Parse a batch of documents, concatenating records in document order.
pub fn parse_documents<S: AsRef<str>>(documents: &[Vec<S>]) -> ParsedRecords {
    let mut out = ParsedRecords::default();

    for (index, lines) in documents.iter().enumerate() {
        let (format, parsed) = parse_document(lines);
        info!(
            document = index,
            %format,
            lines = lines.len(),
            records = parsed.records.len(),
            skipped = parsed.skipped.len(),
            "parsed document"
        );

        out.documents.push(DocumentSummary {
            index,
            format,
            lines: lines.len(),
            records: parsed.records.len(),
        });
        out.records.extend(parsed.records);
        out.skipped_lines
            .extend(parsed.skipped.into_iter().map(|s| SkippedLine {
                document: index,
                ..s
            }));
    }

    out
}

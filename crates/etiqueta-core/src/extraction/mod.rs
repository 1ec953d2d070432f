pub mod lines;
pub mod pdftotext;
pub mod xlsx;

use crate::error::EtiquetaError;

/// An atomic positioned text fragment from a PDF page.
///
/// `y` grows upward, as in PDF user space, so larger `y` is higher on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub page: usize,
}

/// Text fragments extracted from a single page of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PageItems {
    pub page_number: usize,
    pub items: Vec<TextItem>,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract positioned text from PDF bytes, returning one PageItems per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageItems>, EtiquetaError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

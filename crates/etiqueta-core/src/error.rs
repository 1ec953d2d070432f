use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EtiquetaError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("no data: {0}")]
    EmptyData(String),

    #[error("missing required columns in sheet: {}", missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("no sheet rows with DESTINO = {destination}")]
    NoDestinationRows { destination: String },

    #[error("no UPC records could be extracted from the PDF documents")]
    NoPdfRecords,

    #[error("no overlap between PDF records and sheet rows. Check that STYLE, color and SIZE match")]
    NoOverlap,

    #[error("failed to load profile from {}: {reason}", path.display())]
    ProfileLoad { path: PathBuf, reason: String },

    #[error("invalid profile: {0}")]
    ProfileInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

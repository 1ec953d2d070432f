use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static PIPE_SPACING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\|\s*").unwrap());

/// Known UPC document layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfFormat {
    /// One pipe-delimited row per barcode.
    Barras,
    /// Style headers with size tokens, then color rows with UPC groups.
    Matricial,
    Unknown,
}

impl fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfFormat::Barras => write!(f, "barras"),
            PdfFormat::Matricial => write!(f, "matricial"),
            PdfFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// Remove whitespace around every `|`.
pub fn normalize_pipes(s: &str) -> String {
    PIPE_SPACING.replace_all(s, "|").into_owned()
}

/// Classify a document by marker strings. `Division|` is checked first.
pub fn detect_format<S: AsRef<str>>(lines: &[S]) -> PdfFormat {
    let joined = lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    let text = normalize_pipes(&joined);

    if text.contains("Division|") {
        PdfFormat::Barras
    } else if text.contains("UPC REPORT") {
        PdfFormat::Matricial
    } else {
        PdfFormat::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pipes() {
        assert_eq!(normalize_pipes("Division | Style |UPC"), "Division|Style|UPC");
    }

    #[test]
    fn test_detect_barras_with_spaced_pipes() {
        let lines = ["Report", "Division  |  Style | UPC | Color"];
        assert_eq!(detect_format(&lines), PdfFormat::Barras);
    }

    #[test]
    fn test_detect_matricial() {
        let lines = ["SKECHERS", "UPC REPORT BY STYLE", "TP214 *S* *M*"];
        assert_eq!(detect_format(&lines), PdfFormat::Matricial);
    }

    #[test]
    fn test_barras_marker_wins() {
        let lines = ["UPC REPORT", "Division|01"];
        assert_eq!(detect_format(&lines), PdfFormat::Barras);
    }

    #[test]
    fn test_detect_unknown() {
        let lines: [&str; 2] = ["hello", "division|lowercase"];
        assert_eq!(detect_format(&lines), PdfFormat::Unknown);
        let empty: [&str; 0] = [];
        assert_eq!(detect_format(&empty), PdfFormat::Unknown);
    }
}

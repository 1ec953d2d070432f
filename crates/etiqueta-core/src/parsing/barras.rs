//! Pipe-delimited layout: one barcode per row.
//!
//! ```text
//! Division|Style|UPC|Description|Color|Color Desc|Width|Size
//! 01|TP214|195204123456|TEE|C01|BLUE|M|XL
//! ```

use tracing::debug;

use super::detect::normalize_pipes;
use super::{LayoutParse, SkippedLine};
use crate::model::UpcRecord;
use crate::text::normalize_text;

const MIN_FIELDS: usize = 8;
const STYLE_FIELD: usize = 1;
const UPC_FIELD: usize = 2;
const COLOR_CODE_FIELD: usize = 4;
const COLOR_NAME_FIELD: usize = 5;
const SIZE_FIELD: usize = 7;

/// UPC-A is 12 digits, EAN-13 is 13, GTIN-14 is 14; 11 covers a dropped check digit.
pub const UPC_DIGITS: std::ops::RangeInclusive<usize> = 11..=14;

/// Parse every line of a pipe-delimited document.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> LayoutParse {
    let mut out = LayoutParse::default();

    for raw in lines {
        let line = normalize_pipes(raw.as_ref());

        if is_header(&line) || !line.contains('|') {
            continue;
        }

        match parse_row(&line) {
            Ok(record) => out.records.push(record),
            Err(reason) => {
                debug!(line = %line, %reason, "skipped tabular line");
                out.skipped.push(SkippedLine {
                    document: 0,
                    line_text: line,
                    reason,
                });
            }
        }
    }

    out
}

fn is_header(line: &str) -> bool {
    line.contains("Division|") && line.contains("Style|") && line.contains("UPC|")
}

fn parse_row(line: &str) -> Result<UpcRecord, String> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() < MIN_FIELDS {
        return Err(format!(
            "expected at least {MIN_FIELDS} fields, found {}",
            fields.len()
        ));
    }

    let upc: String = fields[UPC_FIELD]
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    if upc.is_empty() {
        return Err(format!("UPC field '{}' has no digits", fields[UPC_FIELD]));
    }
    if !UPC_DIGITS.contains(&upc.len()) {
        return Err(format!("UPC '{upc}' has {} digits", upc.len()));
    }

    Ok(UpcRecord::new(
        normalize_text(fields[STYLE_FIELD]),
        normalize_text(fields[COLOR_CODE_FIELD]),
        normalize_text(fields[COLOR_NAME_FIELD]),
        normalize_text(fields[SIZE_FIELD]),
        upc,
    ))
}

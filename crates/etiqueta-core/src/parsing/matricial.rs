//! Multi-line layout: a style header listing sizes, followed by color rows
//! whose UPCs are listed in the same order as the sizes.
//!
//! ```text
//! TP214 TEE SHIRT  *S* *M* *L*
//! *XL*
//! C01 BLUE 195204000011 195204000012 195204000013
//! 195204000014
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{LayoutParse, SkippedLine};
use crate::model::UpcRecord;

static STYLE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]{2}\d+[A-Z]?)\b").unwrap());

static SIZE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*+\s*([A-Z0-9/]+)\s*\*+").unwrap());

static COLOR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z0-9]{3,5})\s+([A-Z0-9/ .\-]+?)(?:\s+((?:\d{11,14}\s+)*\d{11,14}))?\s*$")
        .unwrap()
});

static UPCS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{11,14}\s+)*\d{11,14}$").unwrap());

fn size_tokens(line: &str) -> Vec<String> {
    SIZE_TOKEN
        .captures_iter(line)
        .map(|c| c[1].to_string())
        .collect()
}

fn line_at<S: AsRef<str>>(lines: &[S], idx: usize) -> &str {
    lines[idx].as_ref().trim()
}

fn is_boundary(line: &str) -> bool {
    STYLE_LINE.is_match(line) || COLOR_LINE.is_match(line)
}

/// Walk the lines once, emitting records for every color row under a style.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> LayoutParse {
    let mut out = LayoutParse::default();

    let mut style: Option<String> = None;
    let mut sizes: Vec<String> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = line_at(lines, i);
        i += 1;

        if line.is_empty() || line.starts_with('-') || line.starts_with('*') {
            continue;
        }

        if let Some(caps) = STYLE_LINE.captures(line) {
            style = Some(caps[1].to_uppercase());
            sizes = size_tokens(line);

            // Size headers may wrap onto following lines.
            while i < lines.len() {
                let next = line_at(lines, i);
                if next.is_empty() || is_boundary(next) {
                    break;
                }
                let extra = size_tokens(next);
                if extra.is_empty() {
                    break;
                }
                sizes.extend(extra);
                i += 1;
            }
            continue;
        }

        let Some(caps) = COLOR_LINE.captures(line) else {
            continue;
        };
        let Some(style) = style.as_deref() else {
            continue;
        };
        if sizes.is_empty() {
            continue;
        }

        let color_code = caps[1].to_uppercase();
        let color_name = caps[2].trim().to_uppercase();
        let mut upcs: Vec<String> = caps
            .get(3)
            .map(|m| m.as_str().split_whitespace().map(String::from).collect())
            .unwrap_or_default();

        while i < lines.len() && UPCS_ONLY.is_match(line_at(lines, i)) {
            upcs.extend(line_at(lines, i).split_whitespace().map(String::from));
            i += 1;
        }

        if !upcs.is_empty() && upcs.len() != sizes.len() {
            let paired = sizes.len().min(upcs.len());
            debug!(
                style,
                color = %color_code,
                sizes = sizes.len(),
                upcs = upcs.len(),
                "size/UPC count mismatch"
            );
            out.skipped.push(SkippedLine {
                document: 0,
                line_text: line.to_string(),
                reason: format!(
                    "{} sizes but {} UPCs; paired the first {paired}",
                    sizes.len(),
                    upcs.len()
                ),
            });
        }

        for (size, upc) in sizes.iter().zip(upcs) {
            out.records.push(UpcRecord::new(
                style,
                color_code.as_str(),
                color_name.as_str(),
                size.to_uppercase(),
                upc,
            ));
        }
    }

    out
}

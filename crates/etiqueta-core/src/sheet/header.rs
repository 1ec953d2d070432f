use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::EtiquetaError;
use crate::model::{Sheet, Workbook};
use crate::text::normalize_token;

/// What to do when no row on any sheet looks like a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFallback {
    /// Use this row index of the first sheet.
    FixedRow(usize),
    /// Pick the most text-like row among the first `rows` of the first sheet.
    TextDensity { rows: usize },
}

/// Recognized header vocabulary and how far down to look for it.
#[derive(Debug, Clone, Copy)]
pub struct HeaderProbe {
    /// Normalized tokens (see [`normalize_token`]) that count as header hits.
    pub terms: &'static [&'static str],
    pub scan_rows: usize,
    pub fallback: HeaderFallback,
}

/// How the header row was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStrategy {
    Terms { hits: usize },
    Fallback,
}

#[derive(Debug, Clone)]
pub struct HeaderLocation<'a> {
    pub sheet: &'a Sheet,
    pub header_row: usize,
    pub strategy: HeaderStrategy,
}

const ANCHOR_TERMS: [&str; 2] = ["STYLE", "ESTILOS"];

/// Find the header row across every sheet of a workbook.
///
/// A row is a candidate only when it carries a `STYLE` or `ESTILOS` cell.
/// Candidates are scored by the number of cells matching `probe.terms` and the
/// first strictly best one wins, scanning sheets in workbook order.
pub fn locate_header<'a>(
    workbook: &'a Workbook,
    probe: &HeaderProbe,
) -> Result<HeaderLocation<'a>, EtiquetaError> {
    let first = workbook
        .sheets
        .first()
        .ok_or_else(|| EtiquetaError::EmptyData("workbook has no sheets".into()))?;

    let terms: HashSet<&str> = probe.terms.iter().copied().collect();
    let mut best: Option<(&Sheet, usize, usize)> = None;

    for sheet in &workbook.sheets {
        for (idx, row) in sheet.rows.iter().take(probe.scan_rows).enumerate() {
            let cells: Vec<String> = row.iter().map(|c| normalize_token(c)).collect();
            if !cells.iter().any(|c| ANCHOR_TERMS.contains(&c.as_str())) {
                continue;
            }
            let hits = cells.iter().filter(|c| terms.contains(c.as_str())).count();
            if best.map_or(true, |(_, _, best_hits)| hits > best_hits) {
                best = Some((sheet, idx, hits));
            }
        }
    }

    if let Some((sheet, header_row, hits)) = best {
        debug!(sheet = %sheet.name, header_row, hits, "located header row");
        return Ok(HeaderLocation {
            sheet,
            header_row,
            strategy: HeaderStrategy::Terms { hits },
        });
    }

    let header_row = match probe.fallback {
        HeaderFallback::FixedRow(row) => row,
        HeaderFallback::TextDensity { rows } => densest_text_row(first, rows),
    };
    warn!(
        sheet = %first.name,
        header_row,
        "no STYLE/ESTILOS header found; falling back"
    );
    Ok(HeaderLocation {
        sheet: first,
        header_row,
        strategy: HeaderStrategy::Fallback,
    })
}

/// Row with the most cells that look like labels, 0 when nothing scores.
fn densest_text_row(sheet: &Sheet, rows: usize) -> usize {
    let mut best_row = 0;
    let mut best_score = 0;
    for (idx, row) in sheet.rows.iter().take(rows).enumerate() {
        let score = row.iter().filter(|c| is_label_like(c)).count();
        if score > best_score {
            best_score = score;
            best_row = idx;
        }
    }
    best_row
}

/// Longer than two characters and not a number such as "1.200,50".
fn is_label_like(cell: &str) -> bool {
    let s = cell.trim();
    if s.chars().count() <= 2 {
        return false;
    }
    let digits: String = s.chars().filter(|c| *c != '.' && *c != ',').collect();
    digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit())
}

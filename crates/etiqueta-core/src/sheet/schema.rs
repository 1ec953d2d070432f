use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::debug;

use super::header::{HeaderFallback, HeaderProbe};
use super::{forward_fill, strip_dup_suffix};
use crate::error::EtiquetaError;
use crate::model::{cell, col, ReportKind, Row, Table};
use crate::text::collate::{sort_rows, SortKey};
use crate::text::sizes::is_size_label;
use crate::text::{has_qty, norm_size, normalize_text, normalize_token};

/// Static description of one planning-sheet layout.
#[derive(Debug)]
pub struct SheetSchema {
    pub kind: ReportKind,
    pub header: HeaderProbe,
    /// Canonical columns that must exist after renaming.
    pub required: &'static [&'static str],
    /// Columns filled downward within a style group.
    pub fill_columns: &'static [&'static str],
    /// Carried into long rows after the identity columns, when present.
    pub extra_columns: &'static [&'static str],
}

pub static UPC_STICKER: SheetSchema = SheetSchema {
    kind: ReportKind::UpcSticker,
    header: HeaderProbe {
        terms: &[
            "STYLE",
            "ESTILOS",
            "OP",
            "RSV",
            "PROTO",
            "DESTINO",
            "PO",
            "PO NO",
            "PO#",
            "DESCRIPCION COLOR",
            "DESCRIPCION DE COLOR",
            "COLOR",
            "CARTA",
            "CODE",
            "COLR CODE",
            "COLOR CODE",
            "LN",
        ],
        scan_rows: 40,
        fallback: HeaderFallback::FixedRow(1),
    },
    required: &[
        col::STYLE_NAME,
        col::PRODUCTION_ORDER,
        col::PROTO,
        col::DESTINATION,
        col::PURCHASE_ORDER,
        col::COLOR_NAME_SHEET,
    ],
    fill_columns: &[],
    extra_columns: &[col::LINE_NUMBER],
};

pub static CASE_CONTENT: SheetSchema = SheetSchema {
    kind: ReportKind::CaseContent,
    header: HeaderProbe {
        terms: &[
            "STYLE",
            "ESTILOS",
            "OP",
            "PROTO",
            "DESTINO",
            "PO",
            "PO NO",
            "PO#",
            "DESCRIPCION COLOR",
            "COLOR",
            "CARTA",
            "CODE",
            "COLR CODE",
            "COLOR CODE",
        ],
        scan_rows: 30,
        fallback: HeaderFallback::TextDensity { rows: 5 },
    },
    required: &[
        col::STYLE_NAME,
        col::DESTINATION,
        col::PURCHASE_ORDER,
        col::COLOR_NAME_SHEET,
        col::COLOR,
    ],
    fill_columns: &[col::CASE_QTY, col::WIP_LINE_NUMBER, col::LEGACY_QTY],
    extra_columns: &[
        col::MARKING_SHEET,
        col::ORDER_UNITS,
        col::WIP_LINE_NUMBER,
        col::CASE_QTY,
        col::LEGACY_QTY,
    ],
};

pub fn for_kind(kind: ReportKind) -> &'static SheetSchema {
    match kind {
        ReportKind::UpcSticker => &UPC_STICKER,
        ReportKind::CaseContent => &CASE_CONTENT,
    }
}

/// Identity columns every canonical row carries, in output order.
const ID_COLUMNS: [&str; 7] = [
    col::STYLE_NAME,
    col::PRODUCTION_ORDER,
    col::PROTO,
    col::DESTINATION,
    col::PURCHASE_ORDER,
    col::COLOR_NAME_SHEET,
    col::COLOR,
];

/// Columns upper-cased and trimmed before joining.
const TEXT_COLUMNS: [&str; 4] = [
    col::STYLE_NAME,
    col::DESTINATION,
    col::COLOR_NAME_SHEET,
    col::COLOR,
];

/// Candidate group columns for forward fill, first present wins.
const GROUP_COLUMNS: [&str; 3] = [col::STYLE_NAME, "STYLE", "ESTILOS"];

/// Marking-sheet values sampled when deciding whether they hold line numbers.
const MARKING_SAMPLE: usize = 20;
const MARKING_DIGIT_RATIO: f64 = 0.4;

/// Normalized header token -> canonical column (case-content sheets).
static CASE_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("STYLE", col::STYLE_NAME),
        ("ESTILOS", col::STYLE_NAME),
        ("NOMBRE ESTILO", col::STYLE_NAME),
        ("OP", col::PRODUCTION_ORDER),
        ("PEDIDO PRODUCCION COFACO", col::PRODUCTION_ORDER),
        ("PROTO", col::PROTO),
        ("PROTO COFACO", col::PROTO),
        ("DESTINO", col::DESTINATION),
        ("PO#", col::PURCHASE_ORDER),
        ("PO", col::PURCHASE_ORDER),
        ("PO NO", col::PURCHASE_ORDER),
        ("DESCRIPCION COLOR", col::COLOR_NAME_SHEET),
        ("NOMBRE COLOR", col::COLOR_NAME_SHEET),
        ("COLOR", col::COLOR),
        ("CARTA", col::CARTA),
        ("COLR CODE", col::COLOR_CODE_SHEET),
        ("COLOR CODE", col::COLOR_CODE_SHEET),
        ("COLUMNA1", col::MARKING_SHEET),
        ("HOJA DE MARCACION", col::MARKING_SHEET),
        ("HOJA MARCACION", col::MARKING_SHEET),
        ("TOTAL", col::ORDER_UNITS),
        ("UNITS TALLA PEDIDO", col::ORDER_UNITS),
        ("SKX PO#", col::SKX_PO),
        ("SKX PO", col::SKX_PO),
        ("WIP LINE NUMBER", col::WIP_LINE_NUMBER),
        ("LN", col::WIP_LINE_NUMBER),
        ("CASE QTY", col::CASE_QTY),
        ("CASEQTY", col::CASE_QTY),
    ])
});

impl SheetSchema {
    /// Rename, fill, validate and reshape raw row objects to canonical long rows.
    pub fn normalize(&self, raw: Table) -> Result<Table, EtiquetaError> {
        if raw.rows.is_empty() {
            return Err(EtiquetaError::EmptyData("sheet has no data rows".into()));
        }
        match self.kind {
            ReportKind::UpcSticker => self.normalize_upc_sticker(raw),
            ReportKind::CaseContent => self.normalize_case_content(raw),
        }
    }

    fn check_required(&self, table: &Table) -> Result<(), EtiquetaError> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|c| !table.has_column(c))
            .map(|c| c.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(EtiquetaError::MissingColumns {
                missing,
                available: table.columns.clone(),
            })
        }
    }

    fn normalize_case_content(&self, raw: Table) -> Result<Table, EtiquetaError> {
        let mut table = rename_by_alias(raw);

        let group = GROUP_COLUMNS
            .iter()
            .copied()
            .find(|c| table.has_column(c));
        for column in self.fill_columns {
            if table.has_column(column) {
                forward_fill(&mut table.rows, column, group);
            }
        }

        for row in &mut table.rows {
            derive_color_fields(row);
        }
        infer_line_numbers(&mut table);
        pad_columns(&mut table);

        self.check_required(&table)?;
        table.ensure_column(col::PRODUCTION_ORDER, "");
        table.ensure_column(col::PROTO, "");
        normalize_text_columns(&mut table);

        Ok(self.to_long_form(&table, true))
    }

    fn normalize_upc_sticker(&self, raw: Table) -> Result<Table, EtiquetaError> {
        let mut table = rename_by_pick(raw);

        self.check_required(&table)?;
        table.ensure_column(col::COLOR, "");
        normalize_text_columns(&mut table);

        let mut long = self.to_long_form(&table, false);
        if long.rows.iter().any(|r| !cell(r, col::SIZE).is_empty()) {
            sort_rows(
                &mut long.rows,
                &[
                    SortKey::Text(col::STYLE_NAME),
                    SortKey::Text(col::DESTINATION),
                    SortKey::Text(col::COLOR_NAME_SHEET),
                    SortKey::Size(col::SIZE),
                ],
            );
        }
        Ok(long)
    }

    /// One row per (row, size column) with a present quantity.
    ///
    /// Without size columns every row is kept with an empty `SIZE`.
    fn to_long_form(&self, table: &Table, with_qty: bool) -> Table {
        let mut keep: Vec<&str> = ID_COLUMNS.to_vec();
        keep.extend(
            self.extra_columns
                .iter()
                .copied()
                .filter(|c| table.has_column(c)),
        );

        let size_columns: Vec<&str> = table
            .columns
            .iter()
            .map(String::as_str)
            .filter(|c| is_size_label(c))
            .collect();
        debug!(?size_columns, "detected size columns");

        let mut columns: Vec<String> = keep.iter().map(|c| c.to_string()).collect();
        columns.push(col::SIZE.to_string());
        if with_qty {
            columns.push(col::QTY.to_string());
        }

        let base = |row: &Row| -> Row {
            keep.iter()
                .map(|c| (c.to_string(), cell(row, c).to_string()))
                .collect()
        };

        let mut rows = Vec::new();
        for row in &table.rows {
            if size_columns.is_empty() {
                let mut out = base(row);
                out.insert(col::SIZE.to_string(), String::new());
                if with_qty {
                    out.insert(col::QTY.to_string(), String::new());
                }
                rows.push(out);
                continue;
            }
            for size_col in &size_columns {
                let qty = cell(row, size_col);
                if !has_qty(qty) {
                    continue;
                }
                let mut out = base(row);
                out.insert(col::SIZE.to_string(), norm_size(size_col));
                if with_qty {
                    out.insert(col::QTY.to_string(), qty.to_string());
                }
                rows.push(out);
            }
        }

        Table { columns, rows }
    }
}

/// Rename every column through [`CASE_ALIASES`]; the first non-blank value
/// wins when several raw columns land on one canonical name.
fn rename_by_alias(raw: Table) -> Table {
    let mapping: Vec<(String, String)> = raw
        .columns
        .iter()
        .map(|c| {
            let cleaned = strip_dup_suffix(c);
            let canonical = CASE_ALIASES
                .get(normalize_token(cleaned).as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| cleaned.trim().to_string());
            (c.clone(), canonical)
        })
        .collect();

    let mut columns: Vec<String> = Vec::new();
    for (_, canonical) in &mapping {
        if !columns.contains(canonical) {
            columns.push(canonical.clone());
        }
    }

    let rows = raw
        .rows
        .iter()
        .map(|row| {
            let mut out = Row::new();
            for (original, canonical) in &mapping {
                let taken = out.get(canonical).is_some_and(|v| !v.trim().is_empty());
                if !taken {
                    out.insert(canonical.clone(), cell(row, original).to_string());
                }
            }
            out
        })
        .collect();

    Table { columns, rows }
}

/// Pick one raw column per canonical role (UPC-sticker sheets).
///
/// The color *code* lands in `COLOR`: an explicit code column if there is
/// one, otherwise a `COLOR` column not already used for the color name.
fn rename_by_pick(raw: Table) -> Table {
    // Normalized label -> raw column; a later duplicate replaces an earlier one.
    let mut by_token: HashMap<String, String> = HashMap::new();
    for c in &raw.columns {
        by_token.insert(normalize_token(strip_dup_suffix(c)), c.clone());
    }
    let pick = |candidates: &[&str]| -> Option<String> {
        candidates.iter().find_map(|t| by_token.get(*t).cloned())
    };

    let mut renames: HashMap<String, &'static str> = HashMap::new();
    if let Some(c) = pick(&["ESTILOS", "STYLE"]) {
        renames.insert(c, col::STYLE_NAME);
    }
    if let Some(c) = pick(&["OP"]).or_else(|| pick(&["RSV"])) {
        renames.insert(c, col::PRODUCTION_ORDER);
    }
    if let Some(c) = pick(&["PROTO"]) {
        renames.insert(c, col::PROTO);
    }
    if let Some(c) = pick(&["DESTINO"]) {
        renames.insert(c, col::DESTINATION);
    }
    if let Some(c) = pick(&["PO", "PO NO", "PO#"]) {
        renames.insert(c, col::PURCHASE_ORDER);
    }
    if let Some(c) = pick(&["LN"]) {
        renames.insert(c, col::LINE_NUMBER);
    }

    let name_col = pick(&["DESCRIPCION COLOR", "DESCRIPCION DE COLOR"])
        .or_else(|| pick(&["COLOR", "CARTA"]));
    let code_col = pick(&["COLR CODE", "COLOR CODE"])
        .or_else(|| pick(&["CODE"]))
        .or_else(|| pick(&["COLOR"]).filter(|c| Some(c) != name_col.as_ref()));
    if let Some(c) = name_col {
        renames.insert(c, col::COLOR_NAME_SHEET);
    }
    if let Some(c) = code_col {
        renames.insert(c, col::COLOR);
    }

    let target = |c: &String| -> String {
        renames
            .get(c)
            .map(|s| s.to_string())
            .unwrap_or_else(|| c.clone())
    };

    let mut columns: Vec<String> = Vec::new();
    for c in &raw.columns {
        let t = target(c);
        if !columns.contains(&t) {
            columns.push(t);
        }
    }

    let rows = raw
        .rows
        .iter()
        .map(|row| {
            let mut out = Row::new();
            for (k, v) in row {
                let t = target(k);
                let taken = out.get(&t).is_some_and(|v| !v.trim().is_empty());
                if !taken {
                    out.insert(t, v.clone());
                }
            }
            out
        })
        .collect();

    Table { columns, rows }
}

/// Fill the color name from `COLOR`/`CARTA` and the color code from `COLOR CODE`.
fn derive_color_fields(row: &mut Row) {
    if cell(row, col::COLOR_NAME_SHEET).trim().is_empty() {
        let fallback = [col::COLOR, col::CARTA]
            .iter()
            .map(|c| cell(row, c))
            .find(|v| !v.trim().is_empty())
            .map(str::to_string);
        if let Some(v) = fallback {
            row.insert(col::COLOR_NAME_SHEET.to_string(), v);
        }
    }

    let code = cell(row, col::COLOR_CODE_SHEET).to_string();
    if !code.trim().is_empty() {
        row.insert(col::COLOR.to_string(), code);
    }
}

/// Use the marking-sheet column as the WIP line number when it looks numeric.
fn infer_line_numbers(table: &mut Table) {
    let Some(first) = table.rows.first() else {
        return;
    };
    if !cell(first, col::WIP_LINE_NUMBER).trim().is_empty()
        || cell(first, col::MARKING_SHEET).trim().is_empty()
    {
        return;
    }

    let sample: Vec<&str> = table
        .rows
        .iter()
        .map(|r| cell(r, col::MARKING_SHEET).trim())
        .filter(|v| !v.is_empty())
        .take(MARKING_SAMPLE)
        .collect();
    let with_digits = sample
        .iter()
        .filter(|v| v.chars().any(|c| c.is_ascii_digit()))
        .count();
    let ratio = with_digits as f64 / sample.len() as f64;

    debug!(
        sampled = sample.len(),
        with_digits, ratio, "marking sheet line-number check"
    );
    if ratio >= MARKING_DIGIT_RATIO {
        for row in &mut table.rows {
            let v = cell(row, col::MARKING_SHEET).to_string();
            row.insert(col::WIP_LINE_NUMBER.to_string(), v);
        }
    }
}

/// Make `columns` the union of row keys and give every row every column.
fn pad_columns(table: &mut Table) {
    for row in &table.rows {
        for k in row.keys() {
            if !table.columns.contains(k) {
                table.columns.push(k.clone());
            }
        }
    }
    let columns = table.columns.clone();
    for c in &columns {
        table.ensure_column(c, "");
    }
}

fn normalize_text_columns(table: &mut Table) {
    for row in &mut table.rows {
        for c in TEXT_COLUMNS {
            if let Some(v) = row.get_mut(c) {
                *v = normalize_text(v);
            }
        }
        if let Some(v) = row.get_mut(col::SIZE) {
            *v = norm_size(v);
        }
    }
}

pub mod case_content;
pub mod join;
pub mod upc_sticker;

use tracing::{debug, info};

use crate::error::EtiquetaError;
use crate::model::{cell, col, Market, Report, ReportKind, Row, Table, UpcRecord};
use crate::text::sizes::market_size_label;
use crate::text::{norm_size, normalize_text};
use join::{dedupe_by_keys, inner_join};

/// Destination implied by the Brazil market when nothing else is configured.
pub const BRAZIL_DESTINATION: &str = "BRAZIL";

/// Columns whose combination identifies one reconciled row.
const DEDUPE_COLUMNS: [&str; 7] = [
    col::STYLE_NAME,
    col::COLOR_NAME_SHEET,
    col::COLOR,
    col::DESTINATION,
    col::PURCHASE_ORDER,
    col::SIZE,
    col::UPC_CODE,
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOptions {
    pub markets: Vec<Market>,
    /// Keep only sheet rows whose `DESTINO` equals this value.
    pub destination: Option<String>,
}

impl ReconcileOptions {
    pub fn has_market(&self, market: Market) -> bool {
        self.markets.contains(&market)
    }

    /// The configured destination, or `BRAZIL` when that market is requested.
    pub fn effective_destination(&self) -> Option<String> {
        match &self.destination {
            Some(d) => Some(normalize_text(d)),
            None if self.has_market(Market::Brazil) => Some(BRAZIL_DESTINATION.to_string()),
            None => None,
        }
    }
}

/// Join PDF records with canonical sheet rows.
///
/// Rows are matched once by color name and once by color code, both keyed on
/// style and, when the sheet has sizes, on size. Name matches come first so
/// they win when both passes produce the same row.
///
/// Fails with `NoPdfRecords` on an empty record set. [`crate::build_report`]
/// checks the same before reading the workbook; this covers direct callers.
pub fn reconcile(
    records: &[UpcRecord],
    sheet: &Table,
    options: &ReconcileOptions,
) -> Result<Vec<Row>, EtiquetaError> {
    if records.is_empty() {
        return Err(EtiquetaError::NoPdfRecords);
    }

    let pdf_rows: Vec<Row> = records.iter().map(normalize_pdf_row).collect();

    let mut sheet_rows: Vec<Row> = sheet.rows.clone();
    for row in &mut sheet_rows {
        if let Some(size) = row.get_mut(col::SIZE) {
            if !size.is_empty() {
                *size = norm_size(size);
            }
        }
    }

    if let Some(destination) = options.effective_destination() {
        sheet_rows.retain(|r| normalize_text(cell(r, col::DESTINATION)) == destination);
        if sheet_rows.is_empty() {
            return Err(EtiquetaError::NoDestinationRows { destination });
        }
        debug!(%destination, rows = sheet_rows.len(), "applied destination filter");
    }

    let has_size = sheet_rows.iter().any(|r| !cell(r, col::SIZE).is_empty());
    let with_size = |a: &'static str, b: &'static str| -> Vec<&'static str> {
        let mut keys = vec![a, b];
        if has_size {
            keys.push(col::SIZE);
        }
        keys
    };

    let by_name = inner_join(
        &sheet_rows,
        &pdf_rows,
        &with_size(col::STYLE_NAME, col::COLOR_NAME_SHEET),
        &with_size(col::STYLE, col::COLOR_NAME),
    );
    let by_code = inner_join(
        &sheet_rows,
        &pdf_rows,
        &with_size(col::STYLE_NAME, col::COLOR),
        &with_size(col::STYLE, col::COLOR_CODE),
    );
    debug!(
        name_matches = by_name.len(),
        code_matches = by_code.len(),
        has_size,
        "joined sheet rows with PDF records"
    );

    let mut merged = by_name;
    merged.extend(by_code);

    let keys: Vec<&str> = DEDUPE_COLUMNS
        .iter()
        .copied()
        .filter(|c| merged.iter().any(|r| r.contains_key(*c)))
        .collect();
    let merged = dedupe_by_keys(merged, &keys);

    if merged.is_empty() {
        return Err(EtiquetaError::NoOverlap);
    }
    info!(
        sheet_rows = sheet_rows.len(),
        pdf_records = records.len(),
        merged = merged.len(),
        "reconciled"
    );
    Ok(merged)
}

/// Reconcile and render the report of the given kind.
pub fn build_report(
    kind: ReportKind,
    records: &[UpcRecord],
    sheet: &Table,
    options: &ReconcileOptions,
) -> Result<Report, EtiquetaError> {
    let merged = reconcile(records, sheet, options)?;
    let report = match kind {
        ReportKind::UpcSticker => upc_sticker::build(merged, options),
        ReportKind::CaseContent => case_content::build(merged, options),
    };
    Ok(report)
}

fn normalize_pdf_row(record: &UpcRecord) -> Row {
    let mut row = record.to_row();
    for key in [col::STYLE, col::COLOR_CODE, col::COLOR_NAME, col::SIZE, col::STYLE_COLOR] {
        if let Some(v) = row.get_mut(key) {
            *v = normalize_text(v);
        }
    }
    if let Some(size) = row.get_mut(col::SIZE) {
        if !size.is_empty() {
            *size = norm_size(size);
        }
    }
    row
}

/// Project rows onto `columns`, filling absent cells with "".
fn project(rows: &[Row], columns: &[&str]) -> Vec<Row> {
    rows.iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| (c.to_string(), cell(r, c).to_string()))
                .collect()
        })
        .collect()
}

/// Prefix `0` to UPCs that lack it (Japan labels carry EAN-13).
fn prefix_upcs(rows: &mut [Row], column: &str) {
    for row in rows {
        if let Some(upc) = row.get_mut(column) {
            if !upc.starts_with('0') {
                upc.insert(0, '0');
            }
        }
    }
}

/// Replace sizes with each requested market's label.
///
/// Canada applies before Brazil and Brazil only maps canonical sizes. With
/// both requested, a size Canada relabels keeps its Canada label and the rest
/// get Brazil's.
fn remap_sizes(rows: &mut [Row], column: &str, options: &ReconcileOptions) {
    for market in [Market::Canada, Market::Brazil] {
        if !options.has_market(market) {
            continue;
        }
        for row in rows.iter_mut() {
            if let Some(size) = row.get_mut(column) {
                if let Some(label) = market_size_label(market, size) {
                    *size = label.to_string();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sheet(rows: Vec<Row>) -> Table {
        let columns = rows
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default();
        Table { columns, rows }
    }

    fn sheet_row(style: &str, name: &str, code: &str, dest: &str, po: &str, size: &str) -> Row {
        row(&[
            ("NOMBRE ESTILO", style),
            ("DESTINO", dest),
            ("PO#", po),
            ("NOMBRE COLOR", name),
            ("COLOR", code),
            ("SIZE", size),
        ])
    }

    #[test]
    fn test_name_and_code_passes_are_deduplicated() {
        let table = sheet(vec![sheet_row("TP214", "BLUE", "C01", "USA", "100", "M")]);
        let records = vec![UpcRecord::new("tp214", "c01", "blue", "medium", "195204000012")];
        let merged = reconcile(&records, &table, &ReconcileOptions::default()).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["UPC CODE"], "195204000012");
        assert_eq!(merged[0]["SIZE"], "M");
        assert_eq!(merged[0]["STYLE COLOR"], "TP214 C01");
    }

    #[test]
    fn test_code_join_catches_renamed_colors() {
        let table = sheet(vec![sheet_row("TP214", "AZUL", "C01", "USA", "100", "S")]);
        let records = vec![UpcRecord::new("TP214", "C01", "BLUE", "S", "195204000011")];
        let merged = reconcile(&records, &table, &ReconcileOptions::default()).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["NOMBRE COLOR"], "AZUL");
        assert_eq!(merged[0]["COLOR NAME"], "BLUE");
    }

    #[test]
    fn test_no_overlap_is_an_error() {
        let table = sheet(vec![sheet_row("TP214", "BLUE", "C01", "USA", "100", "M")]);
        let records = vec![UpcRecord::new("SN100", "C09", "RED", "M", "195204000012")];
        let err = reconcile(&records, &table, &ReconcileOptions::default()).unwrap_err();
        assert!(matches!(err, EtiquetaError::NoOverlap));
    }

    #[test]
    fn test_empty_records_is_an_error() {
        let table = sheet(vec![sheet_row("TP214", "BLUE", "C01", "USA", "100", "M")]);
        let err = reconcile(&[], &table, &ReconcileOptions::default()).unwrap_err();
        assert!(matches!(err, EtiquetaError::NoPdfRecords));
    }

    #[test]
    fn test_destination_gate() {
        let table = sheet(vec![
            sheet_row("TP214", "BLUE", "C01", "usa", "100", "M"),
            sheet_row("TP214", "BLUE", "C01", "CANADA", "200", "M"),
        ]);
        let records = vec![UpcRecord::new("TP214", "C01", "BLUE", "M", "195204000012")];
        let options = ReconcileOptions {
            destination: Some("USA".into()),
            ..Default::default()
        };
        let merged = reconcile(&records, &table, &options).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0]["PO#"], "100");

        let brazil = ReconcileOptions {
            markets: vec![Market::Brazil],
            destination: None,
        };
        let err = reconcile(&records, &table, &brazil).unwrap_err();
        match err {
            EtiquetaError::NoDestinationRows { destination } => assert_eq!(destination, "BRAZIL"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sizeless_sheet_joins_on_style_and_color() {
        let table = sheet(vec![sheet_row("TP214", "BLUE", "C01", "USA", "100", "")]);
        let records = vec![
            UpcRecord::new("TP214", "C01", "BLUE", "S", "195204000011"),
            UpcRecord::new("TP214", "C01", "BLUE", "M", "195204000012"),
        ];
        let merged = reconcile(&records, &table, &ReconcileOptions::default()).unwrap();
        let sizes: Vec<&str> = merged.iter().map(|r| r["SIZE"].as_str()).collect();
        assert_eq!(sizes, vec!["S", "M"]);
    }

    #[test]
    fn test_canada_remap_runs_before_brazil() {
        let mut rows = vec![row(&[("SIZE", "2XL")]), row(&[("SIZE", "XS")])];
        let options = ReconcileOptions {
            markets: vec![Market::Brazil, Market::Canada],
            destination: None,
        };
        remap_sizes(&mut rows, "SIZE", &options);
        assert_eq!(rows[0]["SIZE"], "2XL/TTG");
        assert_eq!(rows[1]["SIZE"], "XS/PP");
    }

    #[test]
    fn test_remap_and_prefix_helpers() {
        let mut rows = vec![row(&[("SIZE", "XL"), ("UPC", "123")]), row(&[("SIZE", "ONE"), ("UPC", "0123")])];
        let options = ReconcileOptions {
            markets: vec![Market::Brazil, Market::Canada],
            destination: None,
        };
        remap_sizes(&mut rows, "SIZE", &options);
        prefix_upcs(&mut rows, "UPC");
        assert_eq!(rows[0]["SIZE"], "XL/TG");
        assert_eq!(rows[1]["SIZE"], "ONE");
        assert_eq!(rows[0]["UPC"], "0123");
        assert_eq!(rows[1]["UPC"], "0123");
    }
}

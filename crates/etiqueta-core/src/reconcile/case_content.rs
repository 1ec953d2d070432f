//! Case content report: the packing sheet printed for each shipping case,
//! with derived SKX PO, WIP line and sticker counts.

use rust_decimal::Decimal;

use super::{prefix_upcs, remap_sizes, ReconcileOptions};
use crate::model::{cell, col, Market, Report, ReportKind, Row};
use crate::text::collate::{sort_rows, SortKey};
use crate::text::sizes::parse_quantity;

pub const STYLE_NAME: &str = "NOMBRE ESTILO";
pub const PROTO: &str = "PROTO";
pub const OP: &str = "OP";
pub const CUSTOMER_PO: &str = "PO(cliente)";
pub const ORDER_UNITS: &str = "UNITS/TALLA(pedido)";
pub const SKX_PO: &str = "SKX PO#";
pub const WIP_LINE: &str = "WIP Line Number";
pub const STYLE_COLOR: &str = "STYLE/COLOR";
pub const UPC_BARCODE: &str = "UPC Barcode";
pub const CASE_QTY: &str = "Case QTY";
pub const US_SIZE: &str = "US Size";
pub const QTY: &str = "QTY POR TALLA";
pub const STICKERS: &str = "QTY DE STICKERS A IMPRIMIR";

pub const COLUMNS: [&str; 13] = [
    STYLE_NAME,
    PROTO,
    OP,
    CUSTOMER_PO,
    ORDER_UNITS,
    SKX_PO,
    WIP_LINE,
    STYLE_COLOR,
    UPC_BARCODE,
    CASE_QTY,
    US_SIZE,
    QTY,
    STICKERS,
];

const ORDER: [SortKey<'static>; 4] = [
    SortKey::Text(SKX_PO),
    SortKey::Text(WIP_LINE),
    SortKey::Text(STYLE_COLOR),
    SortKey::Size(US_SIZE),
];

/// Spare stickers printed on top of the per-case count.
const SPARE_STICKERS: i64 = 3;

pub fn build(merged: Vec<Row>, options: &ReconcileOptions) -> Report {
    let use_legacy_units = merged.iter().any(|r| r.contains_key(col::LEGACY_QTY));

    let mut rows: Vec<Row> = merged
        .iter()
        .map(|r| render_row(r, use_legacy_units))
        .collect();

    if options.has_market(Market::Japan) {
        prefix_upcs(&mut rows, UPC_BARCODE);
    }
    sort_rows(&mut rows, &ORDER);
    remap_sizes(&mut rows, US_SIZE, options);

    Report {
        kind: ReportKind::CaseContent,
        columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

fn render_row(r: &Row, use_legacy_units: bool) -> Row {
    let units = if use_legacy_units {
        cell(r, col::LEGACY_QTY)
    } else {
        cell(r, col::ORDER_UNITS)
    };
    let case_qty = case_quantity(cell(r, col::CASE_QTY));
    let qty = cell(r, col::QTY);
    let stickers = stickers_to_print(qty, &case_qty);

    let values = [
        (STYLE_NAME, cell(r, col::STYLE_NAME).to_string()),
        (PROTO, cell(r, col::PROTO).to_string()),
        (OP, cell(r, col::PRODUCTION_ORDER).to_string()),
        (CUSTOMER_PO, cell(r, col::PURCHASE_ORDER).to_string()),
        (ORDER_UNITS, units.to_string()),
        (SKX_PO, skx_po(cell(r, col::PURCHASE_ORDER))),
        (WIP_LINE, wip_line(cell(r, col::WIP_LINE_NUMBER))),
        (STYLE_COLOR, cell(r, col::STYLE_COLOR).to_string()),
        (UPC_BARCODE, cell(r, col::UPC_CODE).to_string()),
        (CASE_QTY, case_qty),
        (US_SIZE, cell(r, col::SIZE).to_string()),
        (QTY, qty.to_string()),
        (STICKERS, stickers),
    ];
    values.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Customer PO with the `P` prefix SKX expects: "4501" -> "P4501".
pub fn skx_po(po: &str) -> String {
    let po = po.trim();
    if po.is_empty() || po.to_uppercase().starts_with('P') {
        po.to_string()
    } else {
        format!("P{po}")
    }
}

/// Leading integer as `N` plus at least two digits ("3" -> "N03"); other text unchanged.
pub fn wip_line(raw: &str) -> String {
    let s = raw.trim();
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u64>() {
        Ok(n) => format!("N{n:02}"),
        Err(_) => s.to_string(),
    }
}

/// `Q` followed by the digits of a case quantity ("PP10" -> "Q10"), "" when it has none.
pub fn case_quantity(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        String::new()
    } else {
        format!("Q{digits}")
    }
}

/// Cases needed for `qty` units, rounded up, plus spares.
///
/// A blank `qty` counts as zero units. "0" when `qty` is not a number or the
/// case quantity is missing, non-numeric or zero.
pub fn stickers_to_print(qty: &str, case_qty: &str) -> String {
    let Some(per_case) = parse_quantity(case_qty.trim_start_matches('Q')) else {
        return "0".to_string();
    };
    let qty = if qty.trim().is_empty() {
        Decimal::ZERO
    } else {
        match parse_quantity(qty) {
            Some(q) => q,
            None => return "0".to_string(),
        }
    };
    match qty.checked_div(per_case) {
        Some(cases) => (cases.ceil() + Decimal::from(SPARE_STICKERS))
            .normalize()
            .to_string(),
        None => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_skx_po() {
        assert_eq!(skx_po("4501"), "P4501");
        assert_eq!(skx_po(" p4501 "), "p4501");
        assert_eq!(skx_po(""), "");
    }

    #[test]
    fn test_wip_line() {
        assert_eq!(wip_line("3"), "N03");
        assert_eq!(wip_line("007"), "N07");
        assert_eq!(wip_line("12b"), "N12");
        assert_eq!(wip_line("125"), "N125");
        assert_eq!(wip_line("N05"), "N05");
        assert_eq!(wip_line(""), "");
    }

    #[test]
    fn test_case_quantity() {
        assert_eq!(case_quantity("PP10"), "Q10");
        assert_eq!(case_quantity("75"), "Q75");
        assert_eq!(case_quantity("n/a"), "");
    }

    #[test]
    fn test_stickers_to_print() {
        assert_eq!(stickers_to_print("25", "Q6"), "8");
        assert_eq!(stickers_to_print("24", "Q6"), "7");
        assert_eq!(stickers_to_print("24", ""), "0");
        assert_eq!(stickers_to_print("24", "Q0"), "0");
        assert_eq!(stickers_to_print("n/a", "Q6"), "0");
    }

    #[test]
    fn test_blank_quantity_still_prints_spares() {
        assert_eq!(stickers_to_print("", "Q6"), "3");
        assert_eq!(stickers_to_print("  ", "Q12"), "3");
        assert_eq!(stickers_to_print("0", "Q6"), "3");
        assert_eq!(stickers_to_print("", ""), "0");

        let rows = vec![merged(&[
            ("PO#", "4501"),
            ("CASE QTY", "6"),
            ("SIZE", ""),
            ("QTY POR TALLA", ""),
        ])];
        let report = build(rows, &ReconcileOptions::default());
        assert_eq!(report.rows[0]["QTY DE STICKERS A IMPRIMIR"], "3");
    }

    #[test]
    fn test_build_derives_and_sorts() {
        let rows = vec![
            merged(&[
                ("NOMBRE ESTILO", "SN100"),
                ("PO#", "4502"),
                ("WIP LINE NUMBER", "1"),
                ("STYLE COLOR", "SN100 BLK"),
                ("UPC CODE", "195204000031"),
                ("SIZE", "M"),
                ("QTY POR TALLA", "12"),
                ("CASE QTY", "6"),
                ("UNITS/TALLA (PEDIDO)", "40"),
            ]),
            merged(&[
                ("NOMBRE ESTILO", "SN100"),
                ("PO#", "4501"),
                ("WIP LINE NUMBER", "2"),
                ("STYLE COLOR", "SN100 BLK"),
                ("UPC CODE", "195204000032"),
                ("SIZE", "L"),
                ("QTY POR TALLA", "13"),
                ("CASE QTY", "PP6"),
                ("UNITS/TALLA (PEDIDO)", "30"),
            ]),
        ];
        let report = build(rows, &ReconcileOptions::default());
        assert_eq!(report.kind, ReportKind::CaseContent);
        assert_eq!(report.columns.len(), 13);

        let first = &report.rows[0];
        assert_eq!(first["SKX PO#"], "P4501");
        assert_eq!(first["WIP Line Number"], "N02");
        assert_eq!(first["Case QTY"], "Q6");
        assert_eq!(first["UNITS/TALLA(pedido)"], "30");
        assert_eq!(first["QTY DE STICKERS A IMPRIMIR"], "6");
        assert_eq!(first["US Size"], "L");
        assert_eq!(report.rows[1]["SKX PO#"], "P4502");
        assert_eq!(report.rows[1]["QTY DE STICKERS A IMPRIMIR"], "5");
    }

    #[test]
    fn test_legacy_units_column_takes_precedence() {
        let rows = vec![merged(&[
            ("PO#", "1"),
            ("TT", "24"),
            ("UNITS/TALLA (PEDIDO)", "30"),
        ])];
        let report = build(rows, &ReconcileOptions::default());
        assert_eq!(report.rows[0]["UNITS/TALLA(pedido)"], "24");
        assert_eq!(report.rows[0]["QTY DE STICKERS A IMPRIMIR"], "0");
    }
}

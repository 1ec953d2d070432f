//! UPC sticker report: one row per style, color, PO and size with its barcode.

use super::{prefix_upcs, project, remap_sizes, ReconcileOptions};
use crate::model::{col, Market, Report, ReportKind, Row};
use crate::text::collate::{sort_rows, SortKey};

pub const COLUMNS: [&str; 11] = [
    col::PROTO,
    col::PRODUCTION_ORDER,
    col::DESTINATION,
    col::STYLE_NAME,
    col::COLOR_NAME_SHEET,
    col::PURCHASE_ORDER,
    col::UPC_CODE,
    col::STYLE_COLOR,
    col::SIZE,
    col::COLOR,
    col::LINE_NUMBER,
];

const ORDER: [SortKey<'static>; 5] = [
    SortKey::Text(col::PRODUCTION_ORDER),
    SortKey::Text(col::DESTINATION),
    SortKey::Text(col::PURCHASE_ORDER),
    SortKey::Text(col::COLOR_NAME_SHEET),
    SortKey::Size(col::SIZE),
];

pub fn build(merged: Vec<Row>, options: &ReconcileOptions) -> Report {
    let mut rows = project(&merged, &COLUMNS);

    if options.has_market(Market::Japan) {
        prefix_upcs(&mut rows, col::UPC_CODE);
    }

    sort_rows(&mut rows, &ORDER);
    // Market labels are display-only; sorting uses the canonical sizes.
    remap_sizes(&mut rows, col::SIZE, options);

    Report {
        kind: ReportKind::UpcSticker,
        columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

pub mod header;
pub mod schema;

use std::collections::HashMap;

use tracing::info;

use crate::error::EtiquetaError;
use crate::model::{Row, Table, Workbook};
use header::locate_header;
use schema::SheetSchema;

/// Turn a cell matrix into row objects keyed by the labels in `header_row`.
///
/// Blank labels become `Col_<idx>`; repeated labels get `__dup2`, `__dup3`, ...
/// Rows whose cells are all blank are dropped and short rows are padded with "".
pub fn rows_to_table(rows: &[Vec<String>], header_row: usize) -> Table {
    let header: &[String] = rows.get(header_row).map(Vec::as_slice).unwrap_or(&[]);

    let mut seen: HashMap<String, usize> = HashMap::new();
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let trimmed = label.trim();
            let base = if trimmed.is_empty() {
                format!("Col_{idx}")
            } else {
                trimmed.to_string()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{base}__dup{count}")
            }
        })
        .collect();

    let data = rows.iter().skip(header_row + 1);
    let table_rows: Vec<Row> = data
        .filter(|cells| cells.iter().any(|c| !c.trim().is_empty()))
        .map(|cells| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, col)| (col.clone(), cells.get(idx).cloned().unwrap_or_default()))
                .collect()
        })
        .collect();

    Table {
        columns,
        rows: table_rows,
    }
}

/// Drop a `__dupN` suffix added by [`rows_to_table`].
pub fn strip_dup_suffix(label: &str) -> &str {
    match label.rsplit_once("__dup") {
        Some((base, n)) if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => base,
        _ => label,
    }
}

/// Fill blank `column` cells with the last non-blank value seen in the same group.
///
/// Rows are scanned top to bottom; a group never receives another group's
/// value and nothing is filled backward. `None` puts every row in one group.
pub fn forward_fill(rows: &mut [Row], column: &str, group_column: Option<&str>) {
    let mut last_by_group: HashMap<String, String> = HashMap::new();

    for row in rows.iter_mut() {
        let group = match group_column {
            Some(g) => row.get(g).cloned().unwrap_or_default(),
            None => String::new(),
        };
        let value = row.get(column).map(|v| v.trim().to_string()).unwrap_or_default();

        if !value.is_empty() {
            if let Some(v) = row.get(column) {
                last_by_group.insert(group, v.clone());
            }
        } else if let Some(previous) = last_by_group.get(&group) {
            row.insert(column.to_string(), previous.clone());
        }
    }
}

/// Locate the header, build row objects and normalize them to `schema`.
pub fn prepare_sheet(workbook: &Workbook, schema: &SheetSchema) -> Result<Table, EtiquetaError> {
    let location = locate_header(workbook, &schema.header)?;
    let raw = rows_to_table(&location.sheet.rows, location.header_row);
    info!(
        sheet = %location.sheet.name,
        header_row = location.header_row,
        rows = raw.rows.len(),
        "read sheet rows"
    );
    schema.normalize(raw)
}

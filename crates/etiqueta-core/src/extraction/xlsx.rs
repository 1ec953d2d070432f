use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use tracing::debug;

use crate::error::EtiquetaError;
use crate::model::{Sheet, Workbook};

/// Decode every worksheet of an xlsx file into rows of cell text.
///
/// The used range is padded with empty rows and cells so that row and
/// column indices match sheet coordinates (row 0 is sheet row 1).
pub fn read_workbook(bytes: &[u8]) -> Result<Workbook, EtiquetaError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| EtiquetaError::Workbook(format!("failed to open xlsx: {e}")))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| EtiquetaError::Workbook(format!("sheet '{name}' unreadable: {e}")))?;

        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); row_offset as usize];
        for cells in range.rows() {
            let mut row = vec![String::new(); col_offset as usize];
            row.extend(cells.iter().map(cell_as_string));
            rows.push(row);
        }

        debug!(sheet = %name, rows = rows.len(), "decoded worksheet");
        sheets.push(Sheet { name, rows });
    }

    if sheets.is_empty() {
        return Err(EtiquetaError::EmptyData("workbook has no sheets".into()));
    }

    Ok(Workbook { sheets })
}

/// Render a cell the way a spreadsheet displays it; empty cells become "".
pub(crate) fn cell_as_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        // f64 Display already drops a trailing ".0"
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string().to_uppercase(),
        Data::Empty => String::new(),
        _ => format!("{cell}"),
    }
}

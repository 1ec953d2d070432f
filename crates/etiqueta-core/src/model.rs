use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical column labels shared by the sheet schemas and report builders.
pub mod col {
    pub const STYLE_NAME: &str = "NOMBRE ESTILO";
    pub const PRODUCTION_ORDER: &str = "PEDIDO PRODUCCION COFACO";
    pub const PROTO: &str = "PROTO COFACO";
    pub const DESTINATION: &str = "DESTINO";
    pub const PURCHASE_ORDER: &str = "PO#";
    pub const COLOR_NAME_SHEET: &str = "NOMBRE COLOR";
    pub const COLOR: &str = "COLOR";
    pub const CARTA: &str = "CARTA";
    pub const COLOR_CODE_SHEET: &str = "COLOR CODE";
    pub const LINE_NUMBER: &str = "LN";
    pub const WIP_LINE_NUMBER: &str = "WIP LINE NUMBER";
    pub const MARKING_SHEET: &str = "HOJA MARCACION";
    pub const ORDER_UNITS: &str = "UNITS/TALLA (PEDIDO)";
    pub const SKX_PO: &str = "SKX PO#";
    pub const CASE_QTY: &str = "CASE QTY";
    pub const LEGACY_QTY: &str = "TT";
    pub const SIZE: &str = "SIZE";
    pub const QTY: &str = "QTY POR TALLA";

    // Columns contributed by PDF records.
    pub const STYLE: &str = "STYLE";
    pub const COLOR_CODE: &str = "COLOR CODE";
    pub const COLOR_NAME: &str = "COLOR NAME";
    pub const UPC_CODE: &str = "UPC CODE";
    pub const STYLE_COLOR: &str = "STYLE COLOR";
}

/// One spreadsheet or merged row, keyed by column label in first-seen order.
pub type Row = IndexMap<String, String>;

/// Cell text of `col`, "" when the row has no such column.
pub fn cell<'r>(row: &'r Row, col: &str) -> &'r str {
    row.get(col).map(String::as_str).unwrap_or("")
}

/// A set of rows sharing one ordered column list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Append a column, filling existing rows with `value` when it is new.
    pub fn ensure_column(&mut self, name: &str, value: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
        for row in &mut self.rows {
            row.entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }
    }
}

/// A decoded worksheet: its name and row-major cell text.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// A single UPC barcode assignment read from a PDF document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcRecord {
    #[serde(rename = "STYLE")]
    pub style: String,
    #[serde(rename = "COLOR CODE")]
    pub color_code: String,
    #[serde(rename = "COLOR NAME")]
    pub color_name: String,
    #[serde(rename = "SIZE")]
    pub size: String,
    #[serde(rename = "UPC CODE")]
    pub upc_code: String,
    #[serde(rename = "STYLE COLOR")]
    pub style_color: String,
}

impl UpcRecord {
    /// Build a record, deriving the `STYLE COLOR` join key.
    pub fn new(
        style: impl Into<String>,
        color_code: impl Into<String>,
        color_name: impl Into<String>,
        size: impl Into<String>,
        upc_code: impl Into<String>,
    ) -> Self {
        let style = style.into();
        let color_code = color_code.into();
        let style_color = format!("{style} {color_code}");
        UpcRecord {
            style,
            color_code,
            color_name: color_name.into(),
            size: size.into(),
            upc_code: upc_code.into(),
            style_color,
        }
    }

    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert(col::STYLE.to_string(), self.style.clone());
        row.insert(col::COLOR_CODE.to_string(), self.color_code.clone());
        row.insert(col::COLOR_NAME.to_string(), self.color_name.clone());
        row.insert(col::SIZE.to_string(), self.size.clone());
        row.insert(col::UPC_CODE.to_string(), self.upc_code.clone());
        row.insert(col::STYLE_COLOR.to_string(), self.style_color.clone());
        row
    }
}

/// Target market options that alter the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Japan,
    Canada,
    Brazil,
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::Japan => write!(f, "japan"),
            Market::Canada => write!(f, "canada"),
            Market::Brazil => write!(f, "brazil"),
        }
    }
}

impl Market {
    pub fn from_str_loose(s: &str) -> Option<Market> {
        match s.trim().to_lowercase().as_str() {
            "japan" | "jp" | "japon" | "japón" => Some(Market::Japan),
            "canada" | "ca" | "canadá" => Some(Market::Canada),
            "brazil" | "br" | "brasil" => Some(Market::Brazil),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    UpcSticker,
    CaseContent,
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::UpcSticker => write!(f, "upc_sticker"),
            ReportKind::CaseContent => write!(f, "case_content"),
        }
    }
}

/// Reconciled output rows with the fixed column set of one report kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub kind: ReportKind,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upc_record_derives_style_color() {
        let r = UpcRecord::new("TP214", "C01", "BLUE", "M", "012345678901");
        assert_eq!(r.style_color, "TP214 C01");
        let row = r.to_row();
        assert_eq!(row.get("UPC CODE").map(String::as_str), Some("012345678901"));
        assert_eq!(row.keys().next().map(String::as_str), Some("STYLE"));
    }

    #[test]
    fn ensure_column_keeps_existing_values() {
        let mut t = Table {
            columns: vec!["A".into()],
            rows: vec![Row::from([("A".to_string(), "1".to_string())])],
        };
        t.ensure_column("A", "x");
        t.ensure_column("B", "");
        assert_eq!(t.columns, vec!["A", "B"]);
        assert_eq!(t.rows[0]["A"], "1");
        assert_eq!(t.rows[0]["B"], "");
    }

    #[test]
    fn market_loose_parsing() {
        assert_eq!(Market::from_str_loose("Brasil"), Some(Market::Brazil));
        assert_eq!(Market::from_str_loose(" JP "), Some(Market::Japan));
        assert_eq!(Market::from_str_loose("peru"), None);
    }
}

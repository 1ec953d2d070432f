//! End-to-end tests from positioned PDF text to rendered reports.
//!
//! Uses a MockExtractor that returns pre-built PageItems without
//! invoking pdftotext, so these tests run without poppler-utils.

use etiqueta_core::error::EtiquetaError;
use etiqueta_core::extraction::{PageItems, PdfExtractor, TextItem};
use etiqueta_core::model::{Market, Sheet, Workbook};
use etiqueta_core::parsing::PdfFormat;
use etiqueta_core::profiles::builtin::load_preset;
use etiqueta_core::reconcile::{self, ReconcileOptions};
use etiqueta_core::sheet::{prepare_sheet, schema};
use etiqueta_core::{build_report, extract_records, ReportKind};

struct MockExtractor {
    documents: Vec<Vec<PageItems>>,
}

impl PdfExtractor for MockExtractor {
    /// The "PDF bytes" are a single byte holding the document index.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageItems>, EtiquetaError> {
        let idx = pdf_bytes.first().copied().unwrap_or(0) as usize;
        self.documents
            .get(idx)
            .cloned()
            .ok_or_else(|| EtiquetaError::Extraction(format!("no mock document {idx}")))
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

/// One TextItem per word, lines 20pt apart from the top of the page.
fn page(number: usize, lines: &[&str]) -> PageItems {
    let mut items = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        let y = 800.0 - 20.0 * row as f32;
        let mut x = 40.0;
        for word in line.split_whitespace() {
            items.push(TextItem {
                text: word.to_string(),
                x,
                y,
                page: number,
            });
            x += 8.0 * word.len() as f32 + 4.0;
        }
    }
    // Reverse so the assembler must sort rather than rely on input order.
    items.reverse();
    PageItems {
        page_number: number,
        items,
    }
}

fn workbook(rows: &[&[&str]]) -> Workbook {
    Workbook {
        sheets: vec![Sheet {
            name: "Pedido".into(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }],
    }
}

fn barras_document() -> Vec<PageItems> {
    vec![page(
        1,
        &[
            "Division | Style | UPC | Description | Color | Color Desc | Width | Size",
            "01|TP214|195204000011|TEE|C01|BLUE|R|S",
            "01|TP214|195204000012|TEE|C01|BLUE|R|M",
            "01|TP214|ABC|TEE|C01|BLUE|R|L",
            "01|TP214|195204000013|TEE|C01|BLUE|R|L",
        ],
    )]
}

fn matricial_document() -> Vec<PageItems> {
    vec![
        page(1, &["UPC REPORT", "SN100 WOMENS *S* *M*"]),
        page(2, &["BLK BLACK 195204000031 195204000032"]),
    ]
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------
#[test]
fn barras_document_yields_records_and_diagnostics() {
    let extractor = MockExtractor {
        documents: vec![barras_document()],
    };
    let parsed = extract_records(&[&[0]], &extractor, 2.0).unwrap();

    assert_eq!(parsed.records.len(), 3);
    assert_eq!(parsed.documents[0].format, PdfFormat::Barras);
    assert_eq!(parsed.records[0].style, "TP214");
    assert_eq!(parsed.records[0].color_name, "BLUE");
    assert_eq!(parsed.records[2].size, "L");
    assert_eq!(parsed.records[2].upc_code, "195204000013");

    assert_eq!(parsed.skipped_lines.len(), 1);
    assert!(parsed.skipped_lines[0].line_text.contains("ABC"));
}

#[test]
fn style_header_and_color_row_may_sit_on_different_pages() {
    let extractor = MockExtractor {
        documents: vec![matricial_document()],
    };
    let parsed = extract_records(&[&[0]], &extractor, 2.0).unwrap();

    assert_eq!(parsed.documents[0].format, PdfFormat::Matricial);
    let got: Vec<(&str, &str)> = parsed
        .records
        .iter()
        .map(|r| (r.size.as_str(), r.upc_code.as_str()))
        .collect();
    assert_eq!(got, vec![("S", "195204000031"), ("M", "195204000032")]);
    assert_eq!(parsed.records[0].style_color, "SN100 BLK");
}

#[test]
fn batch_keeps_document_order_and_falls_back_to_tabular() {
    let unmarked = vec![page(1, &["01|TP300|195204000099|TEE|R01|RED|R|XL"])];
    let extractor = MockExtractor {
        documents: vec![matricial_document(), unmarked, barras_document()],
    };
    let parsed = extract_records(&[&[0], &[1], &[2]], &extractor, 2.0).unwrap();

    let formats: Vec<PdfFormat> = parsed.documents.iter().map(|d| d.format).collect();
    assert_eq!(
        formats,
        vec![PdfFormat::Matricial, PdfFormat::Unknown, PdfFormat::Barras]
    );
    assert_eq!(parsed.records.len(), 6);
    assert_eq!(parsed.records[0].style, "SN100");
    assert_eq!(parsed.records[2].style, "TP300");
    assert_eq!(parsed.records[3].style, "TP214");
    assert_eq!(parsed.skipped_lines[0].document, 2);
}

#[test]
fn extractor_failure_propagates() {
    let extractor = MockExtractor { documents: vec![] };
    let err = extract_records(&[&[0]], &extractor, 2.0).unwrap_err();
    assert!(matches!(err, EtiquetaError::Extraction(_)));
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------
#[test]
fn upc_sticker_report_from_wide_sheet() {
    let extractor = MockExtractor {
        documents: vec![barras_document()],
    };
    let parsed = extract_records(&[&[0]], &extractor, 2.0).unwrap();

    let wb = workbook(&[
        &["PLAN DE PRODUCCION"],
        &[
            "ESTILOS",
            "OP",
            "PROTO",
            "DESTINO",
            "PO",
            "DESCRIPCION COLOR",
            "COLOR CODE",
            "S",
            "M",
            "L",
        ],
        &["tp214", "OP1", "PR1", "usa", "4501", "Blue", "C01", "10", "0", "5"],
    ]);
    let table = prepare_sheet(&wb, &schema::UPC_STICKER).unwrap();
    let sizes: Vec<&str> = table.rows.iter().map(|r| r["SIZE"].as_str()).collect();
    assert_eq!(sizes, vec!["S", "L"]);

    let report = reconcile::build_report(
        ReportKind::UpcSticker,
        &parsed.records,
        &table,
        &ReconcileOptions::default(),
    )
    .unwrap();

    assert_eq!(report.rows.len(), 2);
    let first = &report.rows[0];
    assert_eq!(first["NOMBRE ESTILO"], "TP214");
    assert_eq!(first["DESTINO"], "USA");
    assert_eq!(first["PO#"], "4501");
    assert_eq!(first["SIZE"], "S");
    assert_eq!(first["UPC CODE"], "195204000011");
    assert_eq!(first["COLOR"], "C01");
    assert_eq!(report.rows[1]["UPC CODE"], "195204000013");
}

#[test]
fn case_content_report_keeps_usa_rows_only() {
    let extractor = MockExtractor {
        documents: vec![matricial_document()],
    };
    let parsed = extract_records(&[&[0]], &extractor, 2.0).unwrap();

    let wb = workbook(&[
        &[
            "STYLE",
            "OP",
            "PROTO",
            "DESTINO",
            "PO#",
            "DESCRIPCION COLOR",
            "COLOR CODE",
            "CASE QTY",
            "WIP LINE NUMBER",
            "S",
            "M",
        ],
        &["SN100", "OP7", "PR7", "USA", "4501", "Black", "BLK", "6", "1", "13", "0"],
        &["SN100", "OP7", "PR7", "USA", "4501", "Black", "BLK", "", "", "", "12"],
        &["SN100", "OP7", "PR7", "CANADA", "4600", "Black", "BLK", "6", "2", "5", "5"],
    ]);
    let table = prepare_sheet(&wb, &schema::CASE_CONTENT).unwrap();
    assert_eq!(table.rows.len(), 4);

    let profile = load_preset("case-content").unwrap();
    let report = reconcile::build_report(
        ReportKind::CaseContent,
        &parsed.records,
        &table,
        &profile.options(&[]),
    )
    .unwrap();

    assert_eq!(report.rows.len(), 2);
    let s = &report.rows[0];
    assert_eq!(s["US Size"], "S");
    assert_eq!(s["SKX PO#"], "P4501");
    assert_eq!(s["WIP Line Number"], "N01");
    assert_eq!(s["STYLE/COLOR"], "SN100 BLK");
    assert_eq!(s["UPC Barcode"], "195204000031");
    assert_eq!(s["Case QTY"], "Q6");
    assert_eq!(s["QTY DE STICKERS A IMPRIMIR"], "6");

    // Forward-filled from the row above within the same style.
    let m = &report.rows[1];
    assert_eq!(m["US Size"], "M");
    assert_eq!(m["Case QTY"], "Q6");
    assert_eq!(m["WIP Line Number"], "N01");
    assert_eq!(m["QTY DE STICKERS A IMPRIMIR"], "5");
}

#[test]
fn brazil_market_without_brazil_rows_fails() {
    let extractor = MockExtractor {
        documents: vec![barras_document()],
    };
    let parsed = extract_records(&[&[0]], &extractor, 2.0).unwrap();
    let wb = workbook(&[
        &["x"],
        &["STYLE", "OP", "PROTO", "DESTINO", "PO", "DESCRIPCION COLOR", "S"],
        &["TP214", "OP1", "PR1", "USA", "1", "BLUE", "4"],
    ]);
    let table = prepare_sheet(&wb, &schema::UPC_STICKER).unwrap();
    let options = ReconcileOptions {
        markets: vec![Market::Brazil],
        destination: None,
    };
    let err =
        reconcile::build_report(ReportKind::UpcSticker, &parsed.records, &table, &options)
            .unwrap_err();
    assert!(matches!(err, EtiquetaError::NoDestinationRows { .. }));
}

#[test]
fn disjoint_inputs_report_no_overlap() {
    let extractor = MockExtractor {
        documents: vec![barras_document()],
    };
    let parsed = extract_records(&[&[0]], &extractor, 2.0).unwrap();
    let wb = workbook(&[
        &["x"],
        &["STYLE", "OP", "PROTO", "DESTINO", "PO", "DESCRIPCION COLOR", "S"],
        &["ZZ999", "OP1", "PR1", "USA", "1", "GREEN", "4"],
    ]);
    let table = prepare_sheet(&wb, &schema::UPC_STICKER).unwrap();
    let err = reconcile::build_report(
        ReportKind::UpcSticker,
        &parsed.records,
        &table,
        &ReconcileOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, EtiquetaError::NoOverlap));
}

#[test]
fn missing_required_columns_are_named() {
    let wb = workbook(&[&["x"], &["STYLE", "DESTINO", "S"], &["TP214", "USA", "1"]]);
    let err = prepare_sheet(&wb, &schema::UPC_STICKER).unwrap_err();
    match err {
        EtiquetaError::MissingColumns { missing, .. } => {
            assert!(missing.contains(&"PO#".to_string()));
            assert!(missing.contains(&"PEDIDO PRODUCCION COFACO".to_string()));
        }
        other => panic!("expected MissingColumns, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// Top-level entry point
// ---------------------------------------------------------------------------
#[test]
fn build_report_without_pdf_records_fails_before_reading_sheet() {
    let extractor = MockExtractor {
        documents: vec![vec![page(1, &["nothing to see here"])]],
    };
    let profile = load_preset("upc-sticker").unwrap();
    let err = build_report(b"not a workbook", &[&[0]], &extractor, &profile, &[]).unwrap_err();
    assert!(matches!(err, EtiquetaError::NoPdfRecords));
}

#[test]
fn build_report_rejects_unreadable_workbook() {
    let extractor = MockExtractor {
        documents: vec![barras_document()],
    };
    let profile = load_preset("upc-sticker").unwrap();
    let err = build_report(b"not a workbook", &[&[0]], &extractor, &profile, &[]).unwrap_err();
    assert!(matches!(err, EtiquetaError::Workbook(_)));
}

use etiqueta_core::model::Row;
use etiqueta_core::parsing::ParsedRecords;
use std::fmt::Write;
use std::path::PathBuf;

/// Widest cells are clipped to this many characters.
const MAX_WIDTH: usize = 32;

pub fn format_parsed(parsed: &ParsedRecords, paths: &[PathBuf]) -> String {
    let mut out = String::new();

    for doc in &parsed.documents {
        let name = paths
            .get(doc.index)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("document {}", doc.index));
        let _ = writeln!(
            out,
            "{}: {} layout, {} line(s), {} record(s)",
            name, doc.format, doc.lines, doc.records
        );
    }
    let _ = writeln!(out);

    let columns = ["STYLE", "COLOR CODE", "COLOR NAME", "SIZE", "UPC CODE"];
    let rows: Vec<Vec<&str>> = parsed
        .records
        .iter()
        .map(|r| {
            vec![
                r.style.as_str(),
                r.color_code.as_str(),
                r.color_name.as_str(),
                r.size.as_str(),
                r.upc_code.as_str(),
            ]
        })
        .collect();
    out.push_str(&render(&columns, &rows));

    if !parsed.skipped_lines.is_empty() {
        let _ = writeln!(out, "\nSkipped lines:");
        for s in &parsed.skipped_lines {
            let _ = writeln!(out, "  [doc {}] {}  ({})", s.document, s.line_text, s.reason);
        }
    }

    out
}

pub fn format_rows(columns: &[String], rows: &[Row]) -> String {
    let headers: Vec<&str> = columns.iter().map(String::as_str).collect();
    let cells: Vec<Vec<&str>> = rows
        .iter()
        .map(|r| {
            headers
                .iter()
                .map(|c| r.get(*c).map(String::as_str).unwrap_or(""))
                .collect()
        })
        .collect();
    render(&headers, &cells)
}

fn render(headers: &[&str], rows: &[Vec<&str>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_WIDTH)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let rule_refs: Vec<&str> = rule.iter().map(String::as_str).collect();
    push_line(&mut out, &rule_refs, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let parts: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).copied().unwrap_or("");
            let clipped: String = cell.chars().take(*w).collect();
            format!("{:<width$}", clipped, width = *w)
        })
        .collect();
    let _ = writeln!(out, "  {}", parts.join("  ").trim_end());
}

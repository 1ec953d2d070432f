use tracing::debug;

use crate::extraction::{PageItems, TextItem};
use crate::text::normalize::collapse_ws;

/// Vertical distance from a line's anchor within which an item joins that line.
pub const DEFAULT_LINE_TOLERANCE: f32 = 2.0;

/// Text items judged co-linear, in left-to-right order.
#[derive(Debug, Clone)]
pub struct LogicalLine {
    pub page: usize,
    /// `y` of the first item that opened the line.
    pub anchor_y: f32,
    pub items: Vec<TextItem>,
}

impl LogicalLine {
    pub fn text(&self) -> String {
        let joined = self
            .items
            .iter()
            .map(|i| i.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        collapse_ws(&joined)
    }
}

/// Group one page's items into logical lines, top to bottom.
///
/// Items are ordered by descending `y`. A new line starts whenever an item
/// is farther than `tolerance` from the current line's anchor. Within a line
/// items are ordered by ascending `x`. Rotated and multi-column layouts are
/// not handled.
pub fn assemble_page(page: &PageItems, tolerance: f32) -> Vec<LogicalLine> {
    let mut items: Vec<&TextItem> = page
        .items
        .iter()
        .filter(|i| !i.text.trim().is_empty())
        .collect();
    items.sort_by(|a, b| b.y.total_cmp(&a.y).then_with(|| a.x.total_cmp(&b.x)));

    let mut lines: Vec<LogicalLine> = Vec::new();
    let mut current: Option<LogicalLine> = None;

    for item in items {
        let joins = current
            .as_ref()
            .is_some_and(|line| (item.y - line.anchor_y).abs() <= tolerance);

        if joins {
            if let Some(line) = current.as_mut() {
                line.items.push(item.clone());
            }
        } else {
            if let Some(done) = current.take() {
                lines.push(done);
            }
            current = Some(LogicalLine {
                page: page.page_number,
                anchor_y: item.y,
                items: vec![item.clone()],
            });
        }
    }
    if let Some(done) = current {
        lines.push(done);
    }

    for line in &mut lines {
        line.items.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines.retain(|l| !l.text().is_empty());
    lines
}

/// Assemble every page of a document and return its line texts in page order.
pub fn assemble_lines(pages: &[PageItems], tolerance: f32) -> Vec<String> {
    let mut out = Vec::new();
    for page in pages {
        let lines = assemble_page(page, tolerance);
        debug!(
            page = page.page_number,
            items = page.items.len(),
            lines = lines.len(),
            "assembled page"
        );
        out.extend(lines.iter().map(LogicalLine::text));
    }
    out
}

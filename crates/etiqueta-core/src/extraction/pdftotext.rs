use crate::error::EtiquetaError;
use crate::extraction::{PageItems, PdfExtractor, TextItem};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox` to get one positioned entry per word.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageItems>, EtiquetaError> {
        // Write PDF bytes to a temp file
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| EtiquetaError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| EtiquetaError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    EtiquetaError::PdftotextNotFound
                } else {
                    EtiquetaError::Extraction(format!("pdftotext -bbox failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(EtiquetaError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        parse_bbox_xml(&xml)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// A `<word>` whose text has not been read yet.
struct OpenWord {
    x_min: f32,
    y_min: f32,
    text: String,
}

/// Parse `pdftotext -bbox` XHTML into pages of words.
///
/// pdftotext measures `yMin` downward from the top of the page; it is
/// flipped against the page height so `y` grows upward.
pub(crate) fn parse_bbox_xml(xml: &str) -> Result<Vec<PageItems>, EtiquetaError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<PageItems> = Vec::new();
    let mut page_height: f32 = 0.0;
    let mut word: Option<OpenWord> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => {
                    page_height = attr_f32(&e, b"height").unwrap_or(0.0);
                    pages.push(PageItems {
                        page_number: pages.len() + 1,
                        items: Vec::new(),
                    });
                }
                b"word" => {
                    word = Some(OpenWord {
                        x_min: attr_f32(&e, b"xMin").unwrap_or(0.0),
                        y_min: attr_f32(&e, b"yMin").unwrap_or(0.0),
                        text: String::new(),
                    });
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let Some(w) = word.as_mut() {
                    match t.unescape() {
                        Ok(s) => w.text.push_str(&s),
                        Err(_) => w.text.push_str(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"word" => {
                if let (Some(w), Some(page)) = (word.take(), pages.last_mut()) {
                    let text = w.text.trim().to_string();
                    if !text.is_empty() {
                        page.items.push(TextItem {
                            text,
                            x: w.x_min,
                            y: page_height - w.y_min,
                            page: page.page_number,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(EtiquetaError::Extraction(format!(
                    "invalid pdftotext bbox output at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    Ok(pages)
}

fn attr_f32(tag: &BytesStart<'_>, name: &[u8]) -> Option<f32> {
    tag.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| {
            let value = a.unescape_value().ok()?;
            value.trim().parse().ok()
        })
}

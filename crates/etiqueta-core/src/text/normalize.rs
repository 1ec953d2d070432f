use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Trim and upper-case a cell value.
pub fn normalize_text(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Decompose to NFD and drop combining marks: "Línea" -> "Linea".
pub fn remove_accents(raw: &str) -> String {
    raw.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize a header label to a matching key.
///
/// Steps:
/// 1. Strip accents
/// 2. Upper-case
/// 3. Collapse every run of characters other than `A-Z`, `0-9` and `#` to one space
/// 4. Trim
pub fn normalize_token(raw: &str) -> String {
    let folded = remove_accents(raw).to_uppercase();

    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;
    for c in folded.chars() {
        if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '#' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Collapse internal whitespace runs to single spaces and trim.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Key used by the reconciler: accent-stripped, upper-cased, trimmed.
pub fn join_key_part(raw: &str) -> String {
    remove_accents(raw).trim().to_uppercase()
}

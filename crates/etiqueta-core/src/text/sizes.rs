use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use rust_decimal::Decimal;

use crate::model::Market;

/// Canonical sizes in sort order.
pub const SIZE_ORDER: [&str; 8] = ["XXS", "XS", "S", "M", "L", "XL", "2XL", "3XL"];

/// Sort position for sizes outside the canonical vocabulary.
pub const UNKNOWN_SIZE_INDEX: usize = 999;

/// Raw size label (trimmed, upper-cased) -> canonical size.
static SIZE_MAP: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("XXS", "XXS"),
        ("XS", "XS"),
        ("S", "S"),
        ("M", "M"),
        ("L", "L"),
        ("XL", "XL"),
        ("XXL", "2XL"),
        ("2XL", "2XL"),
        ("XXXL", "3XL"),
        ("3XL", "3XL"),
        ("XSS", "XS"),
        ("SMALL", "S"),
        ("MEDIUM", "M"),
        ("LARGE", "L"),
        ("EXTRA SMALL", "XS"),
        ("EXTRA LARGE", "XL"),
        ("EXTRA EXTRA LARGE", "2XL"),
        ("EXTRA EXTRA EXTRA LARGE", "3XL"),
        ("CHICO", "S"),
        ("MEDIANO", "M"),
        ("GRANDE", "L"),
    ])
});

static CANADA_SIZES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("S", "S/P"),
        ("M", "M/M"),
        ("L", "L/G"),
        ("XL", "XL/TG"),
        ("2XL", "2XL/TTG"),
        ("3XL", "3XL/TTTG"),
    ])
});

static BRAZIL_SIZES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("XS", "XS/PP"),
        ("S", "S/P"),
        ("M", "M/M"),
        ("L", "L/G"),
        ("XL", "XL/GG"),
        ("2XL", "XXL/XGG"),
        ("XXL", "XXL/XGG"),
    ])
});

/// Map a raw size label to its canonical token.
///
/// Unknown labels come back trimmed and upper-cased, never as an error.
pub fn norm_size(raw: &str) -> String {
    let key = raw.trim().to_uppercase();
    match SIZE_MAP.get(key.as_str()) {
        Some(canonical) => canonical.to_string(),
        None => key,
    }
}

/// True when the trimmed, upper-cased label is a canonical size or a known variant.
pub fn is_size_label(raw: &str) -> bool {
    SIZE_MAP.contains_key(raw.trim().to_uppercase().as_str())
}

/// Position of a canonical size in [`SIZE_ORDER`], [`UNKNOWN_SIZE_INDEX`] otherwise.
pub fn size_index(size: &str) -> usize {
    let key = size.trim().to_uppercase();
    SIZE_ORDER
        .iter()
        .position(|s| *s == key)
        .unwrap_or(UNKNOWN_SIZE_INDEX)
}

/// Parse a quantity cell. Accepts plain decimals and scientific notation.
pub fn parse_quantity(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Whether a quantity cell counts as present.
///
/// Blank, `0` and `0.0` are absent. Numeric values must be strictly
/// positive. Non-numeric text is a presence marker and counts as present.
pub fn has_qty(raw: &str) -> bool {
    let s = raw.trim();
    if s.is_empty() || s == "0" || s == "0.0" {
        return false;
    }
    match parse_quantity(s) {
        Some(n) => n > Decimal::ZERO,
        None => true,
    }
}

/// Market-specific display label for a canonical size, if the market remaps it.
pub fn market_size_label(market: Market, size: &str) -> Option<&'static str> {
    let table = match market {
        Market::Canada => &CANADA_SIZES,
        Market::Brazil => &BRAZIL_SIZES,
        Market::Japan => return None,
    };
    table.get(size.trim().to_uppercase().as_str()).copied()
}

use std::collections::{HashMap, HashSet};

use crate::model::{cell, Row};
use crate::text::normalize::join_key_part;

const KEY_SEPARATOR: &str = "||";

fn composite_key(row: &Row, keys: &[&str]) -> String {
    keys.iter()
        .map(|k| join_key_part(cell(row, k)))
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}

/// Inner join on accent- and case-insensitive composite keys.
///
/// Every right row sharing a left row's key produces its own merged row,
/// in left order then right order. Merged rows start from the left row and
/// take the right row's value for any column both sides carry.
pub fn inner_join(left: &[Row], right: &[Row], left_keys: &[&str], right_keys: &[&str]) -> Vec<Row> {
    let mut index: HashMap<String, Vec<&Row>> = HashMap::new();
    for row in right {
        index
            .entry(composite_key(row, right_keys))
            .or_default()
            .push(row);
    }

    let mut merged = Vec::new();
    for l in left {
        let Some(matches) = index.get(&composite_key(l, left_keys)) else {
            continue;
        };
        for r in matches {
            let mut row = l.clone();
            for (k, v) in r.iter() {
                row.insert(k.clone(), v.clone());
            }
            merged.push(row);
        }
    }
    merged
}

/// Keep the first row for every distinct composite key.
pub fn dedupe_by_keys(rows: Vec<Row>, keys: &[&str]) -> Vec<Row> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(composite_key(row, keys)))
        .collect()
}

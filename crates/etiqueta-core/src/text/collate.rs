use std::cmp::Ordering;

use super::normalize::remove_accents;
use super::sizes::size_index;
use crate::model::{cell, Row};

/// One level of a multi-column row ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey<'a> {
    /// Compare the column's text with [`compare`].
    Text(&'a str),
    /// Compare the column by canonical size order.
    Size(&'a str),
}

/// Stable sort by `keys` in order; missing cells compare as "".
pub fn sort_rows(rows: &mut [Row], keys: &[SortKey<'_>]) {
    rows.sort_by(|a, b| {
        for key in keys {
            let ord = match *key {
                SortKey::Text(col) => compare(cell(a, col), cell(b, col)),
                SortKey::Size(col) => size_index(cell(a, col)).cmp(&size_index(cell(b, col))),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

/// Compare two cell values in the order a Spanish reader expects.
///
/// Accents and case are folded away, runs of ASCII digits compare by
/// numeric value ("PO9" < "PO10"), and fully equal folded strings fall
/// back to comparing the raw text so the order stays total.
pub fn compare(a: &str, b: &str) -> Ordering {
    let fa: Vec<char> = fold(a);
    let fb: Vec<char> = fold(b);
    compare_natural(&fa, &fb).then_with(|| a.cmp(b))
}

fn fold(s: &str) -> Vec<char> {
    remove_accents(s).to_lowercase().chars().collect()
}

fn compare_natural(a: &[char], b: &[char]) -> Ordering {
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let start_a = i;
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            let start_b = j;
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
            let ord = compare_digits(&a[start_a..i], &b[start_b..j]);
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = a[i].cmp(&b[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

/// Numeric comparison of two digit runs of any length.
fn compare_digits(a: &[char], b: &[char]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(run: &[char]) -> &[char] {
    let first = run.iter().position(|c| *c != '0').unwrap_or(run.len());
    &run[first..]
}

//! Canonicalization of raw cell values: model names, ids, and prices.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::source::Cell;

/// Trims, collapses internal whitespace, and fixes the `iPhone` casing of a
/// leading `iphone` (any case). Blank input yields an empty string.
#[must_use]
pub fn normalize_model(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let has_iphone_prefix = collapsed
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("iphone"));
    if has_iphone_prefix {
        format!("iPhone{}", &collapsed[6..])
    } else {
        collapsed
    }
}

/// Slug for a model: lower-cased, whitespace runs replaced by `-`, anything
/// outside `[a-z0-9-]` dropped.
///
/// `derive_id("iPhone 13 Pro") == "iphone-13-pro"`.
#[must_use]
pub fn derive_id(model: &str) -> String {
    model
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Parses a price cell written in the upstream sheet convention: `.` is a
/// thousands separator and `,` the decimal mark (`"1.299,50"` → `1299.50`).
///
/// Numeric cells are taken as-is. For text, everything except digits, `,`,
/// `.` and `-` is stripped first, so currency labels (`"Kz 450.000"`) are
/// tolerated. Returns `None` for blank cells or anything that still fails to
/// parse.
///
/// This is lossy for text that genuinely uses `.` as the decimal mark
/// (`"12.99"` reads as `1299`). Sheets in that format should store numeric
/// cells instead of text.
#[must_use]
pub fn parse_localized_number(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(n) => Decimal::try_from(*n).ok(),
        Cell::Text(s) => parse_localized_str(s),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

fn parse_localized_str(raw: &str) -> Option<Decimal> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if kept.is_empty() {
        return None;
    }

    let without_thousands = kept.replace('.', "");
    let normalized = without_thousands.replacen(',', ".", 1);
    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

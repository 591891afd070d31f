//! Internal helpers for parsing stored values and normalizing user input.
//!
//! These utilities are **not** part of the public API.

use chrono::{NaiveDate, NaiveDateTime};
use unicode_normalization::UnicodeNormalization;

use crate::{DEFAULT_CATEGORY, ENTRY_DATE_FORMAT};

const ENTRY_DAY_FORMAT: &str = "%d.%m.%Y";

/// Lenient parse of a stored `history.date`.
///
/// Accepts `day.month.year hour:minute` or, failing that, a leading
/// `day.month.year` token. Anything else yields `None` and the caller drops
/// the entry from date-based views.
pub(crate) fn parse_entry_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, ENTRY_DATE_FORMAT) {
        return Some(dt.date());
    }
    let day = raw.split_whitespace().next()?;
    NaiveDate::parse_from_str(day, ENTRY_DAY_FORMAT).ok()
}

/// Category as written to the ledger: the caller's text untouched, or
/// `Other` when missing or blank.
pub(crate) fn stored_category(input: Option<String>) -> String {
    input
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

/// Grouping label for a stored category: trimmed, NFC-normalized, `Other`
/// when blank.
pub(crate) fn category_label(input: Option<&str>) -> String {
    let normalized: String = input.map(str::trim).unwrap_or_default().nfc().collect();
    if normalized.is_empty() {
        return DEFAULT_CATEGORY.to_string();
    }
    normalized
}

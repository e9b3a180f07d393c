//! Lenient cell parsing
//!
//! Sheets come from hand-maintained spreadsheets. A cell that cannot be
//! read degrades to a default and the caller records a warning.

use chrono::{Duration, NaiveDate};

/// Day zero of spreadsheet serial dates
fn serial_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Largest serial day spreadsheets accept (9999-12-31)
const MAX_SERIAL: f64 = 2_958_465.0;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Outcome of reading one cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<T> {
    Blank,
    Value(T),
    Invalid,
}

impl<T> Cell<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Cell::Value(v) => Some(v),
            _ => None,
        }
    }
}

pub fn parse_date(raw: &str) -> Cell<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Cell::Blank;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Cell::Value(date);
        }
    }

    // ISO timestamps keep only their date part
    if raw.len() > 10 && raw.is_char_boundary(10) {
        if let Ok(date) = NaiveDate::parse_from_str(&raw[..10], "%Y-%m-%d") {
            return Cell::Value(date);
        }
    }

    match raw.replace(',', ".").parse::<f64>() {
        Ok(serial) if serial >= 1.0 && serial <= MAX_SERIAL => serial_epoch()
            .and_then(|epoch| epoch.checked_add_signed(Duration::days(serial.floor() as i64)))
            .map_or(Cell::Invalid, Cell::Value),
        _ => Cell::Invalid,
    }
}

/// Amounts with thousands separators and a currency suffix
///
/// A `,` or `.` is a decimal point only when it is the last separator,
/// occurs once, and is followed by one or two digits. Every other
/// separator groups thousands.
pub fn parse_amount(raw: &str) -> Cell<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Cell::Blank;
    }

    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return Cell::Invalid;
    }

    let decimal = kept.rfind([',', '.']).filter(|&pos| {
        let sep = kept[pos..].chars().next().unwrap_or('.');
        let digits_after = kept.len() - pos - 1;
        kept.matches(sep).count() == 1 && (1..=2).contains(&digits_after)
    });

    let normalized: String = kept
        .char_indices()
        .filter_map(|(i, c)| match c {
            ',' | '.' if Some(i) == decimal => Some('.'),
            ',' | '.' => None,
            other => Some(other),
        })
        .collect();

    match normalized.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Cell::Value(amount),
        _ => Cell::Invalid,
    }
}

pub fn format_date(date: Option<&NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

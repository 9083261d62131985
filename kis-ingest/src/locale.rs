//! Locale-aware parsing of currency and date strings as they appear in
//! bank exports: shekel/dollar/euro symbols, two decimal conventions, and
//! day-first dates.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Parse a raw amount cell into a non-negative value.
///
/// Strips currency symbols and whitespace, then decides the decimal
/// convention by the positions of the last comma and last dot: a comma to
/// the right of the dot means European style (dot = thousands, comma =
/// decimal); otherwise commas are thousands separators. Unparseable input
/// normalizes to 0.0, which downstream filters drop.
pub fn parse_amount(raw: &str) -> f64 {
    let mut cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '₪' | '$' | '€') && !c.is_whitespace())
        .collect();

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');
    if last_comma > last_dot {
        cleaned = cleaned.replace('.', "").replacen(',', ".", 1);
    } else {
        cleaned = cleaned.replace(',', "");
    }
    cleaned.retain(|c| c.is_ascii_digit() || c == '.' || c == '-');

    cleaned.parse::<f64>().map(f64::abs).unwrap_or(0.0)
}

fn day_first_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})$").expect("invalid date regex")
    })
}

fn iso_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})").expect("invalid date regex"))
}

/// Month-name formats seen in English exports ("Mar 5, 2026", "5 Mar 2026").
const TEXTUAL_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%d %b %Y", "%d %B %Y"];

/// Parse a raw date cell. Tried in order: day-first `D/M/YYYY` (also with
/// `-` or `.` separators), ISO `YYYY-MM-DD`, then month-name forms.
/// Anything else, including impossible calendar dates, yields None and the
/// row is dropped downstream.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    if let Some(caps) = day_first_re().captures(trimmed) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = iso_re().captures(trimmed) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    TEXTUAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

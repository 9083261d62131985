//! Calendar helpers shared by the budget engine and month-end maintenance.

use chrono::{Datelike, Days, NaiveDate};

/// Days left in `today`'s month, counting today itself.
pub fn days_remaining_in_month(today: NaiveDate) -> u32 {
    last_day_of_month(today.year(), today.month()).day() - today.day() + 1
}

/// Last calendar day of the given month.
pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_y, next_m) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    // First of next month always exists, as does the day before it; the
    // fallback is never hit for valid (year, month) inputs.
    NaiveDate::from_ymd_opt(next_y, next_m, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// `YYYY-MM` key for a date, matching the keys used for month grouping and
/// the persisted last-active-month marker.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// The day before `today`.
pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

/// First day of the month `months_back` months before `today`'s month.
/// Duplicate review reads the store from this date onward.
pub fn month_window_start(today: NaiveDate, months_back: u32) -> NaiveDate {
    let months0 = today.year() as i64 * 12 + today.month0() as i64 - months_back as i64;
    let (year, month) = (months0.div_euclid(12) as i32, months0.rem_euclid(12) as u32 + 1);
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_days_remaining_counts_today() {
        assert_eq!(days_remaining_in_month(d(2026, 2, 28)), 1);
        assert_eq!(days_remaining_in_month(d(2026, 2, 1)), 28);
        assert_eq!(days_remaining_in_month(d(2026, 1, 17)), 15);
    }

    #[test]
    fn test_last_day_of_month_handles_december() {
        assert_eq!(last_day_of_month(2025, 12), d(2025, 12, 31));
        assert_eq!(last_day_of_month(2028, 2), d(2028, 2, 29));
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key(d(2026, 3, 5)), "2026-03");
    }

    #[test]
    fn test_yesterday_crosses_month_boundary() {
        assert_eq!(yesterday(d(2026, 3, 1)), d(2026, 2, 28));
    }

    #[test]
    fn test_month_window_start() {
        assert_eq!(month_window_start(d(2026, 3, 15), 2), d(2026, 1, 1));
        assert_eq!(month_window_start(d(2026, 1, 20), 2), d(2025, 11, 1));
        assert_eq!(month_window_start(d(2026, 3, 15), 0), d(2026, 3, 1));
    }
}

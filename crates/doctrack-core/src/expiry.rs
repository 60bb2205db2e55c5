use chrono::{Days, NaiveDate};

/// Inclusive date window `[today, today + days]` used by the expiry queries.
///
/// Returns `None` for a negative horizon or when the end date would leave the
/// supported calendar range.
#[must_use]
pub fn expiry_window(today: NaiveDate, days: i64) -> Option<(NaiveDate, NaiveDate)> {
    let days = u64::try_from(days).ok()?;
    let end = today.checked_add_days(Days::new(days))?;
    Some((today, end))
}

#[must_use]
pub fn within_window(date: NaiveDate, window: (NaiveDate, NaiveDate)) -> bool {
    date >= window.0 && date <= window.1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn window_spans_inclusive_range() {
        let window = expiry_window(date(2024, 1, 15), 30).expect("window");
        assert_eq!(window, (date(2024, 1, 15), date(2024, 2, 14)));
        assert!(within_window(date(2024, 1, 15), window));
        assert!(within_window(date(2024, 2, 14), window));
        assert!(!within_window(date(2024, 2, 15), window));
        assert!(!within_window(date(2024, 1, 14), window));
    }

    #[test]
    fn zero_days_is_today_only() {
        let today = date(2024, 3, 1);
        assert_eq!(expiry_window(today, 0), Some((today, today)));
    }

    #[test]
    fn negative_days_has_no_window() {
        assert_eq!(expiry_window(date(2024, 3, 1), -1), None);
    }

    #[test]
    fn overflow_has_no_window() {
        assert_eq!(expiry_window(NaiveDate::MAX, 1), None);
    }
}

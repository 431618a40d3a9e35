use chrono::{Datelike, NaiveDate};

/// Returns the canonical storage key for a calendar day (`YYYY-MM-DD`).
///
/// Month and day are zero-padded so that lexical ordering of keys matches
/// chronological ordering of the days they denote. Two dates produce the
/// same key exactly when they denote the same calendar day.
pub fn entry_key(date: NaiveDate) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Parses a storage key back into a date. Returns `None` for anything
/// that is not a valid `YYYY-MM-DD` day.
pub fn parse_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("first of month is always valid");
    first_of_next
        .pred_opt()
        .expect("day before first of month is always valid")
        .day()
}

/// Weekday of the first day of the month containing `date`, with
/// Sunday = 0 through Saturday = 6 (calendar-grid convention).
pub fn first_weekday_of_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).expect("day 1 is always valid");
    first.weekday().num_days_from_sunday()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn key_is_zero_padded() {
        assert_eq!(entry_key(d(2025, 3, 7)), "2025-03-07");
        assert_eq!(entry_key(d(2025, 11, 23)), "2025-11-23");
    }

    #[test]
    fn key_round_trips_through_parse() {
        let date = d(2024, 2, 29);
        assert_eq!(parse_key(&entry_key(date)), Some(date));
    }

    #[test]
    fn keys_are_equal_only_for_the_same_day() {
        assert_eq!(entry_key(d(2025, 1, 2)), entry_key(d(2025, 1, 2)));
        assert_ne!(entry_key(d(2025, 1, 2)), entry_key(d(2025, 2, 1)));
    }

    #[test]
    fn lexical_order_matches_chronological_order() {
        let mut keys = vec![
            entry_key(d(2025, 12, 1)),
            entry_key(d(2025, 2, 28)),
            entry_key(d(2024, 6, 15)),
        ];
        keys.sort();
        assert_eq!(keys, vec!["2024-06-15", "2025-02-28", "2025-12-01"]);
    }

    #[test]
    fn parse_key_rejects_malformed_input() {
        assert_eq!(parse_key("not-a-date"), None);
        assert_eq!(parse_key("2025-13-01"), None);
        assert_eq!(parse_key("2025-02-30"), None);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(d(2024, 2, 10)), 29);
        assert_eq!(days_in_month(d(2025, 2, 10)), 28);
        assert_eq!(days_in_month(d(2025, 12, 31)), 31);
        assert_eq!(days_in_month(d(2025, 4, 1)), 30);
    }

    #[test]
    fn first_weekday_uses_sunday_zero() {
        // June 2025 starts on a Sunday, September 2025 on a Monday.
        assert_eq!(first_weekday_of_month(d(2025, 6, 15)), 0);
        assert_eq!(first_weekday_of_month(d(2025, 9, 20)), 1);
    }
}

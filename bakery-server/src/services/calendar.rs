//! UTC calendar arithmetic on epoch milliseconds

use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Utc, Weekday};

fn to_datetime(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Move forward `days` business days (Monday to Friday), keeping the time of day.
///
/// Counting starts on the day after `start_ms`; weekend days are skipped
/// without being counted.
pub fn add_business_days(start_ms: i64, days: u32) -> i64 {
    let mut at = to_datetime(start_ms);
    let mut added = 0;
    while added < days {
        at += Duration::days(1);
        if !matches!(at.weekday(), Weekday::Sat | Weekday::Sun) {
            added += 1;
        }
    }
    at.timestamp_millis()
}

/// The same instant `months` calendar months earlier (clamped to month end)
pub fn months_before(now_ms: i64, months: u32) -> i64 {
    let now = to_datetime(now_ms);
    now.checked_sub_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .timestamp_millis()
}

/// `[start, end)` of a calendar month in UTC, as epoch milliseconds
pub fn month_bounds(year: i32, month: u32) -> Option<(i64, i64)> {
    let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()?;
    let end = start.checked_add_months(Months::new(1))?;
    Some((start.timestamp_millis(), end.timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_business_days_midweek() {
        // Monday + 3 business days = Thursday, same time of day
        assert_eq!(add_business_days(ms(2024, 3, 4, 10), 3), ms(2024, 3, 7, 10));
    }

    #[test]
    fn test_business_days_skip_weekend() {
        // Thursday + 3 business days = Tuesday
        assert_eq!(add_business_days(ms(2024, 3, 7, 9), 3), ms(2024, 3, 12, 9));
        // Friday + 1 business day = Monday
        assert_eq!(add_business_days(ms(2024, 3, 8, 9), 1), ms(2024, 3, 11, 9));
    }

    #[test]
    fn test_business_days_from_weekend() {
        // Saturday + 3 business days = Wednesday
        assert_eq!(add_business_days(ms(2024, 3, 9, 12), 3), ms(2024, 3, 13, 12));
    }

    #[test]
    fn test_zero_business_days() {
        assert_eq!(add_business_days(ms(2024, 3, 9, 12), 0), ms(2024, 3, 9, 12));
    }

    #[test]
    fn test_months_before_clamps() {
        assert_eq!(months_before(ms(2024, 3, 31, 8), 1), ms(2024, 2, 29, 8));
        assert_eq!(months_before(ms(2024, 1, 15, 8), 1), ms(2023, 12, 15, 8));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2024, 12),
            Some((ms(2024, 12, 1, 0), ms(2025, 1, 1, 0)))
        );
        assert_eq!(month_bounds(2024, 13), None);
    }
}

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveDateTime};

/// Parse an ISO-8601 date string into a local timestamp.
///
/// Accepts RFC 3339 (with offset), a naive `YYYY-MM-DDTHH:MM:SS`, a
/// space-separated variant, or a bare `YYYY-MM-DD` (taken as local
/// midnight). Returns `None` for anything else; callers treat an
/// unparsable date the same as a missing one.
pub fn parse_date(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return naive.and_local_timezone(Local).earliest();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| naive.and_local_timezone(Local).earliest());
    }
    None
}

/// Seconds since the epoch for a date string, or `None` if unparsable.
pub fn timestamp(value: &str) -> Option<i64> {
    parse_date(value).map(|dt| dt.timestamp())
}

/// Monday of the week containing `date` (ISO week, Monday = day 0).
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Whether `dt` falls on the same local calendar day as `now`.
pub fn is_same_day(dt: DateTime<Local>, now: DateTime<Local>) -> bool {
    dt.date_naive() == now.date_naive()
}

/// Whether `dt` fell on the local calendar day before `now`.
pub fn is_yesterday(dt: DateTime<Local>, now: DateTime<Local>) -> bool {
    dt.date_naive() == now.date_naive() - Days::new(1)
}

/// Whether `dt` falls within the Monday-anchored week containing `now`.
pub fn is_in_week(dt: DateTime<Local>, now: DateTime<Local>) -> bool {
    let start = week_start(now.date_naive());
    let date = dt.date_naive();
    date >= start && date < start + Days::new(7)
}

/// Whether `dt` falls within the local calendar month containing `now`.
pub fn is_in_month(dt: DateTime<Local>, now: DateTime<Local>) -> bool {
    dt.year() == now.year() && dt.month() == now.month()
}

/// Format a stored date string for display. Falls back to the raw string
/// when the date doesn't parse.
pub fn format_display_date(value: &str) -> String {
    match parse_date(value) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_date_variants() {
        assert!(parse_date("2025-06-18T09:30:00").is_some());
        assert!(parse_date("2025-06-18 09:30:00").is_some());
        assert!(parse_date("2025-06-18").is_some());
        assert!(parse_date("2025-06-18T09:30:00+02:00").is_some());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2025-13-40"), None);
    }

    #[test]
    fn test_bare_date_is_local_midnight() {
        let dt = parse_date("2025-06-18").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 6, 18).unwrap());
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-06-18 is a Wednesday; its week starts on Monday 2025-06-16.
        let wed = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        assert_eq!(week_start(wed), NaiveDate::from_ymd_opt(2025, 6, 16).unwrap());
        // A Monday is its own week start.
        let mon = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        assert_eq!(week_start(mon), mon);
        // A Sunday belongs to the preceding Monday's week.
        let sun = NaiveDate::from_ymd_opt(2025, 6, 22).unwrap();
        assert_eq!(week_start(sun), mon);
    }

    #[test]
    fn test_same_day_window() {
        let now = at(2025, 6, 18, 12);
        assert!(is_same_day(parse_date("2025-06-18T00:00:00").unwrap(), now));
        assert!(is_same_day(parse_date("2025-06-18T23:59:59").unwrap(), now));
        assert!(!is_same_day(parse_date("2025-06-17T23:59:59").unwrap(), now));
        assert!(!is_same_day(parse_date("2025-06-19T00:00:00").unwrap(), now));
    }

    #[test]
    fn test_week_window_boundaries() {
        let now = at(2025, 6, 18, 12);
        assert!(is_in_week(parse_date("2025-06-16T00:00:00").unwrap(), now));
        assert!(is_in_week(parse_date("2025-06-22T23:00:00").unwrap(), now));
        assert!(!is_in_week(parse_date("2025-06-15T23:00:00").unwrap(), now));
        assert!(!is_in_week(parse_date("2025-06-23T00:00:00").unwrap(), now));
    }

    #[test]
    fn test_month_window() {
        let now = at(2025, 6, 18, 12);
        assert!(is_in_month(parse_date("2025-06-01").unwrap(), now));
        assert!(is_in_month(parse_date("2025-06-30").unwrap(), now));
        assert!(!is_in_month(parse_date("2025-05-31").unwrap(), now));
        assert!(!is_in_month(parse_date("2024-06-15").unwrap(), now));
    }

    #[test]
    fn test_yesterday() {
        let now = at(2025, 6, 18, 9);
        assert!(is_yesterday(parse_date("2025-06-17T22:00:00").unwrap(), now));
        assert!(!is_yesterday(parse_date("2025-06-18T01:00:00").unwrap(), now));
        assert!(!is_yesterday(parse_date("2025-06-16T23:00:00").unwrap(), now));
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date("2025-06-18T09:30:00"), "2025-06-18");
        assert_eq!(format_display_date("junk"), "junk");
    }
}

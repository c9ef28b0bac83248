//! Date operators for `created_at` / `modified_at` criteria and
//! date-typed properties.
//!
//! `now` is threaded in as a parameter so relative operators stay
//! deterministic under test; callers pass `Utc::now()` in production.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Evaluate a date operator. A `None` date never matches anything.
pub fn evaluate(
    date: Option<DateTime<Utc>>,
    operator: &str,
    value: &str,
    now: DateTime<Utc>,
) -> bool {
    let Some(date) = date else {
        return false;
    };

    // Component comparisons carry their family in the operator prefix
    if let Some(cmp) = operator.strip_prefix("day of week ") {
        return compare_component(i64::from(date.weekday().num_days_from_sunday()), cmp, value);
    }
    if let Some(cmp) = operator.strip_prefix("day of month ") {
        return compare_component(i64::from(date.day()), cmp, value);
    }
    if let Some(cmp) = operator.strip_prefix("month ") {
        return compare_component(i64::from(date.month()), cmp, value);
    }
    if let Some(cmp) = operator.strip_prefix("year ") {
        return compare_component(i64::from(date.year()), cmp, value);
    }

    match operator {
        "is" => parse_value(value).is_some_and(|v| date.timestamp_millis() == v.timestamp_millis()),
        "is before" => parse_value(value).is_some_and(|v| date < v),
        "is after" => parse_value(value).is_some_and(|v| date > v),
        "time is before" => {
            parse_value(value).is_some_and(|v| date.timestamp_millis() < v.timestamp_millis())
        }
        "time is after" => {
            parse_value(value).is_some_and(|v| date.timestamp_millis() > v.timestamp_millis())
        }
        "time is before now" => date < now,
        "time is after now" => date > now,
        "date is" => parse_value(value).is_some_and(|v| date.date_naive() == v.date_naive()),
        "date is not" => parse_value(value).is_some_and(|v| date.date_naive() != v.date_naive()),
        "date is before" => parse_value(value).is_some_and(|v| date.date_naive() < v.date_naive()),
        "date is after" => parse_value(value).is_some_and(|v| date.date_naive() > v.date_naive()),
        "date is today" => date.date_naive() == now.date_naive(),
        "date is not today" => date.date_naive() != now.date_naive(),
        // Whole-day floor of (now - date)
        "is under x days ago" => parse_days(value).is_some_and(|n| (now - date).num_days() < n),
        "is over x days ago" => parse_days(value).is_some_and(|n| (now - date).num_days() > n),
        _ => false,
    }
}

fn compare_component(actual: i64, comparison: &str, value: &str) -> bool {
    let Ok(wanted) = value.trim().parse::<i64>() else {
        return false;
    };
    match comparison {
        "is" => actual == wanted,
        "is not" => actual != wanted,
        "is before" => actual < wanted,
        "is after" => actual > wanted,
        _ => false,
    }
}

fn parse_days(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Parse a comparison value: full RFC 3339, a local datetime without
/// offset, or a plain date (midnight UTC).
pub fn parse_value(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_none_date_never_matches() {
        let now = at(2024, 6, 1, 12, 0);
        assert!(!evaluate(None, "date is today", "", now));
        assert!(!evaluate(None, "is before", "2030-01-01", now));
    }

    #[test]
    fn test_absolute_comparisons() {
        let now = at(2024, 6, 1, 12, 0);
        let date = Some(at(2024, 5, 17, 9, 30));
        assert!(evaluate(date, "is", "2024-05-17T09:30:00", now));
        assert!(evaluate(date, "is before", "2024-06-01", now));
        assert!(evaluate(date, "is after", "2024-01-01", now));
        assert!(evaluate(date, "time is before", "2024-05-17 09:31", now));
        assert!(evaluate(date, "time is after", "2024-05-17 09:29", now));
        assert!(evaluate(date, "time is before now", "", now));
        assert!(!evaluate(date, "time is after now", "", now));
    }

    #[test]
    fn test_calendar_comparisons() {
        let now = at(2024, 5, 17, 23, 0);
        let date = Some(at(2024, 5, 17, 9, 30));
        assert!(evaluate(date, "date is", "2024-05-17", now));
        assert!(evaluate(date, "date is not", "2024-05-18", now));
        assert!(evaluate(date, "date is before", "2024-05-18", now));
        assert!(evaluate(date, "date is after", "2024-05-16", now));
        assert!(evaluate(date, "date is today", "", now));
        assert!(!evaluate(date, "date is not today", "", now));
    }

    #[test]
    fn test_relative_age_uses_whole_day_floor() {
        let now = at(2024, 6, 10, 12, 0);
        // 2.5 days old -> floors to 2
        let date = Some(at(2024, 6, 8, 0, 0));
        assert!(evaluate(date, "is under x days ago", "3", now));
        assert!(!evaluate(date, "is over x days ago", "2", now));
        assert!(evaluate(date, "is over x days ago", "1", now));
    }

    #[test]
    fn test_component_comparisons() {
        let now = at(2024, 6, 1, 12, 0);
        // 2024-05-17 is a Friday (5 when counting from Sunday = 0)
        let date = Some(at(2024, 5, 17, 9, 30));
        assert!(evaluate(date, "day of week is", "5", now));
        assert!(evaluate(date, "day of week is not", "0", now));
        assert!(evaluate(date, "day of week is after", "4", now));
        assert!(evaluate(date, "day of month is", "17", now));
        assert!(evaluate(date, "day of month is before", "20", now));
        assert!(evaluate(date, "month is", "5", now));
        assert!(evaluate(date, "year is", "2024", now));
        assert!(evaluate(date, "year is after", "2020", now));
    }

    #[test]
    fn test_unparseable_value_is_false() {
        let now = at(2024, 6, 1, 12, 0);
        let date = Some(at(2024, 5, 17, 9, 30));
        assert!(!evaluate(date, "is before", "soonish", now));
        assert!(!evaluate(date, "day of week is", "friday", now));
        assert!(!evaluate(date, "unknown op", "2024-05-17", now));
    }
}

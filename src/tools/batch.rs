use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::SlotIdentifier;

pub const FIRST_LESSON_HOUR: u32 = 10;
/// Lessons start on the hour up to, but not including, this hour.
pub const CLOSING_HOUR: u32 = 18;
pub const MAX_BATCH_DAYS: u32 = 366;

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Hourly slots for each weekday in `days` calendar days from `start`.
///
/// Works on plain calendar dates, so the result never depends on the local
/// timezone.
pub fn weekday_slots(start: NaiveDate, days: u32, subject: &str, teacher: &str) -> Vec<SlotIdentifier> {
    (0..i64::from(days))
        .map(|offset| start + Duration::days(offset))
        .filter(|date| !is_weekend(*date))
        .flat_map(|date| {
            let date = date.format("%Y-%m-%d").to_string();
            (FIRST_LESSON_HOUR..CLOSING_HOUR).map(move |hour| {
                SlotIdentifier::new(date.clone(), format!("{:02}:00", hour), subject.trim(), teacher.trim())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_from_monday_yields_forty_slots() {
        let start = parse_date("2025-06-02").unwrap();
        let slots = weekday_slots(start, 7, "Math", "Ms Tan");

        assert_eq!(slots.len(), 40);
        assert!(slots.iter().all(|s| s.date != "2025-06-07" && s.date != "2025-06-08"));
        assert_eq!(slots.first().unwrap().time, "10:00");
        assert_eq!(slots[7].time, "17:00");
        assert_eq!(slots.last().unwrap().date, "2025-06-06");
    }

    #[test]
    fn test_weekend_only_span_creates_nothing() {
        let saturday = parse_date("2025-06-07").unwrap();
        assert!(weekday_slots(saturday, 2, "Math", "Ms Tan").is_empty());
        assert!(weekday_slots(saturday, 0, "Math", "Ms Tan").is_empty());
    }

    #[test]
    fn test_span_crosses_month_boundary() {
        let start = parse_date("2025-01-30").unwrap(); // Thursday
        let slots = weekday_slots(start, 5, "English", "Mr Lee");
        let dates: Vec<&str> = slots.iter().map(|s| s.date.as_str()).step_by(8).collect();
        assert_eq!(dates, vec!["2025-01-30", "2025-01-31", "2025-02-03"]);
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(parse_date("02/06/2025").is_none());
        assert!(parse_date("2025-02-30").is_none());
        assert_eq!(parse_date(" 2025-06-02 "), NaiveDate::from_ymd_opt(2025, 6, 2));
    }
}

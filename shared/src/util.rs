use crate::models::ServingDay;
use chrono::{DateTime, Datelike, FixedOffset};

/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Weekday of a Unix-millis timestamp in the business time zone
pub fn serving_day_at(millis: i64, offset: FixedOffset) -> Option<ServingDay> {
    DateTime::from_timestamp_millis(millis).map(|dt| ServingDay::from(dt.with_timezone(&offset).weekday()))
}

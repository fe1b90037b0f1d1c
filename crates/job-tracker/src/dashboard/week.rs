use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

/// Calendar week used for "due this week": ISO convention, Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    pub fn containing(day: NaiveDate) -> Self {
        let offset = i64::from(day.weekday().num_days_from_monday());
        let start = day - Duration::days(offset);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

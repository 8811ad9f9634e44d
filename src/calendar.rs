use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashSet;

/// Business-day calendar used to derive task end dates.
///
/// The work week is a fixed Mon-Fri. The source schedules carry no holiday
/// calendar, so none is modeled here; weekends are the only non-working days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCalendar {
    non_working_days: HashSet<Weekday>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }
}

impl WorkCalendar {
    /// Check if a date is available for scheduling
    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.non_working_days.contains(&date.weekday())
    }

    /// Find the date `days` working days ahead of `start`, rolling forward
    /// over weekends. `days = 0` returns `start` unchanged.
    pub fn add_working_days(&self, start: NaiveDate, days: i64) -> NaiveDate {
        let mut current = start;
        let mut count = 0;

        while count < days {
            current = current + Duration::days(1);
            if self.is_available(current) {
                count += 1;
            }
        }
        current
    }
}

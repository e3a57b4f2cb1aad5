use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{PlannerError, Result};

pub const HOURS_PER_WORKING_DAY: f64 = 8.0;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A reversed range is empty and yields 0.
pub fn working_days(start_date: NaiveDate, end_date: NaiveDate) -> u32 {
    let mut count = 0;
    let mut current_date = start_date;
    while current_date <= end_date {
        if is_working_day(current_date) {
            count += 1;
        }
        match current_date.succ_opt() {
            Some(next) => current_date = next,
            None => break,
        }
    }
    count
}

pub fn max_capacity(total_working_days: u32) -> f64 {
    f64::from(total_working_days) * HOURS_PER_WORKING_DAY
}

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PlannerError::validation(format!("{field} is required")));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        PlannerError::validation(format!("{field} '{value}' is not a YYYY-MM-DD date: {e}"))
    })
}

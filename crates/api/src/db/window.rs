use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, Duration};

use super::Error;

/// Length of the "last 12 months" window. Fixed at 365 days, leap years are not accounted for.
pub const LOOKBACK_DAYS: i64 = 365;

/// Inclusive `[start, end]` range of `YYYY-MM-DD` dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: String,
    pub end: String,
}

impl DateWindow {
    /// Window ending on `latest` and starting [`LOOKBACK_DAYS`] calendar days before it
    pub fn trailing_year(latest: &str) -> Result<Self, Error> {
        let end = parse_date(latest)?;
        let start = end
            .checked_sub(Duration::days(LOOKBACK_DAYS))
            .ok_or_else(|| Error::DateRange(format!("{} minus {} days", latest, LOOKBACK_DAYS)))?;

        Ok(Self {
            start: format_date(start)?,
            end: format_date(end)?,
        })
    }

    /// Lexicographic containment, matches how the store compares `date`
    pub fn contains(&self, date: &str) -> bool {
        self.start.as_str() <= date && date <= self.end.as_str()
    }
}

pub fn parse_date(value: &str) -> Result<Date, Error> {
    Ok(Date::parse(value, format_description!("[year]-[month]-[day]"))?)
}

pub fn format_date(date: Date) -> Result<String, Error> {
    Ok(date.format(format_description!("[year]-[month]-[day]"))?)
}

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::fmt;

/// Calendar granularity used to derive a bucketed date dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateGranularity {
    Day,
    /// ISO week, starting Monday
    Week,
    Month,
    Quarter,
    Year,
}

impl DateGranularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateGranularity::Day => "day",
            DateGranularity::Week => "week",
            DateGranularity::Month => "month",
            DateGranularity::Quarter => "quarter",
            DateGranularity::Year => "year",
        }
    }
}

impl fmt::Display for DateGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the first day of the bucket containing `date`
pub fn bucket_of(date: NaiveDate, gran: DateGranularity) -> NaiveDate {
    match gran {
        DateGranularity::Day => date,
        DateGranularity::Week => {
            let offset = date.weekday().num_days_from_monday() as u64;
            date.checked_sub_days(chrono::Days::new(offset))
                .unwrap_or(date)
        }
        DateGranularity::Month => date.with_day(1).unwrap_or(date),
        DateGranularity::Quarter => {
            let first_month = (date.month0() / 3) * 3 + 1;
            NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
        }
        DateGranularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
    }
}

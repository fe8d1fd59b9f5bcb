//! Inclusive local-time windows used for stats, budgets and exports.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed interval `[start, end]` in local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The calendar day containing `now`.
    pub fn day(now: NaiveDateTime) -> Self {
        let date = now.date();
        Self::new(start_of_day(date), end_of_day(date))
    }

    /// The last `days` calendar days up to and including the day of `now`.
    pub fn trailing_days(now: NaiveDateTime, days: u32) -> Self {
        let today = now.date();
        let first = today - Duration::days(i64::from(days.max(1)) - 1);
        Self::new(start_of_day(first), end_of_day(today))
    }

    /// The calendar month containing `now`.
    pub fn month(now: NaiveDateTime) -> Self {
        Period::containing(now).window()
    }

    /// Number of calendar days the window touches, counting both bounds.
    pub fn days_inclusive(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(1)
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last millisecond of the day, `23:59:59.999`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// Calendar month key (`YYYY-MM`) scoping budgets, alerts and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid period `{0}` (use YYYY-MM, e.g. 2025-01)")]
pub struct PeriodError(pub String);

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| PeriodError(format!("{year:04}-{month:02}")))
    }

    pub fn containing(at: NaiveDateTime) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// From the first instant of the month to one millisecond before the
    /// first instant of the next one.
    pub fn window(&self) -> DateWindow {
        let start = start_of_day(self.first_day());
        let end = start_of_day(self.next().first_day()) - Duration::milliseconds(1);
        DateWindow::new(start, end)
    }

    /// Underscore form used in export file names, e.g. `2025_01`.
    pub fn file_stem(&self) -> String {
        format!("{:04}_{:02}", self.year, self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let invalid = || PeriodError(trimmed.to_string());
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

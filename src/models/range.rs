//! Inclusive calendar date ranges
//!
//! A range whose end precedes its start is empty: it contains no dates and
//! spans zero days.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TrackerError, TrackerResult};

/// Inclusive date range `start ..= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range covering a single day
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// The seven days starting at `week_start`
    pub fn week(week_start: NaiveDate) -> Self {
        Self::new(week_start, week_start + Duration::days(6))
    }

    /// A calendar month
    pub fn month(year: i32, month: u32) -> TrackerResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            TrackerError::Validation(format!("Invalid month: {}-{:02}", year, month))
        })?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let end = next
            .map(|d| d - Duration::days(1))
            .ok_or_else(|| TrackerError::Validation(format!("Invalid month: {}-{:02}", year, month)))?;
        Ok(Self::new(start, end))
    }

    /// From `days` days before `today` through `today`, both inclusive
    ///
    /// This spans `days + 1` calendar days: "last 30 days" on March 31st
    /// starts on March 1st.
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        Self::new(today - Duration::days(days), today)
    }

    /// January 1st of `today`'s year through `today`
    pub fn year_to_date(today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        Self::new(start, today)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Number of calendar days covered; zero for an empty range
    pub fn num_days(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every date in the range, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.num_days()).map(move |offset| start + Duration::days(offset))
    }

    /// The range of equal length ending the day before this one starts
    pub fn previous(&self) -> Self {
        let len = self.num_days().max(1);
        let end = self.start - Duration::days(1);
        Self::new(end - Duration::days(len - 1), end)
    }

    /// Parse a preset name (`last-30`, `last-90`, `last-180`, `ytd`) relative
    /// to `today`
    pub fn preset(name: &str, today: NaiveDate) -> TrackerResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "last-30" | "30d" => Ok(Self::last_days(today, 30)),
            "last-90" | "90d" => Ok(Self::last_days(today, 90)),
            "last-180" | "6m" => Ok(Self::last_days(today, 180)),
            "ytd" | "year-to-date" => Ok(Self::year_to_date(today)),
            other => Err(TrackerError::Validation(format!(
                "Unknown range preset '{}' (expected last-30, last-90, last-180 or ytd)",
                other
            ))),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Parse a `YYYY-MM-DD` date, mapping failures to a validation error
pub fn parse_date(s: &str) -> TrackerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        TrackerError::Validation(format!("Invalid date format: {}. Use YYYY-MM-DD", s))
    })
}

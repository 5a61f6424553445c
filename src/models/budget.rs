//! Budget models
//!
//! A weekly budget caps spending over the seven days starting at its
//! `week_start`. Daily budgets cap a single date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::range::DateRange;
use crate::error::{TrackerError, TrackerResult};

/// Spending limit for one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBudget {
    /// First day of the budget week
    pub week_start: NaiveDate,

    /// Amount the user plans to spend this week
    pub limit: Money,

    /// Cash on hand at the start of the week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money_available: Option<Money>,

    /// Income the user expects to receive during the week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_income: Option<Money>,

    /// When this budget was last set
    pub updated_at: DateTime<Utc>,
}

impl WeeklyBudget {
    pub fn new(week_start: NaiveDate, limit: Money) -> Self {
        Self {
            week_start,
            limit,
            money_available: None,
            expected_income: None,
            updated_at: Utc::now(),
        }
    }

    pub fn with_money_available(mut self, amount: Money) -> Self {
        self.money_available = Some(amount);
        self
    }

    pub fn with_expected_income(mut self, amount: Money) -> Self {
        self.expected_income = Some(amount);
        self
    }

    /// Dates covered by this budget
    pub fn range(&self) -> DateRange {
        DateRange::week(self.week_start)
    }

    /// Check that the limit and the optional amounts are non-negative
    pub fn validate(&self) -> TrackerResult<()> {
        check_non_negative("Weekly budget limit", self.limit)?;
        if let Some(available) = self.money_available {
            check_non_negative("Money available", available)?;
        }
        if let Some(income) = self.expected_income {
            check_non_negative("Expected income", income)?;
        }
        Ok(())
    }
}

impl fmt::Display for WeeklyBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week of {}: limit {}", self.week_start, self.limit)
    }
}

/// Spending limit for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBudget {
    pub date: NaiveDate,
    pub limit: Money,
}

impl DailyBudget {
    pub fn new(date: NaiveDate, limit: Money) -> Self {
        Self { date, limit }
    }

    pub fn validate(&self) -> TrackerResult<()> {
        check_non_negative("Daily budget limit", self.limit)
    }
}

fn check_non_negative(what: &str, amount: Money) -> TrackerResult<()> {
    if amount.is_negative() {
        Err(TrackerError::Validation(format!(
            "{} must not be negative (got {})",
            what, amount
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    #[test]
    fn test_week_range_covers_seven_days() {
        let budget = WeeklyBudget::new(monday(), Money::from_major(100));
        let range = budget.range();
        assert_eq!(range.start, monday());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap());
    }

    #[test]
    fn test_negative_limit_rejected() {
        let budget = WeeklyBudget::new(monday(), Money::from_cents(-1));
        assert!(budget.validate().unwrap_err().is_validation());

        let daily = DailyBudget::new(monday(), Money::from_cents(-500));
        assert!(daily.validate().is_err());
    }

    #[test]
    fn test_negative_optional_amounts_rejected() {
        let budget = WeeklyBudget::new(monday(), Money::from_major(100))
            .with_expected_income(Money::from_cents(-100));
        assert!(budget.validate().is_err());
    }

    #[test]
    fn test_zero_limit_is_valid() {
        assert!(WeeklyBudget::new(monday(), Money::zero()).validate().is_ok());
    }
}

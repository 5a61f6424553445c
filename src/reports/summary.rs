//! Summary Report
//!
//! Headline figures for a date range: totals, daily averages and extremes,
//! weekly budget utilisation, comparison with the previous period, and a
//! one-word spending profile.

use std::fmt;
use std::io::Write;

use chrono::NaiveDate;

use crate::error::{TrackerError, TrackerResult};
use crate::ledger::stats::{mean, sample_std_dev};
use crate::ledger::Ledger;
use crate::models::{DateRange, Money, WeeklyBudget};

/// Daily spend below this (in major units) reads as frugal
const FRUGAL_DAILY_AVERAGE: f64 = 20.0;

/// Coarse characterisation of spending in a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendingProfile {
    /// Weekly budget utilisation above 120%
    Overspending,
    /// Weekly budget utilisation above 90%
    NearLimit,
    /// Daily standard deviation above 70% of the daily average
    Volatile,
    Frugal,
    Balanced,
}

impl SpendingProfile {
    /// Classify from budget utilisation (1.0 = fully spent) and the
    /// mean / sample standard deviation of spend on days with data, in major
    /// units
    pub fn classify(utilisation: Option<f64>, daily_mean: f64, daily_sd: f64) -> Self {
        let utilisation = utilisation.unwrap_or(0.0);
        if utilisation > 1.2 {
            Self::Overspending
        } else if utilisation > 0.9 {
            Self::NearLimit
        } else if daily_sd > daily_mean * 0.7 {
            Self::Volatile
        } else if daily_mean < FRUGAL_DAILY_AVERAGE {
            Self::Frugal
        } else {
            Self::Balanced
        }
    }
}

impl fmt::Display for SpendingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Overspending => "Overspending",
            Self::NearLimit => "Near Limit",
            Self::Volatile => "Volatile",
            Self::Frugal => "Frugal",
            Self::Balanced => "Balanced",
        };
        f.pad(label)
    }
}

/// Summary Report
#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub range: DateRange,
    pub total: Money,
    /// Total divided by calendar days in the range
    pub average_daily: Money,
    /// Highest single-day total among days with expenses
    pub highest_day: Option<(NaiveDate, Money)>,
    /// Lowest single-day total among days with expenses
    pub lowest_day: Option<(NaiveDate, Money)>,
    pub days_with_data: usize,
    pub transaction_count: usize,
    /// Weekly budget covering the last day of the range
    pub budget: Option<WeeklyBudget>,
    pub budget_spent: Money,
    pub budget_usage: Option<f64>,
    pub previous_total: Money,
    pub change: Money,
    /// Change as a percentage of the previous total; `None` when that was zero
    pub change_percent: Option<f64>,
    pub profile: SpendingProfile,
}

impl SummaryReport {
    /// Generate a summary for `range`
    ///
    /// Fails with a division error for an empty range.
    pub fn generate(ledger: &Ledger, range: DateRange) -> TrackerResult<Self> {
        let average_daily = ledger.average_daily_spend(range)?;
        let total = ledger.total_spend(range);

        let active_days: Vec<(NaiveDate, Money)> = ledger
            .daily_totals(range)
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .collect();

        let highest_day = active_days.iter().copied().max_by_key(|(_, amount)| *amount);
        let lowest_day = active_days.iter().copied().min_by_key(|(_, amount)| *amount);

        let budget = ledger.budget_covering(range.end).cloned();
        let (budget_spent, budget_usage) = match &budget {
            Some(b) => (
                ledger.total_spend(b.range()),
                ledger.budget_usage(b.week_start),
            ),
            None => (Money::zero(), None),
        };

        let previous_total = ledger.total_spend(range.previous());
        let change = total - previous_total;
        let change_percent = change.ratio(previous_total).map(|r| r * 100.0);

        let values: Vec<f64> = active_days.iter().map(|(_, m)| m.as_f64()).collect();
        let profile = SpendingProfile::classify(
            budget_usage,
            mean(&values).unwrap_or(0.0),
            sample_std_dev(&values).unwrap_or(0.0),
        );

        Ok(Self {
            range,
            total,
            average_daily,
            highest_day,
            lowest_day,
            days_with_data: active_days.len(),
            transaction_count: ledger.expenses_in(range).count(),
            budget,
            budget_spent,
            budget_usage,
            previous_total,
            change,
            change_percent,
            profile,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Spending Summary: {}\n", self.range));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        let line = |label: &str, value: String| format!("{:<28} {:>20}\n", label, value);

        output.push_str(&line("Total Spend:", self.total.to_string()));
        output.push_str(&line("Average Daily Spend:", self.average_daily.to_string()));
        if let Some((date, amount)) = self.highest_day {
            output.push_str(&line("Highest Day:", format!("{} ({})", amount, date)));
        }
        if let Some((date, amount)) = self.lowest_day {
            output.push_str(&line("Lowest Day:", format!("{} ({})", amount, date)));
        }
        output.push_str(&line("Days With Expenses:", self.days_with_data.to_string()));
        output.push_str(&line("Transactions:", self.transaction_count.to_string()));

        output.push_str(&"-".repeat(60));
        output.push('\n');

        match &self.budget {
            Some(budget) => {
                output.push_str(&line(
                    "Budget Week:",
                    format!("from {}", budget.week_start),
                ));
                output.push_str(&line("Weekly Limit:", budget.limit.to_string()));
                output.push_str(&line("Spent This Week:", self.budget_spent.to_string()));
                let usage = self
                    .budget_usage
                    .map(|u| format!("{:.1}%", u * 100.0))
                    .unwrap_or_else(|| "n/a".into());
                output.push_str(&line("Budget Used:", usage));
            }
            None => output.push_str("No weekly budget covers the end of this range\n"),
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');

        output.push_str(&line("Previous Period:", self.previous_total.to_string()));
        let change = match self.change_percent {
            Some(pct) => format!("{} ({:+.1}%)", self.change, pct),
            None => self.change.to_string(),
        };
        output.push_str(&line("Change:", change));
        output.push_str(&line("Spending Profile:", self.profile.to_string()));

        output
    }

    /// Export the report to CSV format as metric/value pairs
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> TrackerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| TrackerError::Export(e.to_string());

        csv.write_record(["Metric", "Value"]).map_err(export_err)?;

        let mut rows: Vec<(&str, String)> = vec![
            ("Start Date", self.range.start.to_string()),
            ("End Date", self.range.end.to_string()),
            ("Total Spend", format!("{:.2}", self.total.as_f64())),
            ("Average Daily Spend", format!("{:.2}", self.average_daily.as_f64())),
            ("Days With Expenses", self.days_with_data.to_string()),
            ("Transactions", self.transaction_count.to_string()),
            ("Previous Period Total", format!("{:.2}", self.previous_total.as_f64())),
            ("Change", format!("{:.2}", self.change.as_f64())),
        ];
        if let Some((_, amount)) = self.highest_day {
            rows.push(("Highest Daily Spend", format!("{:.2}", amount.as_f64())));
        }
        if let Some((_, amount)) = self.lowest_day {
            rows.push(("Lowest Daily Spend", format!("{:.2}", amount.as_f64())));
        }
        if let Some(pct) = self.change_percent {
            rows.push(("Change Percent", format!("{:.2}", pct)));
        }
        if let Some(usage) = self.budget_usage {
            rows.push(("Budget Usage Percent", format!("{:.2}", usage * 100.0)));
        }
        rows.push(("Spending Profile", self.profile.to_string()));

        for (metric, value) in rows {
            csv.write_record([metric, value.as_str()]).map_err(export_err)?;
        }
        csv.flush()
            .map_err(|e| TrackerError::Export(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, ExpenseRecord};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn add(ledger: &mut Ledger, day: u32, major: i64) {
        ledger
            .add_expense(ExpenseRecord::new(
                date(day),
                ExpenseCategory::Food,
                Money::from_major(major),
                None,
            ))
            .unwrap();
    }

    #[test]
    fn test_generate_summary() {
        let mut ledger = Ledger::new();
        add(&mut ledger, 6, 30);
        add(&mut ledger, 6, 10);
        add(&mut ledger, 8, 20);
        // Previous period (Dec 30 - Jan 5)
        add(&mut ledger, 2, 50);
        ledger.set_budget(date(6), Money::from_major(100)).unwrap();

        let report = SummaryReport::generate(&ledger, DateRange::week(date(6))).unwrap();

        assert_eq!(report.total, Money::from_major(60));
        assert_eq!(report.average_daily, Money::from_cents(857));
        assert_eq!(report.highest_day, Some((date(6), Money::from_major(40))));
        assert_eq!(report.lowest_day, Some((date(8), Money::from_major(20))));
        assert_eq!(report.days_with_data, 2);
        assert_eq!(report.transaction_count, 3);
        assert!((report.budget_usage.unwrap() - 0.6).abs() < 1e-9);
        assert_eq!(report.previous_total, Money::from_major(50));
        assert_eq!(report.change, Money::from_major(10));
        assert!((report.change_percent.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_range_is_division_error() {
        let ledger = Ledger::new();
        let range = DateRange::new(date(8), date(6));
        assert!(SummaryReport::generate(&ledger, range).unwrap_err().is_division());
    }

    #[test]
    fn test_profile_classification() {
        assert_eq!(
            SpendingProfile::classify(Some(1.3), 50.0, 5.0),
            SpendingProfile::Overspending
        );
        assert_eq!(
            SpendingProfile::classify(Some(0.95), 50.0, 5.0),
            SpendingProfile::NearLimit
        );
        assert_eq!(
            SpendingProfile::classify(None, 50.0, 40.0),
            SpendingProfile::Volatile
        );
        assert_eq!(
            SpendingProfile::classify(None, 15.0, 1.0),
            SpendingProfile::Frugal
        );
        assert_eq!(
            SpendingProfile::classify(Some(0.5), 50.0, 5.0),
            SpendingProfile::Balanced
        );
    }

    #[test]
    fn test_export_csv() {
        let mut ledger = Ledger::new();
        add(&mut ledger, 6, 30);
        let report = SummaryReport::generate(&ledger, DateRange::day(date(6))).unwrap();

        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        assert!(csv.starts_with("Metric,Value\n"));
        assert!(csv.contains("Total Spend,30.00"));
        assert!(csv.contains("Spending Profile,"));
    }
}

//! Period Report
//!
//! Weekly and monthly rollups. Weeks run Monday to Sunday; a week's budget is
//! the weekly budget set for that Monday, if any.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::TrackerResult;
use crate::ledger::Ledger;
use crate::models::{DateRange, ExpenseCategory, Money};

/// Which rollup to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Weekly,
    Monthly,
}

/// One week or month of spending
#[derive(Debug, Clone)]
pub struct PeriodRow {
    /// The full week or month, not clipped to the report range
    pub period: DateRange,
    /// Spend within both the period and the report range
    pub spent: Money,
    pub transaction_count: usize,
    pub days_with_data: usize,
    pub top_category: Option<ExpenseCategory>,
    /// Weekly rows only
    pub limit: Option<Money>,
    pub usage: Option<f64>,
}

/// Period Report
#[derive(Debug, Clone)]
pub struct PeriodReport {
    pub range: DateRange,
    pub granularity: Granularity,
    pub rows: Vec<PeriodRow>,
}

/// Monday of the week containing `date`
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

impl PeriodReport {
    pub fn generate(
        ledger: &Ledger,
        range: DateRange,
        granularity: Granularity,
    ) -> TrackerResult<Self> {
        let periods = match granularity {
            Granularity::Weekly => weeks_in(range),
            Granularity::Monthly => months_in(range)?,
        };

        let rows = periods
            .into_iter()
            .map(|period| {
                let clipped = DateRange::new(period.start.max(range.start), period.end.min(range.end));
                let spent = ledger.total_spend(clipped);
                let days_with_data = ledger
                    .daily_totals(clipped)
                    .iter()
                    .filter(|(_, amount)| !amount.is_zero())
                    .count();
                let top_category = ledger
                    .category_totals(clipped)
                    .into_iter()
                    .filter(|t| !t.amount.is_zero())
                    .max_by(|a, b| a.amount.cmp(&b.amount).then(b.category.cmp(&a.category)))
                    .map(|t| t.category);

                let budget = match granularity {
                    Granularity::Weekly => ledger.weekly_budget(period.start),
                    Granularity::Monthly => None,
                };

                PeriodRow {
                    period,
                    spent,
                    transaction_count: ledger.expenses_in(clipped).count(),
                    days_with_data,
                    top_category,
                    limit: budget.map(|b| b.limit),
                    usage: budget.and_then(|b| ledger.budget_usage(b.week_start)),
                }
            })
            .collect();

        Ok(Self {
            range,
            granularity,
            rows,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        let title = match self.granularity {
            Granularity::Weekly => "Weekly Spending",
            Granularity::Monthly => "Monthly Spending",
        };
        output.push_str(&format!("{}: {}\n", title, self.range));
        output.push_str(&"=".repeat(78));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>12} {:>6} {:>6} {:<10} {:>12} {:>9}\n",
            "Period", "Spent", "Txns", "Days", "Top", "Limit", "Used"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');

        for row in &self.rows {
            let label = match self.granularity {
                Granularity::Weekly => row.period.start.to_string(),
                Granularity::Monthly => row.period.start.format("%Y-%m").to_string(),
            };
            let top = row.top_category.map(|c| c.label()).unwrap_or("-");
            let limit = row.limit.map(|l| l.to_string()).unwrap_or_else(|| "-".into());
            let used = row
                .usage
                .map(|u| format!("{:.1}%", u * 100.0))
                .unwrap_or_else(|| "-".into());

            output.push_str(&format!(
                "{:<12} {:>12} {:>6} {:>6} {:<10} {:>12} {:>9}\n",
                label, row.spent, row.transaction_count, row.days_with_data, top, limit, used
            ));
        }

        output
    }
}

fn weeks_in(range: DateRange) -> Vec<DateRange> {
    if range.is_empty() {
        return Vec::new();
    }
    let mut weeks = Vec::new();
    let mut start = week_start_of(range.start);
    while start <= range.end {
        weeks.push(DateRange::week(start));
        start += Duration::days(7);
    }
    weeks
}

fn months_in(range: DateRange) -> TrackerResult<Vec<DateRange>> {
    if range.is_empty() {
        return Ok(Vec::new());
    }
    let mut months = Vec::new();
    let (mut year, mut month) = (range.start.year(), range.start.month());
    loop {
        let period = DateRange::month(year, month)?;
        if period.start > range.end {
            break;
        }
        months.push(period);
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseRecord;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn add(ledger: &mut Ledger, day: NaiveDate, category: ExpenseCategory, major: i64) {
        ledger
            .add_expense(ExpenseRecord::new(day, category, Money::from_major(major), None))
            .unwrap();
    }

    #[test]
    fn test_week_start_of() {
        // 2025-01-08 is a Wednesday
        assert_eq!(week_start_of(date(1, 8)), date(1, 6));
        assert_eq!(week_start_of(date(1, 6)), date(1, 6));
        assert_eq!(week_start_of(date(1, 12)), date(1, 6));
    }

    #[test]
    fn test_weekly_rollup_with_budget() {
        let mut ledger = Ledger::new();
        add(&mut ledger, date(1, 7), ExpenseCategory::Food, 30);
        add(&mut ledger, date(1, 8), ExpenseCategory::Transport, 10);
        add(&mut ledger, date(1, 14), ExpenseCategory::Data, 5);
        ledger.set_budget(date(1, 6), Money::from_major(80)).unwrap();

        let range = DateRange::new(date(1, 6), date(1, 19));
        let report = PeriodReport::generate(&ledger, range, Granularity::Weekly).unwrap();

        assert_eq!(report.rows.len(), 2);
        let first = &report.rows[0];
        assert_eq!(first.spent, Money::from_major(40));
        assert_eq!(first.days_with_data, 2);
        assert_eq!(first.top_category, Some(ExpenseCategory::Food));
        assert_eq!(first.limit, Some(Money::from_major(80)));
        assert!((first.usage.unwrap() - 0.5).abs() < 1e-9);

        let second = &report.rows[1];
        assert_eq!(second.spent, Money::from_major(5));
        assert_eq!(second.limit, None);
    }

    #[test]
    fn test_monthly_rollup_clips_to_range() {
        let mut ledger = Ledger::new();
        add(&mut ledger, date(1, 10), ExpenseCategory::Food, 30);
        add(&mut ledger, date(1, 31), ExpenseCategory::Food, 20);
        add(&mut ledger, date(2, 2), ExpenseCategory::Other, 7);

        let range = DateRange::new(date(1, 15), date(2, 28));
        let report = PeriodReport::generate(&ledger, range, Granularity::Monthly).unwrap();

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].spent, Money::from_major(20));
        assert_eq!(report.rows[1].spent, Money::from_major(7));
        assert_eq!(report.rows[1].period, DateRange::month(2025, 2).unwrap());
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let ledger = Ledger::new();
        let range = DateRange::new(date(12, 20), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        let report = PeriodReport::generate(&ledger, range, Granularity::Monthly).unwrap();
        assert_eq!(report.rows.len(), 2);
        assert!(report.format_terminal().contains("2026-01"));
    }
}

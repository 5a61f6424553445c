//! The expense ledger
//!
//! [`Ledger`] owns every expense record and budget and derives all summary
//! figures on demand. It is plain owned state: callers load it, mutate it
//! through the validating methods below, and hand it back to storage.

pub mod anomaly;
pub mod stats;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{
    DailyBudget, DateRange, ExpenseCategory, ExpenseId, ExpenseRecord, Money, WeeklyBudget,
};

pub use anomaly::{Anomaly, Severity};

/// Spending in one category over a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub amount: Money,
    pub count: usize,
}

/// In-memory collection of expense records and budgets
///
/// Invariants: every record amount and every budget limit is non-negative,
/// record IDs are unique, and there is at most one weekly budget per
/// week start and one daily budget per date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    expenses: Vec<ExpenseRecord>,
    weekly_budgets: BTreeMap<NaiveDate, WeeklyBudget>,
    daily_budgets: BTreeMap<NaiveDate, DailyBudget>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted parts, re-checking every invariant
    ///
    /// Later budgets for the same week or date replace earlier ones.
    pub fn from_parts(
        expenses: Vec<ExpenseRecord>,
        weekly_budgets: Vec<WeeklyBudget>,
        daily_budgets: Vec<DailyBudget>,
    ) -> TrackerResult<Self> {
        let mut ledger = Self::new();
        for record in expenses {
            ledger.add_expense(record)?;
        }
        for budget in weekly_budgets {
            ledger.set_weekly_budget(budget)?;
        }
        for budget in daily_budgets {
            ledger.set_daily_budget(budget.date, budget.limit)?;
        }
        Ok(ledger)
    }

    // ---------------------------------------------------------------------
    // Expense records
    // ---------------------------------------------------------------------

    /// Append a validated record
    pub fn add_expense(&mut self, record: ExpenseRecord) -> TrackerResult<ExpenseId> {
        record.validate()?;
        if self.get_expense(record.id).is_some() {
            return Err(TrackerError::Validation(format!(
                "Duplicate expense id: {}",
                record.id
            )));
        }
        let id = record.id;
        self.expenses.push(record);
        Ok(id)
    }

    /// Remove a record, returning it
    pub fn remove_expense(&mut self, id: ExpenseId) -> TrackerResult<ExpenseRecord> {
        let index = self
            .expenses
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| TrackerError::expense_not_found(id.to_string()))?;
        Ok(self.expenses.remove(index))
    }

    pub fn get_expense(&self, id: ExpenseId) -> Option<&ExpenseRecord> {
        self.expenses.iter().find(|r| r.id == id)
    }

    /// Resolve a user-supplied ID reference (short or full form)
    pub fn find_expense(&self, reference: &str) -> TrackerResult<&ExpenseRecord> {
        let mut matches = self.expenses.iter().filter(|r| r.id.matches(reference));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(record),
            (None, _) => Err(TrackerError::expense_not_found(reference)),
            (Some(_), Some(_)) => Err(TrackerError::Validation(format!(
                "Expense reference '{}' is ambiguous; use more characters",
                reference
            ))),
        }
    }

    /// All records in insertion order
    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    /// Records dated within `range`, in insertion order
    pub fn expenses_in(&self, range: DateRange) -> impl Iterator<Item = &ExpenseRecord> {
        self.expenses.iter().filter(move |r| range.contains(r.date))
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Earliest through latest expense date, if any records exist
    pub fn observed_range(&self) -> Option<DateRange> {
        let start = self.expenses.iter().map(|r| r.date).min()?;
        let end = self.expenses.iter().map(|r| r.date).max()?;
        Some(DateRange::new(start, end))
    }

    // ---------------------------------------------------------------------
    // Budgets
    // ---------------------------------------------------------------------

    /// Set the limit for the week starting at `week_start`
    ///
    /// Keeps any money-available and expected-income figures already recorded
    /// for that week. Returns the previous budget, if there was one.
    pub fn set_budget(
        &mut self,
        week_start: NaiveDate,
        limit: Money,
    ) -> TrackerResult<Option<WeeklyBudget>> {
        let mut budget = WeeklyBudget::new(week_start, limit);
        if let Some(existing) = self.weekly_budgets.get(&week_start) {
            budget.money_available = existing.money_available;
            budget.expected_income = existing.expected_income;
        }
        self.set_weekly_budget(budget)
    }

    /// Insert or replace a full weekly budget
    pub fn set_weekly_budget(&mut self, budget: WeeklyBudget) -> TrackerResult<Option<WeeklyBudget>> {
        budget.validate()?;
        Ok(self.weekly_budgets.insert(budget.week_start, budget))
    }

    pub fn weekly_budget(&self, week_start: NaiveDate) -> Option<&WeeklyBudget> {
        self.weekly_budgets.get(&week_start)
    }

    /// Weekly budgets ordered by week start
    pub fn weekly_budgets(&self) -> impl Iterator<Item = &WeeklyBudget> {
        self.weekly_budgets.values()
    }

    /// The weekly budget whose seven days include `date`
    ///
    /// When budget weeks overlap, the one that started most recently wins.
    pub fn budget_covering(&self, date: NaiveDate) -> Option<&WeeklyBudget> {
        self.weekly_budgets
            .range(..=date)
            .rev()
            .map(|(_, b)| b)
            .find(|b| b.range().contains(date))
    }

    /// Insert or replace the budget for a single day
    pub fn set_daily_budget(
        &mut self,
        date: NaiveDate,
        limit: Money,
    ) -> TrackerResult<Option<DailyBudget>> {
        let budget = DailyBudget::new(date, limit);
        budget.validate()?;
        Ok(self.daily_budgets.insert(date, budget))
    }

    pub fn daily_budget(&self, date: NaiveDate) -> Option<&DailyBudget> {
        self.daily_budgets.get(&date)
    }

    pub fn daily_budgets(&self) -> impl Iterator<Item = &DailyBudget> {
        self.daily_budgets.values()
    }

    // ---------------------------------------------------------------------
    // Aggregates
    // ---------------------------------------------------------------------

    /// Sum of amounts dated within `range`; zero for an empty range
    pub fn total_spend(&self, range: DateRange) -> Money {
        self.expenses_in(range).map(|r| r.amount).sum()
    }

    /// Total spend divided by the number of calendar days in `range`
    pub fn average_daily_spend(&self, range: DateRange) -> TrackerResult<Money> {
        let days = range.num_days();
        if days == 0 {
            return Err(TrackerError::Division(format!(
                "date range {} spans zero days",
                range
            )));
        }
        let total = self.total_spend(range);
        Ok(Money::from_major_f64(total.as_f64() / days as f64))
    }

    /// Fraction of the weekly limit spent in the week starting at `week_start`
    ///
    /// `None` means the week is unbudgeted (or its limit is zero, which has no
    /// meaningful ratio). Overspending yields values above 1.0.
    pub fn budget_usage(&self, week_start: NaiveDate) -> Option<f64> {
        let budget = self.weekly_budgets.get(&week_start)?;
        self.total_spend(budget.range()).ratio(budget.limit)
    }

    /// Fraction of the daily limit spent on `date`
    pub fn daily_budget_usage(&self, date: NaiveDate) -> Option<f64> {
        let budget = self.daily_budgets.get(&date)?;
        self.total_spend(DateRange::day(date)).ratio(budget.limit)
    }

    /// Per-day totals over `range`, including zero days
    pub fn daily_totals(&self, range: DateRange) -> Vec<(NaiveDate, Money)> {
        let mut by_day: BTreeMap<NaiveDate, Money> = range.days().map(|d| (d, Money::zero())).collect();
        for record in self.expenses_in(range) {
            if let Some(total) = by_day.get_mut(&record.date) {
                *total += record.amount;
            }
        }
        by_day.into_iter().collect()
    }

    /// Totals for every category over `range`, in category order
    pub fn category_totals(&self, range: DateRange) -> Vec<CategoryTotal> {
        ExpenseCategory::ALL
            .iter()
            .map(|&category| {
                let (amount, count) = self
                    .expenses_in(range)
                    .filter(|r| r.category == category)
                    .fold((Money::zero(), 0), |(sum, n), r| (sum + r.amount, n + 1));
                CategoryTotal {
                    category,
                    amount,
                    count,
                }
            })
            .collect()
    }

    /// Flag anomalous days across the whole observed window
    pub fn detect_anomalies(&self, threshold: f64) -> TrackerResult<Vec<Anomaly>> {
        match self.observed_range() {
            Some(range) => self.detect_anomalies_in(range, threshold),
            None => {
                check_threshold(threshold)?;
                Ok(Vec::new())
            }
        }
    }

    /// Flag anomalous days within `range`
    pub fn detect_anomalies_in(&self, range: DateRange, threshold: f64) -> TrackerResult<Vec<Anomaly>> {
        check_threshold(threshold)?;
        Ok(anomaly::detect(&self.daily_totals(range), threshold))
    }
}

fn check_threshold(threshold: f64) -> TrackerResult<()> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(TrackerError::Validation(format!(
            "Anomaly threshold must be a non-negative number (got {})",
            threshold
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(d: NaiveDate, category: ExpenseCategory, cents: i64) -> ExpenseRecord {
        ExpenseRecord::new(d, category, Money::from_cents(cents), None)
    }

    #[test]
    fn test_added_expense_counted_once() {
        let mut ledger = Ledger::new();
        ledger
            .add_expense(expense(date(2025, 1, 10), ExpenseCategory::Food, 1234))
            .unwrap();

        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 31));
        assert_eq!(ledger.total_spend(range), Money::from_cents(1234));
        assert_eq!(ledger.total_spend(DateRange::day(date(2025, 1, 10))), Money::from_cents(1234));
        assert_eq!(ledger.total_spend(DateRange::day(date(2025, 1, 11))), Money::zero());
    }

    #[test]
    fn test_total_spend_empty_range_is_zero() {
        let mut ledger = Ledger::new();
        ledger
            .add_expense(expense(date(2025, 1, 3), ExpenseCategory::Food, 500))
            .unwrap();
        let empty = DateRange::new(date(2025, 1, 5), date(2025, 1, 1));
        assert_eq!(ledger.total_spend(empty), Money::zero());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut ledger = Ledger::new();
        let err = ledger
            .add_expense(expense(date(2025, 1, 3), ExpenseCategory::Food, -1))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut ledger = Ledger::new();
        let record = expense(date(2025, 1, 3), ExpenseCategory::Data, 100);
        ledger.add_expense(record.clone()).unwrap();
        assert!(ledger.add_expense(record).is_err());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_expense() {
        let mut ledger = Ledger::new();
        let id = ledger
            .add_expense(expense(date(2025, 1, 3), ExpenseCategory::Data, 100))
            .unwrap();
        let removed = ledger.remove_expense(id).unwrap();
        assert_eq!(removed.id, id);
        assert!(ledger.remove_expense(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_expense_by_short_id() {
        let mut ledger = Ledger::new();
        let id = ledger
            .add_expense(expense(date(2025, 1, 3), ExpenseCategory::Other, 100))
            .unwrap();
        assert_eq!(ledger.find_expense(&id.to_string()).unwrap().id, id);
        assert!(ledger.find_expense("exp-zzzzzzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_average_daily_spend() {
        let mut ledger = Ledger::new();
        ledger
            .add_expense(expense(date(2025, 1, 1), ExpenseCategory::Food, 3000))
            .unwrap();
        ledger
            .add_expense(expense(date(2025, 1, 3), ExpenseCategory::Transport, 1500))
            .unwrap();

        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 3));
        assert_eq!(ledger.average_daily_spend(range).unwrap(), Money::from_cents(1500));
    }

    #[test]
    fn test_average_over_zero_days_is_division_error() {
        let ledger = Ledger::new();
        let empty = DateRange::new(date(2025, 1, 2), date(2025, 1, 1));
        assert!(ledger.average_daily_spend(empty).unwrap_err().is_division());
    }

    #[test]
    fn test_budget_usage() {
        let mut ledger = Ledger::new();
        let week = date(2025, 1, 6);
        ledger.set_budget(week, Money::from_major(100)).unwrap();
        ledger
            .add_expense(expense(date(2025, 1, 8), ExpenseCategory::Food, 4000))
            .unwrap();
        // Outside the week
        ledger
            .add_expense(expense(date(2025, 1, 13), ExpenseCategory::Food, 9900))
            .unwrap();

        assert_eq!(ledger.budget_usage(week), Some(0.4));
    }

    #[test]
    fn test_unbudgeted_week_is_none() {
        let ledger = Ledger::new();
        assert_eq!(ledger.budget_usage(date(2025, 1, 6)), None);
    }

    #[test]
    fn test_negative_limit_rejected() {
        let mut ledger = Ledger::new();
        assert!(ledger
            .set_budget(date(2025, 1, 6), Money::from_cents(-100))
            .unwrap_err()
            .is_validation());
        assert!(ledger
            .set_daily_budget(date(2025, 1, 6), Money::from_cents(-100))
            .is_err());
        assert_eq!(ledger.weekly_budgets().count(), 0);
    }

    #[test]
    fn test_set_budget_upserts_and_keeps_extras() {
        let mut ledger = Ledger::new();
        let week = date(2025, 1, 6);
        ledger
            .set_weekly_budget(
                WeeklyBudget::new(week, Money::from_major(100))
                    .with_money_available(Money::from_major(300)),
            )
            .unwrap();
        let previous = ledger.set_budget(week, Money::from_major(150)).unwrap();

        assert_eq!(previous.unwrap().limit, Money::from_major(100));
        assert_eq!(ledger.weekly_budgets().count(), 1);
        let budget = ledger.weekly_budget(week).unwrap();
        assert_eq!(budget.limit, Money::from_major(150));
        assert_eq!(budget.money_available, Some(Money::from_major(300)));
    }

    #[test]
    fn test_budget_covering() {
        let mut ledger = Ledger::new();
        ledger.set_budget(date(2025, 1, 6), Money::from_major(100)).unwrap();
        assert!(ledger.budget_covering(date(2025, 1, 12)).is_some());
        assert!(ledger.budget_covering(date(2025, 1, 13)).is_none());
        assert!(ledger.budget_covering(date(2025, 1, 5)).is_none());
    }

    #[test]
    fn test_daily_budget_usage() {
        let mut ledger = Ledger::new();
        let day = date(2025, 1, 6);
        ledger.set_daily_budget(day, Money::from_major(20)).unwrap();
        ledger
            .add_expense(expense(day, ExpenseCategory::Food, 1000))
            .unwrap();
        assert_eq!(ledger.daily_budget_usage(day), Some(0.5));
        assert_eq!(ledger.daily_budget_usage(date(2025, 1, 7)), None);
    }

    #[test]
    fn test_daily_totals_zero_fill() {
        let mut ledger = Ledger::new();
        ledger
            .add_expense(expense(date(2025, 1, 1), ExpenseCategory::Food, 100))
            .unwrap();
        ledger
            .add_expense(expense(date(2025, 1, 1), ExpenseCategory::Data, 50))
            .unwrap();
        ledger
            .add_expense(expense(date(2025, 1, 3), ExpenseCategory::Food, 200))
            .unwrap();

        let totals = ledger.daily_totals(DateRange::new(date(2025, 1, 1), date(2025, 1, 3)));
        assert_eq!(
            totals,
            vec![
                (date(2025, 1, 1), Money::from_cents(150)),
                (date(2025, 1, 2), Money::zero()),
                (date(2025, 1, 3), Money::from_cents(200)),
            ]
        );
    }

    #[test]
    fn test_category_totals() {
        let mut ledger = Ledger::new();
        ledger
            .add_expense(expense(date(2025, 1, 1), ExpenseCategory::Food, 100))
            .unwrap();
        ledger
            .add_expense(expense(date(2025, 1, 2), ExpenseCategory::Food, 300))
            .unwrap();

        let totals = ledger.category_totals(DateRange::new(date(2025, 1, 1), date(2025, 1, 31)));
        assert_eq!(totals.len(), 4);
        let food = totals.iter().find(|t| t.category == ExpenseCategory::Food).unwrap();
        assert_eq!(food.amount, Money::from_cents(400));
        assert_eq!(food.count, 2);
    }

    #[test]
    fn test_anomalies_none_when_daily_totals_equal() {
        let mut ledger = Ledger::new();
        for day in 1..=7 {
            ledger
                .add_expense(expense(date(2025, 1, day), ExpenseCategory::Food, 2500))
                .unwrap();
        }
        assert!(ledger.detect_anomalies(0.0).unwrap().is_empty());
    }

    #[test]
    fn test_anomalies_flag_spike() {
        let mut ledger = Ledger::new();
        for day in 1..=10 {
            let cents = if day == 7 { 50_000 } else { 2_000 };
            ledger
                .add_expense(expense(date(2025, 1, day), ExpenseCategory::Food, cents))
                .unwrap();
        }
        let anomalies = ledger.detect_anomalies(1.0).unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].date, date(2025, 1, 7));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let ledger = Ledger::new();
        assert!(ledger.detect_anomalies(-1.0).is_err());
        assert!(ledger.detect_anomalies(f64::NAN).is_err());
    }

    #[test]
    fn test_from_parts_revalidates() {
        let bad = expense(date(2025, 1, 1), ExpenseCategory::Food, -10);
        assert!(Ledger::from_parts(vec![bad], Vec::new(), Vec::new()).is_err());

        let good = expense(date(2025, 1, 1), ExpenseCategory::Food, 10);
        let ledger = Ledger::from_parts(
            vec![good],
            vec![WeeklyBudget::new(date(2024, 12, 30), Money::from_major(50))],
            vec![DailyBudget::new(date(2025, 1, 1), Money::from_major(5))],
        )
        .unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.budget_usage(date(2024, 12, 30)), Some(0.002));
    }
}

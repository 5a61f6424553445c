//! Budget service
//!
//! Setting weekly and daily limits and reporting how much of a week's limit
//! has been used.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::TrackerResult;
use crate::ledger::Ledger;
use crate::models::{DailyBudget, DateRange, Money, WeeklyBudget};
use crate::storage::Storage;

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

/// Input for setting a weekly budget
///
/// `None` for the optional figures keeps whatever was recorded before.
#[derive(Debug, Clone)]
pub struct SetWeeklyBudgetInput {
    pub week_start: NaiveDate,
    pub limit: Money,
    pub money_available: Option<Money>,
    pub expected_income: Option<Money>,
}

/// Spending against one weekly budget
#[derive(Debug, Clone)]
pub struct WeeklyStatus {
    pub budget: WeeklyBudget,
    pub spent: Money,
    /// Limit minus spent; negative when over budget
    pub remaining: Money,
    /// Spent / limit, `None` for a zero limit
    pub usage: Option<f64>,
}

impl WeeklyStatus {
    pub fn from_ledger(ledger: &Ledger, budget: &WeeklyBudget) -> Self {
        let spent = ledger.total_spend(budget.range());
        Self {
            budget: budget.clone(),
            spent,
            remaining: budget.limit - spent,
            usage: ledger.budget_usage(budget.week_start),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_negative()
    }
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set (or replace) the budget for a week
    pub fn set_weekly(&self, input: SetWeeklyBudgetInput) -> TrackerResult<WeeklyBudget> {
        let mut ledger = self.storage.load_ledger()?;

        let previous = ledger.weekly_budget(input.week_start).cloned();
        let mut budget = WeeklyBudget::new(input.week_start, input.limit);
        budget.money_available = input
            .money_available
            .or_else(|| previous.as_ref().and_then(|b| b.money_available));
        budget.expected_income = input
            .expected_income
            .or_else(|| previous.as_ref().and_then(|b| b.expected_income));

        ledger.set_weekly_budget(budget.clone())?;
        self.storage.save_ledger(&ledger)?;

        let entity_id = budget.week_start.to_string();
        match &previous {
            Some(before) => {
                self.storage
                    .log_update(EntityType::WeeklyBudget, entity_id, before, &budget)?
            }
            None => self
                .storage
                .log_create(EntityType::WeeklyBudget, entity_id, &budget)?,
        }
        tracing::info!(
            week_start = %budget.week_start,
            limit = %budget.limit,
            replaced = previous.is_some(),
            "weekly budget set"
        );

        Ok(budget)
    }

    /// Set (or replace) the budget for a single day
    pub fn set_daily(&self, date: NaiveDate, limit: Money) -> TrackerResult<DailyBudget> {
        let mut ledger = self.storage.load_ledger()?;
        let previous = ledger.set_daily_budget(date, limit)?;
        self.storage.save_ledger(&ledger)?;

        let budget = DailyBudget::new(date, limit);
        match &previous {
            Some(before) => self.storage.log_update(
                EntityType::DailyBudget,
                date.to_string(),
                before,
                &budget,
            )?,
            None => self
                .storage
                .log_create(EntityType::DailyBudget, date.to_string(), &budget)?,
        }
        tracing::info!(%date, limit = %limit, "daily budget set");

        Ok(budget)
    }

    /// Status of the week starting at `week_start`; `None` if unbudgeted
    pub fn weekly_status(&self, week_start: NaiveDate) -> TrackerResult<Option<WeeklyStatus>> {
        let ledger = self.storage.load_ledger()?;
        Ok(ledger
            .weekly_budget(week_start)
            .map(|budget| WeeklyStatus::from_ledger(&ledger, budget)))
    }

    /// Status of every budgeted week, oldest first
    pub fn list_weekly(&self) -> TrackerResult<Vec<WeeklyStatus>> {
        let ledger = self.storage.load_ledger()?;
        Ok(ledger
            .weekly_budgets()
            .map(|budget| WeeklyStatus::from_ledger(&ledger, budget))
            .collect())
    }

    pub fn list_daily(&self) -> TrackerResult<Vec<(DailyBudget, Money)>> {
        let ledger = self.storage.load_ledger()?;
        Ok(ledger
            .daily_budgets()
            .map(|b| {
                let spent = ledger.total_spend(DateRange::day(b.date));
                (b.clone(), spent)
            })
            .collect())
    }
}

//! Budget display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::format_usage;
use crate::models::{DailyBudget, Money};
use crate::services::WeeklyStatus;

#[derive(Tabled)]
struct WeeklyRow {
    #[tabled(rename = "Week Start")]
    week_start: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
}

#[derive(Tabled)]
struct DailyRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Used")]
    used: String,
}

pub fn format_weekly_status_list(statuses: &[WeeklyStatus], currency: &str) -> String {
    if statuses.is_empty() {
        return "No weekly budgets set.\n".to_string();
    }

    let rows = statuses.iter().map(|s| WeeklyRow {
        week_start: s.budget.week_start.to_string(),
        limit: s.budget.limit.format_with_symbol(currency),
        spent: s.spent.format_with_symbol(currency),
        remaining: s.remaining.format_with_symbol(currency),
        used: format_usage(s.usage),
    });

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}

/// Detail view for one budgeted week
pub fn format_weekly_status(status: &WeeklyStatus, currency: &str) -> String {
    let budget = &status.budget;
    let range = budget.range();
    let mut output = String::new();

    output.push_str(&format!("Week:            {}\n", range));
    output.push_str(&format!("Limit:           {}\n", budget.limit.format_with_symbol(currency)));
    output.push_str(&format!("Spent:           {}\n", status.spent.format_with_symbol(currency)));
    output.push_str(&format!(
        "Remaining:       {}\n",
        status.remaining.format_with_symbol(currency)
    ));
    output.push_str(&format!("Used:            {}\n", format_usage(status.usage)));
    if let Some(available) = budget.money_available {
        output.push_str(&format!("Money Available: {}\n", available.format_with_symbol(currency)));
    }
    if let Some(income) = budget.expected_income {
        output.push_str(&format!("Expected Income: {}\n", income.format_with_symbol(currency)));
    }
    if status.is_over_budget() {
        output.push_str("Status:          OVER BUDGET\n");
    }

    output
}

pub fn format_daily_budget_list(budgets: &[(DailyBudget, Money)], currency: &str) -> String {
    if budgets.is_empty() {
        return "No daily budgets set.\n".to_string();
    }

    let rows = budgets.iter().map(|(budget, spent)| DailyRow {
        date: budget.date.to_string(),
        limit: budget.limit.format_with_symbol(currency),
        spent: spent.format_with_symbol(currency),
        used: format_usage(spent.ratio(budget.limit)),
    });

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeeklyBudget;
    use chrono::NaiveDate;

    fn status(spent: i64) -> WeeklyStatus {
        let budget = WeeklyBudget::new(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(), Money::from_major(100));
        let spent = Money::from_major(spent);
        WeeklyStatus {
            remaining: budget.limit - spent,
            usage: spent.ratio(budget.limit),
            budget,
            spent,
        }
    }

    #[test]
    fn test_weekly_list() {
        let output = format_weekly_status_list(&[status(40)], "₵");
        assert!(output.contains("2025-01-06"));
        assert!(output.contains("₵60.00"));
        assert!(output.contains("40.0%"));
    }

    #[test]
    fn test_over_budget_detail() {
        let output = format_weekly_status(&status(120), "₵");
        assert!(output.contains("Remaining:       -₵20.00"));
        assert!(output.contains("OVER BUDGET"));
    }

    #[test]
    fn test_daily_list() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let output = format_daily_budget_list(
            &[(DailyBudget::new(day, Money::from_major(20)), Money::from_major(5))],
            "₵",
        );
        assert!(output.contains("25.0%"));
    }
}

//! Budget CLI commands
//!
//! Implements CLI commands for weekly and daily spending limits.

use clap::Subcommand;

use super::{date_or_today, today};
use crate::config::settings::Settings;
use crate::display::budget::{
    format_daily_budget_list, format_weekly_status, format_weekly_status_list,
};
use crate::error::{TrackerError, TrackerResult};
use crate::models::parse_date;
use crate::reports::week_start_of;
use crate::services::{parse_amount, BudgetService, SetWeeklyBudgetInput};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the spending limit for a week
    Set {
        /// Weekly limit (e.g., "150"); falls back to the configured default
        #[arg(allow_hyphen_values = true)]
        limit: Option<String>,
        /// First day of the week (YYYY-MM-DD), defaults to this week's Monday
        #[arg(short, long)]
        week: Option<String>,
        /// Money available at the start of the week
        #[arg(short = 'a', long)]
        available: Option<String>,
        /// Income expected during the week
        #[arg(short = 'i', long)]
        income: Option<String>,
    },
    /// Set the spending limit for a single day
    Daily {
        /// Daily limit
        #[arg(allow_hyphen_values = true)]
        limit: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show spending against a week's budget
    Status {
        /// First day of the week (YYYY-MM-DD), defaults to this week's Monday
        #[arg(short, long)]
        week: Option<String>,
    },
    /// List all budgets
    List {
        /// List daily budgets instead of weekly ones
        #[arg(long)]
        daily: bool,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> TrackerResult<()> {
    let service = BudgetService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Set {
            limit,
            week,
            available,
            income,
        } => {
            let limit = match limit {
                Some(limit) => parse_amount(&limit)?,
                None => settings.default_weekly_limit.ok_or_else(|| {
                    TrackerError::Validation(
                        "No limit given and no default_weekly_limit configured".into(),
                    )
                })?,
            };
            let input = SetWeeklyBudgetInput {
                week_start: resolve_week(week.as_deref())?,
                limit,
                money_available: available.as_deref().map(parse_amount).transpose()?,
                expected_income: income.as_deref().map(parse_amount).transpose()?,
            };

            let budget = service.set_weekly(input)?;
            println!(
                "Weekly budget for {} set to {}",
                budget.range(),
                settings.money(budget.limit)
            );
        }

        BudgetCommands::Daily { limit, date } => {
            let date = date_or_today(date.as_deref())?;
            let budget = service.set_daily(date, parse_amount(&limit)?)?;
            println!(
                "Daily budget for {} set to {}",
                budget.date,
                settings.money(budget.limit)
            );
        }

        BudgetCommands::Status { week } => {
            let week_start = resolve_week(week.as_deref())?;
            match service.weekly_status(week_start)? {
                Some(status) => print!("{}", format_weekly_status(&status, currency)),
                None => println!("No budget set for the week starting {}.", week_start),
            }
        }

        BudgetCommands::List { daily } => {
            if daily {
                print!("{}", format_daily_budget_list(&service.list_daily()?, currency));
            } else {
                print!("{}", format_weekly_status_list(&service.list_weekly()?, currency));
            }
        }
    }

    Ok(())
}

/// An explicit week start is taken as given; otherwise this week's Monday
fn resolve_week(week: Option<&str>) -> TrackerResult<chrono::NaiveDate> {
    match week {
        Some(week) => parse_date(week),
        None => Ok(week_start_of(today())),
    }
}

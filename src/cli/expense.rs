//! Expense CLI commands
//!
//! Implements CLI commands for recording, listing and removing expenses.

use clap::Subcommand;

use super::{date_or_today, today, RangeArgs};
use crate::config::settings::Settings;
use crate::display::expense::{format_expense_details, format_expense_list};
use crate::error::TrackerResult;
use crate::models::ExpenseCategory;
use crate::services::{AddExpenseInput, ExpenseFilter, ExpenseService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense
    Add {
        /// Category (transport, food, data, other)
        category: String,
        /// Amount (e.g., "12.50")
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Expense date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List expenses
    List {
        /// Filter by category
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Only show the most recent N expenses
        #[arg(short, long)]
        limit: Option<usize>,
        /// Show every expense regardless of date
        #[arg(long, conflicts_with_all = ["from", "to", "preset"])]
        all: bool,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Show expense details
    Show {
        /// Expense ID (full UUID or short form)
        id: String,
    },
    /// Remove an expense
    Remove {
        /// Expense ID (full UUID or short form)
        id: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> TrackerResult<()> {
    let service = ExpenseService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            category,
            amount,
            date,
            note,
        } => {
            let date = date_or_today(date.as_deref())?;
            let record = service.add(AddExpenseInput {
                date,
                category,
                amount,
                note,
            })?;

            println!(
                "Recorded {} {} on {} ({})",
                record.category.label(),
                settings.money(record.amount),
                record.date,
                record.id
            );
        }

        ExpenseCommands::List {
            category,
            limit,
            all,
            range,
        } => {
            let mut filter = ExpenseFilter::new();
            if !all {
                filter = filter.range(range.resolve(today())?);
            }
            if let Some(category) = category {
                filter = filter.category(category.parse::<ExpenseCategory>()?);
            }
            if let Some(limit) = limit {
                filter = filter.limit(limit);
            }

            let records = service.list(&filter)?;
            print!("{}", format_expense_list(&records, currency, &settings.date_format));
        }

        ExpenseCommands::Show { id } => {
            let record = service.get(&id)?;
            print!("{}", format_expense_details(&record, currency, &settings.date_format));
        }

        ExpenseCommands::Remove { id } => {
            let removed = service.remove(&id)?;
            println!(
                "Removed {} {} on {} ({})",
                removed.category.label(),
                settings.money(removed.amount),
                removed.date,
                removed.id
            );
        }
    }

    Ok(())
}

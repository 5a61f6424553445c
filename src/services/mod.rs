//! Service layer for the expense tracker
//!
//! Services sit between the CLI and storage: they parse user input, apply
//! changes through the [`Ledger`](crate::ledger::Ledger), persist the result
//! and record each change in the audit log.

pub mod budget;
pub mod expense;
pub mod import;

pub use budget::{BudgetService, SetWeeklyBudgetInput, WeeklyStatus};
pub use expense::{parse_amount, AddExpenseInput, ExpenseFilter, ExpenseService};
pub use import::{import_csv, ImportFormat, ImportResult, ImportService, ParsedImport, RowError};

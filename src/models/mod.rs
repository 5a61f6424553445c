//! Core data models for the expense tracker
//!
//! This module contains the data structures of the expense domain: records,
//! categories, budgets, money and date ranges.

pub mod budget;
pub mod category;
pub mod expense;
pub mod ids;
pub mod money;
pub mod range;

pub use budget::{DailyBudget, WeeklyBudget};
pub use category::ExpenseCategory;
pub use expense::ExpenseRecord;
pub use ids::ExpenseId;
pub use money::Money;
pub use range::{parse_date, DateRange};

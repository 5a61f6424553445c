//! Display formatting for terminal output
//!
//! Tables for expense and budget listings, and detail views for single
//! records. Amounts are shown with the configured currency symbol.

pub mod budget;
pub mod expense;

pub use budget::{format_daily_budget_list, format_weekly_status, format_weekly_status_list};
pub use expense::{format_expense_details, format_expense_list};

/// Truncate a string to `max_len` characters, adding an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// A usage ratio as a percentage, or "-" when there is none
pub fn format_usage(usage: Option<f64>) -> String {
    usage
        .map(|u| format!("{:.1}%", u * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

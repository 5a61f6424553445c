//! Expense display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::truncate;
use crate::models::ExpenseRecord;

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Note")]
    note: String,
}

/// Format expense records as a table with a total line
///
/// `date_format` is a strftime pattern.
pub fn format_expense_list(records: &[ExpenseRecord], currency: &str, date_format: &str) -> String {
    if records.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows = records.iter().map(|r| ExpenseRow {
        id: r.id.to_string(),
        date: r.date.format(date_format).to_string(),
        category: r.category.label().to_string(),
        amount: r.amount.format_with_symbol(currency),
        note: truncate(r.note_or_empty(), 30),
    });

    let total: crate::models::Money = records.iter().map(|r| r.amount).sum();

    let mut output = Table::new(rows).with(Style::rounded()).to_string();
    output.push('\n');
    output.push_str(&format!(
        "{} expense(s), total {}\n",
        records.len(),
        total.format_with_symbol(currency)
    ));
    output
}

/// Format a single expense for display
pub fn format_expense_details(record: &ExpenseRecord, currency: &str, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:  {}\n", record.id));
    output.push_str(&format!("UUID:     {}\n", record.id.as_uuid()));
    output.push_str(&format!("Date:     {}\n", record.date.format(date_format)));
    output.push_str(&format!("Category: {}\n", record.category.label()));
    output.push_str(&format!("Amount:   {}\n", record.amount.format_with_symbol(currency)));
    if let Some(note) = &record.note {
        output.push_str(&format!("Note:     {}\n", note));
    }
    output.push_str(&format!(
        "Entered:  {}\n",
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, Money};
    use chrono::NaiveDate;

    fn record() -> ExpenseRecord {
        ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            ExpenseCategory::Transport,
            Money::from_cents(850),
            Some("trotro".into()),
        )
    }

    #[test]
    fn test_list_contains_rows_and_total() {
        let output = format_expense_list(&[record(), record()], "₵", "%d/%m/%Y");
        assert!(output.contains("Transport"));
        assert!(output.contains("06/01/2025"));
        assert!(output.contains("₵8.50"));
        assert!(output.contains("2 expense(s), total ₵17.00"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_expense_list(&[], "₵", "%Y-%m-%d"), "No expenses found.\n");
    }

    #[test]
    fn test_details() {
        let output = format_expense_details(&record(), "$", "%Y-%m-%d");
        assert!(output.contains("Amount:   $8.50"));
        assert!(output.contains("Note:     trotro"));
    }
}

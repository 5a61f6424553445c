//! CSV Export functionality
//!
//! Exports expense records and weekly budgets to CSV format.

use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::ledger::Ledger;

/// Export every expense record, in ledger order
///
/// The ID column carries the full UUID so rows can be matched back later.
pub fn export_expenses_csv<W: Write>(ledger: &Ledger, writer: &mut W) -> TrackerResult<()> {
    writeln!(writer, "ID,Date,Category,Amount,Note")
        .map_err(|e| TrackerError::Export(e.to_string()))?;

    for record in ledger.expenses() {
        writeln!(
            writer,
            "{},{},{},{:.2},{}",
            record.id.as_uuid(),
            record.date,
            record.category,
            record.amount.as_f64(),
            escape_csv(record.note_or_empty())
        )
        .map_err(|e| TrackerError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Export weekly budgets with what was spent against each
pub fn export_budgets_csv<W: Write>(ledger: &Ledger, writer: &mut W) -> TrackerResult<()> {
    writeln!(
        writer,
        "Week Start,Limit,Spent,Money Available,Expected Income,Usage Percent"
    )
    .map_err(|e| TrackerError::Export(e.to_string()))?;

    let optional = |amount: Option<crate::models::Money>| {
        amount
            .map(|a| format!("{:.2}", a.as_f64()))
            .unwrap_or_default()
    };

    for budget in ledger.weekly_budgets() {
        let usage = ledger
            .budget_usage(budget.week_start)
            .map(|u| format!("{:.2}", u * 100.0))
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{:.2},{:.2},{},{},{}",
            budget.week_start,
            budget.limit.as_f64(),
            ledger.total_spend(budget.range()).as_f64(),
            optional(budget.money_available),
            optional(budget.expected_income),
            usage
        )
        .map_err(|e| TrackerError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Quote a field if it contains a delimiter, quote or newline
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseCategory, ExpenseRecord, Money, WeeklyBudget};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn test_export_expenses_csv() {
        let mut ledger = Ledger::new();
        let id = ledger
            .add_expense(ExpenseRecord::new(
                day(6),
                ExpenseCategory::Food,
                Money::from_cents(1250),
                Some("rice, beans".into()),
            ))
            .unwrap();
        ledger
            .add_expense(ExpenseRecord::new(
                day(7),
                ExpenseCategory::Transport,
                Money::from_cents(400),
                None,
            ))
            .unwrap();

        let mut output = Vec::new();
        export_expenses_csv(&ledger, &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID,Date,Category,Amount,Note");
        assert_eq!(
            lines[1],
            format!("{},2025-01-06,food,12.50,\"rice, beans\"", id.as_uuid())
        );
        assert!(lines[2].ends_with(",2025-01-07,transport,4.00,"));
    }

    #[test]
    fn test_export_budgets_csv() {
        let mut ledger = Ledger::new();
        ledger
            .set_weekly_budget(
                WeeklyBudget::new(day(6), Money::from_major(100))
                    .with_money_available(Money::from_major(250)),
            )
            .unwrap();
        ledger
            .add_expense(ExpenseRecord::new(
                day(8),
                ExpenseCategory::Data,
                Money::from_major(25),
                None,
            ))
            .unwrap();

        let mut output = Vec::new();
        export_budgets_csv(&ledger, &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();

        assert!(csv.contains("2025-01-06,100.00,25.00,250.00,,25.00"));
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}

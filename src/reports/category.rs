//! Category Report
//!
//! Spending per category over a date range.

use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::ledger::{CategoryTotal, Ledger};
use crate::models::{DateRange, ExpenseCategory, Money};

/// One category's share of spending
#[derive(Debug, Clone)]
pub struct CategoryRow {
    pub category: ExpenseCategory,
    pub amount: Money,
    pub count: usize,
    /// Share of total spend, 0-100
    pub percentage: f64,
}

/// Category Report
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub range: DateRange,
    /// Every category, largest spend first
    pub rows: Vec<CategoryRow>,
    pub total: Money,
    pub total_count: usize,
}

impl CategoryReport {
    pub fn generate(ledger: &Ledger, range: DateRange) -> Self {
        let totals = ledger.category_totals(range);
        let total: Money = totals.iter().map(|t| t.amount).sum();
        let total_count = totals.iter().map(|t| t.count).sum();

        let mut rows: Vec<CategoryRow> = totals
            .into_iter()
            .map(|CategoryTotal { category, amount, count }| CategoryRow {
                category,
                amount,
                count,
                percentage: amount.ratio(total).map_or(0.0, |r| r * 100.0),
            })
            .collect();

        // Stable sort keeps category order among ties
        rows.sort_by(|a, b| b.amount.cmp(&a.amount));

        Self {
            range,
            rows,
            total,
            total_count,
        }
    }

    /// The largest category, if anything was spent
    pub fn top(&self) -> Option<&CategoryRow> {
        self.rows.first().filter(|row| !row.amount.is_zero())
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Spending by Category: {}\n", self.range));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>14} {:>8} {:>10}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<20} {:>14} {:>8} {:>9.1}%\n",
                row.category.label(),
                row.amount,
                row.count,
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>14} {:>8}\n",
            "TOTAL", self.total, self.total_count
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> TrackerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| TrackerError::Export(e.to_string());

        csv.write_record(["Start Date", "End Date", "Category", "Amount", "Count", "Percentage"])
            .map_err(export_err)?;

        let start = self.range.start.to_string();
        let end = self.range.end.to_string();
        for row in &self.rows {
            csv.write_record([
                start.clone(),
                end.clone(),
                row.category.as_str().to_string(),
                format!("{:.2}", row.amount.as_f64()),
                row.count.to_string(),
                format!("{:.2}", row.percentage),
            ])
            .map_err(export_err)?;
        }

        let total_pct = if self.total.is_zero() { "0.00" } else { "100.00" };
        csv.write_record([
            start,
            end,
            "TOTAL".to_string(),
            format!("{:.2}", self.total.as_f64()),
            self.total_count.to_string(),
            total_pct.to_string(),
        ])
        .map_err(export_err)?;

        csv.flush()
            .map_err(|e| TrackerError::Export(e.to_string()))?;
        Ok(())
    }
}

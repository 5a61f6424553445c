//! Anomaly Report
//!
//! Unusually expensive days, most extreme first, with the categories that
//! drove each one.

use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::ledger::{Anomaly, Ledger};
use crate::models::{DateRange, ExpenseCategory, Money};

/// An anomalous day with its biggest categories
#[derive(Debug, Clone)]
pub struct AnomalyRow {
    pub anomaly: Anomaly,
    /// Up to two categories, largest first
    pub top_categories: Vec<(ExpenseCategory, Money)>,
}

/// Anomaly Report
#[derive(Debug, Clone)]
pub struct AnomalyReport {
    /// Window the statistics were computed over; `None` for an empty ledger
    pub window: Option<DateRange>,
    pub threshold: f64,
    pub rows: Vec<AnomalyRow>,
}

impl AnomalyReport {
    /// Detect anomalies over `range`, or the whole observed window if `None`
    pub fn generate(
        ledger: &Ledger,
        range: Option<DateRange>,
        threshold: f64,
    ) -> TrackerResult<Self> {
        let window = range.or_else(|| ledger.observed_range());
        let mut anomalies = match window {
            Some(window) => ledger.detect_anomalies_in(window, threshold)?,
            None => ledger.detect_anomalies(threshold)?,
        };

        anomalies.sort_by(|a, b| {
            b.z_score
                .abs()
                .total_cmp(&a.z_score.abs())
                .then(a.date.cmp(&b.date))
        });

        let rows = anomalies
            .into_iter()
            .map(|anomaly| {
                let mut categories: Vec<(ExpenseCategory, Money)> = ledger
                    .category_totals(DateRange::day(anomaly.date))
                    .into_iter()
                    .filter(|t| !t.amount.is_zero())
                    .map(|t| (t.category, t.amount))
                    .collect();
                categories.sort_by(|a, b| b.1.cmp(&a.1));
                categories.truncate(2);
                AnomalyRow {
                    anomaly,
                    top_categories: categories,
                }
            })
            .collect();

        Ok(Self {
            window,
            threshold,
            rows,
        })
    }

    fn describe_categories(row: &AnomalyRow) -> String {
        row.top_categories
            .iter()
            .map(|(category, amount)| format!("{} {}", category, amount))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        let window = self
            .window
            .map(|w| w.to_string())
            .unwrap_or_else(|| "no expenses recorded".into());
        output.push_str(&format!(
            "Spending Anomalies: {} (threshold {:.2} sd)\n",
            window, self.threshold
        ));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No unusual spending days found.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<12} {:>12} {:>8} {:<8} {}\n",
            "Date", "Spent", "Z-Score", "Severity", "Top Categories"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<12} {:>12} {:>8.2} {:<8} {}\n",
                row.anomaly.date.to_string(),
                row.anomaly.total,
                row.anomaly.z_score,
                row.anomaly.severity,
                Self::describe_categories(row)
            ));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> TrackerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| TrackerError::Export(e.to_string());

        csv.write_record(["Date", "Amount", "Z-Score", "Severity", "Top Categories"])
            .map_err(export_err)?;

        for row in &self.rows {
            csv.write_record([
                row.anomaly.date.to_string(),
                format!("{:.2}", row.anomaly.total.as_f64()),
                format!("{:.2}", row.anomaly.z_score),
                row.anomaly.severity.to_string(),
                Self::describe_categories(row),
            ])
            .map_err(export_err)?;
        }

        csv.flush()
            .map_err(|e| TrackerError::Export(e.to_string()))?;
        Ok(())
    }
}

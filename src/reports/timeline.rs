//! Timeline Report
//!
//! Day-by-day spend with a running total and a 7-day trailing average.

use chrono::NaiveDate;

use crate::ledger::stats::moving_average;
use crate::ledger::Ledger;
use crate::models::{DateRange, Money};

const MOVING_AVERAGE_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub total: Money,
    pub cumulative: Money,
    pub moving_average: Money,
}

/// Timeline Report
#[derive(Debug, Clone)]
pub struct TimelineReport {
    pub range: DateRange,
    pub points: Vec<TimelinePoint>,
}

impl TimelineReport {
    pub fn generate(ledger: &Ledger, range: DateRange) -> Self {
        let daily = ledger.daily_totals(range);
        let values: Vec<f64> = daily.iter().map(|(_, m)| m.as_f64()).collect();
        let averages = moving_average(&values, MOVING_AVERAGE_WINDOW);

        let mut cumulative = Money::zero();
        let points = daily
            .into_iter()
            .zip(averages)
            .map(|((date, total), avg)| {
                cumulative += total;
                TimelinePoint {
                    date,
                    total,
                    cumulative,
                    moving_average: Money::from_major_f64(avg),
                }
            })
            .collect();

        Self { range, points }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Daily Timeline: {}\n", self.range));
        output.push_str(&"=".repeat(56));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>14} {:>14} {:>12}\n",
            "Date", "Spent", "Cumulative", "7-day Avg"
        ));
        output.push_str(&"-".repeat(56));
        output.push('\n');

        for point in &self.points {
            output.push_str(&format!(
                "{:<12} {:>14} {:>14} {:>12}\n",
                point.date.to_string(),
                point.total,
                point.cumulative,
                point.moving_average
            ));
        }

        output
    }
}

//! Pattern Report
//!
//! Day-of-week habits and short actionable insights.

use chrono::{Datelike, Weekday};

use super::category::CategoryReport;
use super::period::week_start_of;
use crate::ledger::Ledger;
use crate::models::{DateRange, Money};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Spending on one day of the week, over days with expenses
#[derive(Debug, Clone)]
pub struct WeekdayStats {
    pub weekday: Weekday,
    pub total: Money,
    /// Number of dates with expenses that fall on this weekday
    pub days: usize,
    pub mean: Option<Money>,
}

/// Kind of insight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    Category,
    Budget,
    Trend,
}

/// An observation with a suggested action
#[derive(Debug, Clone)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
    pub suggestion: String,
}

/// Pattern Report
#[derive(Debug, Clone)]
pub struct PatternReport {
    pub range: DateRange,
    pub weekdays: Vec<WeekdayStats>,
    /// Busiest weekday and how many times its mean exceeds the quietest
    pub peak: Option<(Weekday, f64)>,
    /// Weekend spend divided by weekday spend
    pub weekend_ratio: Option<f64>,
    pub insights: Vec<Insight>,
}

impl PatternReport {
    pub fn generate(ledger: &Ledger, range: DateRange) -> Self {
        let active_days: Vec<_> = ledger
            .daily_totals(range)
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .collect();

        let weekdays: Vec<WeekdayStats> = WEEKDAYS
            .iter()
            .map(|&weekday| {
                let (total, days) = active_days
                    .iter()
                    .filter(|(date, _)| date.weekday() == weekday)
                    .fold((Money::zero(), 0usize), |(sum, n), (_, amount)| (sum + *amount, n + 1));
                let mean = (days > 0).then(|| Money::from_cents(total.cents() / days as i64));
                WeekdayStats {
                    weekday,
                    total,
                    days,
                    mean,
                }
            })
            .collect();

        let peak = find_peak(&weekdays);

        let (weekend, weekday): (Vec<_>, Vec<_>) = weekdays
            .iter()
            .partition(|s| matches!(s.weekday, Weekday::Sat | Weekday::Sun));
        let weekend_total: Money = weekend.iter().map(|s| s.total).sum();
        let weekday_total: Money = weekday.iter().map(|s| s.total).sum();
        let weekend_ratio = weekend_total.ratio(weekday_total);

        Self {
            range,
            weekdays,
            peak,
            weekend_ratio,
            insights: generate_insights(ledger, range),
        }
    }

    /// Human-readable pattern lines
    pub fn patterns(&self) -> Vec<String> {
        let mut patterns = Vec::new();
        if let Some((weekday, ratio)) = self.peak {
            patterns.push(format!(
                "Peak spending on {}s (+{:.0}%)",
                weekday_name(weekday),
                (ratio - 1.0) * 100.0
            ));
        }
        if let Some(ratio) = self.weekend_ratio.filter(|r| *r > 1.5) {
            patterns.push(format!(
                "Weekend spending is {:.1}x higher than weekdays",
                ratio
            ));
        }
        patterns
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Spending Patterns: {}\n", self.range));
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>14} {:>6} {:>14}\n",
            "Day", "Total", "Days", "Average"
        ));
        output.push_str(&"-".repeat(50));
        output.push('\n');

        for stats in &self.weekdays {
            let mean = stats
                .mean
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".into());
            output.push_str(&format!(
                "{:<12} {:>14} {:>6} {:>14}\n",
                weekday_name(stats.weekday),
                stats.total,
                stats.days,
                mean
            ));
        }

        let patterns = self.patterns();
        if !patterns.is_empty() {
            output.push_str("\nPatterns:\n");
            for pattern in patterns {
                output.push_str(&format!("  * {}\n", pattern));
            }
        }

        if !self.insights.is_empty() {
            output.push_str("\nInsights:\n");
            for insight in &self.insights {
                output.push_str(&format!("  * {}\n    {}\n", insight.message, insight.suggestion));
            }
        }

        output
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// The weekday with the highest mean, when it is more than twice the lowest
fn find_peak(weekdays: &[WeekdayStats]) -> Option<(Weekday, f64)> {
    let means: Vec<(Weekday, Money)> = weekdays
        .iter()
        .filter_map(|s| s.mean.map(|m| (s.weekday, m)))
        .collect();
    if means.len() < 2 {
        return None;
    }
    let (peak_day, max) = means.iter().copied().max_by_key(|(_, m)| *m)?;
    let (_, min) = means.iter().copied().min_by_key(|(_, m)| *m)?;
    let ratio = max.ratio(min)?;
    (ratio > 2.0).then_some((peak_day, ratio))
}

fn generate_insights(ledger: &Ledger, range: DateRange) -> Vec<Insight> {
    let mut insights = Vec::new();

    let categories = CategoryReport::generate(ledger, range);
    if let Some(top) = categories.top().filter(|row| row.percentage > 40.0) {
        insights.push(Insight {
            kind: InsightKind::Category,
            message: format!(
                "{} accounts for {:.0}% of total spending",
                top.category.label(),
                top.percentage
            ),
            suggestion: format!(
                "Consider setting a specific budget for {} or finding alternatives",
                top.category
            ),
        });
    }

    if let Some(budget) = ledger.budget_covering(range.end) {
        if let Some(usage) = ledger.budget_usage(budget.week_start).filter(|u| *u > 1.0) {
            let over = ledger.total_spend(budget.range()) - budget.limit;
            insights.push(Insight {
                kind: InsightKind::Budget,
                message: format!(
                    "Budget alert: {:.0}% of the weekly budget from {} is spent",
                    usage * 100.0,
                    budget.week_start
                ),
                suggestion: format!("Spending is {} over the limit; hold off on non-essentials", over),
            });
        }
    }

    if let Some(change) = week_over_week_change(ledger, range).filter(|c| c.abs() > 10.0) {
        insights.push(Insight {
            kind: InsightKind::Trend,
            message: format!(
                "Weekly spending {} by {:.0}%",
                if change > 0.0 { "increased" } else { "decreased" },
                change.abs()
            ),
            suggestion: "Review what caused this change to understand your spending habits".into(),
        });
    }

    insights
}

/// Percentage change between the last two calendar weeks touching `range`
///
/// Needs at least three weeks of history, and a non-zero previous week.
fn week_over_week_change(ledger: &Ledger, range: DateRange) -> Option<f64> {
    if range.is_empty() {
        return None;
    }
    let mut week_totals = Vec::new();
    let mut start = week_start_of(range.start);
    while start <= range.end {
        let week = DateRange::week(start);
        let clipped = DateRange::new(week.start.max(range.start), week.end.min(range.end));
        week_totals.push(ledger.total_spend(clipped));
        start = week.end.succ_opt()?;
    }
    if week_totals.len() < 3 {
        return None;
    }
    let last = week_totals[week_totals.len() - 1];
    let previous = week_totals[week_totals.len() - 2];
    (last - previous).ratio(previous).map(|r| r * 100.0)
}

//! Reports module for the expense tracker
//!
//! Every report is generated from a [`Ledger`](crate::ledger::Ledger) and a
//! date range, renders itself for the terminal, and (for the tabular ones)
//! exports to CSV.

pub mod anomaly;
pub mod category;
pub mod pattern;
pub mod period;
pub mod summary;
pub mod timeline;

pub use anomaly::{AnomalyReport, AnomalyRow};
pub use category::{CategoryReport, CategoryRow};
pub use pattern::{Insight, InsightKind, PatternReport, WeekdayStats};
pub use period::{week_start_of, Granularity, PeriodReport, PeriodRow};
pub use summary::{SpendingProfile, SummaryReport};
pub use timeline::{TimelinePoint, TimelineReport};

//! Anomalous spending days
//!
//! A day is anomalous when its total exceeds `mean + threshold * sd` of the
//! daily totals in the window. The window is zero-filled, so days without
//! expenses pull the mean down rather than being ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::stats::{mean, sample_std_dev};
use crate::models::Money;

/// How far a day sits from typical spending
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// |z| above 3 is high, above 2 medium, anything else low
    pub fn from_z_score(z: f64) -> Self {
        let z = z.abs();
        if z > 3.0 {
            Self::High
        } else if z > 2.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.pad(label)
    }
}

/// A flagged day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub date: NaiveDate,
    pub total: Money,
    /// Standard deviations above the window mean
    pub z_score: f64,
    pub severity: Severity,
}

/// Flag the days in `daily_totals` that exceed `mean + threshold * sd`
///
/// Returns nothing for fewer than two days or when every total is equal.
pub fn detect(daily_totals: &[(NaiveDate, Money)], threshold: f64) -> Vec<Anomaly> {
    let values: Vec<f64> = daily_totals.iter().map(|(_, m)| m.cents() as f64).collect();

    let (Some(m), Some(sd)) = (mean(&values), sample_std_dev(&values)) else {
        return Vec::new();
    };
    if sd <= f64::EPSILON {
        return Vec::new();
    }

    let cutoff = m + threshold * sd;
    daily_totals
        .iter()
        .zip(&values)
        .filter(|(_, v)| **v > cutoff)
        .map(|(&(date, total), &v)| {
            let z_score = (v - m) / sd;
            Anomaly {
                date,
                total,
                z_score,
                severity: Severity::from_z_score(z_score),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn series(amounts: &[i64]) -> Vec<(NaiveDate, Money)> {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| (start + Duration::days(i as i64), Money::from_major(a)))
            .collect()
    }

    #[test]
    fn test_equal_totals_flag_nothing() {
        assert!(detect(&series(&[20, 20, 20, 20, 20]), 0.0).is_empty());
    }

    #[test]
    fn test_single_day_flags_nothing() {
        assert!(detect(&series(&[500]), 1.0).is_empty());
    }

    #[test]
    fn test_spike_is_flagged() {
        let totals = series(&[10, 12, 9, 11, 10, 95, 10]);
        let anomalies = detect(&totals, 1.0);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].total, Money::from_major(95));
        assert!(anomalies[0].z_score > 2.0);
    }

    #[test]
    fn test_low_days_are_not_flagged() {
        // Only the upper tail counts
        let totals = series(&[50, 50, 50, 0, 50, 50]);
        assert!(detect(&totals, 1.0).is_empty());
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(Severity::from_z_score(1.5), Severity::Low);
        assert_eq!(Severity::from_z_score(2.5), Severity::Medium);
        assert_eq!(Severity::from_z_score(-3.5), Severity::High);
    }
}

//! Expense categories
//!
//! The category set is closed: every record belongs to exactly one of the
//! variants below. Text input is matched case-insensitively.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// Category of an expense record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Transport,
    Food,
    /// Mobile data and airtime
    Data,
    Other,
}

impl ExpenseCategory {
    /// All categories, in display order
    pub const ALL: [ExpenseCategory; 4] = [
        ExpenseCategory::Transport,
        ExpenseCategory::Food,
        ExpenseCategory::Data,
        ExpenseCategory::Other,
    ];

    /// Lowercase name used in files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Food => "food",
            Self::Data => "data",
            Self::Other => "other",
        }
    }

    /// Capitalized name for reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport => "Transport",
            Self::Food => "Food",
            Self::Data => "Data",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                TrackerError::Validation(format!(
                    "Unknown category '{}' (expected one of: transport, food, data, other)",
                    s.trim()
                ))
            })
    }
}

//! Expense record model
//!
//! A record is immutable once it enters the ledger. Editing is modelled as
//! removing the old record and adding a new one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::ExpenseCategory;
use super::ids::ExpenseId;
use super::money::Money;
use crate::error::{TrackerError, TrackerResult};

/// A single spending entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: ExpenseId,

    /// Day the money was spent
    pub date: NaiveDate,

    pub category: ExpenseCategory,

    /// Amount spent; never negative once accepted by the ledger
    pub amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// When the record was entered
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Create a new record with a fresh ID
    ///
    /// Blank notes are normalized to `None`.
    pub fn new(
        date: NaiveDate,
        category: ExpenseCategory,
        amount: Money,
        note: Option<String>,
    ) -> Self {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self {
            id: ExpenseId::new(),
            date,
            category,
            amount,
            note,
            created_at: Utc::now(),
        }
    }

    /// Check the record invariants
    pub fn validate(&self) -> TrackerResult<()> {
        if self.amount.is_negative() {
            return Err(TrackerError::Validation(format!(
                "Expense amount must not be negative (got {})",
                self.amount
            )));
        }
        Ok(())
    }

    pub fn note_or_empty(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.category,
            self.amount
        )?;
        if let Some(note) = &self.note {
            write!(f, " ({})", note)?;
        }
        Ok(())
    }
}

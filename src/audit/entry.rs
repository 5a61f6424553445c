//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Expense,
    WeeklyBudget,
    DailyBudget,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Expense => write!(f, "Expense"),
            EntityType::WeeklyBudget => write!(f, "WeeklyBudget"),
            EntityType::DailyBudget => write!(f, "DailyBudget"),
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "expense" => Ok(EntityType::Expense),
            "weekly_budget" | "weekly" => Ok(EntityType::WeeklyBudget),
            "daily_budget" | "daily" => Ok(EntityType::DailyBudget),
            other => Err(TrackerError::Validation(format!(
                "Unknown entity type '{}' (expected expense, weekly-budget or daily-budget)",
                other
            ))),
        }
    }
}

/// A single audit log entry
///
/// `before` is set for updates and deletes, `after` for creates and updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Expense ID, or the date a budget applies to
    pub entity_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn build(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> Self {
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => super::diff::generate_diff(b, a),
            _ => None,
        };
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            before,
            after,
            diff_summary,
        }
    }

    pub fn create<T: Serialize>(entity_type: EntityType, entity_id: impl Into<String>, entity: &T) -> Self {
        Self::build(
            Operation::Create,
            entity_type,
            entity_id.into(),
            None,
            serde_json::to_value(entity).ok(),
        )
    }

    /// An update entry; the diff summary is derived from `before` and `after`
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        Self::build(
            Operation::Update,
            entity_type,
            entity_id.into(),
            serde_json::to_value(before).ok(),
            serde_json::to_value(after).ok(),
        )
    }

    pub fn delete<T: Serialize>(entity_type: EntityType, entity_id: impl Into<String>, entity: &T) -> Self {
        Self::build(
            Operation::Delete,
            entity_type,
            entity_id.into(),
            serde_json::to_value(entity).ok(),
            None,
        )
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_entry_has_only_after() {
        let entry = AuditEntry::create(EntityType::Expense, "exp-12345678", &json!({"amount": 500}));
        assert_eq!(entry.operation, Operation::Create);
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(json!({"amount": 500})));
    }

    #[test]
    fn test_update_entry_carries_diff() {
        let entry = AuditEntry::update(
            EntityType::WeeklyBudget,
            "2025-01-06",
            &json!({"limit": 10000}),
            &json!({"limit": 15000}),
        );
        assert_eq!(entry.diff_summary.as_deref(), Some("limit: 10000 -> 15000"));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::delete(EntityType::Expense, "exp-12345678", &json!({}));
        let text = entry.format_human_readable();
        assert!(text.contains("DELETE Expense exp-12345678"));
    }

    #[test]
    fn test_entity_type_serializes_snake_case() {
        let json = serde_json::to_string(&EntityType::WeeklyBudget).unwrap();
        assert_eq!(json, "\"weekly_budget\"");
    }

    #[test]
    fn test_entity_type_from_str() {
        assert_eq!("weekly-budget".parse::<EntityType>().unwrap(), EntityType::WeeklyBudget);
        assert_eq!("Expense".parse::<EntityType>().unwrap(), EntityType::Expense);
        assert!("account".parse::<EntityType>().unwrap_err().is_validation());
    }
}

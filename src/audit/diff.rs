//! Diff generation for audit logging

use serde_json::Value;

/// Describe top-level field changes between two JSON objects
///
/// Timestamps are ignored. Returns `None` when nothing else changed or when
/// either side is not an object.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return None;
    };

    let mut keys: Vec<&String> = before_obj.keys().chain(after_obj.keys()).collect();
    keys.sort();
    keys.dedup();

    let changes: Vec<String> = keys
        .into_iter()
        .filter(|key| !key.ends_with("_at"))
        .filter_map(|key| match (before_obj.get(key), after_obj.get(key)) {
            (Some(b), Some(a)) if b != a => Some(format!("{}: {} -> {}", key, b, a)),
            (Some(b), None) => Some(format!("{}: {} -> (removed)", key, b)),
            (None, Some(a)) => Some(format!("{}: (added) -> {}", key, a)),
            _ => None,
        })
        .collect();

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_added_removed() {
        let before = json!({"limit": 100, "money_available": 50});
        let after = json!({"limit": 150, "expected_income": 20});
        assert_eq!(
            generate_diff(&before, &after).unwrap(),
            "expected_income: (added) -> 20, limit: 100 -> 150, money_available: 50 -> (removed)"
        );
    }

    #[test]
    fn test_timestamps_ignored() {
        let before = json!({"limit": 100, "updated_at": "2025-01-01T00:00:00Z"});
        let after = json!({"limit": 100, "updated_at": "2025-01-02T00:00:00Z"});
        assert_eq!(generate_diff(&before, &after), None);
    }
}

//! Strongly-typed ID wrapper for expense records
//!
//! Records are addressed by a random UUID. The short display form
//! (`exp-` plus the first eight hex digits) is what the CLI prints and accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const DISPLAY_PREFIX: &str = "exp-";

/// Identifier of an [`ExpenseRecord`](super::ExpenseRecord)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The eight hex digits shown after the `exp-` prefix
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    /// Whether a user-supplied reference names this ID
    ///
    /// Accepts the full UUID, the short display form with or without the
    /// prefix, or any longer hex prefix of the UUID.
    pub fn matches(&self, reference: &str) -> bool {
        let reference = reference.trim();
        let reference = reference.strip_prefix(DISPLAY_PREFIX).unwrap_or(reference);
        if reference.len() < 8 {
            return false;
        }
        let hyphenated = self.0.to_string();
        let simple = self.0.simple().to_string();
        let reference = reference.to_ascii_lowercase();
        hyphenated.starts_with(&reference) || simple.starts_with(&reference)
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DISPLAY_PREFIX, self.short())
    }
}

impl From<Uuid> for ExpenseId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for ExpenseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix(DISPLAY_PREFIX).unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}

//! Audit trail domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actor name used for actions nobody logged in for (e.g. opening an account)
pub const SYSTEM_ACTOR: &str = "system";

/// A free-text row recording who did what
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub actor: String,
    pub action: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

/// An audit row that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub actor: String,
    pub action: String,
    pub details: String,
}

impl NewAuditEntry {
    pub fn new(actor: impl Into<String>, action: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            action: action.into(),
            details: details.into(),
        }
    }
}

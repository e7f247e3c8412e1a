//! Audit History
//!
//! Immutable, append-only change log rows produced by the storage service on
//! every create/update/delete. This core only reads and chronologically
//! merges them; it never writes history.

use crate::record::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of change a history row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

/// One immutable audit-log row for a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub record_id: RecordId,
    pub actor_id: String,
    pub actor_name: String,
    pub at: DateTime<Utc>,
    pub kind: ChangeKind,
    /// Field the change touched; absent for whole-record create/delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    #[serde(default)]
    pub description: String,
}

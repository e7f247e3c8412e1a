//! Attachments
//!
//! A file bound to a case and stage, and optionally to one owning record.
//! The binding is encoded in the stored name (see the client crate's naming
//! module); this type only carries what the storage service returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-generated numeric file id.
pub type FileId = i64;

/// One uploaded file as reported by the storage service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: FileId,
    /// Convention-encoded stored name (`<human>_<stage>_<record>_<millis>.<ext>`
    /// when record-scoped).
    pub stored_name: String,
    /// Either a directly-usable URL or an internal path that must first be
    /// exchanged for a short-lived signed address.
    pub location: String,
    /// Compliance judgment by the reviewer; unset until reviewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complies: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Attachment {
    /// Whether `location` can be opened as-is, without a signing exchange.
    pub fn has_direct_location(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }
}

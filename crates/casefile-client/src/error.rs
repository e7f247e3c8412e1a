//! Client-Side Error Taxonomy
//!
//! Every subsystem error stops at the stage boundary: a failure in one
//! stage's store must never corrupt the gating engine or another stage's
//! state, so errors carry enough context to surface inline and nothing else.

use casefile_types::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No session credential available. Raised before any network call.
    #[error("No session credential available")]
    AuthMissing,

    /// Field-schema discovery failed; surfaced as a page-level banner.
    #[error("Failed to fetch field schema for '{entity}': {reason}")]
    SchemaFetch { entity: String, reason: String },

    /// Record listing/fetch failed; surfaced as a page-level banner.
    #[error("Failed to fetch records for '{entity}': {reason}")]
    RecordFetch { entity: String, reason: String },

    /// Create/update/delete failed. Local state stays at pre-operation
    /// values; the caller shows a transient alert.
    #[error("Write to '{entity}' failed: {reason}")]
    WriteFailed { entity: String, reason: String },

    /// Upload rejected client-side (missing file or missing name);
    /// nothing was sent.
    #[error("Upload rejected: {0}")]
    UploadRejected(String),

    /// One of the per-record history fetches failed. Partial histories are
    /// never shown, so the whole merge fails.
    #[error("History fetch failed for record {record_id}: {reason}")]
    HistoryFetch { record_id: RecordId, reason: String },

    /// Storage service answered with a non-success status.
    #[error("Storage service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Network or serialization failure talking to the storage service.
    #[error("Transport error: {0}")]
    Transport(String),

    /// An operation that needs a persisted id was given a draft.
    #[error("Record has not been persisted yet")]
    MissingRecordId,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

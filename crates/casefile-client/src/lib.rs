//! StorageApi trait — the sole boundary between the case-file core and the
//! generic storage service. Stage components depend on this crate, never on
//! the service's wire details directly.
//!
//! Layout mirrors the service seams:
//!
//! - [`StorageApi`] — the async trait every backend implements
//! - [`http`] — reqwest-backed implementation of the REST contract
//! - [`memory`] — in-process implementation for tests
//! - [`store`] — schema-driven [`store::RecordStore`] built on the trait
//! - [`attachments`] — naming-convention-bound file handling
//! - [`audit`] — fail-closed history merge (the deliberate opposite of the
//!   gating engine's fail-open stage rules)

pub mod attachments;
pub mod audit;
pub mod error;
pub mod http;
pub mod memory;
pub mod store;

use async_trait::async_trait;
use casefile_types::{Attachment, CaseId, FieldDef, FileId, HistoryEntry, Record, RecordId};

pub use attachments::{AttachmentManager, AttachmentScope};
pub use audit::AuditTrail;
pub use error::ClientError;
pub use http::HttpStorageApi;
pub use memory::InMemoryStorage;
pub use store::{RecordStore, RefreshMode};

pub type Result<T> = std::result::Result<T, ClientError>;

/// Request/response surface of the generic record API (consumed, not owned).
/// `entity` is always the stage's wire token.
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Field discovery for one stage entity, in registry order.
    async fn fetch_fields(&self, entity: &str) -> Result<Vec<FieldDef>>;

    /// All records of the entity scoped strictly to one case. An empty list
    /// is a valid, non-error result.
    async fn list_records(&self, entity: &str, case_id: CaseId) -> Result<Vec<Record>>;

    async fn get_record(&self, entity: &str, id: RecordId) -> Result<Record>;

    /// Create a record; the result carries the generated id.
    async fn create_record(&self, entity: &str, record: &Record) -> Result<Record>;

    async fn update_record(&self, entity: &str, id: RecordId, record: &Record) -> Result<()>;

    /// Delete by id; `actor_id` travels with the request for audit
    /// attribution.
    async fn delete_record(&self, entity: &str, id: RecordId, actor_id: &str) -> Result<()>;

    // ── Attachments ────────────────────────────────────────────

    async fn list_files(&self, entity: &str, case_id: CaseId) -> Result<Vec<Attachment>>;

    async fn upload_file(
        &self,
        entity: &str,
        case_id: CaseId,
        stored_name: &str,
        content: &[u8],
    ) -> Result<Attachment>;

    async fn delete_file(
        &self,
        entity: &str,
        case_id: CaseId,
        file_id: FileId,
        actor_id: &str,
    ) -> Result<()>;

    async fn set_compliance(
        &self,
        entity: &str,
        case_id: CaseId,
        file_id: FileId,
        complies: Option<bool>,
        note: Option<&str>,
    ) -> Result<()>;

    /// Exchange a stored path for a short-lived signed address.
    async fn sign_location(&self, location: &str) -> Result<String>;

    // ── History ────────────────────────────────────────────────

    /// Change history for one record, as produced by the storage service.
    async fn fetch_history(&self, entity: &str, id: RecordId) -> Result<Vec<HistoryEntry>>;
}

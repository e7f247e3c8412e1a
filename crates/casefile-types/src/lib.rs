//! Shared Domain Types for the Case-File Core
//!
//! This crate is the single source of truth for every type that crosses the
//! boundary between the gating engine, the record store, and the generic
//! storage service:
//!
//! - classification of a case (`Group`, `Modality`, `Classification`)
//! - the stage catalog (`Stage`)
//! - field schemas and records (`FieldSchema`, `Record`)
//! - attachments and audit history (`Attachment`, `HistoryEntry`)
//! - the explicit session context (`SessionContext`)
//!
//! All wire-facing types derive serde; timestamps are `chrono::DateTime<Utc>`
//! and case ids are UUIDs.

pub mod attachment;
pub mod classification;
pub mod history;
pub mod record;
pub mod schema;
pub mod session;
pub mod stage;

pub use attachment::{Attachment, FileId};
pub use classification::{Classification, Group, Modality};
pub use history::{ChangeKind, HistoryEntry};
pub use record::{CaseId, Record, RecordId};
pub use schema::{FieldDef, FieldSchema, FieldType};
pub use session::SessionContext;
pub use stage::Stage;

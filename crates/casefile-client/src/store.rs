//! Generic Record Store
//!
//! One store per (stage entity, case). Discovers the field schema once,
//! hydrates the record list scoped to the case, and funnels every mutation
//! through [`StorageApi`]. After any write the in-memory list is the
//! authoritative post-operation state, reached either by patching in place
//! (fast path for frequently-toggled fields) or by re-fetching; both paths
//! must converge to the same observable state.
//!
//! Callers stamp `case_id` and the acting user onto every payload before
//! `upsert` — the store does not infer them. A failed write leaves the
//! previous in-memory state untouched.

use crate::{ClientError, Result, StorageApi};
use casefile_types::{CaseId, FieldSchema, Record, RecordId, SessionContext};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// How the local list is brought up to date after a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Patch the local list in place. Fast path for checkbox-style toggles.
    PatchInPlace,
    /// Re-fetch the whole case-scoped list. Used after structural changes.
    Refetch,
}

pub struct RecordStore {
    api: Arc<dyn StorageApi>,
    session: SessionContext,
    entity: String,
    case_id: CaseId,
    schema: RwLock<Option<FieldSchema>>,
    records: RwLock<Vec<Record>>,
    /// Liveness generation: loads started under an older generation are
    /// discarded instead of applied (stale results from an unmounted view).
    generation: AtomicU64,
}

impl RecordStore {
    pub fn new(
        api: Arc<dyn StorageApi>,
        session: SessionContext,
        entity: impl Into<String>,
        case_id: CaseId,
    ) -> Self {
        Self {
            api,
            session,
            entity: entity.into(),
            case_id,
            schema: RwLock::new(None),
            records: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn case_id(&self) -> CaseId {
        self.case_id
    }

    fn require_auth(&self) -> Result<()> {
        self.session.bearer().map(|_| ()).ok_or(ClientError::AuthMissing)
    }

    /// Invalidate in-flight loads (view unmounted or case switched).
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Fetch the field schema once and cache it for this store's lifetime.
    pub async fn discover_schema(&self) -> Result<FieldSchema> {
        if let Some(schema) = self.schema.read().await.as_ref() {
            return Ok(schema.clone());
        }
        self.require_auth()?;
        let fields = self
            .api
            .fetch_fields(&self.entity)
            .await
            .map_err(|e| ClientError::SchemaFetch {
                entity: self.entity.clone(),
                reason: e.to_string(),
            })?;
        let schema = FieldSchema::new(fields);
        *self.schema.write().await = Some(schema.clone());
        Ok(schema)
    }

    /// Hydrate the case-scoped record list. If the store was invalidated
    /// while the fetch was outstanding, the stale result is discarded and
    /// the current list is returned unchanged.
    pub async fn load(&self) -> Result<Vec<Record>> {
        self.require_auth()?;
        let started_at = self.generation.load(Ordering::SeqCst);
        let fetched = self
            .api
            .list_records(&self.entity, self.case_id)
            .await
            .map_err(|e| ClientError::RecordFetch {
                entity: self.entity.clone(),
                reason: e.to_string(),
            })?;

        if self.generation.load(Ordering::SeqCst) != started_at {
            tracing::debug!(entity = %self.entity, "discarding stale load result");
            return Ok(self.records.read().await.clone());
        }

        *self.records.write().await = fetched.clone();
        Ok(fetched)
    }

    /// The current in-memory list (authoritative after any completed write).
    pub async fn current(&self) -> Vec<Record> {
        self.records.read().await.clone()
    }

    /// Create or update depending on whether the record carries an id. The
    /// caller has already stamped `case_id` and the actor onto the payload.
    /// On failure the local list is left exactly as it was.
    pub async fn upsert(&self, record: Record, mode: RefreshMode) -> Result<Record> {
        self.require_auth()?;
        let entity = self.entity.clone();
        let write_err = |e: ClientError| ClientError::WriteFailed {
            entity: entity.clone(),
            reason: e.to_string(),
        };

        let persisted = match record.id {
            Some(id) => {
                self.api
                    .update_record(&self.entity, id, &record)
                    .await
                    .map_err(write_err)?;
                record
            }
            None => self
                .api
                .create_record(&self.entity, &record)
                .await
                .map_err(write_err)?,
        };

        match mode {
            RefreshMode::PatchInPlace => {
                let mut records = self.records.write().await;
                match records.iter_mut().find(|r| r.id == persisted.id) {
                    Some(slot) => *slot = persisted.clone(),
                    // A new record lands at the end, matching the service's
                    // insertion-order listing.
                    None => records.push(persisted.clone()),
                }
            }
            RefreshMode::Refetch => {
                let fetched = self
                    .api
                    .list_records(&self.entity, self.case_id)
                    .await
                    .map_err(|e| ClientError::RecordFetch {
                        entity: self.entity.clone(),
                        reason: e.to_string(),
                    })?;
                *self.records.write().await = fetched;
            }
        }

        Ok(persisted)
    }

    /// Delete by id. Irreversible; the caller has already confirmed intent.
    /// The session's actor id travels with the request for attribution.
    pub async fn remove(&self, record_id: RecordId) -> Result<()> {
        self.require_auth()?;
        self.api
            .delete_record(&self.entity, record_id, &self.session.actor_id)
            .await
            .map_err(|e| ClientError::WriteFailed {
                entity: self.entity.clone(),
                reason: e.to_string(),
            })?;
        self.records.write().await.retain(|r| r.id != Some(record_id));
        Ok(())
    }
}

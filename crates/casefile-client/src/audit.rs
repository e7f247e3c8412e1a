//! Audit Trail Reader
//!
//! Merges the change histories of one or many records of a stage, newest
//! first. The per-record fetches run in parallel and the merge is
//! fail-closed: one failed fetch fails the whole call, because a partial
//! audit trail is worse than none. (Stage gating makes the opposite choice
//! and fails open; the asymmetry is deliberate.)

use crate::{ClientError, Result, StorageApi};
use casefile_types::{HistoryEntry, RecordId, SessionContext};
use futures::future::join_all;
use std::sync::Arc;

pub struct AuditTrail {
    api: Arc<dyn StorageApi>,
    session: SessionContext,
    entity: String,
}

impl AuditTrail {
    pub fn new(
        api: Arc<dyn StorageApi>,
        session: SessionContext,
        entity: impl Into<String>,
    ) -> Self {
        Self {
            api,
            session,
            entity: entity.into(),
        }
    }

    /// Fetch and merge the histories of the given records, sorted
    /// descending by timestamp. An empty id list returns an empty merge
    /// without any network call.
    pub async fn history(&self, record_ids: &[RecordId]) -> Result<Vec<HistoryEntry>> {
        if record_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.session.bearer().ok_or(ClientError::AuthMissing)?;

        let fetches = record_ids
            .iter()
            .map(|id| self.api.fetch_history(&self.entity, *id));
        let results = join_all(fetches).await;

        let mut merged = Vec::new();
        for (record_id, result) in record_ids.iter().copied().zip(results) {
            match result {
                Ok(entries) => merged.extend(entries),
                Err(e) => {
                    tracing::warn!(record_id, error = %e, "history fetch failed, dropping merge");
                    return Err(ClientError::HistoryFetch {
                        record_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        merged.sort_by(|a, b| b.at.cmp(&a.at));
        Ok(merged)
    }
}

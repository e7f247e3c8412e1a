//! In-process [`StorageApi`] for tests and local development. Mimics the
//! storage service's observable behavior: generated ids, case scoping,
//! insertion-ordered listings, and a history row on every write. A failure
//! can be injected for the next call to exercise error paths.

use crate::{ClientError, Result, StorageApi};
use async_trait::async_trait;
use casefile_types::{
    Attachment, CaseId, ChangeKind, FieldDef, FileId, HistoryEntry, Record, RecordId,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::{Mutex, RwLock};

#[derive(Default)]
pub struct InMemoryStorage {
    schemas: RwLock<HashMap<String, Vec<FieldDef>>>,
    /// Records per entity, in insertion order (the service guarantees it).
    records: RwLock<HashMap<String, Vec<Record>>>,
    files: RwLock<HashMap<String, Vec<Attachment>>>,
    history: RwLock<HashMap<(String, RecordId), Vec<HistoryEntry>>>,
    next_record_id: AtomicI64,
    next_file_id: AtomicI64,
    fail_next: Mutex<Option<String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            next_record_id: AtomicI64::new(1),
            next_file_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    /// Seed the field schema the registry would report for an entity.
    pub async fn seed_schema(&self, entity: &str, fields: Vec<FieldDef>) {
        self.schemas.write().await.insert(entity.to_string(), fields);
    }

    /// Seed history rows directly (for merge tests with fixed timestamps).
    pub async fn seed_history(&self, entity: &str, id: RecordId, entries: Vec<HistoryEntry>) {
        self.history
            .write()
            .await
            .entry((entity.to_string(), id))
            .or_default()
            .extend(entries);
    }

    /// Make the next storage call fail with the given reason.
    pub async fn fail_next(&self, reason: impl Into<String>) {
        *self.fail_next.lock().await = Some(reason.into());
    }

    async fn take_failure(&self) -> Result<()> {
        if let Some(reason) = self.fail_next.lock().await.take() {
            return Err(ClientError::Http {
                status: 500,
                body: reason,
            });
        }
        Ok(())
    }

    fn actor_of(record: &Record) -> String {
        record.get_str("updated_by").unwrap_or("system").to_string()
    }

    async fn push_history(&self, entity: &str, id: RecordId, actor: &str, kind: ChangeKind) {
        let entry = HistoryEntry {
            record_id: id,
            actor_id: actor.to_string(),
            actor_name: actor.to_string(),
            at: Utc::now(),
            kind,
            field: None,
            old_value: None,
            new_value: None,
            description: String::new(),
        };
        self.history
            .write()
            .await
            .entry((entity.to_string(), id))
            .or_default()
            .push(entry);
    }

    fn file_key(entity: &str, case_id: CaseId) -> String {
        format!("{entity}/{case_id}")
    }
}

#[async_trait]
impl StorageApi for InMemoryStorage {
    async fn fetch_fields(&self, entity: &str) -> Result<Vec<FieldDef>> {
        self.take_failure().await?;
        Ok(self
            .schemas
            .read()
            .await
            .get(entity)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_records(&self, entity: &str, case_id: CaseId) -> Result<Vec<Record>> {
        self.take_failure().await?;
        let case = case_id.to_string();
        Ok(self
            .records
            .read()
            .await
            .get(entity)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.get_str("case_id") == Some(case.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_record(&self, entity: &str, id: RecordId) -> Result<Record> {
        self.take_failure().await?;
        self.records
            .read()
            .await
            .get(entity)
            .and_then(|records| records.iter().find(|r| r.id == Some(id)))
            .cloned()
            .ok_or_else(|| ClientError::Http {
                status: 404,
                body: format!("record {id} not found"),
            })
    }

    async fn create_record(&self, entity: &str, record: &Record) -> Result<Record> {
        self.take_failure().await?;
        let mut created = record.clone();
        created.id = Some(self.next_record_id.fetch_add(1, Ordering::SeqCst));
        self.records
            .write()
            .await
            .entry(entity.to_string())
            .or_default()
            .push(created.clone());
        let id = created.id.unwrap();
        self.push_history(entity, id, &Self::actor_of(record), ChangeKind::Create)
            .await;
        Ok(created)
    }

    async fn update_record(&self, entity: &str, id: RecordId, record: &Record) -> Result<()> {
        self.take_failure().await?;
        let mut records = self.records.write().await;
        let slot = records
            .get_mut(entity)
            .and_then(|records| records.iter_mut().find(|r| r.id == Some(id)))
            .ok_or_else(|| ClientError::Http {
                status: 404,
                body: format!("record {id} not found"),
            })?;
        let mut updated = record.clone();
        updated.id = Some(id);
        *slot = updated;
        drop(records);
        self.push_history(entity, id, &Self::actor_of(record), ChangeKind::Update)
            .await;
        Ok(())
    }

    async fn delete_record(&self, entity: &str, id: RecordId, actor_id: &str) -> Result<()> {
        self.take_failure().await?;
        let mut records = self.records.write().await;
        if let Some(records) = records.get_mut(entity) {
            records.retain(|r| r.id != Some(id));
        }
        drop(records);
        self.push_history(entity, id, actor_id, ChangeKind::Delete).await;
        Ok(())
    }

    async fn list_files(&self, entity: &str, case_id: CaseId) -> Result<Vec<Attachment>> {
        self.take_failure().await?;
        Ok(self
            .files
            .read()
            .await
            .get(&Self::file_key(entity, case_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn upload_file(
        &self,
        entity: &str,
        case_id: CaseId,
        stored_name: &str,
        _content: &[u8],
    ) -> Result<Attachment> {
        self.take_failure().await?;
        let attachment = Attachment {
            id: self.next_file_id.fetch_add(1, Ordering::SeqCst),
            stored_name: stored_name.to_string(),
            location: format!("cases/{case_id}/{stored_name}"),
            complies: None,
            compliance_note: None,
            uploaded_at: Some(Utc::now()),
        };
        self.files
            .write()
            .await
            .entry(Self::file_key(entity, case_id))
            .or_default()
            .push(attachment.clone());
        Ok(attachment)
    }

    async fn delete_file(
        &self,
        entity: &str,
        case_id: CaseId,
        file_id: FileId,
        _actor_id: &str,
    ) -> Result<()> {
        self.take_failure().await?;
        if let Some(files) = self.files.write().await.get_mut(&Self::file_key(entity, case_id)) {
            files.retain(|f| f.id != file_id);
        }
        Ok(())
    }

    async fn set_compliance(
        &self,
        entity: &str,
        case_id: CaseId,
        file_id: FileId,
        complies: Option<bool>,
        note: Option<&str>,
    ) -> Result<()> {
        self.take_failure().await?;
        let mut files = self.files.write().await;
        let file = files
            .get_mut(&Self::file_key(entity, case_id))
            .and_then(|files| files.iter_mut().find(|f| f.id == file_id))
            .ok_or_else(|| ClientError::Http {
                status: 404,
                body: format!("file {file_id} not found"),
            })?;
        file.complies = complies;
        file.compliance_note = note.map(str::to_string);
        Ok(())
    }

    async fn sign_location(&self, location: &str) -> Result<String> {
        self.take_failure().await?;
        Ok(format!("https://signed.example/{location}"))
    }

    async fn fetch_history(&self, entity: &str, id: RecordId) -> Result<Vec<HistoryEntry>> {
        self.take_failure().await?;
        Ok(self
            .history
            .read()
            .await
            .get(&(entity.to_string(), id))
            .cloned()
            .unwrap_or_default())
    }
}

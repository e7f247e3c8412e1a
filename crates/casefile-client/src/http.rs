//! HTTP implementation of [`StorageApi`] against the generic REST storage
//! service. Every request carries the session's bearer credential; a missing
//! credential aborts before anything touches the network.

use crate::{ClientError, Result, StorageApi};
use async_trait::async_trait;
use casefile_types::{
    Attachment, CaseId, FieldDef, FileId, HistoryEntry, Record, RecordId, SessionContext,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The storage service wraps history rows in an envelope.
#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    history: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
struct SignedLocation {
    url: String,
}

pub struct HttpStorageApi {
    base_url: String,
    http: Client,
    session: SessionContext,
}

impl HttpStorageApi {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer credential, aborting client-side when absent.
    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.session.bearer().ok_or(ClientError::AuthMissing)?;
        Ok(request.bearer_auth(token))
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl StorageApi for HttpStorageApi {
    async fn fetch_fields(&self, entity: &str) -> Result<Vec<FieldDef>> {
        let url = self.url(&format!("/stage/{entity}/fields"));
        tracing::debug!(%url, "fetching field schema");
        let request = self.authorize(self.http.get(&url))?;
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn list_records(&self, entity: &str, case_id: CaseId) -> Result<Vec<Record>> {
        let url = self.url(&format!("/stage/{entity}/records"));
        let request = self
            .authorize(self.http.get(&url))?
            .query(&[("caseId", case_id.to_string())]);
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get_record(&self, entity: &str, id: RecordId) -> Result<Record> {
        let url = self.url(&format!("/stage/{entity}/record/{id}"));
        let request = self.authorize(self.http.get(&url))?;
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create_record(&self, entity: &str, record: &Record) -> Result<Record> {
        let url = self.url(&format!("/stage/{entity}/record"));
        tracing::debug!(entity, "creating record");
        let request = self.authorize(self.http.post(&url))?.json(record);
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn update_record(&self, entity: &str, id: RecordId, record: &Record) -> Result<()> {
        let url = self.url(&format!("/stage/{entity}/record/{id}"));
        tracing::debug!(entity, id, "updating record");
        let request = self.authorize(self.http.put(&url))?.json(record);
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn delete_record(&self, entity: &str, id: RecordId, actor_id: &str) -> Result<()> {
        let url = self.url(&format!("/stage/{entity}/record/{id}"));
        tracing::debug!(entity, id, "deleting record");
        let request = self
            .authorize(self.http.delete(&url))?
            .query(&[("actorId", actor_id)]);
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn list_files(&self, entity: &str, case_id: CaseId) -> Result<Vec<Attachment>> {
        let url = self.url(&format!("/stage/{entity}/record/{case_id}/files"));
        let request = self.authorize(self.http.get(&url))?;
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn upload_file(
        &self,
        entity: &str,
        case_id: CaseId,
        stored_name: &str,
        content: &[u8],
    ) -> Result<Attachment> {
        let url = self.url(&format!("/stage/{entity}/record/{case_id}/upload"));
        tracing::debug!(entity, %case_id, stored_name, "uploading file");
        let request = self
            .authorize(self.http.post(&url))?
            .query(&[("name", stored_name)])
            .body(content.to_vec());
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn delete_file(
        &self,
        entity: &str,
        case_id: CaseId,
        file_id: FileId,
        actor_id: &str,
    ) -> Result<()> {
        let url = self.url(&format!("/stage/{entity}/record/{case_id}/file/{file_id}"));
        let request = self
            .authorize(self.http.delete(&url))?
            .query(&[("actorId", actor_id)]);
        Self::check(request.send().await?).await?;
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
        let url = self.url(&format!(
            "/stage/{entity}/record/{case_id}/file/{file_id}/compliance"
        ));
        let body = serde_json::json!({ "complies": complies, "note": note });
        let request = self.authorize(self.http.put(&url))?.json(&body);
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn sign_location(&self, location: &str) -> Result<String> {
        let url = self.url("/files/signed-url");
        let request = self
            .authorize(self.http.get(&url))?
            .query(&[("path", location)]);
        let response = Self::check(request.send().await?).await?;
        let signed: SignedLocation = response.json().await?;
        Ok(signed.url)
    }

    async fn fetch_history(&self, entity: &str, id: RecordId) -> Result<Vec<HistoryEntry>> {
        let url = self.url(&format!("/stage/{entity}/record/{id}/history"));
        let request = self.authorize(self.http.get(&url))?;
        let response = Self::check(request.send().await?).await?;
        let envelope: HistoryEnvelope = response.json().await?;
        Ok(envelope.history)
    }
}

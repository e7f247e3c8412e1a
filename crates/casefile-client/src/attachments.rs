//! Attachment Manager
//!
//! Files are bound to their case, stage, and optionally one owning record by
//! a naming convention baked into the stored name:
//!
//! - case-scoped: `<stageToken>_<humanName>_<epochMillis>.<ext>`
//! - record-scoped: `<humanName>_<stageToken>_<recordId>_<epochMillis>.<ext>`
//!
//! The convention is isolated in [`naming`] so a real foreign-key binding
//! can replace it without touching callers. Attachments whose owning record
//! no longer exists simply never match a record-scoped listing; no cleanup
//! is attempted here.

use crate::{ClientError, Result, StorageApi};
use casefile_types::{Attachment, CaseId, FileId, RecordId, SessionContext};
use chrono::Utc;
use std::sync::Arc;

/// What a listing or upload is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentScope {
    /// The case/stage pair as a whole.
    Case,
    /// One specific record within the stage.
    Record(RecordId),
}

pub mod naming {
    //! Stored-name convention: builders plus the inverse extraction used to
    //! recover the owning record id and the human-readable display name.

    use casefile_types::RecordId;
    use regex::Regex;

    /// Compiled convention for one stage token.
    #[derive(Debug, Clone)]
    pub struct NamingConvention {
        stage_token: String,
        /// Matches `_<token>_<recordId>_<millis>.<ext>` at the end.
        record_suffix: Regex,
        /// Matches the trailing `_<millis>.<ext>` of case-scoped names.
        trailing: Regex,
    }

    impl NamingConvention {
        pub fn new(stage_token: &str) -> Self {
            let record_suffix = Regex::new(&format!(
                r"_{}_(\d+)_\d+\.[^.]*$",
                regex::escape(stage_token)
            ))
            .expect("static naming pattern");
            let trailing = Regex::new(r"_\d+\.[^.]*$").expect("static naming pattern");
            Self {
                stage_token: stage_token.to_string(),
                record_suffix,
                trailing,
            }
        }

        pub fn case_scoped(&self, human_name: &str, epoch_millis: i64, ext: &str) -> String {
            format!("{}_{}_{}.{}", self.stage_token, human_name, epoch_millis, ext)
        }

        pub fn record_scoped(
            &self,
            human_name: &str,
            record_id: RecordId,
            epoch_millis: i64,
            ext: &str,
        ) -> String {
            format!(
                "{}_{}_{}_{}.{}",
                human_name, self.stage_token, record_id, epoch_millis, ext
            )
        }

        /// Recover the owning record id, or `None` for case-scoped names.
        pub fn owning_record_id(&self, stored_name: &str) -> Option<RecordId> {
            self.record_suffix
                .captures(stored_name)
                .and_then(|caps| caps[1].parse().ok())
        }

        /// Strip convention tokens back to the human-readable name.
        pub fn display_name(&self, stored_name: &str) -> String {
            if let Some(m) = self.record_suffix.find(stored_name) {
                return stored_name[..m.start()].to_string();
            }
            if let Some(rest) = stored_name.strip_prefix(&format!("{}_", self.stage_token)) {
                return self.trailing.replace(rest, "").into_owned();
            }
            stored_name.to_string()
        }
    }

}

use naming::NamingConvention;

/// Per case+stage attachment operations over [`StorageApi`].
pub struct AttachmentManager {
    api: Arc<dyn StorageApi>,
    session: SessionContext,
    entity: String,
    case_id: CaseId,
    naming: NamingConvention,
}

impl AttachmentManager {
    pub fn new(
        api: Arc<dyn StorageApi>,
        session: SessionContext,
        entity: impl Into<String>,
        case_id: CaseId,
    ) -> Self {
        let entity = entity.into();
        let naming = NamingConvention::new(&entity);
        Self {
            api,
            session,
            entity,
            case_id,
            naming,
        }
    }

    pub fn naming(&self) -> &NamingConvention {
        &self.naming
    }

    fn require_auth(&self) -> Result<()> {
        self.session.bearer().map(|_| ()).ok_or(ClientError::AuthMissing)
    }

    /// Fetch the case/stage file list, then filter by scope using the
    /// naming convention. Orphaned record-scoped files never match a live
    /// record's listing and are thereby excluded.
    pub async fn list(&self, scope: AttachmentScope) -> Result<Vec<Attachment>> {
        self.require_auth()?;
        let files = self.api.list_files(&self.entity, self.case_id).await?;
        Ok(files
            .into_iter()
            .filter(|file| match scope {
                AttachmentScope::Case => true,
                AttachmentScope::Record(record_id) => {
                    self.naming.owning_record_id(&file.stored_name) == Some(record_id)
                }
            })
            .collect())
    }

    /// Upload under a collision-resistant convention name. Rejected
    /// client-side, with no network call, when the content or the human
    /// name is missing.
    pub async fn upload(
        &self,
        scope: AttachmentScope,
        content: &[u8],
        human_name: &str,
        extension: &str,
    ) -> Result<Attachment> {
        if content.is_empty() {
            return Err(ClientError::UploadRejected("no file selected".to_string()));
        }
        let human_name = human_name.trim();
        if human_name.is_empty() {
            return Err(ClientError::UploadRejected("a file name is required".to_string()));
        }
        self.require_auth()?;

        let millis = Utc::now().timestamp_millis();
        let stored_name = match scope {
            AttachmentScope::Case => self.naming.case_scoped(human_name, millis, extension),
            AttachmentScope::Record(record_id) => {
                self.naming.record_scoped(human_name, record_id, millis, extension)
            }
        };
        tracing::debug!(entity = %self.entity, stored_name, "uploading attachment");
        self.api
            .upload_file(&self.entity, self.case_id, &stored_name, content)
            .await
    }

    /// Delete a file. Irreversible; the caller has already asked the user.
    pub async fn remove(&self, file_id: FileId) -> Result<()> {
        self.require_auth()?;
        self.api
            .delete_file(&self.entity, self.case_id, file_id, &self.session.actor_id)
            .await
    }

    /// Resolve an openable address: direct locations pass through, stored
    /// paths are first exchanged for a short-lived signed URL.
    pub async fn view(&self, attachment: &Attachment) -> Result<String> {
        self.require_auth()?;
        if attachment.has_direct_location() {
            return Ok(attachment.location.clone());
        }
        self.api.sign_location(&attachment.location).await
    }

    /// Record the reviewer's compliance judgment on a file.
    pub async fn set_compliance(
        &self,
        file_id: FileId,
        complies: Option<bool>,
        note: Option<&str>,
    ) -> Result<()> {
        self.require_auth()?;
        self.api
            .set_compliance(&self.entity, self.case_id, file_id, complies, note)
            .await
    }
}

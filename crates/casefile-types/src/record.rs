//! Records
//!
//! A `Record` is one schema-conformant instance belonging to a (case, stage)
//! pair. Before persistence it is a draft with no id; the storage service
//! assigns the id on create. Fields are kept as a JSON map because the
//! schema is discovered at runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Opaque case identifier, assigned at intake by the external system.
pub type CaseId = Uuid;

/// Storage-generated numeric record id.
pub type RecordId = i64;

/// One instance of a stage's schema, scoped to exactly one case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Present once persisted; `None` while still a draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Schema columns keyed to their JSON values.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    /// Start a draft record with no fields set.
    pub fn draft() -> Self {
        Self::default()
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(Value::as_i64)
    }

    /// Stamp the scoping case id and acting user onto the payload. The store
    /// never infers these; every caller stamps before upsert.
    pub fn stamp(&mut self, case_id: CaseId, actor_id: &str) -> &mut Self {
        self.fields
            .insert("case_id".to_string(), Value::String(case_id.to_string()));
        self.fields
            .insert("updated_by".to_string(), Value::String(actor_id.to_string()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_has_no_id() {
        let record = Record::draft();
        assert!(record.is_draft());
        assert!(record.fields.is_empty());
    }

    #[test]
    fn test_stamp_sets_scope_and_actor() {
        let case_id = Uuid::new_v4();
        let mut record = Record::draft();
        record.set("nombre", "finca la esperanza");
        record.stamp(case_id, "analyst-7");

        assert_eq!(record.get_str("case_id"), Some(case_id.to_string().as_str()));
        assert_eq!(record.get_str("updated_by"), Some("analyst-7"));
        assert_eq!(record.get_str("nombre"), Some("finca la esperanza"));
    }

    #[test]
    fn test_serde_flattens_fields() {
        let mut record = Record::draft();
        record.id = Some(42);
        record.set("valor", 10);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["valor"], 10);

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}

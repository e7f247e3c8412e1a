//! Field Schemas
//!
//! The schema registry reports, per stage entity, the ordered list of
//! columns a form should render. The client never invents fields: it renders
//! exactly what the registry reports, minus a fixed set of internal columns
//! that are always hidden.

use serde::{Deserialize, Serialize};

/// Columns present on every entity that are never rendered as form fields.
pub const INTERNAL_COLUMNS: [&str; 6] = [
    "id",
    "case_id",
    "created_by",
    "updated_by",
    "created_at",
    "updated_at",
];

/// Declared type of a schema column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Decimal,
    Date,
    Bool,
    Select,
    File,
    /// Registry reported a type this client does not know; rendered as text.
    #[serde(other)]
    Unknown,
}

/// One column as reported by the schema registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Selectable options, present only for `FieldType::Select`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            options: None,
        }
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }
}

/// The ordered field list for one stage entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub fields: Vec<FieldDef>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    /// The fields a form should render: registry order, internal columns
    /// removed.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields
            .iter()
            .filter(|field| !INTERNAL_COLUMNS.contains(&field.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_columns_hidden() {
        let schema = FieldSchema::new(vec![
            FieldDef::new("id", FieldType::Number),
            FieldDef::new("case_id", FieldType::Number),
            FieldDef::new("nombre", FieldType::Text),
            FieldDef::new("valor", FieldType::Decimal),
            FieldDef::new("created_at", FieldType::Date),
        ]);

        let visible: Vec<_> = schema.visible_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(visible, vec!["nombre", "valor"]);
    }

    #[test]
    fn test_registry_order_preserved() {
        let schema = FieldSchema::new(vec![
            FieldDef::new("b", FieldType::Text),
            FieldDef::new("a", FieldType::Text),
        ]);
        let names: Vec<_> = schema.visible_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_type_deserializes() {
        let def: FieldDef = serde_json::from_str(r#"{"name":"x","type":"geometry"}"#).unwrap();
        assert_eq!(def.field_type, FieldType::Unknown);
    }
}

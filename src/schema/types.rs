//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - timestamp: instant stored as integer epoch milliseconds
//! - array: homogeneous array with an element type

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Instant, stored as integer epoch milliseconds
    Timestamp,
    /// Homogeneous array with a single element type
    Array {
        /// Element type (boxed to allow nesting)
        #[serde(rename = "element_type")]
        element_type: Box<FieldType>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Timestamp => "timestamp",
            FieldType::Array { .. } => "array",
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether the value must be distinct across all documents of the model
    #[serde(default)]
    pub unique: bool,
    /// Whether the field must be present
    #[serde(default)]
    pub required: bool,
}

impl FieldDef {
    /// Create a field of the given type, optional and non-unique
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            unique: false,
            required: false,
        }
    }

    /// Create a string field
    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    /// Create an int field
    pub fn int() -> Self {
        Self::new(FieldType::Int)
    }

    /// Create a float field
    pub fn float() -> Self {
        Self::new(FieldType::Float)
    }

    /// Create a bool field
    pub fn bool() -> Self {
        Self::new(FieldType::Bool)
    }

    /// Create a timestamp field
    pub fn timestamp() -> Self {
        Self::new(FieldType::Timestamp)
    }

    /// Create an array field with the given element type
    pub fn array(element_type: FieldType) -> Self {
        Self::new(FieldType::Array {
            element_type: Box::new(element_type),
        })
    }

    /// Mark the field unique across the model
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark the field required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Field definitions for one model, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDef {
    fields: Vec<(String, FieldDef)>,
}

impl ModelDef {
    /// Create an empty model definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field definition
    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.push((name.into(), def));
        self
    }

    /// Look up a field definition by name
    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, def)| def)
    }

    /// Fields declared unique, in declaration order
    pub fn unique_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, def)| def.unique)
            .map(|(name, _)| name.as_str())
    }
}

/// Schema catalog: model name to field metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    models: HashMap<String, ModelDef>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model definition
    pub fn model(mut self, name: impl Into<String>, def: ModelDef) -> Self {
        self.models.insert(name.into(), def);
        self
    }

    /// Look up a model definition
    pub fn model_def(&self, model: &str) -> Option<&ModelDef> {
        self.models.get(model)
    }

    /// Fields declared unique on a model, in declaration order.
    /// Unknown models have no unique fields.
    pub fn unique_fields(&self, model: &str) -> Vec<&str> {
        self.models
            .get(model)
            .map(|def| def.unique_fields().collect())
            .unwrap_or_default()
    }

    /// Declared type of a field, if the model and field are known
    pub fn field_type(&self, model: &str, field: &str) -> Option<&FieldType> {
        self.models
            .get(model)
            .and_then(|def| def.field_def(field))
            .map(|def| &def.field_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_catalog() -> Catalog {
        Catalog::new().model(
            "user",
            ModelDef::new()
                .field("email", FieldDef::string().unique().required())
                .field("name", FieldDef::string())
                .field("createdAt", FieldDef::timestamp()),
        )
    }

    #[test]
    fn test_field_lookup() {
        let catalog = user_catalog();
        assert_eq!(
            catalog.field_type("user", "createdAt"),
            Some(&FieldType::Timestamp)
        );
        assert_eq!(catalog.field_type("user", "missing"), None);
        assert_eq!(catalog.field_type("ghost", "email"), None);
    }

    #[test]
    fn test_unique_fields_in_declaration_order() {
        let catalog = Catalog::new().model(
            "account",
            ModelDef::new()
                .field("providerId", FieldDef::string().unique())
                .field("label", FieldDef::string())
                .field("accountId", FieldDef::string().unique()),
        );
        assert_eq!(
            catalog.unique_fields("account"),
            vec!["providerId", "accountId"]
        );
    }

    #[test]
    fn test_unknown_model_has_no_unique_fields() {
        let catalog = user_catalog();
        assert!(catalog.unique_fields("ghost").is_empty());
    }

    #[test]
    fn test_field_def_serde_roundtrip() {
        let def = FieldDef::array(FieldType::Timestamp).unique();
        let json = serde_json::to_string(&def).unwrap();
        let back: FieldDef = serde_json::from_str(&json).unwrap();
        assert_eq!(def, back);
    }
}

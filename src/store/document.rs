//! Document representation
//!
//! A document is an opaque JSON object owned by the store. The bridge never
//! synthesizes identities; `_id` and `_creationTime` are assigned by the
//! store on insert and only known after a write lands.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AdapterError, AdapterResult};

/// An opaque store record with at least an identity field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Identity field name
    pub const ID_FIELD: &'static str = "_id";
    /// Store-assigned creation instant, epoch milliseconds
    pub const CREATION_TIME_FIELD: &'static str = "_creationTime";

    /// Create a document from a field map
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Create a document from a JSON value; must be an object
    pub fn from_value(value: Value) -> AdapterResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(AdapterError::validation(format!(
                "document must be a JSON object, got {other}"
            ))),
        }
    }

    /// Identity, if the store has assigned one
    pub fn id(&self) -> Option<&str> {
        self.0.get(Self::ID_FIELD).and_then(Value::as_str)
    }

    /// Identity, or a store-contract failure when absent
    pub fn require_id(&self) -> AdapterResult<&str> {
        self.id()
            .ok_or_else(|| AdapterError::store("store returned a document without an identity"))
    }

    /// Look up a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Borrow the underlying field map
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying field map
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    /// Project the document to the selected fields. Identity is always
    /// retained. `None` keeps the full document.
    pub fn project(self, select: Option<&[String]>) -> Self {
        let Some(select) = select else {
            return self;
        };

        let mut projected = Map::new();
        if let Some(id) = self.0.get(Self::ID_FIELD) {
            projected.insert(Self::ID_FIELD.to_string(), id.clone());
        }
        for field in select {
            if let Some(value) = self.0.get(field) {
                projected.insert(field.clone(), value.clone());
            }
        }
        Self(projected)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.0)
    }
}

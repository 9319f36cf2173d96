//! Hook handles, invocation payloads, and the handler seam

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterResult;
use crate::store::Document;
use crate::BoxFuture;

/// Stable identifier addressing a hook. Serializable so it can cross the
/// mutation-execution boundary; never an in-memory function value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookHandle(String);

impl HookHandle {
    /// Create a handle from an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HookHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HookHandle {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for HookHandle {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Payload handed to a hook invocation.
///
/// Before-hooks may return a replacement value; `None` is the "no value"
/// sentinel and leaves the original standing. After-hooks are notifications;
/// their return value is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HookInput {
    /// Before a create; a returned object replaces the candidate payload
    BeforeCreate { model: String, data: Value },
    /// After a create, with the full stored document
    AfterCreate { model: String, doc: Document },
    /// Before an update; a returned object replaces the update payload
    BeforeUpdate {
        model: String,
        doc: Document,
        update: Value,
    },
    /// After an update, with both versions
    AfterUpdate {
        model: String,
        old_doc: Document,
        new_doc: Document,
    },
    /// Before a delete; a returned object substitutes the hook view of the
    /// document (what gets deleted is fixed by identity at locate time)
    BeforeDelete { model: String, doc: Document },
    /// After a delete, with the deleted view
    AfterDelete { model: String, doc: Document },
}

impl HookInput {
    /// Model the event concerns
    pub fn model(&self) -> &str {
        match self {
            HookInput::BeforeCreate { model, .. }
            | HookInput::AfterCreate { model, .. }
            | HookInput::BeforeUpdate { model, .. }
            | HookInput::AfterUpdate { model, .. }
            | HookInput::BeforeDelete { model, .. }
            | HookInput::AfterDelete { model, .. } => model,
        }
    }
}

/// Callable a handle resolves to
pub trait HookHandler: Send + Sync {
    /// Invoke the hook. Errors propagate to the caller of the mutation; the
    /// pipeline never swallows them.
    fn invoke(&self, input: HookInput) -> BoxFuture<'_, AdapterResult<Option<Value>>>;
}

impl fmt::Debug for dyn HookHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HookHandler")
    }
}

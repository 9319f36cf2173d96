//! Unified error taxonomy for the bridge.
//!
//! Every operation surfaces one of these variants:
//! - Unsupported: the caller asked for something the store contract cannot
//!   express (offset pagination, mixed AND/OR, loose update targeting)
//! - NotFound: a singular update addressed a document that does not exist
//! - Conflict: a uniqueness constraint would be violated
//! - Store: an underlying store call failed; propagated verbatim, no retry
//! - Hook: a hook handle could not be resolved, or a hook itself failed
//! - Validation: malformed input values

use thiserror::Error;

/// Result type for all bridge operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Bridge error type
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Operation cannot be expressed against the underlying store
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A singular operation addressed a document that does not exist
    #[error("No matching {model} document")]
    NotFound {
        /// Model the lookup ran against
        model: String,
    },

    /// A uniqueness constraint would be violated
    #[error("Unique constraint violated on {model}.{field}")]
    Conflict {
        /// Model that declares the constraint
        model: String,
        /// Offending field (comma-joined when a bulk payload touches several)
        field: String,
    },

    /// Underlying store failure, propagated without retry
    #[error("Store failure: {0}")]
    Store(String),

    /// Hook resolution or invocation failure
    #[error("Hook failure: {0}")]
    Hook(String),

    /// Malformed input value
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AdapterError {
    /// Create an unsupported-operation error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a not-found error for a model
    pub fn not_found(model: impl Into<String>) -> Self {
        Self::NotFound {
            model: model.into(),
        }
    }

    /// Create a conflict error naming the model and field
    pub fn conflict(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Conflict {
            model: model.into(),
            field: field.into(),
        }
    }

    /// Create a store failure
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a hook failure
    pub fn hook(msg: impl Into<String>) -> Self {
        Self::Hook(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Get error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unsupported(_) => "UNSUPPORTED_OPERATION",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::Store(_) => "STORE_FAILURE",
            Self::Hook(_) => "HOOK_FAILURE",
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unsupported(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Store(_) => 500,
            Self::Hook(_) => 500,
            Self::Validation(_) => 400,
        }
    }
}

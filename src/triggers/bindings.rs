//! Per-model trigger bindings

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::hook::HookHandle;

/// Hook handles bound to one model's write operations. All optional; an
/// unbound slot means the pipeline skips that phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerBindings {
    /// Transform hook run before a create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_create: Option<HookHandle>,
    /// Notify hook run after a create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_create: Option<HookHandle>,
    /// Transform hook run before an update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_update: Option<HookHandle>,
    /// Notify hook run after an update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<HookHandle>,
    /// Transform hook run before a delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_delete: Option<HookHandle>,
    /// Notify hook run after a delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<HookHandle>,
}

impl TriggerBindings {
    /// Create empty bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the before-create hook
    pub fn before_create(mut self, handle: impl Into<HookHandle>) -> Self {
        self.before_create = Some(handle.into());
        self
    }

    /// Bind the after-create hook
    pub fn on_create(mut self, handle: impl Into<HookHandle>) -> Self {
        self.on_create = Some(handle.into());
        self
    }

    /// Bind the before-update hook
    pub fn before_update(mut self, handle: impl Into<HookHandle>) -> Self {
        self.before_update = Some(handle.into());
        self
    }

    /// Bind the after-update hook
    pub fn on_update(mut self, handle: impl Into<HookHandle>) -> Self {
        self.on_update = Some(handle.into());
        self
    }

    /// Bind the before-delete hook
    pub fn before_delete(mut self, handle: impl Into<HookHandle>) -> Self {
        self.before_delete = Some(handle.into());
        self
    }

    /// Bind the after-delete hook
    pub fn on_delete(mut self, handle: impl Into<HookHandle>) -> Self {
        self.on_delete = Some(handle.into());
        self
    }
}

/// Model name to trigger bindings. Built at startup alongside the catalog
/// and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerMap {
    bindings: HashMap<String, TriggerBindings>,
}

impl TriggerMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind triggers for a model
    pub fn model(mut self, name: impl Into<String>, bindings: TriggerBindings) -> Self {
        self.bindings.insert(name.into(), bindings);
        self
    }

    /// Bindings for a model, if any were declared
    pub fn bindings(&self, model: &str) -> Option<&TriggerBindings> {
        self.bindings.get(model)
    }
}

//! Handle-to-callable resolution

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{AdapterError, AdapterResult};

use super::hook::{HookHandle, HookHandler};

/// Registry mapping hook handles to callables
#[derive(Default)]
pub struct HookRegistry {
    handlers: RwLock<HashMap<HookHandle, Arc<dyn HookHandler>>>,
}

impl HookRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a handle. Handles are stable identifiers;
    /// re-registering one is an error, not a silent replacement.
    pub fn register(
        &self,
        handle: HookHandle,
        handler: Arc<dyn HookHandler>,
    ) -> AdapterResult<()> {
        let mut handlers = self
            .handlers
            .write()
            .map_err(|_| AdapterError::hook("hook registry lock poisoned"))?;
        if handlers.contains_key(&handle) {
            return Err(AdapterError::hook(format!(
                "hook handle {handle} is already registered"
            )));
        }
        handlers.insert(handle, handler);
        Ok(())
    }

    /// Resolve a handle to its callable. Unknown handles fail; the caller
    /// addressed a hook that does not exist on this host.
    pub fn resolve(&self, handle: &HookHandle) -> AdapterResult<Arc<dyn HookHandler>> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| AdapterError::hook("hook registry lock poisoned"))?;
        handlers
            .get(handle)
            .cloned()
            .ok_or_else(|| AdapterError::hook(format!("hook handle {handle} is not registered")))
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

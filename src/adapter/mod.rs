//! Public adapter surface
//!
//! `Adapter` exposes the eight logical operations: `find_one`, `find_many`,
//! `count`, `create`, `update_one`, `update_many`, `delete_one`,
//! `delete_many`, plus construction via `AdapterBuilder`. Everything else
//! in the crate is plumbing behind these.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::mutation::MutationPipeline;
use crate::predicate::Predicate;
use crate::query::{FindOptions, QueryEngine};
use crate::schema::Catalog;
use crate::store::{Document, DocumentStore};
use crate::triggers::{HookHandle, HookHandler, HookRegistry, TriggerMap};

/// Bridge between a relational-style query contract and a cursor-paginated
/// document store
pub struct Adapter {
    query: QueryEngine,
    mutation: MutationPipeline,
}

impl std::fmt::Debug for Adapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter").finish_non_exhaustive()
    }
}

impl Adapter {
    /// Start building an adapter
    pub fn builder() -> AdapterBuilder {
        AdapterBuilder::new()
    }

    /// Find the first document matching the clause list
    pub async fn find_one(
        &self,
        model: &str,
        clauses: &[Predicate],
        select: Option<&[String]>,
    ) -> AdapterResult<Option<Document>> {
        self.query.find_one(model, clauses, select).await
    }

    /// Find every document matching the clause list, bounded by the options
    pub async fn find_many(
        &self,
        model: &str,
        clauses: &[Predicate],
        options: &FindOptions,
    ) -> AdapterResult<Vec<Document>> {
        self.query.find_many(model, clauses, options).await
    }

    /// Count documents matching the clause list
    pub async fn count(&self, model: &str, clauses: &[Predicate]) -> AdapterResult<u64> {
        self.query.count(model, clauses).await
    }

    /// Create a document, returning the stored form (projected when
    /// `select` is given)
    pub async fn create(
        &self,
        model: &str,
        data: Map<String, Value>,
        select: Option<&[String]>,
    ) -> AdapterResult<Document> {
        self.mutation.create(model, data, select).await
    }

    /// Update the single document matched by an exact-equality clause
    pub async fn update_one(
        &self,
        model: &str,
        clauses: &[Predicate],
        update: Map<String, Value>,
    ) -> AdapterResult<Document> {
        self.mutation.update_one(model, clauses, update).await
    }

    /// Update every matching document; returns how many were updated
    pub async fn update_many(
        &self,
        model: &str,
        clauses: &[Predicate],
        update: Map<String, Value>,
    ) -> AdapterResult<u64> {
        self.mutation.update_many(model, clauses, update).await
    }

    /// Delete the single matching document, if any, returning its hook view
    pub async fn delete_one(
        &self,
        model: &str,
        clauses: &[Predicate],
    ) -> AdapterResult<Option<Document>> {
        self.mutation.delete_one(model, clauses).await
    }

    /// Delete every matching document; returns how many were deleted
    pub async fn delete_many(&self, model: &str, clauses: &[Predicate]) -> AdapterResult<u64> {
        self.mutation.delete_many(model, clauses).await
    }
}

/// Builder for adapter construction. The catalog, trigger map, and config
/// are fixed at build time and never mutated afterwards.
pub struct AdapterBuilder {
    store: Option<Arc<dyn DocumentStore>>,
    catalog: Catalog,
    config: AdapterConfig,
    triggers: TriggerMap,
    hooks: Vec<(HookHandle, Arc<dyn HookHandler>)>,
}

impl AdapterBuilder {
    /// Create a builder with defaults
    pub fn new() -> Self {
        Self {
            store: None,
            catalog: Catalog::new(),
            config: AdapterConfig::default(),
            triggers: TriggerMap::new(),
            hooks: Vec::new(),
        }
    }

    /// Set the backing document store
    pub fn store(mut self, store: impl DocumentStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set a shared backing document store
    pub fn shared_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the schema catalog
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the configuration
    pub fn config(mut self, config: AdapterConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the per-model trigger bindings
    pub fn triggers(mut self, triggers: TriggerMap) -> Self {
        self.triggers = triggers;
        self
    }

    /// Register a hook handler under a handle
    pub fn hook(
        mut self,
        handle: impl Into<HookHandle>,
        handler: impl HookHandler + 'static,
    ) -> Self {
        self.hooks.push((handle.into(), Arc::new(handler)));
        self
    }

    /// Validate the configuration, register the hooks, and build
    pub fn build(self) -> AdapterResult<Adapter> {
        let store = self
            .store
            .ok_or_else(|| AdapterError::validation("adapter requires a document store"))?;
        self.config.validate()?;

        let registry = HookRegistry::new();
        for (handle, handler) in self.hooks {
            registry.register(handle, handler)?;
        }

        let catalog = Arc::new(self.catalog);
        let query = QueryEngine::new(store.clone(), catalog.clone(), self.config.clone());
        let mutation = MutationPipeline::new(
            store,
            catalog,
            Arc::new(registry),
            Arc::new(self.triggers),
            self.config,
        );

        Ok(Adapter { query, mutation })
    }
}

impl Default for AdapterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

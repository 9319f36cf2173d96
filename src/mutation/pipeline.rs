//! Write orchestration with hook dispatch

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::observe::Logger;
use crate::predicate::{normalize_fields, Operator, Predicate};
use crate::query::{FindOptions, QueryEngine};
use crate::schema::Catalog;
use crate::store::{Document, DocumentStore};
use crate::triggers::{HookHandle, HookHandler, HookInput, HookRegistry, TriggerBindings, TriggerMap};
use crate::unique::{check_unique, unique_fields_touched};

/// Phase of a logical write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    /// Hooks resolved, nothing executed yet
    Pending,
    /// A before-hook is transforming the payload
    Transforming,
    /// Uniqueness constraints are being checked
    Validating,
    /// The store write is in flight
    Writing,
    /// An after-hook is being notified
    Notifying,
    /// The operation completed
    Done,
    /// The operation failed; no further phases run
    Failed,
}

impl MutationPhase {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationPhase::Pending => "PENDING",
            MutationPhase::Transforming => "TRANSFORMING",
            MutationPhase::Validating => "VALIDATING",
            MutationPhase::Writing => "WRITING",
            MutationPhase::Notifying => "NOTIFYING",
            MutationPhase::Done => "DONE",
            MutationPhase::Failed => "FAILED",
        }
    }
}

/// Executes create/update/delete operations, singular and bulk
pub struct MutationPipeline {
    store: Arc<dyn DocumentStore>,
    catalog: Arc<Catalog>,
    registry: Arc<HookRegistry>,
    triggers: Arc<TriggerMap>,
    query: QueryEngine,
}

impl MutationPipeline {
    /// Create a pipeline over a store, catalog, and trigger wiring
    pub fn new(
        store: Arc<dyn DocumentStore>,
        catalog: Arc<Catalog>,
        registry: Arc<HookRegistry>,
        triggers: Arc<TriggerMap>,
        config: AdapterConfig,
    ) -> Self {
        let query = QueryEngine::new(store.clone(), catalog.clone(), config);
        Self {
            store,
            catalog,
            registry,
            triggers,
            query,
        }
    }

    /// Insert a document. The before-hook may replace the payload; the
    /// after-hook sees the full stored document even when `select` narrows
    /// the returned view.
    pub async fn create(
        &self,
        model: &str,
        data: Map<String, Value>,
        select: Option<&[String]>,
    ) -> AdapterResult<Document> {
        let result = self.create_inner(model, data, select).await;
        self.finish("create", model, result)
    }

    async fn create_inner(
        &self,
        model: &str,
        mut data: Map<String, Value>,
        select: Option<&[String]>,
    ) -> AdapterResult<Document> {
        let bindings = self.bindings(model);
        let before = self.resolve_slot(&bindings.before_create)?;
        let after = self.resolve_slot(&bindings.on_create)?;
        self.log_phase("create", model, MutationPhase::Pending);

        if let Some(hook) = &before {
            self.log_phase("create", model, MutationPhase::Transforming);
            let replaced = hook
                .invoke(HookInput::BeforeCreate {
                    model: model.to_string(),
                    data: Value::Object(data.clone()),
                })
                .await?;
            if let Some(value) = replaced {
                data = as_object(value)?;
            }
        }
        let data = normalize_fields(&self.catalog, model, data)?;

        self.log_phase("create", model, MutationPhase::Validating);
        check_unique(self.store.as_ref(), &self.catalog, model, &data, None).await?;

        self.log_phase("create", model, MutationPhase::Writing);
        let id = self.store.insert(model, data).await?;
        // Identity and creation time are store-assigned; only the re-read
        // has the canonical form
        let doc = self.refetch(model, &id).await?;

        if let Some(hook) = &after {
            self.log_phase("create", model, MutationPhase::Notifying);
            hook.invoke(HookInput::AfterCreate {
                model: model.to_string(),
                doc: doc.clone(),
            })
            .await?;
        }

        Ok(doc.project(select))
    }

    /// Update the single document matched by an exact-equality clause.
    /// A missing target is a failure; the caller addressed one document.
    pub async fn update_one(
        &self,
        model: &str,
        clauses: &[Predicate],
        update: Map<String, Value>,
    ) -> AdapterResult<Document> {
        let result = self.update_one_inner(model, clauses, update).await;
        self.finish("update_one", model, result)
    }

    async fn update_one_inner(
        &self,
        model: &str,
        clauses: &[Predicate],
        update: Map<String, Value>,
    ) -> AdapterResult<Document> {
        exact_target(clauses)?;

        let bindings = self.bindings(model);
        let before = self.resolve_slot(&bindings.before_update)?;
        let after = self.resolve_slot(&bindings.on_update)?;
        self.log_phase("update_one", model, MutationPhase::Pending);

        let target = self
            .query
            .find_one(model, clauses, None)
            .await?
            .ok_or_else(|| AdapterError::not_found(model))?;

        self.apply_update("update_one", model, &target, update, &before, &after, true)
            .await
    }

    /// Update every document matching the clause list. Returns how many
    /// were updated.
    ///
    /// An update payload touching a unique field across more than one
    /// matched document is a conflict by definition and rejected before any
    /// document is written. Targets are processed sequentially; the first
    /// failure stops the batch, and earlier writes stand.
    pub async fn update_many(
        &self,
        model: &str,
        clauses: &[Predicate],
        update: Map<String, Value>,
    ) -> AdapterResult<u64> {
        let result = self.update_many_inner(model, clauses, update).await;
        self.finish("update_many", model, result)
    }

    async fn update_many_inner(
        &self,
        model: &str,
        clauses: &[Predicate],
        update: Map<String, Value>,
    ) -> AdapterResult<u64> {
        let bindings = self.bindings(model);
        let before = self.resolve_slot(&bindings.before_update)?;
        let after = self.resolve_slot(&bindings.on_update)?;
        self.log_phase("update_many", model, MutationPhase::Pending);

        let targets = self
            .query
            .find_many(model, clauses, &FindOptions::default())
            .await?;

        self.log_phase("update_many", model, MutationPhase::Validating);
        let touched = unique_fields_touched(&self.catalog, model, &update);
        if !touched.is_empty() && targets.len() > 1 {
            return Err(AdapterError::conflict(model, touched.join(", ")));
        }

        for target in &targets {
            self.apply_update(
                "update_many",
                model,
                target,
                update.clone(),
                &before,
                &after,
                false,
            )
            .await?;
        }

        Ok(targets.len() as u64)
    }

    /// The singular transform/check/patch/notify sequence shared by both
    /// update shapes. `refetch_always` re-reads the document even without
    /// an after-hook, for callers that return the updated form.
    #[allow(clippy::too_many_arguments)]
    async fn apply_update(
        &self,
        op: &str,
        model: &str,
        target: &Document,
        mut update: Map<String, Value>,
        before: &Option<Arc<dyn HookHandler>>,
        after: &Option<Arc<dyn HookHandler>>,
        refetch_always: bool,
    ) -> AdapterResult<Document> {
        if let Some(hook) = before {
            self.log_phase(op, model, MutationPhase::Transforming);
            let replaced = hook
                .invoke(HookInput::BeforeUpdate {
                    model: model.to_string(),
                    doc: target.clone(),
                    update: Value::Object(update.clone()),
                })
                .await?;
            if let Some(value) = replaced {
                update = as_object(value)?;
            }
        }
        let update = normalize_fields(&self.catalog, model, update)?;

        self.log_phase(op, model, MutationPhase::Validating);
        check_unique(
            self.store.as_ref(),
            &self.catalog,
            model,
            &update,
            Some(target),
        )
        .await?;

        self.log_phase(op, model, MutationPhase::Writing);
        let id = target.require_id()?;
        self.store.patch(model, id, update).await?;

        if after.is_none() && !refetch_always {
            return Ok(target.clone());
        }

        let updated = self.refetch(model, id).await?;

        if let Some(hook) = after {
            self.log_phase(op, model, MutationPhase::Notifying);
            hook.invoke(HookInput::AfterUpdate {
                model: model.to_string(),
                old_doc: target.clone(),
                new_doc: updated.clone(),
            })
            .await?;
        }

        Ok(updated)
    }

    /// Delete the single document matched by the clause list and return its
    /// hook view. A missing target silently returns `None`; delete is
    /// idempotent from the caller's side.
    pub async fn delete_one(
        &self,
        model: &str,
        clauses: &[Predicate],
    ) -> AdapterResult<Option<Document>> {
        let result = self.delete_one_inner(model, clauses).await;
        self.finish("delete_one", model, result)
    }

    async fn delete_one_inner(
        &self,
        model: &str,
        clauses: &[Predicate],
    ) -> AdapterResult<Option<Document>> {
        let bindings = self.bindings(model);
        let before = self.resolve_slot(&bindings.before_delete)?;
        let after = self.resolve_slot(&bindings.on_delete)?;
        self.log_phase("delete_one", model, MutationPhase::Pending);

        let Some(target) = self.query.find_one(model, clauses, None).await? else {
            return Ok(None);
        };

        let view = self
            .apply_delete("delete_one", model, &target, &before, &after)
            .await?;
        Ok(Some(view))
    }

    /// Delete every document matching the clause list. Returns how many
    /// were deleted. Sequential and fail-fast, like `update_many`.
    pub async fn delete_many(&self, model: &str, clauses: &[Predicate]) -> AdapterResult<u64> {
        let result = self.delete_many_inner(model, clauses).await;
        self.finish("delete_many", model, result)
    }

    async fn delete_many_inner(&self, model: &str, clauses: &[Predicate]) -> AdapterResult<u64> {
        let bindings = self.bindings(model);
        let before = self.resolve_slot(&bindings.before_delete)?;
        let after = self.resolve_slot(&bindings.on_delete)?;
        self.log_phase("delete_many", model, MutationPhase::Pending);

        let targets = self
            .query
            .find_many(model, clauses, &FindOptions::default())
            .await?;

        for target in &targets {
            self.apply_delete("delete_many", model, target, &before, &after)
                .await?;
        }

        Ok(targets.len() as u64)
    }

    /// The singular delete sequence. The before-hook may substitute the
    /// view handed to the after-hook and the caller; the deleted identity
    /// is fixed at locate time either way.
    async fn apply_delete(
        &self,
        op: &str,
        model: &str,
        target: &Document,
        before: &Option<Arc<dyn HookHandler>>,
        after: &Option<Arc<dyn HookHandler>>,
    ) -> AdapterResult<Document> {
        let mut view = target.clone();
        if let Some(hook) = before {
            self.log_phase(op, model, MutationPhase::Transforming);
            let replaced = hook
                .invoke(HookInput::BeforeDelete {
                    model: model.to_string(),
                    doc: target.clone(),
                })
                .await?;
            if let Some(value) = replaced {
                view = Document::from_value(value)?;
            }
        }

        self.log_phase(op, model, MutationPhase::Writing);
        self.store.delete(model, target.require_id()?).await?;

        if let Some(hook) = after {
            self.log_phase(op, model, MutationPhase::Notifying);
            hook.invoke(HookInput::AfterDelete {
                model: model.to_string(),
                doc: view.clone(),
            })
            .await?;
        }

        Ok(view)
    }

    fn bindings(&self, model: &str) -> TriggerBindings {
        self.triggers.bindings(model).cloned().unwrap_or_default()
    }

    /// Resolve a bound handle for this operation. Resolution happens here,
    /// once per logical operation, and is never cached across operations.
    fn resolve_slot(
        &self,
        slot: &Option<HookHandle>,
    ) -> AdapterResult<Option<Arc<dyn HookHandler>>> {
        slot.as_ref()
            .map(|handle| self.registry.resolve(handle))
            .transpose()
    }

    async fn refetch(&self, model: &str, id: &str) -> AdapterResult<Document> {
        self.store.get(model, id).await?.ok_or_else(|| {
            AdapterError::store(format!("written {model} document {id} could not be re-read"))
        })
    }

    fn log_phase(&self, op: &str, model: &str, phase: MutationPhase) {
        Logger::trace(
            "MUTATION_PHASE",
            &[("model", model), ("op", op), ("phase", phase.as_str())],
        );
    }

    fn finish<T>(&self, op: &str, model: &str, result: AdapterResult<T>) -> AdapterResult<T> {
        match &result {
            Ok(_) => self.log_phase(op, model, MutationPhase::Done),
            Err(err) => Logger::error(
                "MUTATION_FAILED",
                &[
                    ("code", err.code()),
                    ("model", model),
                    ("op", op),
                    ("phase", MutationPhase::Failed.as_str()),
                ],
            ),
        }
        result
    }
}

/// A singular update must address exactly one document: one clause, exact
/// equality. Anything looser is rejected rather than silently attempted.
fn exact_target(clauses: &[Predicate]) -> AdapterResult<()> {
    match clauses {
        [clause] if clause.operator == Operator::Eq => Ok(()),
        _ => Err(AdapterError::unsupported(
            "singular update requires exactly one equality clause",
        )),
    }
}

fn as_object(value: Value) -> AdapterResult<Map<String, Value>> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(AdapterError::validation(format!(
            "hook replacement must be a JSON object, got {other}"
        ))),
    }
}

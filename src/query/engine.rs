//! Query execution over the store's paginated scan
//!
//! Conjunctive clause lists become one filtered scan. Disjunctive lists fan
//! out into one scan per branch; branch results are unioned, de-duplicated
//! by identity, and re-sorted when a sort is requested.

use std::collections::HashSet;
use std::slice;
use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::observe::Logger;
use crate::paginate::{accumulate, Accumulated, AccumulateOptions, PageRequest, PageResult};
use crate::predicate::{clause_mode, normalize, ClauseMode, Predicate};
use crate::schema::Catalog;
use crate::store::{Document, DocumentStore, ScanRequest};

use super::sorter::{ResultSorter, SortBy};

/// Options for `find_many`
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Maximum documents to return; for disjunctive queries each branch is
    /// bounded by the full limit independently
    pub limit: Option<usize>,
    /// Sort applied after collection (and after the union, for fan-out)
    pub sort_by: Option<SortBy>,
    /// Random-access skip; never supported, the store only cursors forward
    pub offset: Option<usize>,
}

/// Executes find/count operations against a document store
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn DocumentStore>,
    catalog: Arc<Catalog>,
    config: AdapterConfig,
}

impl QueryEngine {
    /// Create an engine over a store and schema catalog
    pub fn new(store: Arc<dyn DocumentStore>, catalog: Arc<Catalog>, config: AdapterConfig) -> Self {
        Self {
            store,
            catalog,
            config,
        }
    }

    /// Find the first document matching the clause list.
    ///
    /// An all-OR list evaluates each clause as an independent single-clause
    /// lookup in declaration order and returns the first match; later
    /// branches are never scanned once one hits.
    pub async fn find_one(
        &self,
        model: &str,
        clauses: &[Predicate],
        select: Option<&[String]>,
    ) -> AdapterResult<Option<Document>> {
        let clauses = normalize(&self.catalog, model, clauses)?;

        let found = match clause_mode(&clauses)? {
            ClauseMode::Disjunctive => {
                let mut found = None;
                for branch in &clauses {
                    found = self.lookup_one(model, slice::from_ref(branch)).await?;
                    if found.is_some() {
                        break;
                    }
                }
                found
            }
            ClauseMode::Conjunctive => self.lookup_one(model, &clauses).await?,
        };

        Ok(found.map(|doc| doc.project(select)))
    }

    /// Find every document matching the clause list, bounded by `limit`.
    pub async fn find_many(
        &self,
        model: &str,
        clauses: &[Predicate],
        options: &FindOptions,
    ) -> AdapterResult<Vec<Document>> {
        if options.offset.is_some() {
            return Err(AdapterError::unsupported(
                "offset pagination is not supported over forward-only cursors",
            ));
        }

        let clauses = normalize(&self.catalog, model, clauses)?;

        let mut docs = match clause_mode(&clauses)? {
            ClauseMode::Conjunctive => {
                self.scan_docs(model, &clauses, options.limit).await?.docs
            }
            ClauseMode::Disjunctive => self.fan_out(model, &clauses, options.limit).await?,
        };

        if let Some(sort_by) = &options.sort_by {
            ResultSorter::sort(&mut docs, sort_by);
        }

        Ok(docs)
    }

    /// Count documents matching the clause list.
    ///
    /// The conjunctive path accumulates per-page counts and never buffers
    /// documents; the disjunctive path counts the de-duplicated union.
    pub async fn count(&self, model: &str, clauses: &[Predicate]) -> AdapterResult<u64> {
        let clauses = normalize(&self.catalog, model, clauses)?;

        match clause_mode(&clauses)? {
            ClauseMode::Conjunctive => {
                let fetch = |request: PageRequest| {
                    let scan = ScanRequest {
                        model,
                        filter: &clauses,
                        cursor: request.cursor,
                        page_size: request.num_items,
                    };
                    async move { Ok(self.store.scan(scan).await?.into_counted()) }
                };
                let state = accumulate(
                    fetch,
                    AccumulateOptions {
                        limit: None,
                        page_size: Some(self.config.default_page_size),
                    },
                )
                .await?;
                Ok(state.count)
            }
            ClauseMode::Disjunctive => {
                let merged = self.fan_out(model, &clauses, None).await?;
                Ok(merged.len() as u64)
            }
        }
    }

    /// One branch-per-clause fan-out: the accumulations run concurrently,
    /// join, and merge in branch-declaration order with identity dedup.
    async fn fan_out(
        &self,
        model: &str,
        clauses: &[Predicate],
        limit: Option<usize>,
    ) -> AdapterResult<Vec<Document>> {
        Logger::trace(
            "QUERY_FAN_OUT",
            &[("branches", &clauses.len().to_string()), ("model", model)],
        );

        let branches = try_join_all(
            clauses
                .iter()
                .map(|branch| self.scan_docs(model, slice::from_ref(branch), limit)),
        )
        .await?;

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for branch in branches {
            for doc in branch.docs {
                let id = doc.require_id()?.to_string();
                if seen.insert(id) {
                    merged.push(doc);
                }
            }
        }
        Ok(merged)
    }

    /// Single bounded lookup of at most one document
    async fn lookup_one(
        &self,
        model: &str,
        filter: &[Predicate],
    ) -> AdapterResult<Option<Document>> {
        let mut state = self.scan_docs_with_page_size(model, filter, Some(1), 1).await?;
        Ok(if state.docs.is_empty() {
            None
        } else {
            Some(state.docs.swap_remove(0))
        })
    }

    /// Accumulate a full conjunctive scan into a document list
    async fn scan_docs(
        &self,
        model: &str,
        filter: &[Predicate],
        limit: Option<usize>,
    ) -> AdapterResult<Accumulated> {
        self.scan_docs_with_page_size(model, filter, limit, self.config.default_page_size)
            .await
    }

    async fn scan_docs_with_page_size(
        &self,
        model: &str,
        filter: &[Predicate],
        limit: Option<usize>,
        page_size: usize,
    ) -> AdapterResult<Accumulated> {
        let fetch = |request: PageRequest| {
            let scan = ScanRequest {
                model,
                filter,
                cursor: request.cursor,
                page_size: request.num_items,
            };
            async move { Ok(PageResult::from(self.store.scan(scan).await?)) }
        };
        accumulate(
            fetch,
            AccumulateOptions {
                limit,
                page_size: Some(page_size),
            },
        )
        .await
    }
}

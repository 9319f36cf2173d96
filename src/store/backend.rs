//! Store backend trait
//!
//! Object-safe so adapters can hold `Arc<dyn DocumentStore>`; every method
//! returns a boxed future. Scan is forward-only: no offsets, no reverse
//! iteration, pages bounded by the caller-requested size.

use serde_json::{Map, Value};

use crate::error::AdapterResult;
use crate::paginate::{PageResult, PageStatus};
use crate::predicate::Predicate;
use crate::BoxFuture;

use super::document::Document;

/// One page request against an indexed scan
#[derive(Debug)]
pub struct ScanRequest<'a> {
    /// Model (collection) to scan
    pub model: &'a str,
    /// Conjunctive clause filter; connectors are ignored by the store
    pub filter: &'a [Predicate],
    /// Resume token from the previous page, `None` for the first page
    pub cursor: Option<String>,
    /// Maximum documents to return; must be positive
    pub page_size: usize,
}

/// One page of scan results
#[derive(Debug, Clone)]
pub struct ScanPage {
    /// Matching documents in native scan order
    pub page: Vec<Document>,
    /// Whether the scan is exhausted after this page
    pub is_done: bool,
    /// Token resuming after the last returned document
    pub continue_cursor: String,
    /// Replacement token when the store had to divide a logical page
    pub split_cursor: Option<String>,
    /// Set when the store recommends or requires using the split cursor
    pub page_status: Option<PageStatus>,
}

impl ScanPage {
    /// View this page as a count of matched documents, dropping the
    /// documents themselves. Used by count-mode accumulations.
    pub fn into_counted(self) -> PageResult {
        PageResult {
            docs: None,
            count: Some(self.page.len() as u64),
            is_done: self.is_done,
            continue_cursor: self.continue_cursor,
            split_cursor: self.split_cursor,
            page_status: self.page_status,
        }
    }
}

impl From<ScanPage> for PageResult {
    fn from(page: ScanPage) -> Self {
        Self {
            docs: Some(page.page),
            count: None,
            is_done: page.is_done,
            continue_cursor: page.continue_cursor,
            split_cursor: page.split_cursor,
            page_status: page.page_status,
        }
    }
}

/// Boundary toward the underlying document store
pub trait DocumentStore: Send + Sync {
    /// Point-read a document by identity
    fn get<'a>(
        &'a self,
        model: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, AdapterResult<Option<Document>>>;

    /// Insert a document, returning the store-assigned identity
    fn insert<'a>(
        &'a self,
        model: &'a str,
        fields: Map<String, Value>,
    ) -> BoxFuture<'a, AdapterResult<String>>;

    /// Shallow-merge fields into an existing document
    fn patch<'a>(
        &'a self,
        model: &'a str,
        id: &'a str,
        fields: Map<String, Value>,
    ) -> BoxFuture<'a, AdapterResult<()>>;

    /// Delete a document by identity
    fn delete<'a>(&'a self, model: &'a str, id: &'a str) -> BoxFuture<'a, AdapterResult<()>>;

    /// Fetch one page of an indexed, filtered scan
    fn scan<'a>(&'a self, request: ScanRequest<'a>) -> BoxFuture<'a, AdapterResult<ScanPage>>;
}

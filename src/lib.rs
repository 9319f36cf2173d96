//! docbridge - a strict bridge between relational-style query contracts and
//! cursor-paginated document stores
//!
//! The underlying store only offers point reads/writes and a forward-only,
//! cursor-paginated range scan. This crate layers on top of that:
//!
//! - a predicate model with AND/OR clause groups and value normalization
//! - a pagination accumulator that turns page-at-a-time scans into bounded
//!   bulk list/count semantics
//! - a query engine with OR-branch fan-out, identity de-duplication, and
//!   post-merge sorting
//! - a uniqueness checker run before every write
//! - a mutation pipeline with before (transform) and after (notify) hooks
//!   addressed by stable handles that may cross a process boundary

use std::future::Future;
use std::pin::Pin;

pub mod adapter;
pub mod config;
pub mod error;
pub mod mutation;
pub mod observe;
pub mod paginate;
pub mod predicate;
pub mod query;
pub mod schema;
pub mod store;
pub mod triggers;
pub mod unique;

pub use adapter::{Adapter, AdapterBuilder};
pub use config::AdapterConfig;
pub use error::{AdapterError, AdapterResult};
pub use predicate::{ClauseMode, Connector, Operator, Predicate};
pub use query::{FindOptions, SortBy, SortDirection};
pub use schema::{Catalog, FieldDef, FieldType, ModelDef};
pub use store::{Document, DocumentStore, InMemoryStore, ScanPage, ScanRequest};
pub use triggers::{HookHandle, HookHandler, HookInput, HookRegistry, TriggerBindings, TriggerMap};

/// Boxed future used at dyn trait seams (store backends, hook handlers)
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

//! Document store boundary
//!
//! The bridge never owns document storage. It talks to any backend that can
//! do point reads/writes and a forward-only, cursor-paginated range scan.
//! `InMemoryStore` is the reference backend used by tests and examples.

mod backend;
mod document;
mod memory;

pub use backend::{DocumentStore, ScanPage, ScanRequest};
pub use document::Document;
pub use memory::InMemoryStore;

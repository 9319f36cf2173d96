//! Query engine
//!
//! Composes the predicate model and the pagination accumulator into
//! find-one, find-many, and count, with OR-branch fan-out and post-merge
//! sorting.

mod engine;
mod sorter;

pub use engine::{FindOptions, QueryEngine};
pub use sorter::{ResultSorter, SortBy, SortDirection};

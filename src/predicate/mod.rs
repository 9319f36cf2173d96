//! Predicate model
//!
//! A where-list is a flat list of clauses. Clauses without a connector (or
//! with AND) combine conjunctively into one scan filter. A list where every
//! clause carries OR is evaluated as independent single-clause sub-queries
//! whose results are unioned. A heterogeneous mix is rejected.

mod filter;
mod normalize;
mod types;

pub use filter::PredicateFilter;
pub use normalize::{normalize, normalize_fields};
pub use types::{clause_mode, ClauseMode, Connector, Operator, Predicate};

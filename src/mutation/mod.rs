//! Mutation pipeline
//!
//! Every logical write walks the same phase sequence: optional before-hook
//! transform, uniqueness validation, the store write, optional after-hook
//! notification. Bulk writes repeat the singular sequence per matched
//! document, sequentially and fail-fast; documents already written are not
//! rolled back.

mod pipeline;

pub use pipeline::{MutationPhase, MutationPipeline};

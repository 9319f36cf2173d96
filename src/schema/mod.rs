//! Schema metadata for the bridge
//!
//! The catalog is an explicit value handed to every component that needs
//! field metadata (predicate normalization, uniqueness checks). It is built
//! once at startup and never mutated afterwards.

mod types;

pub use types::{Catalog, FieldDef, FieldType, ModelDef};

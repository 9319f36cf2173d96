//! Uniqueness checking
//!
//! Check-then-write: every create, and every update touching a unique
//! field, scans for another holder of the value before the write is issued.
//! The race window between check and write is accepted; the store offers no
//! transactional isolation to close it.

mod checker;

pub use checker::{check_unique, unique_fields_touched};

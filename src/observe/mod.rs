//! Structured logging
//!
//! One log line = one JSON event, synchronous, deterministic key ordering.
//! The mutation pipeline logs phase transitions; the query engine logs
//! fan-out shape at trace level.

mod logger;

pub use logger::{Logger, Severity};

#[cfg(test)]
pub use logger::capture_log;

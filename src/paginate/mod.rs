//! Cursor-pagination accumulator
//!
//! Turns a page-at-a-time source into bulk list/count semantics bounded by
//! a caller-supplied limit. Sources either return documents (list scans) or
//! counts (mutating pagers); the accumulator drives whichever it is given
//! until the source is exhausted or the limit is met.

mod accumulator;

pub use accumulator::{
    accumulate, Accumulated, AccumulateOptions, PageRequest, PageResult, PageStatus, MAX_PAGE_SIZE,
};

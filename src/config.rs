//! Bridge configuration
//!
//! Immutable after construction; validated once at adapter build time.

use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, AdapterResult};
use crate::paginate::MAX_PAGE_SIZE;

/// Configuration for the adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Page size requested from the store per scan round. The accumulator
    /// further shrinks this toward the remaining limit budget and the
    /// platform cap of 200 documents per page.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

impl AdapterConfig {
    /// Validate the configuration
    pub fn validate(&self) -> AdapterResult<()> {
        if self.default_page_size == 0 {
            return Err(AdapterError::validation("default_page_size must be positive"));
        }
        if self.default_page_size > MAX_PAGE_SIZE {
            return Err(AdapterError::validation(format!(
                "default_page_size {} exceeds the platform page cap of {}",
                self.default_page_size, MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }
}

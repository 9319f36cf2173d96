//! Page-fetch loop and accumulation state

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::AdapterResult;
use crate::store::Document;

/// Hard cap on documents per scan page. The store disallows larger single
/// pages, so no request may exceed this regardless of limit or page size.
pub const MAX_PAGE_SIZE: usize = 200;

/// One bounded fetch issued to the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Resume token from the previous page, `None` for the first fetch
    pub cursor: Option<String>,
    /// Maximum items the source may return for this fetch
    pub num_items: usize,
}

/// Split signal attached to a page result. When present, the split cursor
/// must be preferred over the continuation cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageStatus {
    /// The store suggests resuming from the split cursor
    SplitRecommended,
    /// The store divided the page; resuming from the split cursor is required
    SplitRequired,
}

/// One page produced by the source. List sources set `docs`; mutating and
/// counting sources set `count` instead.
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Documents returned by a list source, in scan order
    pub docs: Option<Vec<Document>>,
    /// Items processed by a count source
    pub count: Option<u64>,
    /// Whether the source is exhausted after this page
    pub is_done: bool,
    /// Token resuming after the last item of this page
    pub continue_cursor: String,
    /// Replacement token when the store divided the page
    pub split_cursor: Option<String>,
    /// Split signal, if the store raised one
    pub page_status: Option<PageStatus>,
}

impl PageResult {
    /// Page of documents from a list source
    pub fn listed(docs: Vec<Document>, is_done: bool, continue_cursor: impl Into<String>) -> Self {
        Self {
            docs: Some(docs),
            count: None,
            is_done,
            continue_cursor: continue_cursor.into(),
            split_cursor: None,
            page_status: None,
        }
    }

    /// Page of processed items from a count source
    pub fn counted(count: u64, is_done: bool, continue_cursor: impl Into<String>) -> Self {
        Self {
            docs: None,
            count: Some(count),
            is_done,
            continue_cursor: continue_cursor.into(),
            split_cursor: None,
            page_status: None,
        }
    }
}

/// Bounds for one accumulation run
#[derive(Debug, Clone, Copy, Default)]
pub struct AccumulateOptions {
    /// Stop once this many items have been collected; `None` runs to source
    /// exhaustion
    pub limit: Option<usize>,
    /// Preferred page size, clamped to the remaining budget and the page cap
    pub page_size: Option<usize>,
}

/// Final state of an accumulation run
#[derive(Debug, Clone, Default)]
pub struct Accumulated {
    /// Documents collected from a list source, in scan order across pages
    pub docs: Vec<Document>,
    /// Total items reported by a count source
    pub count: u64,
    /// Cursor after the last fetched page
    pub cursor: Option<String>,
    /// Whether the run ended by exhaustion or by meeting the limit
    pub is_done: bool,
}

impl Accumulated {
    fn collected(&self) -> usize {
        self.docs.len() + self.count as usize
    }

    fn advance_cursor(&mut self, result: &PageResult) {
        self.cursor = Some(match result.page_status {
            Some(PageStatus::SplitRecommended) | Some(PageStatus::SplitRequired) => result
                .split_cursor
                .clone()
                .unwrap_or_else(|| result.continue_cursor.clone()),
            None => result.continue_cursor.clone(),
        });
    }

    fn absorb(&mut self, result: PageResult, limit: Option<usize>) {
        self.advance_cursor(&result);

        if let Some(docs) = result.docs {
            self.docs.extend(docs);
            self.is_done =
                result.is_done || limit.is_some_and(|limit| self.docs.len() >= limit);
        } else if let Some(count) = result.count {
            self.count += count;
            self.is_done =
                result.is_done || limit.is_some_and(|limit| self.count as usize >= limit);
        } else {
            self.is_done = result.is_done;
        }
    }
}

/// Drives `fetch` until the source is exhausted or the limit is met.
///
/// Each round requests `min(page_size, remaining-limit, MAX_PAGE_SIZE)`
/// items and issues exactly one fetch. The cursor advances to the split
/// cursor when the page signals a split, otherwise to the continuation
/// cursor, so no page is ever re-fetched. A fetch failure propagates
/// immediately with no retry and no partial result.
pub async fn accumulate<F, Fut>(
    mut fetch: F,
    options: AccumulateOptions,
) -> AdapterResult<Accumulated>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = AdapterResult<PageResult>>,
{
    let mut state = Accumulated::default();

    loop {
        // With no limit the budget is unbounded and termination rests on
        // source exhaustion alone.
        let remaining = match options.limit {
            Some(limit) => limit.saturating_sub(state.collected()),
            None => MAX_PAGE_SIZE,
        };
        if remaining == 0 {
            state.is_done = true;
            return Ok(state);
        }

        let num_items = options
            .page_size
            .unwrap_or(MAX_PAGE_SIZE)
            .min(remaining)
            .min(MAX_PAGE_SIZE);

        let result = fetch(PageRequest {
            cursor: state.cursor.clone(),
            num_items,
        })
        .await?;
        state.absorb(result, options.limit);

        if state.is_done {
            return Ok(state);
        }
    }
}

//! In-memory store backend
//!
//! Reference backend with the same observable contract the bridge expects
//! from a real store: stable scan order (monotonic insertion sequence),
//! opaque cursors, store-assigned identity and creation time, shallow-merge
//! patch semantics. Not durable.

use std::collections::HashMap;
use std::sync::RwLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{AdapterError, AdapterResult};
use crate::predicate::PredicateFilter;
use crate::BoxFuture;

use super::backend::{DocumentStore, ScanPage, ScanRequest};
use super::document::Document;

#[derive(Debug, Clone)]
struct StoredDoc {
    seq: u64,
    doc: Document,
}

#[derive(Debug, Default)]
struct StoreInner {
    collections: HashMap<String, Vec<StoredDoc>>,
    next_seq: u64,
}

/// In-memory reference backend
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn encode_cursor(seq: u64) -> String {
        STANDARD.encode(seq.to_string())
    }

    fn decode_cursor(cursor: Option<&str>) -> AdapterResult<u64> {
        let Some(cursor) = cursor else {
            return Ok(0);
        };
        let bytes = STANDARD
            .decode(cursor)
            .map_err(|_| AdapterError::store("invalid scan cursor"))?;
        String::from_utf8(bytes)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| AdapterError::store("invalid scan cursor"))
    }

    fn read(&self) -> AdapterResult<std::sync::RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|_| AdapterError::store("store lock poisoned"))
    }

    fn write(&self) -> AdapterResult<std::sync::RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|_| AdapterError::store("store lock poisoned"))
    }
}

impl DocumentStore for InMemoryStore {
    fn get<'a>(
        &'a self,
        model: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, AdapterResult<Option<Document>>> {
        Box::pin(async move {
            let inner = self.read()?;
            let found = inner
                .collections
                .get(model)
                .and_then(|docs| docs.iter().find(|stored| stored.doc.id() == Some(id)))
                .map(|stored| stored.doc.clone());
            Ok(found)
        })
    }

    fn insert<'a>(
        &'a self,
        model: &'a str,
        fields: Map<String, Value>,
    ) -> BoxFuture<'a, AdapterResult<String>> {
        Box::pin(async move {
            let mut inner = self.write()?;
            inner.next_seq += 1;
            let seq = inner.next_seq;

            let id = Uuid::new_v4().to_string();
            let mut fields = fields;
            fields.insert(Document::ID_FIELD.to_string(), Value::from(id.clone()));
            fields.insert(
                Document::CREATION_TIME_FIELD.to_string(),
                Value::from(Utc::now().timestamp_millis()),
            );

            inner
                .collections
                .entry(model.to_string())
                .or_default()
                .push(StoredDoc {
                    seq,
                    doc: Document::new(fields),
                });
            Ok(id)
        })
    }

    fn patch<'a>(
        &'a self,
        model: &'a str,
        id: &'a str,
        fields: Map<String, Value>,
    ) -> BoxFuture<'a, AdapterResult<()>> {
        Box::pin(async move {
            let mut inner = self.write()?;
            let stored = inner
                .collections
                .get_mut(model)
                .and_then(|docs| docs.iter_mut().find(|stored| stored.doc.id() == Some(id)))
                .ok_or_else(|| {
                    AdapterError::store(format!("patch target {id} not found in {model}"))
                })?;

            let mut merged = stored.doc.clone().into_fields();
            for (name, value) in fields {
                // Identity is immutable once assigned
                if name == Document::ID_FIELD {
                    continue;
                }
                merged.insert(name, value);
            }
            stored.doc = Document::new(merged);
            Ok(())
        })
    }

    fn delete<'a>(&'a self, model: &'a str, id: &'a str) -> BoxFuture<'a, AdapterResult<()>> {
        Box::pin(async move {
            let mut inner = self.write()?;
            if let Some(docs) = inner.collections.get_mut(model) {
                docs.retain(|stored| stored.doc.id() != Some(id));
            }
            Ok(())
        })
    }

    fn scan<'a>(&'a self, request: ScanRequest<'a>) -> BoxFuture<'a, AdapterResult<ScanPage>> {
        Box::pin(async move {
            if request.page_size == 0 {
                return Err(AdapterError::store("scan page size must be positive"));
            }

            let after = Self::decode_cursor(request.cursor.as_deref())?;
            let inner = self.read()?;

            let matching: Vec<&StoredDoc> = inner
                .collections
                .get(request.model)
                .map(|docs| {
                    docs.iter()
                        .filter(|stored| {
                            stored.seq > after
                                && PredicateFilter::matches(&stored.doc, request.filter)
                        })
                        .collect()
                })
                .unwrap_or_default();

            let page: Vec<Document> = matching
                .iter()
                .take(request.page_size)
                .map(|stored| stored.doc.clone())
                .collect();
            let last_seq = matching
                .iter()
                .take(request.page_size)
                .last()
                .map(|stored| stored.seq)
                .unwrap_or(after);

            Ok(ScanPage {
                is_done: matching.len() <= request.page_size,
                continue_cursor: Self::encode_cursor(last_seq),
                split_cursor: None,
                page_status: None,
                page,
            })
        })
    }
}

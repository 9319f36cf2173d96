//! Unique-field conflict detection

use serde_json::{Map, Value};

use crate::error::{AdapterError, AdapterResult};
use crate::paginate::{accumulate, AccumulateOptions, PageRequest, PageResult};
use crate::predicate::Predicate;
use crate::schema::Catalog;
use crate::store::{Document, DocumentStore, ScanRequest};

/// Fails with a Conflict when another document already holds a value the
/// candidate payload assigns to a schema-declared unique field.
///
/// `excluding` exempts one document by identity, so an update comparing a
/// document against itself does not conflict. Null values are never
/// conflicting; a unique field left unset on many documents is legal.
pub async fn check_unique(
    store: &dyn DocumentStore,
    catalog: &Catalog,
    model: &str,
    candidate: &Map<String, Value>,
    excluding: Option<&Document>,
) -> AdapterResult<()> {
    let excluding_id = excluding.and_then(Document::id);

    for field in catalog.unique_fields(model) {
        let Some(value) = candidate.get(field) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let filter = [Predicate::eq(field, value.clone())];
        let fetch = |request: PageRequest| {
            let scan = ScanRequest {
                model,
                filter: &filter,
                cursor: request.cursor,
                page_size: request.num_items,
            };
            async move { Ok(PageResult::from(store.scan(scan).await?)) }
        };
        // Two holders suffice: at most one of them can be the excluded doc
        let holders = accumulate(
            fetch,
            AccumulateOptions {
                limit: Some(2),
                page_size: Some(2),
            },
        )
        .await?;

        let taken = holders
            .docs
            .iter()
            .any(|doc| excluding_id.is_none() || doc.id() != excluding_id);
        if taken {
            return Err(AdapterError::conflict(model, field));
        }
    }

    Ok(())
}

/// Unique fields a payload assigns a non-null value to, in declaration
/// order. A bulk update touching any of these across more than one target
/// is rejected wholesale.
pub fn unique_fields_touched<'a>(
    catalog: &'a Catalog,
    model: &str,
    fields: &Map<String, Value>,
) -> Vec<&'a str> {
    catalog
        .unique_fields(model)
        .into_iter()
        .filter(|field| fields.get(*field).is_some_and(|value| !value.is_null()))
        .collect()
}

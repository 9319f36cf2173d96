//! Predicate and payload value normalization
//!
//! The store compares timestamps as integer epoch milliseconds. Values for
//! timestamp-typed fields arriving as RFC 3339 strings are converted here;
//! values already numeric pass through, so normalization is idempotent.

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::error::{AdapterError, AdapterResult};
use crate::schema::{Catalog, FieldType};

use super::types::Predicate;

/// Normalize a clause list against the catalog. Never mutates the input.
pub fn normalize(
    catalog: &Catalog,
    model: &str,
    clauses: &[Predicate],
) -> AdapterResult<Vec<Predicate>> {
    clauses
        .iter()
        .map(|clause| {
            let value = if is_timestamp_field(catalog, model, &clause.field) {
                normalize_value(&clause.value, &clause.field)?
            } else {
                clause.value.clone()
            };
            Ok(Predicate {
                value,
                ..clause.clone()
            })
        })
        .collect()
}

/// Normalize a create/update payload against the catalog
pub fn normalize_fields(
    catalog: &Catalog,
    model: &str,
    fields: Map<String, Value>,
) -> AdapterResult<Map<String, Value>> {
    fields
        .into_iter()
        .map(|(name, value)| {
            let value = if is_timestamp_field(catalog, model, &name) {
                normalize_value(&value, &name)?
            } else {
                value
            };
            Ok((name, value))
        })
        .collect()
}

fn is_timestamp_field(catalog: &Catalog, model: &str, field: &str) -> bool {
    match catalog.field_type(model, field) {
        Some(FieldType::Timestamp) => true,
        Some(FieldType::Array { element_type }) => **element_type == FieldType::Timestamp,
        _ => false,
    }
}

fn normalize_value(value: &Value, field: &str) -> AdapterResult<Value> {
    match value {
        Value::String(text) => {
            let instant = DateTime::parse_from_rfc3339(text).map_err(|_| {
                AdapterError::validation(format!("invalid timestamp for field {field}: {text}"))
            })?;
            Ok(Value::from(instant.timestamp_millis()))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| normalize_value(item, field))
            .collect::<AdapterResult<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

//! Mutation Pipeline Invariant Tests
//!
//! Invariants covered:
//! - create then find_one by the returned identity round-trips
//! - uniqueness conflicts name the model and field, on create and update
//! - a singular update requires an exact-equality target and fails with
//!   Not-Found when the target is missing
//! - a bulk update touching a unique field across several targets fails
//!   before mutating any of them
//! - deleting a missing document is silently empty, never an error

use docbridge::{Adapter, AdapterError, Catalog, FieldDef, FindOptions, ModelDef, Predicate};
use docbridge::store::InMemoryStore;
use serde_json::{json, Map, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn user_catalog() -> Catalog {
    Catalog::new().model(
        "user",
        ModelDef::new()
            .field("email", FieldDef::string().unique().required())
            .field("name", FieldDef::string())
            .field("role", FieldDef::string()),
    )
}

fn adapter() -> Adapter {
    Adapter::builder()
        .store(InMemoryStore::new())
        .catalog(user_catalog())
        .build()
        .unwrap()
}

// =============================================================================
// Create
// =============================================================================

/// A created document re-read by its returned identity equals the stored
/// form, including the store-assigned fields.
#[tokio::test]
async fn test_create_find_one_round_trip() {
    let adapter = adapter();

    let created = adapter
        .create(
            "user",
            fields(json!({"email": "a@b.c", "name": "Alice"})),
            None,
        )
        .await
        .unwrap();
    let id = created.id().unwrap().to_string();

    let found = adapter
        .find_one("user", &[Predicate::eq("_id", id.clone())], None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found, created);
    assert!(found.get("_creationTime").is_some());
}

/// Two creates with the same unique email: the second fails with a
/// Conflict naming the model and field.
#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let adapter = adapter();

    adapter
        .create("user", fields(json!({"email": "a@b.c"})), None)
        .await
        .unwrap();
    let err = adapter
        .create("user", fields(json!({"email": "a@b.c"})), None)
        .await
        .unwrap_err();

    match err {
        AdapterError::Conflict { model, field } => {
            assert_eq!(model, "user");
            assert_eq!(field, "email");
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
}

/// Projection narrows the returned view but never drops the identity.
#[tokio::test]
async fn test_create_with_projection() {
    let adapter = adapter();

    let select = vec!["name".to_string()];
    let created = adapter
        .create(
            "user",
            fields(json!({"email": "a@b.c", "name": "Alice"})),
            Some(&select),
        )
        .await
        .unwrap();

    assert_eq!(created.get("name"), Some(&json!("Alice")));
    assert!(created.get("email").is_none());
    assert!(created.id().is_some());
}

// =============================================================================
// Update (single)
// =============================================================================

#[tokio::test]
async fn test_update_one_patches_and_returns_new_form() {
    let adapter = adapter();

    adapter
        .create(
            "user",
            fields(json!({"email": "a@b.c", "name": "Alice"})),
            None,
        )
        .await
        .unwrap();

    let updated = adapter
        .update_one(
            "user",
            &[Predicate::eq("email", "a@b.c")],
            fields(json!({"name": "Alicia"})),
        )
        .await
        .unwrap();

    assert_eq!(updated.get("name"), Some(&json!("Alicia")));
    assert_eq!(updated.get("email"), Some(&json!("a@b.c")));
}

/// A singular update addressed one document; a missing target is a
/// failure, not an empty result.
#[tokio::test]
async fn test_update_one_missing_target_is_not_found() {
    let adapter = adapter();

    let err = adapter
        .update_one(
            "user",
            &[Predicate::eq("email", "ghost@b.c")],
            fields(json!({"name": "x"})),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

/// Loose targeting shapes are rejected, never silently attempted.
#[tokio::test]
async fn test_update_one_requires_exact_equality_target() {
    let adapter = adapter();

    let err = adapter
        .update_one(
            "user",
            &[Predicate::gt("name", "A")],
            fields(json!({"role": "admin"})),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_OPERATION");

    let err = adapter
        .update_one(
            "user",
            &[
                Predicate::eq("email", "a@b.c"),
                Predicate::eq("name", "Alice"),
            ],
            fields(json!({"role": "admin"})),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "UNSUPPORTED_OPERATION");
}

/// Re-asserting a document's own unique value is not a conflict.
#[tokio::test]
async fn test_update_one_excludes_self_from_uniqueness() {
    let adapter = adapter();

    adapter
        .create(
            "user",
            fields(json!({"email": "a@b.c", "name": "Alice"})),
            None,
        )
        .await
        .unwrap();

    let updated = adapter
        .update_one(
            "user",
            &[Predicate::eq("email", "a@b.c")],
            fields(json!({"email": "a@b.c", "name": "Alicia"})),
        )
        .await
        .unwrap();
    assert_eq!(updated.get("name"), Some(&json!("Alicia")));
}

/// Moving onto another document's unique value conflicts.
#[tokio::test]
async fn test_update_one_conflicts_with_other_holder() {
    let adapter = adapter();

    adapter
        .create("user", fields(json!({"email": "a@b.c"})), None)
        .await
        .unwrap();
    adapter
        .create("user", fields(json!({"email": "z@b.c"})), None)
        .await
        .unwrap();

    let err = adapter
        .update_one(
            "user",
            &[Predicate::eq("email", "z@b.c")],
            fields(json!({"email": "a@b.c"})),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
}

// =============================================================================
// Update (bulk)
// =============================================================================

/// Setting a unique field across three matched documents is rejected
/// wholesale, before any of the three is touched.
#[tokio::test]
async fn test_bulk_update_unique_field_rejected_before_any_write() {
    let adapter = adapter();

    for i in 0..3 {
        adapter
            .create(
                "user",
                fields(json!({"email": format!("u{i}@b.c"), "role": "member"})),
                None,
            )
            .await
            .unwrap();
    }

    let err = adapter
        .update_many(
            "user",
            &[Predicate::eq("role", "member")],
            fields(json!({"email": "same@b.c"})),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");

    // None of the three documents was mutated
    let untouched = adapter
        .find_many("user", &[], &FindOptions::default())
        .await
        .unwrap();
    assert_eq!(untouched.len(), 3);
    assert!(untouched
        .iter()
        .all(|doc| doc.get("email") != Some(&json!("same@b.c"))));
}

/// A bulk update on a non-unique field touches every match and reports
/// the count.
#[tokio::test]
async fn test_bulk_update_non_unique_field() {
    let adapter = adapter();

    for i in 0..3 {
        adapter
            .create(
                "user",
                fields(json!({"email": format!("u{i}@b.c"), "role": "member"})),
                None,
            )
            .await
            .unwrap();
    }
    adapter
        .create(
            "user",
            fields(json!({"email": "x@b.c", "role": "admin"})),
            None,
        )
        .await
        .unwrap();

    let count = adapter
        .update_many(
            "user",
            &[Predicate::eq("role", "member")],
            fields(json!({"role": "viewer"})),
        )
        .await
        .unwrap();
    assert_eq!(count, 3);

    assert_eq!(
        adapter
            .count("user", &[Predicate::eq("role", "viewer")])
            .await
            .unwrap(),
        3
    );
    assert_eq!(
        adapter
            .count("user", &[Predicate::eq("role", "admin")])
            .await
            .unwrap(),
        1
    );
}

/// A unique-field payload against a single matched document is allowed.
#[tokio::test]
async fn test_bulk_update_unique_field_single_target_allowed() {
    let adapter = adapter();

    adapter
        .create(
            "user",
            fields(json!({"email": "a@b.c", "role": "member"})),
            None,
        )
        .await
        .unwrap();

    let count = adapter
        .update_many(
            "user",
            &[Predicate::eq("role", "member")],
            fields(json!({"email": "new@b.c"})),
        )
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// =============================================================================
// Delete
// =============================================================================

/// Deleting a non-existent target returns no error and no document.
#[tokio::test]
async fn test_delete_one_missing_target_is_silent() {
    let adapter = adapter();

    let deleted = adapter
        .delete_one("user", &[Predicate::eq("email", "ghost@b.c")])
        .await
        .unwrap();
    assert!(deleted.is_none());
}

#[tokio::test]
async fn test_delete_one_removes_and_returns_view() {
    let adapter = adapter();

    adapter
        .create("user", fields(json!({"email": "a@b.c"})), None)
        .await
        .unwrap();

    let deleted = adapter
        .delete_one("user", &[Predicate::eq("email", "a@b.c")])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(deleted.get("email"), Some(&json!("a@b.c")));

    assert_eq!(adapter.count("user", &[]).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_many_reports_count() {
    let adapter = adapter();

    for i in 0..4 {
        let role = if i % 2 == 0 { "member" } else { "admin" };
        adapter
            .create(
                "user",
                fields(json!({"email": format!("u{i}@b.c"), "role": role})),
                None,
            )
            .await
            .unwrap();
    }

    let count = adapter
        .delete_many("user", &[Predicate::eq("role", "member")])
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(adapter.count("user", &[]).await.unwrap(), 2);
}

/// OR-connected clauses address delete targets through the same fan-out
/// as queries.
#[tokio::test]
async fn test_delete_many_disjunctive_targets() {
    let adapter = adapter();

    for (email, role) in [("a@b.c", "x"), ("b@b.c", "y"), ("c@b.c", "z")] {
        adapter
            .create("user", fields(json!({"email": email, "role": role})), None)
            .await
            .unwrap();
    }

    let count = adapter
        .delete_many(
            "user",
            &[Predicate::eq("role", "x").or(), Predicate::eq("role", "y").or()],
        )
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(adapter.count("user", &[]).await.unwrap(), 1);
}

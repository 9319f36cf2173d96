//! Conjunctive clause evaluation against documents
//!
//! No type coercion: a string never matches a number, range operators only
//! compare values of the same kind. Missing fields are treated as null for
//! equality and inequality, and never match any other operator.

use serde_json::Value;

use crate::store::Document;

use super::types::{Operator, Predicate};

/// Evaluates clause lists against documents
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks whether a document passes every clause (AND semantics).
    /// Connectors are ignored here; disjunction is resolved by the query
    /// engine before a scan filter reaches the store.
    pub fn matches(document: &Document, clauses: &[Predicate]) -> bool {
        clauses
            .iter()
            .all(|clause| Self::matches_clause(document, clause))
    }

    fn matches_clause(document: &Document, clause: &Predicate) -> bool {
        let actual = document.get(&clause.field);

        match clause.operator {
            Operator::Eq => Self::eq_match(actual, &clause.value),
            Operator::Ne => !Self::eq_match(actual, &clause.value),
            Operator::In => Self::in_match(actual, &clause.value),
            Operator::NotIn => !Self::in_match(actual, &clause.value),
            Operator::Lt | Operator::Lte | Operator::Gt | Operator::Gte => {
                Self::ord_match(actual, &clause.value, clause.operator)
            }
            Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
                Self::text_match(actual, &clause.value, clause.operator)
            }
        }
    }

    /// Exact equality; a missing field equals null
    fn eq_match(actual: Option<&Value>, expected: &Value) -> bool {
        match actual {
            Some(value) => value == expected,
            None => expected.is_null(),
        }
    }

    /// Membership in a scalar list
    fn in_match(actual: Option<&Value>, expected: &Value) -> bool {
        match (actual, expected) {
            (Some(value), Value::Array(items)) => items.contains(value),
            _ => false,
        }
    }

    /// Range comparison on numbers or strings of the same kind
    fn ord_match(actual: Option<&Value>, bound: &Value, operator: Operator) -> bool {
        let ordering = match (actual, bound) {
            (Some(Value::Number(a)), Value::Number(b)) => {
                match (a.as_f64(), b.as_f64()) {
                    (Some(af), Some(bf)) => af.partial_cmp(&bf),
                    _ => None,
                }
            }
            (Some(Value::String(a)), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
            _ => None,
        };

        let Some(ordering) = ordering else {
            return false;
        };

        match operator {
            Operator::Lt => ordering.is_lt(),
            Operator::Lte => ordering.is_le(),
            Operator::Gt => ordering.is_gt(),
            Operator::Gte => ordering.is_ge(),
            _ => false,
        }
    }

    /// Substring, prefix, and suffix matching on strings
    fn text_match(actual: Option<&Value>, expected: &Value, operator: Operator) -> bool {
        let (Some(Value::String(haystack)), Value::String(needle)) = (actual, expected) else {
            return false;
        };

        match operator {
            Operator::Contains => haystack.contains(needle.as_str()),
            Operator::StartsWith => haystack.starts_with(needle.as_str()),
            Operator::EndsWith => haystack.ends_with(needle.as_str()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        Document::from_value(value).unwrap()
    }

    #[test]
    fn test_equality_and_inequality() {
        let d = doc(json!({"_id": "u1", "name": "Alice", "age": 30}));

        assert!(PredicateFilter::matches(&d, &[Predicate::eq("name", "Alice")]));
        assert!(!PredicateFilter::matches(&d, &[Predicate::eq("name", "Bob")]));
        assert!(PredicateFilter::matches(
            &d,
            &[Predicate::new("name", Operator::Ne, "Bob")]
        ));
    }

    #[test]
    fn test_missing_field_equals_null() {
        let d = doc(json!({"_id": "u1"}));

        assert!(PredicateFilter::matches(
            &d,
            &[Predicate::eq("nickname", Value::Null)]
        ));
        assert!(!PredicateFilter::matches(
            &d,
            &[Predicate::eq("nickname", "Al")]
        ));
    }

    #[test]
    fn test_no_type_coercion() {
        let d = doc(json!({"_id": "u1", "count": 123}));

        assert!(!PredicateFilter::matches(&d, &[Predicate::eq("count", "123")]));
        assert!(PredicateFilter::matches(&d, &[Predicate::eq("count", 123)]));
    }

    #[test]
    fn test_range_operators() {
        let d = doc(json!({"_id": "u1", "age": 25}));

        assert!(PredicateFilter::matches(&d, &[Predicate::gte("age", 18)]));
        assert!(PredicateFilter::matches(&d, &[Predicate::lte("age", 30)]));
        assert!(!PredicateFilter::matches(&d, &[Predicate::gt("age", 25)]));
        assert!(!PredicateFilter::matches(&d, &[Predicate::lt("age", 25)]));
    }

    #[test]
    fn test_range_on_missing_field_never_matches() {
        let d = doc(json!({"_id": "u1"}));
        assert!(!PredicateFilter::matches(&d, &[Predicate::gte("age", 0)]));
    }

    #[test]
    fn test_membership() {
        let d = doc(json!({"_id": "u1", "status": "B"}));

        assert!(PredicateFilter::matches(
            &d,
            &[Predicate::new("status", Operator::In, json!(["A", "B"]))]
        ));
        assert!(PredicateFilter::matches(
            &d,
            &[Predicate::new("status", Operator::NotIn, json!(["C"]))]
        ));
        assert!(!PredicateFilter::matches(
            &d,
            &[Predicate::new("status", Operator::In, json!(["C"]))]
        ));
    }

    #[test]
    fn test_text_operators() {
        let d = doc(json!({"_id": "u1", "email": "alice@example.com"}));

        assert!(PredicateFilter::matches(
            &d,
            &[Predicate::new("email", Operator::Contains, "@example")]
        ));
        assert!(PredicateFilter::matches(
            &d,
            &[Predicate::new("email", Operator::StartsWith, "alice")]
        ));
        assert!(PredicateFilter::matches(
            &d,
            &[Predicate::new("email", Operator::EndsWith, ".com")]
        ));
        assert!(!PredicateFilter::matches(
            &d,
            &[Predicate::new("email", Operator::StartsWith, "bob")]
        ));
    }

    #[test]
    fn test_multiple_clauses_are_conjunctive() {
        let d = doc(json!({"_id": "u1", "age": 25, "active": true}));

        assert!(PredicateFilter::matches(
            &d,
            &[Predicate::gte("age", 18), Predicate::eq("active", true)]
        ));
        assert!(!PredicateFilter::matches(
            &d,
            &[Predicate::gte("age", 18), Predicate::eq("active", false)]
        ));
    }
}

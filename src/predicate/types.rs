//! Predicate and clause-list types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AdapterError, AdapterResult};

/// Comparison operator of a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Ne,
    In,
    NotIn,
    Contains,
    StartsWith,
    EndsWith,
}

/// How a clause combines with its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connector {
    And,
    Or,
}

/// One field/operator/value filter condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    /// Field the clause filters on
    pub field: String,
    /// Comparison operator, equality when omitted on the wire
    #[serde(default = "default_operator")]
    pub operator: Operator,
    /// Scalar, scalar list (for in/not_in), or null
    pub value: Value,
    /// AND (default) or OR combination with sibling clauses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<Connector>,
}

fn default_operator() -> Operator {
    Operator::Eq
}

impl Predicate {
    /// Create a clause with an explicit operator
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            connector: None,
        }
    }

    /// Equality clause
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq, value)
    }

    /// Greater-than clause
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Gt, value)
    }

    /// Greater-or-equal clause
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Gte, value)
    }

    /// Less-than clause
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Lt, value)
    }

    /// Less-or-equal clause
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Lte, value)
    }

    /// Mark the clause as an OR branch
    pub fn or(mut self) -> Self {
        self.connector = Some(Connector::Or);
        self
    }

    /// Whether the clause carries the OR connector
    pub fn is_or(&self) -> bool {
        self.connector == Some(Connector::Or)
    }
}

/// Resolved combination mode of a clause list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseMode {
    /// All clauses must pass together as one scan filter
    Conjunctive,
    /// Every clause is an independent branch; results are unioned
    Disjunctive,
}

/// Classify a clause list as conjunctive or disjunctive.
///
/// An empty list and a list with no OR connectors are conjunctive. A list
/// where every clause carries OR is disjunctive. A mix is not resolvable.
pub fn clause_mode(clauses: &[Predicate]) -> AdapterResult<ClauseMode> {
    let or_count = clauses.iter().filter(|clause| clause.is_or()).count();

    if or_count == 0 {
        Ok(ClauseMode::Conjunctive)
    } else if or_count == clauses.len() {
        Ok(ClauseMode::Disjunctive)
    } else {
        Err(AdapterError::unsupported(
            "where clauses mixing AND and OR connectors are not resolvable",
        ))
    }
}

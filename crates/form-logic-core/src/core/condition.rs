// crates/form-logic-core/src/core/condition.rs
// ============================================================================
// Module: Form Logic Conditions
// Description: Boolean predicates over form field values.
// Purpose: Define the condition tree, leaf predicates, and comparison operators.
// Dependencies: serde, serde_json, smallvec
// ============================================================================

//! ## Overview
//! A [`Condition`] is either a combinator (`and` / `or` over child conditions)
//! or a leaf comparing one field value against a comparand. Parsing from JSON
//! is infallible: malformed nodes are kept as leaves with an
//! [`Operator::Unrecognized`] operator so they fail closed at evaluation time
//! instead of rejecting the whole rule set.
//!
//! Wire form:
//! - `{ "and": [ ... ] }` / `{ "or": [ ... ] }` for combinators.
//! - `{ "field": "age", "op": ">=", "value": 18 }` for leaves.
//!
//! Combinators take precedence over leaf fields, `and` before `or`, and an
//! empty child list is never a combinator.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde_json::Map;
use serde_json::Value;
use smallvec::SmallVec;

use crate::core::identifiers::FieldKey;

// ============================================================================
// SECTION: Operators
// ============================================================================

/// Comparison operator applied by a leaf condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`: value-aware equality.
    Equals,
    /// `!=`: negated value-aware equality.
    NotEquals,
    /// `>`: numeric greater-than.
    GreaterThan,
    /// `<`: numeric less-than.
    LessThan,
    /// `>=`: numeric greater-than-or-equal.
    GreaterThanOrEqual,
    /// `<=`: numeric less-than-or-equal.
    LessThanOrEqual,
    /// `contains`: case-sensitive substring test.
    Contains,
    /// `not_contains`: negated substring test.
    NotContains,
    /// `empty`: falsy value or zero-length array.
    Empty,
    /// `not_empty`: negation of `empty`.
    NotEmpty,
    /// Operator label that is not part of the vocabulary (empty when absent).
    ///
    /// Always evaluates to false.
    Unrecognized(String),
}

impl Operator {
    /// Parses an operator label. Unknown labels are preserved verbatim.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label {
            "=" => Self::Equals,
            "!=" => Self::NotEquals,
            ">" => Self::GreaterThan,
            "<" => Self::LessThan,
            ">=" => Self::GreaterThanOrEqual,
            "<=" => Self::LessThanOrEqual,
            "contains" => Self::Contains,
            "not_contains" => Self::NotContains,
            "empty" => Self::Empty,
            "not_empty" => Self::NotEmpty,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the wire label for the operator.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThanOrEqual => "<=",
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::Empty => "empty",
            Self::NotEmpty => "not_empty",
            Self::Unrecognized(label) => label,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Leaf Conditions
// ============================================================================

/// Leaf predicate over a single field value.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafCondition {
    /// Field whose current value is tested (absent means undefined).
    pub field: Option<FieldKey>,
    /// Operator applied to the field value.
    pub operator: Operator,
    /// Comparand; `None` when the wire form omitted `value`.
    pub comparand: Option<Value>,
}

// ============================================================================
// SECTION: Condition Tree
// ============================================================================

/// Condition tree evaluated against current form values.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// All children must hold. An empty child list evaluates false.
    And(SmallVec<[Box<Self>; 4]>),
    /// At least one child must hold. An empty child list evaluates false.
    Or(SmallVec<[Box<Self>; 4]>),
    /// Single field comparison.
    Leaf(LeafCondition),
}

impl Condition {
    /// Creates an `and` combinator.
    #[must_use]
    pub fn and(children: Vec<Self>) -> Self {
        Self::And(children.into_iter().map(Box::new).collect())
    }

    /// Creates an `or` combinator.
    #[must_use]
    pub fn or(children: Vec<Self>) -> Self {
        Self::Or(children.into_iter().map(Box::new).collect())
    }

    /// Creates a leaf comparing `field` against `value`.
    #[must_use]
    pub fn compare(field: impl Into<FieldKey>, operator: Operator, value: Value) -> Self {
        Self::Leaf(LeafCondition {
            field: Some(field.into()),
            operator,
            comparand: Some(value),
        })
    }

    /// Creates a leaf that tests `field` without a comparand (`empty` / `not_empty`).
    #[must_use]
    pub fn check(field: impl Into<FieldKey>, operator: Operator) -> Self {
        Self::Leaf(LeafCondition {
            field: Some(field.into()),
            operator,
            comparand: None,
        })
    }

    /// Parses a condition node from its JSON wire form.
    ///
    /// Never fails: anything that is not a recognizable node becomes a leaf
    /// with an unrecognized operator.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Value::Object(node) = value else {
            return Self::Leaf(LeafCondition {
                field: None,
                operator: Operator::Unrecognized(String::new()),
                comparand: None,
            });
        };
        if let Some(children) = non_empty_children(node, "and") {
            return Self::And(children.iter().map(|child| Box::new(Self::from_json(child))).collect());
        }
        if let Some(children) = non_empty_children(node, "or") {
            return Self::Or(children.iter().map(|child| Box::new(Self::from_json(child))).collect());
        }
        Self::Leaf(LeafCondition {
            field: node.get("field").and_then(field_key_from_json),
            operator: match node.get("op") {
                Some(Value::String(label)) => Operator::parse(label),
                Some(other) => Operator::Unrecognized(other.to_string()),
                None => Operator::Unrecognized(String::new()),
            },
            comparand: node.get("value").cloned(),
        })
    }

    /// Returns the nesting depth of the tree (a single leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(|child| child.depth()).max().unwrap_or(0)
            }
            Self::Leaf(_) => 1,
        }
    }

    /// Visits every leaf in the tree in document order.
    pub fn for_each_leaf<'a>(&'a self, visit: &mut impl FnMut(&'a LeafCondition)) {
        match self {
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.for_each_leaf(visit);
                }
            }
            Self::Leaf(leaf) => visit(leaf),
        }
    }
}

// ============================================================================
// SECTION: Serialization
// ============================================================================

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::And(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("and", children.as_slice())?;
                map.end()
            }
            Self::Or(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("or", children.as_slice())?;
                map.end()
            }
            Self::Leaf(leaf) => {
                let mut map = serializer.serialize_map(None)?;
                if let Some(field) = &leaf.field {
                    map.serialize_entry("field", field)?;
                }
                if !leaf.operator.label().is_empty() {
                    map.serialize_entry("op", leaf.operator.label())?;
                }
                if let Some(comparand) = &leaf.comparand {
                    map.serialize_entry("value", comparand)?;
                }
                map.end()
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the child list stored under `key` when it is a non-empty array.
fn non_empty_children<'a>(node: &'a Map<String, Value>, key: &str) -> Option<&'a Vec<Value>> {
    match node.get(key) {
        Some(Value::Array(children)) if !children.is_empty() => Some(children),
        _ => None,
    }
}

/// Reads a field reference. Numeric keys are accepted in their decimal form.
fn field_key_from_json(value: &Value) -> Option<FieldKey> {
    match value {
        Value::String(key) => Some(FieldKey::new(key.as_str())),
        Value::Number(number) => Some(FieldKey::new(number.to_string())),
        _ => None,
    }
}

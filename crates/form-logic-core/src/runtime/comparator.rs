// crates/form-logic-core/src/runtime/comparator.rs
// ============================================================================
// Module: Form Logic Comparator
// Description: Condition evaluation against a snapshot of form values.
// Purpose: Resolve every condition to a defined boolean, failing closed.
// Dependencies: crate::core, crate::runtime::coercion, serde_json
// ============================================================================

//! ## Overview
//! Conditions evaluate to plain booleans. Anything that cannot be evaluated
//! meaningfully (unknown operator, non-numeric ordering operand) yields
//! `false`, so a broken rule leaves its targets in their default state rather
//! than revealing or enabling them. A missing comparand is coerced like any
//! other absent value, so each negated operator stays the exact complement of
//! its positive form.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::Condition;
use crate::core::FieldValues;
use crate::core::LeafCondition;
use crate::core::Operator;
use crate::runtime::coercion::is_empty_value;
use crate::runtime::coercion::loose_equals;
use crate::runtime::coercion::to_number;
use crate::runtime::coercion::to_text;

// ============================================================================
// SECTION: Condition Evaluation
// ============================================================================

/// Evaluates a condition tree against current values.
///
/// `and` / `or` short-circuit; empty combinators evaluate false.
#[must_use]
pub fn evaluate_condition<V: FieldValues + ?Sized>(condition: &Condition, values: &V) -> bool {
    match condition {
        Condition::And(children) => {
            !children.is_empty() && children.iter().all(|child| evaluate_condition(child, values))
        }
        Condition::Or(children) => children.iter().any(|child| evaluate_condition(child, values)),
        Condition::Leaf(leaf) => evaluate_leaf(leaf, values),
    }
}

/// Evaluates a single field comparison.
fn evaluate_leaf<V: FieldValues + ?Sized>(leaf: &LeafCondition, values: &V) -> bool {
    let field_value = leaf.field.as_ref().and_then(|field| values.value(field.as_str()));
    evaluate_operator(&leaf.operator, field_value, leaf.comparand.as_ref())
}

/// Applies `operator` to a field value and comparand.
///
/// `None` means the value (or comparand) is absent: it reads as `""` for
/// text comparisons and NaN for ordering.
#[must_use]
pub fn evaluate_operator(
    operator: &Operator,
    field_value: Option<&Value>,
    comparand: Option<&Value>,
) -> bool {
    match operator {
        Operator::Equals => loose_equals(field_value, comparand),
        Operator::NotEquals => !loose_equals(field_value, comparand),
        Operator::GreaterThan => to_number(field_value) > to_number(comparand),
        Operator::LessThan => to_number(field_value) < to_number(comparand),
        Operator::GreaterThanOrEqual => to_number(field_value) >= to_number(comparand),
        Operator::LessThanOrEqual => to_number(field_value) <= to_number(comparand),
        Operator::Contains => contains_text(field_value, comparand),
        Operator::NotContains => !contains_text(field_value, comparand),
        Operator::Empty => is_empty_value(field_value),
        Operator::NotEmpty => !is_empty_value(field_value),
        Operator::Unrecognized(_) => false,
    }
}

/// Case-sensitive substring test over the text forms of both operands.
fn contains_text(field_value: Option<&Value>, comparand: Option<&Value>) -> bool {
    to_text(field_value).contains(&*to_text(comparand))
}

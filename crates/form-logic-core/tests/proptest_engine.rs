// crates/form-logic-core/tests/proptest_engine.rs
// ============================================================================
// Module: Engine Property-Based Tests
// Description: Property tests for evaluation totality and determinism.
// Purpose: Detect panics and ordering sensitivity across wide input ranges.
// ============================================================================

//! Property-based tests for engine invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use form_logic_core::Condition;
use form_logic_core::LogicDocument;
use form_logic_core::Operator;
use form_logic_core::runtime::evaluate_operator;
use proptest::prelude::*;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

const OPERATORS: [&str; 11] =
    ["=", "!=", ">", "<", ">=", "<=", "contains", "not_contains", "empty", "not_empty", "??"];

fn json_value_strategy(max_depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::Number(v.into())),
        any::<f64>()
            .prop_filter("finite", |v| v.is_finite())
            .prop_map(|v| serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)),
        ".*".prop_map(Value::String),
        prop_oneof![Just("Yes"), Just("no"), Just("0x1f"), Just(" 42 "), Just("Infinity")]
            .prop_map(|text| Value::String(text.to_string())),
    ];

    leaf.prop_recursive(max_depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0 .. 4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn form_values_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-c]", json_value_strategy(2), 0 .. 4)
        .prop_map(|map| map.into_iter().collect())
}

proptest! {
    #[test]
    fn operators_never_panic(
        op_index in 0 .. OPERATORS.len(),
        field in prop::option::of(json_value_strategy(3)),
        comparand in prop::option::of(json_value_strategy(3)),
    ) {
        let operator = Operator::parse(OPERATORS[op_index]);
        let _ = evaluate_operator(&operator, field.as_ref(), comparand.as_ref());
    }

    #[test]
    fn negated_operators_are_complements(
        field in prop::option::of(json_value_strategy(2)),
        comparand in prop::option::of(json_value_strategy(2)),
    ) {
        let field = field.as_ref();
        let comparand = comparand.as_ref();
        prop_assert_eq!(
            evaluate_operator(&Operator::Equals, field, comparand),
            !evaluate_operator(&Operator::NotEquals, field, comparand)
        );
        prop_assert_eq!(
            evaluate_operator(&Operator::Contains, field, comparand),
            !evaluate_operator(&Operator::NotContains, field, comparand)
        );
        prop_assert_eq!(
            evaluate_operator(&Operator::Empty, field, None),
            !evaluate_operator(&Operator::NotEmpty, field, None)
        );
    }

    #[test]
    fn arbitrary_conditions_parse_and_evaluate(
        condition in json_value_strategy(4),
        values in form_values_strategy(),
    ) {
        let parsed = Condition::from_json(&condition);
        let _ = form_logic_core::runtime::evaluate_condition(&parsed, &values);
    }

    #[test]
    fn evaluation_is_deterministic(
        op_index in 0 .. OPERATORS.len(),
        comparand in json_value_strategy(2),
        values in form_values_strategy(),
    ) {
        let document = LogicDocument::from_json(&json!({
            "rules": [
                {"id": "r1", "when": {"field": "a", "op": OPERATORS[op_index], "value": comparand},
                 "actions": [{"type": "show", "target": "b"}, {"type": "setValue", "target": "c", "value": 1}]},
                {"id": "r2", "when": {"or": [{"field": "b", "op": "not_empty"}, {"field": "c", "op": "empty"}]},
                 "actions": [{"type": "require", "target": "a"}]}
            ],
            "field_keys": ["a", "b", "c"],
            "hidden_fields": ["c"]
        }))
        .unwrap();
        let engine = document.to_engine().unwrap();
        let snapshot = values.clone();
        let first = engine.evaluate(&values);
        prop_assert_eq!(&first, &engine.evaluate(&values));
        prop_assert_eq!(&values, &snapshot);
        prop_assert!(first.fields.contains_key("a"));
        prop_assert!(first.fields.contains_key("b"));
        prop_assert!(first.fields.contains_key("c"));
    }
}

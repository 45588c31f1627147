// crates/form-logic-core/src/runtime/engine.rs
// ============================================================================
// Module: Form Logic Engine
// Description: Applies an ordered rule set to form values.
// Purpose: Compute visibility, enablement, requiredness, and forced values.
// Dependencies: crate::core, crate::runtime::{comparator, trace}
// ============================================================================

//! ## Overview
//! A [`LogicEngine`] is built once per schema version and evaluated on every
//! value change. Evaluation runs in four passes:
//!
//! 1. Collect the key set: keys with values plus the stored key universe
//!    (declared field keys and every action target).
//! 2. Assign defaults: visible unless listed in the hidden fields, enabled,
//!    optional.
//! 3. Show-target pre-pass: any key targeted by a `show` action anywhere in
//!    the rule set starts hidden, so it stays hidden until a rule reveals it.
//! 4. Apply fired rules in list order; each action overwrites its target's
//!    attribute, so the last write wins.
//!
//! The engine is immutable after construction and evaluation never fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::Value;

use crate::core::Action;
use crate::core::ActionKind;
use crate::core::EvaluationOutcome;
use crate::core::FieldKey;
use crate::core::FieldState;
use crate::core::FieldValues;
use crate::core::Rule;
use crate::error::ConfigurationError;
use crate::runtime::comparator::evaluate_condition;
use crate::runtime::trace::EvaluationTrace;
use crate::runtime::trace::NoopTrace;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum number of rules per rule set.
pub const DEFAULT_MAX_RULES: usize = 512;
/// Default maximum number of actions per rule.
pub const DEFAULT_MAX_ACTIONS_PER_RULE: usize = 64;
/// Default maximum condition nesting depth.
pub const DEFAULT_MAX_CONDITION_DEPTH: usize = 32;
/// Default maximum size of the field key universe.
pub const DEFAULT_MAX_FIELD_KEYS: usize = 4_096;

/// Size limits enforced when an engine is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineLimits {
    /// Maximum number of rules.
    pub max_rules: usize,
    /// Maximum number of actions in a single rule.
    pub max_actions_per_rule: usize,
    /// Maximum condition nesting depth (a leaf has depth 1).
    pub max_condition_depth: usize,
    /// Maximum size of the key universe after action targets are merged in.
    pub max_field_keys: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_rules: DEFAULT_MAX_RULES,
            max_actions_per_rule: DEFAULT_MAX_ACTIONS_PER_RULE,
            max_condition_depth: DEFAULT_MAX_CONDITION_DEPTH,
            max_field_keys: DEFAULT_MAX_FIELD_KEYS,
        }
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Immutable rule set plus the field universe it governs.
///
/// # Invariants
/// - `field_keys` contains every action target.
/// - `show_targets` is exactly the set of `show` action targets.
/// - Rules are stored in authoring order.
#[derive(Debug, Clone)]
pub struct LogicEngine {
    /// Rules in evaluation order.
    rules: Vec<Rule>,
    /// Declared field keys merged with all action targets.
    field_keys: BTreeSet<FieldKey>,
    /// Fields hidden by default in the schema.
    hidden_fields: BTreeSet<FieldKey>,
    /// Fields targeted by at least one `show` action.
    show_targets: BTreeSet<FieldKey>,
}

impl LogicEngine {
    /// Builds an engine with [`EngineLimits::default`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when a rule is malformed or a limit is
    /// exceeded.
    pub fn build<K, H>(
        rules: Vec<Rule>,
        field_keys: K,
        hidden_fields: H,
    ) -> Result<Self, ConfigurationError>
    where
        K: IntoIterator,
        K::Item: Into<FieldKey>,
        H: IntoIterator,
        H::Item: Into<FieldKey>,
    {
        Self::build_with_limits(rules, field_keys, hidden_fields, EngineLimits::default())
    }

    /// Builds an engine, enforcing the given limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Shape`] for empty rule ids or action
    /// targets and [`ConfigurationError::LimitExceeded`] when the rule set is
    /// larger than `limits` allow.
    pub fn build_with_limits<K, H>(
        rules: Vec<Rule>,
        field_keys: K,
        hidden_fields: H,
        limits: EngineLimits,
    ) -> Result<Self, ConfigurationError>
    where
        K: IntoIterator,
        K::Item: Into<FieldKey>,
        H: IntoIterator,
        H::Item: Into<FieldKey>,
    {
        if rules.len() > limits.max_rules {
            return Err(ConfigurationError::limit("rule count", rules.len(), limits.max_rules));
        }
        let mut universe: BTreeSet<FieldKey> = field_keys.into_iter().map(Into::into).collect();
        let mut show_targets = BTreeSet::new();
        for (index, rule) in rules.iter().enumerate() {
            validate_rule(rule, index, limits)?;
            for action in &rule.actions {
                universe.insert(action.target.clone());
                if action.kind == ActionKind::Show {
                    show_targets.insert(action.target.clone());
                }
            }
        }
        if universe.len() > limits.max_field_keys {
            return Err(ConfigurationError::limit(
                "field key count",
                universe.len(),
                limits.max_field_keys,
            ));
        }
        Ok(Self {
            rules,
            field_keys: universe,
            hidden_fields: hidden_fields.into_iter().map(Into::into).collect(),
            show_targets,
        })
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the key universe (declared keys plus action targets).
    #[must_use]
    pub const fn field_keys(&self) -> &BTreeSet<FieldKey> {
        &self.field_keys
    }

    /// Returns the fields hidden by default in the schema.
    #[must_use]
    pub const fn hidden_fields(&self) -> &BTreeSet<FieldKey> {
        &self.hidden_fields
    }

    /// Returns the fields targeted by at least one `show` action.
    #[must_use]
    pub const fn show_targets(&self) -> &BTreeSet<FieldKey> {
        &self.show_targets
    }

    /// Evaluates the rule set against a value snapshot.
    #[must_use]
    pub fn evaluate<V: FieldValues + ?Sized>(&self, values: &V) -> EvaluationOutcome {
        self.evaluate_traced(values, &mut NoopTrace)
    }

    /// Evaluates the rule set, reporting rule outcomes and applied actions
    /// to `trace`.
    pub fn evaluate_traced<V, T>(&self, values: &V, trace: &mut T) -> EvaluationOutcome
    where
        V: FieldValues + ?Sized,
        T: EvaluationTrace + ?Sized,
    {
        let mut fields = self.default_states(values);
        self.apply_show_target_defaults(&mut fields);
        let mut forced = BTreeMap::new();
        for rule in &self.rules {
            let fired = evaluate_condition(&rule.when, values);
            trace.on_rule_evaluated(rule, fired);
            if !fired {
                continue;
            }
            for action in &rule.actions {
                self.apply_action(action, &mut fields, &mut forced);
                trace.on_action_applied(rule, action);
            }
        }
        EvaluationOutcome {
            fields,
            values: forced,
        }
    }

    /// Returns the schema default for `key`, ignoring rules.
    fn default_state(&self, key: &str) -> FieldState {
        if self.hidden_fields.contains(key) { FieldState::HIDDEN } else { FieldState::VISIBLE }
    }

    /// Passes 1 and 2: the key set with schema defaults.
    fn default_states<V: FieldValues + ?Sized>(&self, values: &V) -> BTreeMap<FieldKey, FieldState> {
        let mut fields: BTreeMap<FieldKey, FieldState> = self
            .field_keys
            .iter()
            .map(|key| (key.clone(), self.default_state(key.as_str())))
            .collect();
        for key in values.keys() {
            if !fields.contains_key(key) {
                fields.insert(FieldKey::new(key), self.default_state(key));
            }
        }
        fields
    }

    /// Pass 3: fields governed by a `show` action start hidden.
    fn apply_show_target_defaults(&self, fields: &mut BTreeMap<FieldKey, FieldState>) {
        for target in &self.show_targets {
            if let Some(state) = fields.get_mut(target) {
                state.visible = false;
            }
        }
    }

    /// Applies one action, overwriting whatever earlier actions wrote.
    fn apply_action(
        &self,
        action: &Action,
        fields: &mut BTreeMap<FieldKey, FieldState>,
        forced: &mut BTreeMap<FieldKey, Value>,
    ) {
        if let ActionKind::SetValue(payload) = &action.kind {
            forced.insert(action.target.clone(), payload.clone());
            return;
        }
        let state = fields
            .entry(action.target.clone())
            .or_insert_with(|| self.default_state(action.target.as_str()));
        match &action.kind {
            ActionKind::Show => state.visible = true,
            ActionKind::Hide => state.visible = false,
            ActionKind::Enable => state.disabled = false,
            ActionKind::Disable => state.disabled = true,
            ActionKind::Require => state.required = true,
            ActionKind::Unrequire => state.required = false,
            ActionKind::SetValue(_) => {}
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Checks a single rule against structural rules and limits.
fn validate_rule(rule: &Rule, index: usize, limits: EngineLimits) -> Result<(), ConfigurationError> {
    if rule.id.is_empty() {
        return Err(ConfigurationError::shape(format!("rules[{index}].id"), "expected a non-empty string"));
    }
    if rule.actions.len() > limits.max_actions_per_rule {
        return Err(ConfigurationError::limit(
            format!("rules[{index}] action count"),
            rule.actions.len(),
            limits.max_actions_per_rule,
        ));
    }
    let depth = rule.when.depth();
    if depth > limits.max_condition_depth {
        return Err(ConfigurationError::limit(
            format!("rules[{index}] condition depth"),
            depth,
            limits.max_condition_depth,
        ));
    }
    for (action_index, action) in rule.actions.iter().enumerate() {
        if action.target.is_empty() {
            return Err(ConfigurationError::shape(
                format!("rules[{index}].actions[{action_index}].target"),
                "expected a non-empty string",
            ));
        }
    }
    Ok(())
}

// crates/form-logic-core/src/runtime/trace.rs
// ============================================================================
// Module: Evaluation Trace Hooks
// Description: Observer hooks for rule outcomes and applied actions.
// Purpose: Let callers explain an evaluation without changing its result.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! The engine reports every rule it evaluates, and every action it applies,
//! to an [`EvaluationTrace`]. [`NoopTrace`] is the fast path used by
//! [`LogicEngine::evaluate`](crate::LogicEngine::evaluate);
//! [`RecordingTrace`] collects a per-rule summary for previews and audits.

use serde::Serialize;

use crate::core::Action;
use crate::core::Rule;
use crate::core::RuleId;

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Trace hook for rule evaluation.
pub trait EvaluationTrace {
    /// Called once per rule, in list order, after its condition is evaluated.
    fn on_rule_evaluated(&mut self, rule: &Rule, fired: bool);

    /// Called for each action applied by a fired rule.
    fn on_action_applied(&mut self, _rule: &Rule, _action: &Action) {}
}

/// No-op trace hook for fast paths.
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Default)]
pub struct NoopTrace;

impl EvaluationTrace for NoopTrace {
    fn on_rule_evaluated(&mut self, _rule: &Rule, _fired: bool) {}
}

// ============================================================================
// SECTION: Recording Trace
// ============================================================================

/// Outcome of a single rule during one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    /// Rule identifier.
    pub rule_id: RuleId,
    /// Whether the rule's condition held.
    pub fired: bool,
    /// Number of actions applied (zero when the rule did not fire).
    pub actions_applied: usize,
}

/// Trace hook that records every rule outcome in evaluation order.
#[derive(Debug, Default)]
pub struct RecordingTrace {
    /// Recorded outcomes in rule order.
    outcomes: Vec<RuleOutcome>,
}

impl RecordingTrace {
    /// Creates an empty recording trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded outcomes in rule order.
    #[must_use]
    pub fn outcomes(&self) -> &[RuleOutcome] {
        &self.outcomes
    }

    /// Returns the identifiers of rules whose condition held.
    #[must_use]
    pub fn fired_rules(&self) -> Vec<&RuleId> {
        self.outcomes.iter().filter(|outcome| outcome.fired).map(|outcome| &outcome.rule_id).collect()
    }

    /// Consumes the trace, returning the recorded outcomes.
    #[must_use]
    pub fn into_outcomes(self) -> Vec<RuleOutcome> {
        self.outcomes
    }
}

impl EvaluationTrace for RecordingTrace {
    fn on_rule_evaluated(&mut self, rule: &Rule, fired: bool) {
        self.outcomes.push(RuleOutcome {
            rule_id: rule.id.clone(),
            fired,
            actions_applied: 0,
        });
    }

    fn on_action_applied(&mut self, rule: &Rule, _action: &Action) {
        if let Some(outcome) = self.outcomes.last_mut()
            && outcome.rule_id == rule.id
        {
            outcome.actions_applied += 1;
        }
    }
}

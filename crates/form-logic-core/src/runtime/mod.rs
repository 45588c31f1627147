// crates/form-logic-core/src/runtime/mod.rs
// ============================================================================
// Module: Form Logic Runtime
// Description: Coercion, comparison, and rule application.
// Purpose: Evaluate rule sets against form values without side effects.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! The runtime turns a rule set into field states. [`LogicEngine`] owns the
//! pass structure; [`comparator`] and [`coercion`] decide single conditions.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod coercion;
pub mod comparator;
pub mod engine;
pub mod trace;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use comparator::evaluate_condition;
pub use comparator::evaluate_operator;
pub use engine::DEFAULT_MAX_ACTIONS_PER_RULE;
pub use engine::DEFAULT_MAX_CONDITION_DEPTH;
pub use engine::DEFAULT_MAX_FIELD_KEYS;
pub use engine::DEFAULT_MAX_RULES;
pub use engine::EngineLimits;
pub use engine::LogicEngine;
pub use trace::EvaluationTrace;
pub use trace::NoopTrace;
pub use trace::RecordingTrace;
pub use trace::RuleOutcome;

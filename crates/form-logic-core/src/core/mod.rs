// crates/form-logic-core/src/core/mod.rs
// ============================================================================
// Module: Form Logic Core Types
// Description: Canonical rule, condition, action, and field-state structures.
// Purpose: Provide stable, serializable types for form logic documents.
// Dependencies: hex, serde, serde_jcs, serde_json, sha2, smallvec
// ============================================================================

//! ## Overview
//! Core types describe what a rule set says. They carry no evaluation logic;
//! see [`crate::runtime`] for that.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod action;
pub mod condition;
pub mod fingerprint;
pub mod identifiers;
pub mod rule;
pub mod state;
pub mod values;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use action::Action;
pub use action::ActionKind;
pub use condition::Condition;
pub use condition::LeafCondition;
pub use condition::Operator;
pub use fingerprint::CanonicalJson;
pub use fingerprint::Fingerprint;
pub use fingerprint::FingerprintAlgorithm;
pub use identifiers::FieldKey;
pub use identifiers::RuleId;
pub use rule::Rule;
pub use rule::parse_rules;
pub use state::EvaluationOutcome;
pub use state::FieldState;
pub use values::FieldValues;

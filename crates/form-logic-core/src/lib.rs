// crates/form-logic-core/src/lib.rs
// ============================================================================
// Module: Form Logic Core Library
// Description: Declarative conditional logic for dynamic forms.
// Purpose: Decide field visibility, enablement, requiredness, and forced values.
// Dependencies: hex, ron, serde, serde_jcs, serde_json, sha2, smallvec, thiserror
// ============================================================================

//! ## Overview
//! Form schemas attach ordered rules to their fields. Each rule pairs a
//! condition over current form values with actions on target fields. The
//! [`LogicEngine`] evaluates the whole rule set in one deterministic pass and
//! returns an [`EvaluationOutcome`] describing every field's state plus any
//! values the rules force.
//!
//! Building an engine validates the rule set and may fail with
//! [`ConfigurationError`]; evaluating never fails.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod authoring;
pub mod core;
pub mod error;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use authoring::AuthoringFormat;
pub use authoring::LogicDocument;
pub use authoring::MAX_DOCUMENT_BYTES;
pub use authoring::NormalizedDocument;
pub use authoring::detect_format;
pub use authoring::normalize_document;
pub use crate::core::Action;
pub use crate::core::ActionKind;
pub use crate::core::Condition;
pub use crate::core::EvaluationOutcome;
pub use crate::core::FieldKey;
pub use crate::core::FieldState;
pub use crate::core::FieldValues;
pub use crate::core::Fingerprint;
pub use crate::core::LeafCondition;
pub use crate::core::Operator;
pub use crate::core::Rule;
pub use crate::core::RuleId;
pub use crate::core::parse_rules;
pub use error::ConfigurationError;
pub use error::ConfigurationResult;
pub use runtime::EngineLimits;
pub use runtime::EvaluationTrace;
pub use runtime::LogicEngine;
pub use runtime::NoopTrace;
pub use runtime::RecordingTrace;
pub use runtime::RuleOutcome;

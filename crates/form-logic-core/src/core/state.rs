// crates/form-logic-core/src/core/state.rs
// ============================================================================
// Module: Field State
// Description: Per-field visibility, enablement, and requiredness results.
// Purpose: Define the evaluation output consumed by form renderers.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`EvaluationOutcome`] holds one [`FieldState`] per known field plus the
//! forced values written by `setValue` actions. Maps are ordered so repeated
//! evaluations serialize identically.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::FieldKey;

/// Resolved state of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
    /// Whether the field is rendered.
    pub visible: bool,
    /// Whether the field rejects input.
    pub disabled: bool,
    /// Whether the field must be filled before submit.
    pub required: bool,
}

impl FieldState {
    /// Visible, enabled, optional.
    pub const VISIBLE: Self = Self {
        visible: true,
        disabled: false,
        required: false,
    };

    /// Hidden, enabled, optional.
    pub const HIDDEN: Self = Self {
        visible: false,
        disabled: false,
        required: false,
    };
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    /// State for every key in the evaluated key set.
    pub fields: BTreeMap<FieldKey, FieldState>,
    /// Values forced by `setValue` actions; only touched keys appear.
    pub values: BTreeMap<FieldKey, Value>,
}

impl EvaluationOutcome {
    /// Returns the state for `key`, if it was part of the evaluated key set.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldState> {
        self.fields.get(key)
    }

    /// Returns true when `key` is known and visible.
    #[must_use]
    pub fn is_visible(&self, key: &str) -> bool {
        self.field(key).is_some_and(|state| state.visible)
    }

    /// Returns true when `key` is known and disabled.
    #[must_use]
    pub fn is_disabled(&self, key: &str) -> bool {
        self.field(key).is_some_and(|state| state.disabled)
    }

    /// Returns true when `key` is known and required.
    #[must_use]
    pub fn is_required(&self, key: &str) -> bool {
        self.field(key).is_some_and(|state| state.required)
    }

    /// Returns the forced value for `key`, if a `setValue` action wrote one.
    #[must_use]
    pub fn forced_value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

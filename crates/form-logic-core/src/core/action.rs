// crates/form-logic-core/src/core/action.rs
// ============================================================================
// Module: Form Logic Actions
// Description: Effects applied to target fields when a rule fires.
// Purpose: Define the closed action vocabulary and its JSON wire form.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! An [`Action`] pairs a target field with an [`ActionKind`]. The wire form is
//! `{ "type": "show", "target": "petName" }`, with a `value` payload for
//! `setValue` only. Unlike conditions, actions are validated strictly when a
//! rule set is loaded: an unknown action type is an authoring error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde_json::Value;

use crate::core::identifiers::FieldKey;
use crate::error::ConfigurationError;

// ============================================================================
// SECTION: Action Kinds
// ============================================================================

/// Effect applied to a target field.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
    /// Make the target visible.
    Show,
    /// Make the target invisible.
    Hide,
    /// Clear the target's disabled flag.
    Enable,
    /// Set the target's disabled flag.
    Disable,
    /// Force the target's value.
    SetValue(Value),
    /// Mark the target as required.
    Require,
    /// Clear the target's required flag.
    Unrequire,
}

impl ActionKind {
    /// Returns the wire label for the action type.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Hide => "hide",
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::SetValue(_) => "setValue",
            Self::Require => "require",
            Self::Unrequire => "unrequire",
        }
    }
}

// ============================================================================
// SECTION: Actions
// ============================================================================

/// A single effect applied when a rule's condition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Field the effect applies to.
    pub target: FieldKey,
    /// Effect to apply.
    pub kind: ActionKind,
}

impl Action {
    /// Creates a new action.
    #[must_use]
    pub fn new(target: impl Into<FieldKey>, kind: ActionKind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }

    /// Parses an action from its JSON wire form.
    ///
    /// `path` names the action in error messages (for example
    /// `rules[0].actions[1]`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Shape`] when the action is not an object,
    /// has a missing or unknown `type`, an empty `target`, or a `setValue`
    /// without a `value`.
    pub fn from_json(value: &Value, path: &str) -> Result<Self, ConfigurationError> {
        let Value::Object(node) = value else {
            return Err(ConfigurationError::shape(path, "expected an object"));
        };
        let Some(Value::String(label)) = node.get("type") else {
            return Err(ConfigurationError::shape(format!("{path}.type"), "expected a string"));
        };
        let target = match node.get("target") {
            Some(Value::String(target)) if !target.is_empty() => FieldKey::new(target.as_str()),
            _ => {
                return Err(ConfigurationError::shape(
                    format!("{path}.target"),
                    "expected a non-empty string",
                ));
            }
        };
        let kind = match label.as_str() {
            "show" => ActionKind::Show,
            "hide" => ActionKind::Hide,
            "enable" => ActionKind::Enable,
            "disable" => ActionKind::Disable,
            "require" => ActionKind::Require,
            "unrequire" => ActionKind::Unrequire,
            "setValue" => match node.get("value") {
                Some(payload) => ActionKind::SetValue(payload.clone()),
                None => {
                    return Err(ConfigurationError::shape(
                        format!("{path}.value"),
                        "setValue requires a value",
                    ));
                }
            },
            other => {
                return Err(ConfigurationError::shape(
                    format!("{path}.type"),
                    format!("unsupported action type `{other}`"),
                ));
            }
        };
        Ok(Self {
            target,
            kind,
        })
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind.label())?;
        map.serialize_entry("target", &self.target)?;
        if let ActionKind::SetValue(payload) = &self.kind {
            map.serialize_entry("value", payload)?;
        }
        map.end()
    }
}

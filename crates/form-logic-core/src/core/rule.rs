// crates/form-logic-core/src/core/rule.rs
// ============================================================================
// Module: Form Logic Rules
// Description: Condition/action pairs authored in the form builder.
// Purpose: Define rules and their strict wire-shape validation.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Rule`] fires its actions, in order, when its `when` condition holds.
//! Rule shape (id, actions, action types) is validated when the rule is
//! loaded; the condition tree is parsed leniently (see
//! [`Condition::from_json`]).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::action::Action;
use crate::core::condition::Condition;
use crate::core::identifiers::RuleId;
use crate::error::ConfigurationError;

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Declarative rule: when `when` holds, apply `actions` in order.
///
/// # Invariants
/// - Immutable once an engine is built from it.
/// - `id` is used for diagnostics only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Rule {
    /// Rule identifier.
    pub id: RuleId,
    /// Optional human-readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Condition gating the actions.
    pub when: Condition,
    /// Actions applied in order when the condition holds.
    pub actions: Vec<Action>,
}

impl Rule {
    /// Creates a rule without a display name.
    #[must_use]
    pub fn new(id: impl Into<RuleId>, when: Condition, actions: Vec<Action>) -> Self {
        Self {
            id: id.into(),
            name: None,
            when,
            actions,
        }
    }

    /// Attaches a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Parses a rule from its JSON wire form; `path` prefixes error locations.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Shape`] when the rule is not an object,
    /// lacks a non-empty string `id`, has a non-string `name`, lacks an object
    /// `when`, or has a malformed `actions` list.
    pub fn from_json(value: &Value, path: &str) -> Result<Self, ConfigurationError> {
        let Value::Object(node) = value else {
            return Err(ConfigurationError::shape(path, "expected an object"));
        };
        let id = match node.get("id") {
            Some(Value::String(id)) if !id.is_empty() => RuleId::new(id.as_str()),
            _ => {
                return Err(ConfigurationError::shape(
                    format!("{path}.id"),
                    "expected a non-empty string",
                ));
            }
        };
        let name = match node.get("name") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => {
                return Err(ConfigurationError::shape(format!("{path}.name"), "expected a string"));
            }
        };
        let when = match node.get("when") {
            Some(when @ Value::Object(_)) => Condition::from_json(when),
            _ => {
                return Err(ConfigurationError::shape(format!("{path}.when"), "expected an object"));
            }
        };
        let Some(Value::Array(raw_actions)) = node.get("actions") else {
            return Err(ConfigurationError::shape(format!("{path}.actions"), "expected an array"));
        };
        let actions = raw_actions
            .iter()
            .enumerate()
            .map(|(index, action)| Action::from_json(action, &format!("{path}.actions[{index}]")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id,
            name,
            when,
            actions,
        })
    }
}

impl TryFrom<Value> for Rule {
    type Error = ConfigurationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value, "rule")
    }
}

// ============================================================================
// SECTION: Rule Lists
// ============================================================================

/// Parses an ordered rule list from a JSON array.
///
/// # Errors
///
/// Returns [`ConfigurationError::Shape`] when `value` is not an array or any
/// element is not a well-formed rule.
pub fn parse_rules(value: &Value) -> Result<Vec<Rule>, ConfigurationError> {
    let Value::Array(rules) = value else {
        return Err(ConfigurationError::shape("rules", "expected an array"));
    };
    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| Rule::from_json(rule, &format!("rules[{index}]")))
        .collect()
}

// crates/form-logic-core/src/core/values.rs
// ============================================================================
// Module: Form Value Snapshots
// Description: Read-only access to the current values of a form.
// Purpose: Let the engine evaluate against any map-like value snapshot.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! The renderer owns form values; the engine only reads them. [`FieldValues`]
//! is the seam between the two and is implemented for the map types callers
//! commonly hold.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::BuildHasher;

use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Read-only snapshot of current form values keyed by field key.
pub trait FieldValues {
    /// Returns the current value for `key`, or `None` when the key is absent.
    fn value(&self, key: &str) -> Option<&Value>;

    /// Iterates every key that currently has a value.
    fn keys(&self) -> impl Iterator<Item = &str>;
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

impl FieldValues for BTreeMap<String, Value> {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        BTreeMap::keys(self).map(String::as_str)
    }
}

impl<S: BuildHasher> FieldValues for HashMap<String, Value, S> {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        HashMap::keys(self).map(String::as_str)
    }
}

impl FieldValues for Map<String, Value> {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn keys(&self) -> impl Iterator<Item = &str> {
        Map::keys(self).map(String::as_str)
    }
}

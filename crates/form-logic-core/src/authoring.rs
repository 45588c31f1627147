// crates/form-logic-core/src/authoring.rs
// ============================================================================
// Module: Logic Document Authoring
// Description: Logic document parsing and normalization helpers.
// Purpose: Load rule sets from JSON or RON and canonicalize them for caching.
// Dependencies: ron, serde, serde_json, crate::core::fingerprint
// ============================================================================

//! ## Overview
//! A logic document bundles a rule list with the field key universe and the
//! schema's hidden fields. JSON is the canonical format; RON is accepted for
//! hand-written documents and normalizes to the same canonical JSON
//! (RFC 8785), so both spellings of a document share one fingerprint.
//! Authoring inputs are untrusted and size-bounded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::FieldKey;
use crate::core::Rule;
use crate::core::fingerprint::Fingerprint;
use crate::core::fingerprint::canonicalize;
use crate::core::parse_rules;
use crate::error::ConfigurationError;
use crate::runtime::EngineLimits;
use crate::runtime::LogicEngine;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted logic document size in bytes.
pub const MAX_DOCUMENT_BYTES: usize = 4 * 1024 * 1024;

// ============================================================================
// SECTION: Authoring Formats
// ============================================================================

/// Supported authoring formats for logic documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthoringFormat {
    /// Canonical JSON authoring format.
    Json,
    /// Human-friendly RON authoring format.
    Ron,
}

impl AuthoringFormat {
    /// Returns the lowercase label for the format.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ron => "ron",
        }
    }

    /// Parses a format from a file extension.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "ron" => Some(Self::Ron),
            _ => None,
        }
    }
}

impl fmt::Display for AuthoringFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Detects the authoring format from a file path.
#[must_use]
pub fn detect_format(path: &Path) -> Option<AuthoringFormat> {
    path.extension()
        .and_then(|extension| extension.to_str())
        .and_then(AuthoringFormat::from_extension)
}

// ============================================================================
// SECTION: Logic Document
// ============================================================================

/// Rules plus the field universe they apply to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LogicDocument {
    /// Ordered rule list.
    pub rules: Vec<Rule>,
    /// Declared field keys.
    pub field_keys: BTreeSet<FieldKey>,
    /// Fields hidden by default in the schema.
    pub hidden_fields: BTreeSet<FieldKey>,
}

impl LogicDocument {
    /// Parses a document from authoring text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the input is too large, does not
    /// parse, or is not a well-formed document.
    pub fn parse(input: &str, format: AuthoringFormat) -> Result<Self, ConfigurationError> {
        if input.len() > MAX_DOCUMENT_BYTES {
            return Err(ConfigurationError::InputTooLarge {
                size: input.len(),
                limit: MAX_DOCUMENT_BYTES,
            });
        }
        let value = parse_value(input, format)?;
        Self::from_json(&value)
    }

    /// Builds a document from a parsed JSON value.
    ///
    /// `rules` is required. `field_keys` and `hidden_fields` are optional and
    /// also accepted as `fieldKeys` / `hiddenFields`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Shape`] naming the first malformed node.
    pub fn from_json(value: &Value) -> Result<Self, ConfigurationError> {
        let Value::Object(object) = value else {
            return Err(ConfigurationError::shape("document", "expected an object"));
        };
        let rules = match object.get("rules") {
            Some(rules) => parse_rules(rules)?,
            None => return Err(ConfigurationError::shape("rules", "missing required field")),
        };
        Ok(Self {
            rules,
            field_keys: key_list(object, "field_keys", "fieldKeys")?,
            hidden_fields: key_list(object, "hidden_fields", "hiddenFields")?,
        })
    }

    /// Returns every field key referenced by a rule condition.
    #[must_use]
    pub fn referenced_fields(&self) -> BTreeSet<&FieldKey> {
        let mut referenced = BTreeSet::new();
        for rule in &self.rules {
            rule.when.for_each_leaf(&mut |leaf| {
                if let Some(field) = &leaf.field {
                    referenced.insert(field);
                }
            });
        }
        referenced
    }

    /// Builds an engine from this document with default limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the rule set is malformed or too
    /// large.
    pub fn to_engine(&self) -> Result<LogicEngine, ConfigurationError> {
        self.to_engine_with_limits(EngineLimits::default())
    }

    /// Builds an engine from this document with explicit limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the rule set is malformed or
    /// exceeds `limits`.
    pub fn to_engine_with_limits(
        &self,
        limits: EngineLimits,
    ) -> Result<LogicEngine, ConfigurationError> {
        LogicEngine::build_with_limits(
            self.rules.clone(),
            self.field_keys.iter().cloned(),
            self.hidden_fields.iter().cloned(),
            limits,
        )
    }
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalized logic document with canonical JSON and fingerprint.
#[derive(Debug, Clone)]
pub struct NormalizedDocument {
    /// Parsed document.
    pub document: LogicDocument,
    /// Canonical JSON bytes for the document (RFC 8785).
    pub canonical_json: Vec<u8>,
    /// SHA-256 digest of `canonical_json`.
    pub fingerprint: Fingerprint,
}

/// Parses authoring input and canonicalizes it.
///
/// # Errors
///
/// Returns [`ConfigurationError`] when parsing, shape validation, or
/// canonicalization fails.
#[must_use = "use the normalized document or handle the error"]
pub fn normalize_document(
    input: &str,
    format: AuthoringFormat,
) -> Result<NormalizedDocument, ConfigurationError> {
    let document = LogicDocument::parse(input, format)?;
    let canonical = canonicalize(&document)?;
    Ok(NormalizedDocument {
        document,
        canonical_json: canonical.bytes,
        fingerprint: canonical.fingerprint,
    })
}

// ============================================================================
// SECTION: Parsing Helpers
// ============================================================================

/// Parses authoring input into a JSON value.
fn parse_value(input: &str, format: AuthoringFormat) -> Result<Value, ConfigurationError> {
    match format {
        AuthoringFormat::Json => {
            serde_json::from_str(input).map_err(|err| ConfigurationError::Parse {
                format,
                error: err.to_string(),
            })
        }
        AuthoringFormat::Ron => ron::from_str(input).map_err(|err| ConfigurationError::Parse {
            format,
            error: err.to_string(),
        }),
    }
}

/// Reads an optional list of field keys stored under `name` or `alias`.
fn key_list(
    object: &Map<String, Value>,
    name: &str,
    alias: &str,
) -> Result<BTreeSet<FieldKey>, ConfigurationError> {
    let Some((label, value)) = object
        .get_key_value(name)
        .or_else(|| object.get_key_value(alias))
    else {
        return Ok(BTreeSet::new());
    };
    let Value::Array(items) = value else {
        return Err(ConfigurationError::shape(label.as_str(), "expected an array"));
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(key) if !key.is_empty() => Ok(FieldKey::new(key.as_str())),
            Value::Number(number) => Ok(FieldKey::new(number.to_string())),
            _ => Err(ConfigurationError::shape(
                format!("{label}[{index}]"),
                "expected a non-empty string",
            )),
        })
        .collect()
}

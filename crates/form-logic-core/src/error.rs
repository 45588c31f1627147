// crates/form-logic-core/src/error.rs
// ============================================================================
// Module: Form Logic Errors
// Description: Construction-time diagnostics for rule sets and documents.
// Purpose: Surface malformed logic to schema authors before it reaches a form.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`ConfigurationError`] is the only error the engine raises, and only while
//! a rule set is being loaded or built. Evaluation itself never fails: every
//! ambiguous comparison resolves to a defined boolean.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::authoring::AuthoringFormat;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading or building a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The authoring input could not be parsed.
    #[error("failed to parse {format} input: {error}")]
    Parse {
        /// Format that failed to parse.
        format: AuthoringFormat,
        /// Underlying parse error message.
        error: String,
    },
    /// The authoring input exceeds the size limit.
    #[error("logic document is {size} bytes (limit {limit})")]
    InputTooLarge {
        /// Input size in bytes.
        size: usize,
        /// Maximum accepted size in bytes.
        limit: usize,
    },
    /// A rule, action, or document node has the wrong shape.
    #[error("{path}: {reason}")]
    Shape {
        /// Location of the offending node (for example `rules[2].actions[0].type`).
        path: String,
        /// What was wrong with the node.
        reason: String,
    },
    /// A rule set exceeds a configured engine limit.
    #[error("{what} exceeds limit ({actual} > {limit})")]
    LimitExceeded {
        /// Name of the limited quantity.
        what: String,
        /// Observed count.
        actual: usize,
        /// Configured maximum.
        limit: usize,
    },
    /// Canonical serialization of a document failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(String),
}

impl ConfigurationError {
    /// Creates a [`ConfigurationError::Shape`] error.
    pub fn shape(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Shape {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`ConfigurationError::LimitExceeded`] error.
    pub fn limit(what: impl Into<String>, actual: usize, limit: usize) -> Self {
        Self::LimitExceeded {
            what: what.into(),
            actual,
            limit,
        }
    }

    /// Returns a stable label for the error category.
    ///
    /// Labels are safe to log: they never carry document content.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Parse {
                ..
            } => "parse",
            Self::InputTooLarge {
                ..
            } => "input_too_large",
            Self::Shape {
                ..
            } => "shape",
            Self::LimitExceeded {
                ..
            } => "limit_exceeded",
            Self::Canonicalization(_) => "canonicalization",
        }
    }
}

/// Result alias for rule set construction.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

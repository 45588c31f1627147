// crates/form-logic-core/src/core/fingerprint.rs
// ============================================================================
// Module: Logic Document Fingerprints
// Description: Canonical JSON encoding and content fingerprints for documents.
// Purpose: Give renderers a stable cache key per logic schema version.
// Dependencies: hex, serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! A document's identity is the digest of its RFC 8785 (JCS) encoding, so key
//! order, whitespace, and authoring format never change it. [`canonicalize`]
//! produces both the canonical bytes and their [`Fingerprint`] in one step;
//! callers that only need stable output bytes use [`canonical_json_bytes`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::error::ConfigurationError;

// ============================================================================
// SECTION: Fingerprint
// ============================================================================

/// Digest algorithm behind a [`Fingerprint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintAlgorithm {
    /// SHA-256 over canonical JSON.
    Sha256,
}

impl FingerprintAlgorithm {
    /// Returns the label used in `algorithm:hex` renderings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }
}

/// Content fingerprint of a canonical logic document.
///
/// Displays as `sha256:<hex>`; serializes as `{ algorithm, value }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    /// Digest algorithm.
    pub algorithm: FingerprintAlgorithm,
    /// Lowercase hex digest.
    pub value: String,
}

impl Fingerprint {
    /// Fingerprints already-canonical JSON bytes with SHA-256.
    #[must_use]
    pub fn sha256(canonical_json: &[u8]) -> Self {
        Self {
            algorithm: FingerprintAlgorithm::Sha256,
            value: hex::encode(Sha256::digest(canonical_json)),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm.label(), self.value)
    }
}

// ============================================================================
// SECTION: Canonical Encoding
// ============================================================================

/// Canonical JSON bytes paired with their fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalJson {
    /// RFC 8785 encoding.
    pub bytes: Vec<u8>,
    /// SHA-256 of `bytes`.
    pub fingerprint: Fingerprint,
}

/// Encodes `value` as RFC 8785 canonical JSON.
///
/// # Errors
///
/// Returns [`ConfigurationError::Canonicalization`] when `value` cannot be
/// represented as JSON (for example a non-finite float).
pub fn canonical_json_bytes<T: Serialize + ?Sized>(
    value: &T,
) -> Result<Vec<u8>, ConfigurationError> {
    serde_jcs::to_vec(value).map_err(|err| ConfigurationError::Canonicalization(err.to_string()))
}

/// Encodes `value` canonically and fingerprints the result.
///
/// # Errors
///
/// Returns [`ConfigurationError::Canonicalization`] when encoding fails.
pub fn canonicalize<T: Serialize + ?Sized>(
    value: &T,
) -> Result<CanonicalJson, ConfigurationError> {
    let bytes = canonical_json_bytes(value)?;
    let fingerprint = Fingerprint::sha256(&bytes);
    Ok(CanonicalJson {
        bytes,
        fingerprint,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

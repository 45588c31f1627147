// crates/form-logic-cli/src/lib.rs
// ============================================================================
// Module: Form Logic CLI Library
// Description: Shared helpers for the form-logic command-line interface.
// Purpose: Provide reusable components (i18n, audit) for the binary and tests.
// Dependencies: form-logic-config, form-logic-core, serde, serde_json
// ============================================================================

//! ## Overview
//! Library half of the `form-logic` CLI. The binary entry point
//! (`src/main.rs`) owns argument parsing and command dispatch and imports the
//! localized message catalog and audit sinks from here.
//!
//! Security posture: CLI inputs are untrusted and must be validated.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Structured audit events and sinks.
pub mod audit;
/// Internationalization helpers and message catalog.
pub mod i18n;

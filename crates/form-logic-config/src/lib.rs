// crates/form-logic-config/src/lib.rs
// ============================================================================
// Module: Form Logic Config Library
// Description: Canonical config model and validation for Form Logic tooling.
// Purpose: Single source of truth for form-logic.toml semantics.
// Dependencies: form-logic-core, serde, toml
// ============================================================================

//! ## Overview
//! `form-logic-config` defines the configuration model shared by Form Logic
//! tooling: engine size limits and the audit sink. Validation is strict and
//! fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;

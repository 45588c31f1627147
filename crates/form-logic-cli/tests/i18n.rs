// crates/form-logic-cli/tests/i18n.rs
// ============================================================================
// Module: CLI i18n Tests
// Description: Exercises the translation catalog and placeholder substitution.
// Purpose: Ensure CLI user-facing strings route through stable i18n helpers.
// Dependencies: form-logic-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates the form logic CLI i18n catalog behavior:
//! - Message arguments capture key/value substitutions.
//! - Translation falls back to keys on misses.
//! - The [`t!`](form_logic_cli::t) macro formats placeholders correctly.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use form_logic_cli::i18n::MessageArg;
use form_logic_cli::i18n::translate;
use form_logic_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms message arguments capture key/value pairs.
#[test]
fn message_arg_new_captures_key_and_value() {
    let arg = MessageArg::new("path", "/tmp/rules.json");
    assert_eq!(arg.key, "path");
    assert_eq!(arg.value, "/tmp/rules.json");
}

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let args = vec![MessageArg::new("path", "/tmp/values.json")];
    let result = translate("evaluate.values.not_object", args);
    assert_eq!(result, "Form values at /tmp/values.json must be a JSON object.");
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

/// Confirms the macro formats named arguments.
#[test]
fn t_macro_formats_named_arguments() {
    let message = t!("rules.validate.ok", rules = 2, fields = 4, fingerprint = "sha256:ab");
    assert_eq!(message, "Logic document valid (rules=2, fields=4, fingerprint=sha256:ab)");
}

/// Confirms unused arguments are ignored.
#[test]
fn t_macro_ignores_unused_arguments() {
    assert_eq!(t!("config.validate.ok", unused = "x"), "Config valid.");
}

//! Limits validation tests for form-logic-config.
// crates/form-logic-config/tests/limits_validation.rs
// =============================================================================
// Module: Limits Validation Tests
// Description: Range checks for engine limits.
// Purpose: Ensure every limit is bounded below and above.
// =============================================================================

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

use form_logic_config::FormLogicConfig;
use form_logic_config::LimitsConfig;
use form_logic_config::MAX_ACTIONS_PER_RULE_CEILING;
use form_logic_config::MAX_CONDITION_DEPTH_CEILING;
use form_logic_config::MAX_FIELD_KEYS_CEILING;
use form_logic_config::MAX_RULES_CEILING;
use form_logic_core::EngineLimits;

mod common;

use crate::common::TestResult;
use crate::common::assert_invalid;

#[test]
fn defaults_match_engine_defaults() -> TestResult {
    let config = common::config_from_toml("").map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.limits.to_engine_limits() != EngineLimits::default() {
        return Err("config defaults drifted from engine defaults".to_string());
    }
    Ok(())
}

#[test]
fn partial_limits_keep_other_defaults() -> TestResult {
    let config = common::config_from_toml("[limits]\nmax_condition_depth = 4\n")
        .map_err(|err| err.to_string())?;
    let limits = config.limits.to_engine_limits();
    if limits.max_condition_depth != 4 || limits.max_rules != EngineLimits::default().max_rules {
        return Err(format!("unexpected limits {limits:?}"));
    }
    Ok(())
}

#[test]
fn zero_limits_are_rejected() -> TestResult {
    for field in ["max_rules", "max_actions_per_rule", "max_condition_depth", "max_field_keys"] {
        let toml = format!("[limits]\n{field} = 0\n");
        assert_invalid(FormLogicConfig::from_toml_str(&toml), &format!("limits.{field} must be greater than zero"))?;
    }
    Ok(())
}

#[test]
fn limits_at_ceiling_are_accepted() -> TestResult {
    let limits = LimitsConfig {
        max_rules: MAX_RULES_CEILING,
        max_actions_per_rule: MAX_ACTIONS_PER_RULE_CEILING,
        max_condition_depth: MAX_CONDITION_DEPTH_CEILING,
        max_field_keys: MAX_FIELD_KEYS_CEILING,
    };
    limits.validate().map_err(|err| err.to_string())
}

#[test]
fn limits_above_ceiling_are_rejected() -> TestResult {
    let base = LimitsConfig::default();
    let cases = [
        (
            LimitsConfig {
                max_rules: MAX_RULES_CEILING + 1,
                ..base
            },
            "limits.max_rules",
        ),
        (
            LimitsConfig {
                max_actions_per_rule: MAX_ACTIONS_PER_RULE_CEILING + 1,
                ..base
            },
            "limits.max_actions_per_rule",
        ),
        (
            LimitsConfig {
                max_condition_depth: MAX_CONDITION_DEPTH_CEILING + 1,
                ..base
            },
            "limits.max_condition_depth",
        ),
        (
            LimitsConfig {
                max_field_keys: MAX_FIELD_KEYS_CEILING + 1,
                ..base
            },
            "limits.max_field_keys",
        ),
    ];
    for (limits, needle) in cases {
        assert_invalid(limits.validate(), needle)?;
    }
    Ok(())
}

#[test]
fn negative_limits_fail_to_parse() -> TestResult {
    match common::config_from_toml("[limits]\nmax_rules = -1\n") {
        Err(_) => Ok(()),
        Ok(config) => Err(format!("expected parse failure, got {config:?}")),
    }
}

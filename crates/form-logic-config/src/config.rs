// crates/form-logic-config/src/config.rs
// ============================================================================
// Module: Form Logic Configuration
// Description: Configuration loading and validation for Form Logic tooling.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: form-logic-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! An explicitly requested file (via argument or `FORM_LOGIC_CONFIG`) must
//! exist; the default `form-logic.toml` is optional and falls back to
//! defaults when absent. Invalid configuration fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use form_logic_core::EngineLimits;
use form_logic_core::runtime::DEFAULT_MAX_ACTIONS_PER_RULE;
use form_logic_core::runtime::DEFAULT_MAX_CONDITION_DEPTH;
use form_logic_core::runtime::DEFAULT_MAX_FIELD_KEYS;
use form_logic_core::runtime::DEFAULT_MAX_RULES;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "form-logic.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FORM_LOGIC_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Hard ceiling for `limits.max_rules`.
pub const MAX_RULES_CEILING: usize = 65_536;
/// Hard ceiling for `limits.max_actions_per_rule`.
pub const MAX_ACTIONS_PER_RULE_CEILING: usize = 1_024;
/// Hard ceiling for `limits.max_condition_depth`.
pub const MAX_CONDITION_DEPTH_CEILING: usize = 256;
/// Hard ceiling for `limits.max_field_keys`.
pub const MAX_FIELD_KEYS_CEILING: usize = 262_144;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Form Logic tooling configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FormLogicConfig {
    /// Engine size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl FormLogicConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: `path`, then `FORM_LOGIC_CONFIG`, then
    /// `form-logic.toml` in the working directory. Only the last may be
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, required) = resolve_path(path)?;
        load_resolved(&resolved, required)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits.validate()?;
        self.audit.validate()
    }
}

/// Engine size limits applied when building rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum number of rules in a document.
    #[serde(default = "default_max_rules")]
    pub max_rules: usize,
    /// Maximum number of actions in a single rule.
    #[serde(default = "default_max_actions_per_rule")]
    pub max_actions_per_rule: usize,
    /// Maximum condition nesting depth.
    #[serde(default = "default_max_condition_depth")]
    pub max_condition_depth: usize,
    /// Maximum size of the field key universe.
    #[serde(default = "default_max_field_keys")]
    pub max_field_keys: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_rules: DEFAULT_MAX_RULES,
            max_actions_per_rule: DEFAULT_MAX_ACTIONS_PER_RULE,
            max_condition_depth: DEFAULT_MAX_CONDITION_DEPTH,
            max_field_keys: DEFAULT_MAX_FIELD_KEYS,
        }
    }
}

impl LimitsConfig {
    /// Validates every limit against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a limit is zero or above its
    /// ceiling.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_limit("limits.max_rules", self.max_rules, MAX_RULES_CEILING)?;
        validate_limit(
            "limits.max_actions_per_rule",
            self.max_actions_per_rule,
            MAX_ACTIONS_PER_RULE_CEILING,
        )?;
        validate_limit(
            "limits.max_condition_depth",
            self.max_condition_depth,
            MAX_CONDITION_DEPTH_CEILING,
        )?;
        validate_limit("limits.max_field_keys", self.max_field_keys, MAX_FIELD_KEYS_CEILING)
    }

    /// Converts the configured limits into engine limits.
    #[must_use]
    pub const fn to_engine_limits(&self) -> EngineLimits {
        EngineLimits {
            max_rules: self.max_rules,
            max_actions_per_rule: self.max_actions_per_rule,
            max_condition_depth: self.max_condition_depth,
            max_field_keys: self.max_field_keys,
        }
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Audit disabled.
    None,
}

/// Audit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Where audit events are written.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Output file for the `file` sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates sink and path consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the `file` sink lacks a valid
    /// path or another sink sets one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required when audit.sink = \"file\"".to_string()))
            }
            (AuditSinkKind::Stderr | AuditSinkKind::None, Some(_)) => Err(ConfigError::Invalid(
                "audit.path is only valid when audit.sink = \"file\"".to_string(),
            )),
            (AuditSinkKind::Stderr | AuditSinkKind::None, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default for `limits.max_rules`.
const fn default_max_rules() -> usize {
    DEFAULT_MAX_RULES
}

/// Default for `limits.max_actions_per_rule`.
const fn default_max_actions_per_rule() -> usize {
    DEFAULT_MAX_ACTIONS_PER_RULE
}

/// Default for `limits.max_condition_depth`.
const fn default_max_condition_depth() -> usize {
    DEFAULT_MAX_CONDITION_DEPTH
}

/// Default for `limits.max_field_keys`.
const fn default_max_field_keys() -> usize {
    DEFAULT_MAX_FIELD_KEYS
}

/// Resolves the config path from CLI or environment defaults.
///
/// Returns the path and whether it must exist.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Reads, parses, and validates the config at `path`.
///
/// A missing optional file yields the default configuration.
fn load_resolved(path: &Path, required: bool) -> Result<FormLogicConfig, ConfigError> {
    validate_path(path)?;
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if !required && err.kind() == ErrorKind::NotFound => {
            return Ok(FormLogicConfig::default());
        }
        Err(err) => return Err(ConfigError::Io(err.to_string())),
    };
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
    FormLogicConfig::from_toml_str(content)
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() != value.len() {
        return Err(ConfigError::Invalid(format!(
            "{field} must not have leading or trailing whitespace"
        )));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates that a limit lies in `1 ..= ceiling`.
fn validate_limit(field: &str, value: usize, ceiling: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid(format!("{field} must be greater than zero")));
    }
    if value > ceiling {
        return Err(ConfigError::Invalid(format!("{field} must be at most {ceiling}")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

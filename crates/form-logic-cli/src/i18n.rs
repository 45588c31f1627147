// crates/form-logic-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Keep every user-facing string in one localized catalog.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! The form logic CLI stores user-facing strings in a small translation
//! catalog. All runtime output is routed through the [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The locale is selected once per process and read-only thereafter.
//! - Missing keys fall back to English and then to the key itself.
//! - Every locale carries the same keys and the same placeholders.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Supported CLI locales.
///
/// # Invariants
/// - [`Locale::En`] is the default fallback locale.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Locale {
    /// English (default).
    En,
    /// Catalan.
    Ca,
}

impl Locale {
    /// Returns the canonical locale label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ca => "ca",
        }
    }

    /// Parses a locale value, ignoring case and region tags.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        let lang = normalized.split(['-', '_']).next().unwrap_or_default();
        match lang {
            "en" => Some(Self::En),
            "ca" => Some(Self::Ca),
            _ => None,
        }
    }
}

/// Supported CLI locales in presentation order.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::Ca];

/// A named message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// Placeholder name without braces (for example `path`).
    pub key: &'static str,
    /// Preformatted value substituted for the placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a message argument.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Locale Selection
// ============================================================================

/// Process-wide locale selection.
static CURRENT_LOCALE: OnceLock<Locale> = OnceLock::new();

/// Sets the CLI locale. Only the first call wins.
pub fn set_locale(locale: Locale) {
    let _ = CURRENT_LOCALE.set(locale);
}

/// Returns the current CLI locale (defaults to English).
#[must_use]
pub fn current_locale() -> Locale {
    CURRENT_LOCALE.get().copied().unwrap_or(Locale::En)
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog.
const CATALOG_EN: &[(&str, &str)] = &[
    ("main.version", "form-logic {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {kind} at {path}: {size} bytes exceeds limit of {limit} bytes.",
    ),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("rules.kind.document", "logic document"),
    ("rules.kind.values", "form values"),
    ("rules.read_failed", "Failed to read {kind} at {path}: {error}"),
    (
        "rules.format.missing",
        "Cannot infer the format of {path}. Use --format json or --format ron.",
    ),
    ("rules.invalid", "Logic document {path} is invalid: {error}"),
    (
        "rules.validate.ok",
        "Logic document valid (rules={rules}, fields={fields}, fingerprint={fingerprint})",
    ),
    (
        "rules.validate.undeclared_field",
        "Warning: condition field {field} is not a declared field key.",
    ),
    ("rules.normalize.write_failed", "Failed to write canonical JSON to {path}: {error}"),
    ("rules.normalize.ok", "Canonical logic document written to {path} (fingerprint={fingerprint})"),
    ("evaluate.values.parse_failed", "Failed to parse form values at {path}: {error}"),
    ("evaluate.values.not_object", "Form values at {path} must be a JSON object."),
    ("evaluate.serialize_failed", "Failed to serialize evaluation result: {error}"),
    ("evaluate.text.fields", "Fields:"),
    (
        "evaluate.text.field",
        "  {field}: visible={visible} disabled={disabled} required={required}",
    ),
    ("evaluate.text.values", "Forced values:"),
    ("evaluate.text.value", "  {field} = {value}"),
    ("evaluate.text.trace", "Rules:"),
    ("evaluate.text.rule_fired", "  {rule}: fired, {actions} action(s) applied"),
    ("evaluate.text.rule_skipped", "  {rule}: not fired"),
    ("evaluate.text.none", "  (none)"),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("i18n.lang.invalid_env", "Invalid value for {env}: {value}. Expected 'en' or 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Note: non-English output is machine-translated and may be inaccurate.",
    ),
];

/// Catalan catalog.
const CATALOG_CA: &[(&str, &str)] = &[
    ("main.version", "form-logic {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "sortida"),
    ("output.write_failed", "No s'ha pogut escriure a {stream}: {error}"),
    (
        "input.read_too_large",
        "No es llegeix {kind} a {path}: {size} bytes supera el límit de {limit} bytes.",
    ),
    ("config.load_failed", "No s'ha pogut carregar la configuració: {error}"),
    ("config.validate.ok", "Configuració vàlida."),
    ("rules.kind.document", "document de lògica"),
    ("rules.kind.values", "valors del formulari"),
    ("rules.read_failed", "No s'ha pogut llegir {kind} a {path}: {error}"),
    (
        "rules.format.missing",
        "No es pot deduir el format de {path}. Feu servir --format json o --format ron.",
    ),
    ("rules.invalid", "El document de lògica {path} no és vàlid: {error}"),
    (
        "rules.validate.ok",
        "Document de lògica vàlid (regles={rules}, camps={fields}, empremta={fingerprint})",
    ),
    (
        "rules.validate.undeclared_field",
        "Avís: el camp de condició {field} no és una clau de camp declarada.",
    ),
    ("rules.normalize.write_failed", "No s'ha pogut escriure el JSON canònic a {path}: {error}"),
    (
        "rules.normalize.ok",
        "Document de lògica canònic escrit a {path} (empremta={fingerprint})",
    ),
    (
        "evaluate.values.parse_failed",
        "No s'han pogut analitzar els valors del formulari a {path}: {error}",
    ),
    (
        "evaluate.values.not_object",
        "Els valors del formulari a {path} han de ser un objecte JSON.",
    ),
    ("evaluate.serialize_failed", "No s'ha pogut serialitzar el resultat: {error}"),
    ("evaluate.text.fields", "Camps:"),
    (
        "evaluate.text.field",
        "  {field}: visible={visible} desactivat={disabled} obligatori={required}",
    ),
    ("evaluate.text.values", "Valors forçats:"),
    ("evaluate.text.value", "  {field} = {value}"),
    ("evaluate.text.trace", "Regles:"),
    ("evaluate.text.rule_fired", "  {rule}: activada, {actions} acció(ns) aplicada(es)"),
    ("evaluate.text.rule_skipped", "  {rule}: no activada"),
    ("evaluate.text.none", "  (cap)"),
    ("audit.open_failed", "No s'ha pogut obrir el registre d'auditoria {path}: {error}"),
    ("i18n.lang.invalid_env", "Valor no vàlid per a {env}: {value}. S'esperava 'en' o 'ca'."),
    (
        "i18n.disclaimer.machine_translated",
        "Nota: la sortida que no és en anglès està traduïda automàticament i pot ser inexacta.",
    ),
];

/// Returns the raw catalog entries for `locale`, in declaration order.
#[cfg(test)]
pub(crate) const fn catalog_entries_for(locale: Locale) -> &'static [(&'static str, &'static str)] {
    match locale {
        Locale::En => CATALOG_EN,
        Locale::Ca => CATALOG_CA,
    }
}

/// Returns the message catalog for the requested locale.
pub(crate) fn catalog_for(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_EN_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    static CATALOG_CA_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    match locale {
        Locale::En => CATALOG_EN_MAP.get_or_init(|| CATALOG_EN.iter().copied().collect()),
        Locale::Ca => CATALOG_CA_MAP.get_or_init(|| CATALOG_CA.iter().copied().collect()),
    }
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the selected locale while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog_for(current_locale())
        .get(key)
        .copied()
        .or_else(|| catalog_for(Locale::En).get(key).copied())
        .unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        result = result.replace(&format!("{{{}}}", arg.key), &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a localized message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}

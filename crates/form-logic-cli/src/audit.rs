// crates/form-logic-cli/src/audit.rs
// ============================================================================
// Module: Form Logic Audit Logging
// Description: Structured audit events for document validation and evaluation.
// Purpose: Emit JSON-lines audit records without leaking form values.
// Dependencies: form-logic-config, form-logic-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The CLI records one audit event per validated document and one per
//! evaluation. Events carry the document fingerprint, counts, and rule and
//! field identifiers only; form values and forced values are never logged.
//! Security posture: audit logs are append-only JSON lines.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use form_logic_config::AuditConfig;
use form_logic_config::AuditSinkKind;
use form_logic_core::FieldKey;
use form_logic_core::Fingerprint;
use form_logic_core::RuleId;
use serde::Serialize;

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Result label for a validation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// The document parsed and built an engine.
    Valid,
    /// The document was rejected.
    Invalid,
}

/// Audit event for a logic document validation.
#[derive(Debug, Clone, Serialize)]
pub struct LogicValidationEvent {
    /// Event kind (`logic_validation`).
    pub event: &'static str,
    /// Unix timestamp in milliseconds.
    pub timestamp_ms: u128,
    /// Command that triggered the validation.
    pub command: &'static str,
    /// Validation result.
    pub outcome: ValidationOutcome,
    /// Canonical document fingerprint, when the document parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
    /// Number of rules in the document.
    pub rule_count: usize,
    /// Size of the engine key universe.
    pub field_key_count: usize,
    /// Error category label, when rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

/// Inputs for a [`LogicValidationEvent`].
pub struct LogicValidationEventParams {
    /// Command that triggered the validation.
    pub command: &'static str,
    /// Validation result.
    pub outcome: ValidationOutcome,
    /// Canonical document fingerprint, when the document parsed.
    pub fingerprint: Option<Fingerprint>,
    /// Number of rules in the document.
    pub rule_count: usize,
    /// Size of the engine key universe.
    pub field_key_count: usize,
    /// Error category label, when rejected.
    pub error_kind: Option<&'static str>,
}

impl LogicValidationEvent {
    /// Builds a validation event stamped with the current time.
    #[must_use]
    pub fn new(params: LogicValidationEventParams) -> Self {
        Self {
            event: "logic_validation",
            timestamp_ms: now_ms(),
            command: params.command,
            outcome: params.outcome,
            fingerprint: params.fingerprint,
            rule_count: params.rule_count,
            field_key_count: params.field_key_count,
            error_kind: params.error_kind,
        }
    }
}

/// Audit event for one evaluation pass.
#[derive(Debug, Clone, Serialize)]
pub struct LogicEvaluationEvent {
    /// Event kind (`logic_evaluation`).
    pub event: &'static str,
    /// Unix timestamp in milliseconds.
    pub timestamp_ms: u128,
    /// Canonical document fingerprint.
    pub fingerprint: Fingerprint,
    /// Number of rules evaluated.
    pub rule_count: usize,
    /// Identifiers of rules whose condition held, in order.
    pub fired_rules: Vec<RuleId>,
    /// Number of fields in the evaluated key set.
    pub field_count: usize,
    /// Keys written by `setValue` actions (values are omitted).
    pub forced_value_keys: Vec<FieldKey>,
}

/// Inputs for a [`LogicEvaluationEvent`].
pub struct LogicEvaluationEventParams {
    /// Canonical document fingerprint.
    pub fingerprint: Fingerprint,
    /// Number of rules evaluated.
    pub rule_count: usize,
    /// Identifiers of rules whose condition held, in order.
    pub fired_rules: Vec<RuleId>,
    /// Number of fields in the evaluated key set.
    pub field_count: usize,
    /// Keys written by `setValue` actions.
    pub forced_value_keys: Vec<FieldKey>,
}

impl LogicEvaluationEvent {
    /// Builds an evaluation event stamped with the current time.
    #[must_use]
    pub fn new(params: LogicEvaluationEventParams) -> Self {
        Self {
            event: "logic_evaluation",
            timestamp_ms: now_ms(),
            fingerprint: params.fingerprint,
            rule_count: params.rule_count,
            fired_rules: params.fired_rules,
            field_count: params.field_count,
            forced_value_keys: params.forced_value_keys,
        }
    }
}

/// Current Unix time in milliseconds.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Audit Sinks
// ============================================================================

/// Audit sink for form logic events.
pub trait AuditSink: Send + Sync {
    /// Records a document validation.
    fn record_validation(&self, event: &LogicValidationEvent);

    /// Records an evaluation pass.
    fn record_evaluation(&self, event: &LogicEvaluationEvent);
}

/// Serializes an event as a single JSON line.
fn json_line<T: Serialize>(event: &T) -> Option<String> {
    serde_json::to_string(event).ok()
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Writes one JSON line to stderr.
    fn write<T: Serialize>(event: &T) {
        if let Some(payload) = json_line(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

impl AuditSink for StderrAuditSink {
    fn record_validation(&self, event: &LogicValidationEvent) {
        Self::write(event);
    }

    fn record_evaluation(&self, event: &LogicEvaluationEvent) {
        Self::write(event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// Output file guarded for concurrent writes.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens `path` for appending, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one JSON line and flushes.
    fn write<T: Serialize>(&self, event: &T) {
        if let Some(payload) = json_line(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_validation(&self, event: &LogicValidationEvent) {
        self.write(event);
    }

    fn record_evaluation(&self, event: &LogicEvaluationEvent) {
        self.write(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_validation(&self, _event: &LogicValidationEvent) {}

    fn record_evaluation(&self, _event: &LogicEvaluationEvent) {}
}

/// Builds the sink selected by `config`.
///
/// # Errors
///
/// Returns [`io::Error`] when the file sink cannot open its path.
pub fn sink_from_config(config: &AuditConfig) -> io::Result<Box<dyn AuditSink>> {
    match (config.sink, config.path.as_deref()) {
        (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrAuditSink)),
        (AuditSinkKind::None, _) => Ok(Box::new(NoopAuditSink)),
        (AuditSinkKind::File, Some(path)) => Ok(Box::new(FileAuditSink::new(Path::new(path))?)),
        (AuditSinkKind::File, None) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "audit.path is required when audit.sink = \"file\"",
        )),
    }
}

// crates/form-logic-cli/src/main.rs
// ============================================================================
// Module: Form Logic CLI Entry Point
// Description: Command dispatcher for logic document and evaluation workflows.
// Purpose: Provide a safe, localized CLI for validating and previewing rules.
// Dependencies: clap, form-logic-config, form-logic-core, serde, thiserror.
// ============================================================================

//! ## Overview
//! The `form-logic` CLI validates and normalizes logic documents and previews
//! an evaluation against a JSON snapshot of form values. All user-facing
//! strings are routed through the i18n catalog. Inputs are untrusted: every
//! file read is size-bounded and documents are validated before use.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use form_logic_cli::audit::AuditSink;
use form_logic_cli::audit::LogicEvaluationEvent;
use form_logic_cli::audit::LogicEvaluationEventParams;
use form_logic_cli::audit::LogicValidationEvent;
use form_logic_cli::audit::LogicValidationEventParams;
use form_logic_cli::audit::ValidationOutcome;
use form_logic_cli::audit::sink_from_config;
use form_logic_cli::i18n::Locale;
use form_logic_cli::i18n::set_locale;
use form_logic_cli::t;
use form_logic_config::FormLogicConfig;
use form_logic_core::AuthoringFormat;
use form_logic_core::ConfigurationError;
use form_logic_core::EngineLimits;
use form_logic_core::EvaluationOutcome;
use form_logic_core::FieldKey;
use form_logic_core::FieldState;
use form_logic_core::LogicEngine;
use form_logic_core::MAX_DOCUMENT_BYTES;
use form_logic_core::NormalizedDocument;
use form_logic_core::RecordingTrace;
use form_logic_core::RuleOutcome;
use form_logic_core::core::fingerprint::canonical_json_bytes;
use form_logic_core::detect_format;
use form_logic_core::normalize_document;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a form values snapshot in bytes.
const MAX_VALUES_BYTES: usize = MAX_DOCUMENT_BYTES;
/// Environment variable selecting the output language.
const LANG_ENV: &str = "FORM_LOGIC_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "form-logic", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `FORM_LOGIC_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Logic document utilities.
    Rules {
        /// Selected rules subcommand.
        #[command(subcommand)]
        command: RulesCommand,
    },
    /// Evaluate a logic document against form values.
    Evaluate(EvaluateCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Logic document subcommands.
#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Validate a logic document.
    Validate(RulesValidateCommand),
    /// Normalize a logic document to canonical JSON.
    Normalize(RulesNormalizeCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file.
    Validate(ConfigValidateCommand),
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

/// Supported authoring formats for logic documents.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum AuthoringFormatArg {
    /// Canonical JSON authoring format.
    Json,
    /// Human-friendly RON authoring format.
    Ron,
}

impl From<AuthoringFormatArg> for AuthoringFormat {
    fn from(value: AuthoringFormatArg) -> Self {
        match value {
            AuthoringFormatArg::Json => Self::Json,
            AuthoringFormatArg::Ron => Self::Ron,
        }
    }
}

/// Output formats for evaluation results.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum OutputFormat {
    /// Canonical JSON output.
    Json,
    /// Human-readable text output.
    Text,
}

/// Arguments shared by every command that loads a logic document.
#[derive(Args, Debug)]
struct DocumentArgs {
    /// Path to the logic document.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// Explicit authoring format override.
    #[arg(long, value_enum, value_name = "FORMAT")]
    format: Option<AuthoringFormatArg>,
    /// Optional config file path (defaults to form-logic.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `rules validate`.
#[derive(Args, Debug)]
struct RulesValidateCommand {
    /// Document to validate.
    #[command(flatten)]
    document: DocumentArgs,
}

/// Arguments for `rules normalize`.
#[derive(Args, Debug)]
struct RulesNormalizeCommand {
    /// Document to normalize.
    #[command(flatten)]
    document: DocumentArgs,
    /// Output path for canonical JSON (defaults to stdout).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Arguments for `evaluate`.
#[derive(Args, Debug)]
struct EvaluateCommand {
    /// Document to evaluate.
    #[command(flatten)]
    document: DocumentArgs,
    /// Path to a JSON object of current form values.
    #[arg(long, value_name = "PATH")]
    values: PathBuf,
    /// Output format for the result.
    #[arg(long = "output-format", value_enum, value_name = "FORMAT", default_value = "json")]
    output_format: OutputFormat,
    /// Include per-rule outcomes in the output.
    #[arg(long, action = ArgAction::SetTrue)]
    trace: bool,
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to form-logic.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        write_stdout_line(&t!("main.version", version = env!("CARGO_PKG_VERSION")))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Rules {
            command,
        } => command_rules(command),
        Commands::Evaluate(command) => command_evaluate(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Runtime Setup
// ============================================================================

/// Engine limits and audit sink resolved from configuration.
struct Runtime {
    /// Limits applied when building engines.
    limits: EngineLimits,
    /// Destination for audit events.
    audit: Box<dyn AuditSink>,
}

/// Loads configuration and builds the runtime.
fn load_runtime(config: Option<&Path>) -> CliResult<Runtime> {
    let config = FormLogicConfig::load(config)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let audit = sink_from_config(&config.audit).map_err(|err| {
        CliError::new(t!(
            "audit.open_failed",
            path = config.audit.path.as_deref().unwrap_or_default(),
            error = err
        ))
    })?;
    Ok(Runtime {
        limits: config.limits.to_engine_limits(),
        audit,
    })
}

/// A validated document with its engine.
struct LoadedDocument {
    /// Canonical form and fingerprint.
    normalized: NormalizedDocument,
    /// Engine built under the configured limits.
    engine: LogicEngine,
}

/// Reads, normalizes, and builds a logic document, auditing the outcome.
fn load_document(
    args: &DocumentArgs,
    runtime: &Runtime,
    command: &'static str,
) -> CliResult<LoadedDocument> {
    let format = resolve_authoring_format(&args.input, args.format)?;
    let input = read_text_input(&args.input, &t!("rules.kind.document"), MAX_DOCUMENT_BYTES)?;
    let normalized = match normalize_document(&input, format) {
        Ok(normalized) => normalized,
        Err(err) => return Err(reject_document(runtime, command, &args.input, None, &err)),
    };
    let engine = match normalized.document.to_engine_with_limits(runtime.limits) {
        Ok(engine) => engine,
        Err(err) => {
            return Err(reject_document(runtime, command, &args.input, Some(&normalized), &err));
        }
    };
    let loaded = LoadedDocument {
        normalized,
        engine,
    };
    runtime.audit.record_validation(&LogicValidationEvent::new(LogicValidationEventParams {
        command,
        outcome: ValidationOutcome::Valid,
        fingerprint: Some(loaded.normalized.fingerprint.clone()),
        rule_count: loaded.engine.rules().len(),
        field_key_count: loaded.engine.field_keys().len(),
        error_kind: None,
    }));
    Ok(loaded)
}

/// Audits a rejected document and returns the localized error.
fn reject_document(
    runtime: &Runtime,
    command: &'static str,
    path: &Path,
    normalized: Option<&NormalizedDocument>,
    error: &ConfigurationError,
) -> CliError {
    runtime.audit.record_validation(&LogicValidationEvent::new(LogicValidationEventParams {
        command,
        outcome: ValidationOutcome::Invalid,
        fingerprint: normalized.map(|normalized| normalized.fingerprint.clone()),
        rule_count: normalized.map_or(0, |normalized| normalized.document.rules.len()),
        field_key_count: normalized.map_or(0, |normalized| normalized.document.field_keys.len()),
        error_kind: Some(error.kind()),
    }));
    CliError::new(t!("rules.invalid", path = path.display(), error = error))
}

// ============================================================================
// SECTION: Rules Commands
// ============================================================================

/// Dispatches rules subcommands.
fn command_rules(command: RulesCommand) -> CliResult<ExitCode> {
    match command {
        RulesCommand::Validate(command) => command_rules_validate(&command),
        RulesCommand::Normalize(command) => command_rules_normalize(&command),
    }
}

/// Executes the rules validation command.
fn command_rules_validate(command: &RulesValidateCommand) -> CliResult<ExitCode> {
    let runtime = load_runtime(command.document.config.as_deref())?;
    let loaded = load_document(&command.document, &runtime, "rules.validate")?;
    let document = &loaded.normalized.document;
    if !document.field_keys.is_empty() {
        for field in document.referenced_fields() {
            if !loaded.engine.field_keys().contains(field) {
                write_stderr_line(&t!("rules.validate.undeclared_field", field = field))
                    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
            }
        }
    }
    write_stdout_line(&validation_summary(&loaded))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the rules normalization command.
fn command_rules_normalize(command: &RulesNormalizeCommand) -> CliResult<ExitCode> {
    let runtime = load_runtime(command.document.config.as_deref())?;
    let loaded = load_document(&command.document, &runtime, "rules.normalize")?;
    let canonical_json = &loaded.normalized.canonical_json;

    if let Some(output) = &command.output {
        fs::write(output, canonical_json).map_err(|err| {
            CliError::new(t!("rules.normalize.write_failed", path = output.display(), error = err))
        })?;
        write_stdout_line(&t!(
            "rules.normalize.ok",
            path = output.display(),
            fingerprint = loaded.normalized.fingerprint.to_string()
        ))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    write_stdout_bytes(canonical_json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stderr_line(&validation_summary(&loaded))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Formats the one-line summary for a valid document.
fn validation_summary(loaded: &LoadedDocument) -> String {
    t!(
        "rules.validate.ok",
        rules = loaded.engine.rules().len(),
        fields = loaded.engine.field_keys().len(),
        fingerprint = loaded.normalized.fingerprint.to_string()
    )
}

// ============================================================================
// SECTION: Evaluate Command
// ============================================================================

/// JSON shape of an evaluation result.
#[derive(Serialize)]
struct EvaluationReport<'a> {
    /// Per-field states.
    fields: &'a BTreeMap<FieldKey, FieldState>,
    /// Forced values.
    values: &'a BTreeMap<FieldKey, Value>,
    /// Per-rule outcomes when tracing was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [RuleOutcome]>,
}

/// Executes the evaluate command.
fn command_evaluate(command: &EvaluateCommand) -> CliResult<ExitCode> {
    let runtime = load_runtime(command.document.config.as_deref())?;
    let loaded = load_document(&command.document, &runtime, "evaluate")?;
    let values = read_form_values(&command.values)?;

    let mut trace = RecordingTrace::new();
    let outcome = loaded.engine.evaluate_traced(&values, &mut trace);
    runtime.audit.record_evaluation(&LogicEvaluationEvent::new(LogicEvaluationEventParams {
        fingerprint: loaded.normalized.fingerprint.clone(),
        rule_count: loaded.engine.rules().len(),
        fired_rules: trace.fired_rules().into_iter().cloned().collect(),
        field_count: outcome.fields.len(),
        forced_value_keys: outcome.values.keys().cloned().collect(),
    }));

    let rule_outcomes = command.trace.then(|| trace.outcomes());
    match command.output_format {
        OutputFormat::Json => {
            let report = EvaluationReport {
                fields: &outcome.fields,
                values: &outcome.values,
                trace: rule_outcomes,
            };
            let bytes = canonical_json_bytes(&report)
                .map_err(|err| CliError::new(t!("evaluate.serialize_failed", error = err)))?;
            write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))?;
            write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        OutputFormat::Text => {
            write_stdout_line(&render_evaluation_text(&outcome, rule_outcomes))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Reads a JSON object of form values.
fn read_form_values(path: &Path) -> CliResult<Map<String, Value>> {
    let text = read_text_input(path, &t!("rules.kind.values"), MAX_VALUES_BYTES)?;
    parse_form_values(&text, path)
}

/// Parses form values text, requiring a top-level object.
fn parse_form_values(text: &str, path: &Path) -> CliResult<Map<String, Value>> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        CliError::new(t!("evaluate.values.parse_failed", path = path.display(), error = err))
    })?;
    match value {
        Value::Object(values) => Ok(values),
        _ => Err(CliError::new(t!("evaluate.values.not_object", path = path.display()))),
    }
}

/// Renders an evaluation result as text.
fn render_evaluation_text(outcome: &EvaluationOutcome, trace: Option<&[RuleOutcome]>) -> String {
    let mut lines = vec![t!("evaluate.text.fields")];
    if outcome.fields.is_empty() {
        lines.push(t!("evaluate.text.none"));
    }
    for (field, state) in &outcome.fields {
        lines.push(t!(
            "evaluate.text.field",
            field = field,
            visible = state.visible,
            disabled = state.disabled,
            required = state.required
        ));
    }
    lines.push(t!("evaluate.text.values"));
    if outcome.values.is_empty() {
        lines.push(t!("evaluate.text.none"));
    }
    for (field, value) in &outcome.values {
        lines.push(t!("evaluate.text.value", field = field, value = value));
    }
    if let Some(trace) = trace {
        lines.push(t!("evaluate.text.trace"));
        if trace.is_empty() {
            lines.push(t!("evaluate.text.none"));
        }
        for rule in trace {
            lines.push(if rule.fired {
                t!("evaluate.text.rule_fired", rule = rule.rule_id, actions = rule.actions_applied)
            } else {
                t!("evaluate.text.rule_skipped", rule = rule.rule_id)
            });
        }
    }
    lines.join("\n")
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = FormLogicConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Resolves an authoring format from flags or file extension.
fn resolve_authoring_format(
    path: &Path,
    format: Option<AuthoringFormatArg>,
) -> CliResult<AuthoringFormat> {
    if let Some(format) = format {
        return Ok(format.into());
    }
    detect_format(path)
        .ok_or_else(|| CliError::new(t!("rules.format.missing", path = path.display())))
}

/// Reads a UTF-8 input file under a size limit.
fn read_text_input(path: &Path, kind: &str, max_bytes: usize) -> CliResult<String> {
    let bytes = read_bytes_with_limit(path, max_bytes).map_err(|err| match err {
        ReadLimitError::Io(err) => CliError::new(t!(
            "rules.read_failed",
            kind = kind,
            path = path.display(),
            error = err
        )),
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            kind = kind,
            path = path.display(),
            size = size,
            limit = limit
        )),
    })?;
    String::from_utf8(bytes).map_err(|err| {
        CliError::new(t!("rules.read_failed", kind = kind, path = path.display(), error = err))
    })
}

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}

// crates/form-logic-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests for the form-logic binary.
// Purpose: Ensure rules, evaluate, and config commands behave end to end.
// Dependencies: form-logic-cli binary, serde_json, tempfile
// ============================================================================

//! CLI command integration tests.

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
    clippy::missing_docs_in_private_items,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

const PET_RULES: &str = r#"{
  "rules": [
    {
      "id": "pet",
      "when": {"field": "hasPet", "op": "=", "value": "Yes"},
      "actions": [
        {"type": "show", "target": "petName"},
        {"type": "require", "target": "petName"}
      ]
    },
    {
      "id": "adult",
      "when": {"field": "age", "op": ">=", "value": 18},
      "actions": [{"type": "setValue", "target": "tier", "value": "adult"}]
    }
  ],
  "fieldKeys": ["hasPet", "petName", "age"]
}"#;

const PET_RULES_RON: &str = r#"{
  "field_keys": ["hasPet", "petName", "age"],
  "rules": [
    {
      "id": "pet",
      "when": {"field": "hasPet", "op": "=", "value": "Yes"},
      "actions": [
        {"type": "show", "target": "petName"},
        {"type": "require", "target": "petName"},
      ],
    },
    {
      "id": "adult",
      "when": {"field": "age", "op": ">=", "value": 18},
      "actions": [{"type": "setValue", "target": "tier", "value": "adult"}],
    },
  ],
}"#;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn form_logic_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_form-logic"))
}

fn write_text(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

/// Writes a config that disables audit output so stderr stays clean.
fn quiet_config(dir: &TempDir) -> PathBuf {
    write_text(dir, "form-logic.toml", "[audit]\nsink = \"none\"\n")
}

fn run(args: &[&str]) -> Output {
    Command::new(form_logic_bin())
        .args(args)
        .env_remove("FORM_LOGIC_LANG")
        .env_remove("FORM_LOGIC_CONFIG")
        .output()
        .expect("run form-logic")
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

// ============================================================================
// SECTION: Rules Commands
// ============================================================================

/// Verifies `rules validate` reports counts and a fingerprint.
#[test]
fn rules_validate_reports_summary() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_text(&dir, "rules.json", PET_RULES);
    let config = quiet_config(&dir);

    let output = run(&["rules", "validate", "--input", arg(&rules), "--config", arg(&config)]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Logic document valid (rules=2, fields=4"), "stdout: {stdout}");
    assert!(stdout.contains("fingerprint=sha256:"), "stdout: {stdout}");
    assert!(output.stderr.is_empty());
}

/// Verifies `rules validate` names the malformed node and fails.
#[test]
fn rules_validate_rejects_unknown_action_type() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_text(
        &dir,
        "rules.json",
        r#"{"rules": [{"id": "r", "when": {"field": "a", "op": "=", "value": 1}, "actions": [{"type": "explode", "target": "b"}]}]}"#,
    );
    let config = quiet_config(&dir);

    let output = run(&["rules", "validate", "--input", arg(&rules), "--config", arg(&config)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is invalid"), "stderr: {stderr}");
    assert!(stderr.contains("rules[0].actions[0].type"), "stderr: {stderr}");
}

/// Verifies undeclared condition fields produce a warning but still pass.
#[test]
fn rules_validate_warns_on_undeclared_condition_fields() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_text(
        &dir,
        "rules.json",
        r#"{"rules": [{"id": "r", "when": {"field": "ghost", "op": "not_empty"}, "actions": [{"type": "show", "target": "b"}]}], "fieldKeys": ["b"]}"#,
    );
    let config = quiet_config(&dir);

    let output = run(&["rules", "validate", "--input", arg(&rules), "--config", arg(&config)]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ghost"), "stderr: {stderr}");
}

/// Verifies configured limits are enforced when building the engine.
#[test]
fn rules_validate_enforces_configured_limits() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_text(&dir, "rules.json", PET_RULES);
    let config =
        write_text(&dir, "strict.toml", "[limits]\nmax_rules = 1\n\n[audit]\nsink = \"none\"\n");

    let output = run(&["rules", "validate", "--input", arg(&rules), "--config", arg(&config)]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rule count exceeds limit (2 > 1)"), "stderr: {stderr}");
}

/// Verifies RON and JSON spellings normalize to identical bytes.
#[test]
fn rules_normalize_ron_matches_json() {
    let dir = tempfile::tempdir().unwrap();
    let json_rules = write_text(&dir, "rules.json", PET_RULES);
    let ron_rules = write_text(&dir, "rules.ron", PET_RULES_RON);
    let config = quiet_config(&dir);

    let from_json =
        run(&["rules", "normalize", "--input", arg(&json_rules), "--config", arg(&config)]);
    let from_ron =
        run(&["rules", "normalize", "--input", arg(&ron_rules), "--config", arg(&config)]);

    assert!(from_json.status.success());
    assert!(from_ron.status.success());
    assert_eq!(from_json.stdout, from_ron.stdout);
    let canonical: Value = serde_json::from_slice(&from_json.stdout).unwrap();
    assert_eq!(canonical["field_keys"], json!(["age", "hasPet", "petName"]));
}

/// Verifies `rules normalize --output` writes canonical JSON to disk.
#[test]
fn rules_normalize_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_text(&dir, "rules.json", PET_RULES);
    let out = dir.path().join("canonical.json");
    let config = quiet_config(&dir);

    let output = run(&[
        "rules",
        "normalize",
        "--input",
        arg(&rules),
        "--output",
        arg(&out),
        "--config",
        arg(&config),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Canonical logic document written to"), "stdout: {stdout}");
    let written: Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
    assert_eq!(written["rules"][0]["id"], json!("pet"));
}

/// Verifies a file without a known extension requires `--format`.
#[test]
fn rules_validate_requires_format_for_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_text(&dir, "rules.txt", PET_RULES);
    let config = quiet_config(&dir);

    let missing = run(&["rules", "validate", "--input", arg(&rules), "--config", arg(&config)]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("--format"));

    let explicit = run(&[
        "rules",
        "validate",
        "--input",
        arg(&rules),
        "--format",
        "json",
        "--config",
        arg(&config),
    ]);
    assert!(explicit.status.success());
}

// ============================================================================
// SECTION: Evaluate Command
// ============================================================================

/// Verifies the canonical JSON result for the pet scenario.
#[test]
fn evaluate_emits_field_states_and_forced_values() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_text(&dir, "rules.json", PET_RULES);
    let values = write_text(&dir, "values.json", r#"{"hasPet": "Yes", "age": "21"}"#);
    let config = quiet_config(&dir);

    let output = run(&[
        "evaluate",
        "--input",
        arg(&rules),
        "--values",
        arg(&values),
        "--config",
        arg(&config),
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        result["fields"]["petName"],
        json!({"visible": true, "disabled": false, "required": true})
    );
    assert_eq!(result["values"], json!({"tier": "adult"}));
    assert!(result.get("trace").is_none());
}

/// Verifies show targets stay hidden when their rule does not fire.
#[test]
fn evaluate_keeps_show_targets_hidden_until_revealed() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_text(&dir, "rules.json", PET_RULES);
    let values = write_text(&dir, "values.json", r#"{"hasPet": "No"}"#);
    let config = quiet_config(&dir);

    let output = run(&[
        "evaluate",
        "--input",
        arg(&rules),
        "--values",
        arg(&values),
        "--trace",
        "--config",
        arg(&config),
    ]);

    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["fields"]["petName"]["visible"], json!(false));
    assert_eq!(result["values"], json!({}));
    assert_eq!(
        result["trace"],
        json!([
            {"rule_id": "pet", "fired": false, "actions_applied": 0},
            {"rule_id": "adult", "fired": false, "actions_applied": 0}
        ])
    );
}

/// Verifies the text renderer output.
#[test]
fn evaluate_text_output_lists_fields() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_text(&dir, "rules.json", PET_RULES);
    let values = write_text(&dir, "values.json", r#"{"hasPet": "yes"}"#);
    let config = quiet_config(&dir);

    let output = run(&[
        "evaluate",
        "--input",
        arg(&rules),
        "--values",
        arg(&values),
        "--output-format",
        "text",
        "--trace",
        "--config",
        arg(&config),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("petName: visible=true disabled=false required=true"), "{stdout}");
    assert!(stdout.contains("pet: fired, 2 action(s) applied"), "{stdout}");
    assert!(stdout.contains("adult: not fired"), "{stdout}");
}

/// Verifies non-object values files are rejected.
#[test]
fn evaluate_rejects_non_object_values() {
    let dir = tempfile::tempdir().unwrap();
    let rules = write_text(&dir, "rules.json", PET_RULES);
    let values = write_text(&dir, "values.json", "[]");
    let config = quiet_config(&dir);

    let output = run(&[
        "evaluate",
        "--input",
        arg(&rules),
        "--values",
        arg(&values),
        "--config",
        arg(&config),
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("must be a JSON object"));
}

// ============================================================================
// SECTION: Config and Global Flags
// ============================================================================

/// Verifies `config validate` accepts a valid file and rejects unknown keys.
#[test]
fn config_validate_accepts_and_rejects() {
    let dir = tempfile::tempdir().unwrap();
    let good = quiet_config(&dir);
    let bad = write_text(&dir, "bad.toml", "[limits]\nmax_rulez = 3\n");

    let ok = run(&["config", "validate", "--config", arg(&good)]);
    assert!(ok.status.success());
    assert!(String::from_utf8_lossy(&ok.stdout).contains("Config valid."));

    let rejected = run(&["config", "validate", "--config", arg(&bad)]);
    assert!(!rejected.status.success());
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("Failed to load config"));
}

/// Verifies an explicitly named config file must exist.
#[test]
fn config_validate_rejects_missing_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let output = run(&["config", "validate", "--config", arg(&missing)]);

    assert!(!output.status.success());
}

/// Verifies `--version` prints the package version.
#[test]
fn version_flag_prints_version() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "stdout: {stdout}");
}

/// Verifies Catalan output carries the machine translation notice.
#[test]
fn catalan_locale_localizes_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = quiet_config(&dir);

    let output = run(&["--lang", "ca", "config", "validate", "--config", arg(&config)]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuració vàlida."));
    assert!(String::from_utf8_lossy(&output.stderr).contains("traduïda automàticament"));
}

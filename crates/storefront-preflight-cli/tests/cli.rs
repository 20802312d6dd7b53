// crates/storefront-preflight-cli/tests/cli.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests that run the storefront-preflight binary.
// Purpose: Ensure commands print reports and map hard failures to exit codes.
// Dependencies: storefront-preflight-cli binary, tempfile, tiny_http
// ============================================================================

//! ## Overview
//! Runs the CLI binary against temporary deployment trees, inline configs,
//! and an in-process webhook receiver. Every command runs with the config
//! and secret environment variables cleared unless a test sets them.

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

use std::fs;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;
use std::process::Stdio;
use std::thread;

use storefront_preflight_config::DEFAULT_WEBHOOK_PAYLOAD;
use storefront_preflight_config::PreflightConfig;
use storefront_preflight_probes::verify_signature;
use tempfile::TempDir;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const SECRET: &str = "shpss_test_secret";
const SECRET_SIGNATURE: &str = "lZvn9hqoLeLyG8OZEFAhHWMf5w7dsrKSEsxrfFmvh0Q=";

const DEPLOY_CONFIG: &str = r#"
[[deploy.files]]
path = ".github/workflows/deploy.yml"
contains = ["supabase functions deploy"]

[[deploy.files]]
path = "docs/RUNBOOK.md"
required = false
"#;

fn preflight_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_storefront-preflight"))
}

/// Builds a command rooted in `dir` with the config and secret env cleared.
fn preflight(dir: &Path) -> Command {
    let mut command = Command::new(preflight_bin());
    command
        .current_dir(dir)
        .stdin(Stdio::null())
        .env_remove("STOREFRONT_PREFLIGHT_CONFIG")
        .env_remove("SHOPIFY_WEBHOOK_SECRET");
    command
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("preflight.toml");
    fs::write(&path, content.trim()).unwrap();
    path
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn webhook_config(url: &str) -> String {
    format!(
        "[webhook]\nendpoints = [\"{url}\"]\nshop_domain = \"test.myshopify.com\"\nallow_http = \
         true\n"
    )
}

/// Spawns a receiver answering 200 for valid signatures and 401 otherwise.
fn spawn_receiver(requests: usize) -> (String, thread::JoinHandle<usize>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        let mut handled = 0;
        for _ in 0 .. requests {
            let mut request = server.recv().unwrap();
            let mut body = Vec::new();
            request.as_reader().read_to_end(&mut body).unwrap();
            let signature = request
                .headers()
                .iter()
                .find(|header| header.field.equiv("X-Shopify-Hmac-Sha256"))
                .map(|header| header.value.to_string())
                .unwrap_or_default();
            let status =
                if verify_signature(SECRET.as_bytes(), &body, &signature) { 200 } else { 401 };
            request.respond(Response::from_string("").with_status_code(status)).unwrap();
            handled += 1;
        }
        handled
    });
    (format!("http://{addr}/webhooks/orders"), handle)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Verifies the example config parses and validates.
#[test]
fn config_example_is_valid() {
    let dir = TempDir::new().unwrap();
    let output = preflight(dir.path()).args(["config", "example"]).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    PreflightConfig::from_toml_str(&stdout(&output)).unwrap();
}

/// Verifies `config validate` accepts a valid file and rejects a broken one.
#[test]
fn config_validate_reports_result() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), DEPLOY_CONFIG);
    let output = preflight(dir.path())
        .args(["config", "validate", "--config", &path_arg(&path)])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Config valid."));

    let broken = write_config(dir.path(), "[[deploy.files]]\npath = \"../escape\"\n");
    let output = preflight(dir.path())
        .args(["config", "validate", "--config", &path_arg(&broken)])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load config"));
}

// ============================================================================
// SECTION: Deploy Check
// ============================================================================

/// Verifies a missing required file fails the run with a labeled outcome.
#[test]
fn deploy_check_fails_on_missing_required_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), DEPLOY_CONFIG);
    let output = preflight(dir.path())
        .args(["deploy", "check", "--config", &path_arg(&path)])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(
        text.contains("[FAIL] deploy.file.exists (.github/workflows/deploy.yml): file not found"),
        "{text}"
    );
    assert!(text.contains("Deployment check failed"));
}

/// Verifies a complete tree passes even when optional files are missing.
#[test]
fn deploy_check_passes_on_complete_tree() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), DEPLOY_CONFIG);
    let workflows = dir.path().join(".github/workflows");
    fs::create_dir_all(&workflows).unwrap();
    fs::write(workflows.join("deploy.yml"), "run: supabase functions deploy shopify-webhook\n")
        .unwrap();
    let output = preflight(dir.path())
        .args(["deploy", "check", "--config", &path_arg(&path)])
        .output()
        .unwrap();
    let text = stdout(&output);
    assert!(output.status.success(), "{text}");
    assert!(text.contains("[FAIL] deploy.file.exists (docs/RUNBOOK.md)"));
    assert!(text.contains("Deployment check passed."));
}

/// Verifies JSON output carries the report family and outcomes.
#[test]
fn deploy_check_emits_json() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), DEPLOY_CONFIG);
    let output = preflight(dir.path())
        .args(["--format", "json", "deploy", "check", "--config", &path_arg(&path)])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["family"], "deploy");
    assert_eq!(value["outcomes"][0]["id"], "deploy.root");
}

/// Verifies a config without a deploy section is an error.
#[test]
fn deploy_check_requires_deploy_section() {
    let dir = TempDir::new().unwrap();
    let path = write_config(dir.path(), "[audit]\nenabled = false\n");
    let output = preflight(dir.path())
        .args(["deploy", "check", "--config", &path_arg(&path)])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("[deploy]"));
}

// ============================================================================
// SECTION: Lint
// ============================================================================

/// Verifies the example config lints clean and a parity gap fails.
#[test]
fn lint_exit_code_tracks_hard_failures() {
    let dir = TempDir::new().unwrap();
    let example = preflight(dir.path()).args(["config", "example"]).output().unwrap();
    let path = dir.path().join("example.toml");
    fs::write(&path, &example.stdout).unwrap();
    let output = preflight(dir.path()).args(["lint", "--config", &path_arg(&path)]).output().unwrap();
    assert!(output.status.success(), "{}", stdout(&output));

    let broken = write_config(
        dir.path(),
        r##"
[[themes]]
name = "tailwind"
light = { background = "#ffffff", hover = "#f1f5f9" }
dark = { background = "#0f172a" }
"##,
    );
    let output = preflight(dir.path())
        .args(["lint", "--only", "themes", "--config", &path_arg(&broken)])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.contains("missing in dark: hover"), "{text}");
    assert!(!text.contains("== dev_server =="));
}

// ============================================================================
// SECTION: Webhook Commands
// ============================================================================

/// Verifies `webhook sign` uses the default payload and env secret.
#[test]
fn webhook_sign_prints_known_signature() {
    let dir = TempDir::new().unwrap();
    let output = preflight(dir.path())
        .env("SHOPIFY_WEBHOOK_SECRET", SECRET)
        .args(["webhook", "sign"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), SECRET_SIGNATURE);
}

/// Verifies `webhook sign` signs a payload file.
#[test]
fn webhook_sign_reads_payload_file() {
    let dir = TempDir::new().unwrap();
    let payload = dir.path().join("order.json");
    fs::write(&payload, DEFAULT_WEBHOOK_PAYLOAD).unwrap();
    let output = preflight(dir.path())
        .env("SHOPIFY_WEBHOOK_SECRET", SECRET)
        .args(["webhook", "sign", "--payload-file", &path_arg(&payload)])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), SECRET_SIGNATURE);
}

/// Verifies a missing secret without a terminal fails closed.
#[test]
fn webhook_sign_requires_secret() {
    let dir = TempDir::new().unwrap();
    let output = preflight(dir.path()).args(["webhook", "sign"]).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("SHOPIFY_WEBHOOK_SECRET"));
    assert!(output.stdout.is_empty());
}

/// Verifies `webhook verify` exit codes for matching and forged signatures.
#[test]
fn webhook_verify_checks_signature() {
    let dir = TempDir::new().unwrap();
    let valid = preflight(dir.path())
        .env("SHOPIFY_WEBHOOK_SECRET", SECRET)
        .args(["webhook", "verify", "--signature", SECRET_SIGNATURE])
        .output()
        .unwrap();
    assert!(valid.status.success());
    assert!(stdout(&valid).contains("Signature valid."));

    let forged = preflight(dir.path())
        .env("SHOPIFY_WEBHOOK_SECRET", SECRET)
        .args(["webhook", "verify", "--signature", "invalid_hmac_signature_12345678"])
        .output()
        .unwrap();
    assert!(!forged.status.success());
}

/// Verifies `webhook test` against a compliant receiver.
#[test]
fn webhook_test_passes_against_compliant_receiver() {
    let dir = TempDir::new().unwrap();
    let (url, handle) = spawn_receiver(2);
    let path = write_config(dir.path(), &webhook_config(&url));
    let output = preflight(dir.path())
        .env("SHOPIFY_WEBHOOK_SECRET", SECRET)
        .args(["webhook", "test", "--strict", "--config", &path_arg(&path)])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}\n{}", stdout(&output), stderr(&output));
    assert_eq!(handle.join().unwrap(), 2);
    assert!(stdout(&output).contains("2 passed, 0 failed"));
}

/// Verifies `--strict` turns a wrong-secret run into a failing exit.
#[test]
fn webhook_test_strict_fails_on_rejected_signature() {
    let dir = TempDir::new().unwrap();
    let (url, handle) = spawn_receiver(2);
    let path = write_config(dir.path(), &webhook_config(&url));
    let output = preflight(dir.path())
        .env("SHOPIFY_WEBHOOK_SECRET", "wrong_secret")
        .args(["webhook", "test", "--strict", "--config", &path_arg(&path)])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert_eq!(handle.join().unwrap(), 2);
}

/// Verifies failures without `--strict` are reported but do not fail the run.
#[test]
fn webhook_test_without_strict_reports_failures() {
    let dir = TempDir::new().unwrap();
    let (url, handle) = spawn_receiver(2);
    let path = write_config(dir.path(), &webhook_config(&url));
    let output = preflight(dir.path())
        .env("SHOPIFY_WEBHOOK_SECRET", "wrong_secret")
        .args(["webhook", "test", "--config", &path_arg(&path)])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(handle.join().unwrap(), 2);
    assert!(stdout(&output).contains("--strict"));
}

// ============================================================================
// SECTION: Misc
// ============================================================================

/// Verifies `--version` prints the binary name.
#[test]
fn version_flag_prints_name() {
    let dir = TempDir::new().unwrap();
    let output = preflight(dir.path()).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("storefront-preflight "));
}

/// Verifies `diagnose` fails closed when credentials are absent.
#[test]
fn diagnose_requires_credentials() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        dir.path(),
        "[diagnose]\nbase_url = \"https://project.supabase.co\"\nemail = \
         \"admin@example.com\"\npassword_env = \"PREFLIGHT_TEST_UNSET_PASSWORD\"\nanon_key_env = \
         \"PREFLIGHT_TEST_UNSET_ANON_KEY\"\n",
    );
    let output =
        preflight(dir.path()).args(["diagnose", "--config", &path_arg(&path)]).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("PREFLIGHT_TEST_UNSET_ANON_KEY"));
}

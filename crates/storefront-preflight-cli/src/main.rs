// crates/storefront-preflight-cli/src/main.rs
// ============================================================================
// Module: Storefront Preflight CLI Entry Point
// Description: Command dispatcher for storefront verification checks.
// Purpose: Run lint, webhook, deployment, and backend checks from one binary.
// Dependencies: clap, serde, storefront-preflight-config, storefront-preflight-probes
// ============================================================================

//! ## Overview
//! The preflight CLI loads one TOML configuration, runs the requested check
//! family, prints a report, and maps hard failures to a non-zero exit code.
//! All operator-facing strings are routed through the message catalog.
//! Checks run one at a time; there is no async runtime.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::BufRead;
use std::io::IsTerminal;
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
use serde::Serialize;
use storefront_preflight_cli::t;
use storefront_preflight_config::AuditConfig;
use storefront_preflight_config::DEFAULT_WEBHOOK_PAYLOAD;
use storefront_preflight_config::DEFAULT_WEBHOOK_SECRET_ENV;
use storefront_preflight_config::MAX_WEBHOOK_PAYLOAD_BYTES;
use storefront_preflight_config::PreflightConfig;
use storefront_preflight_config::config_toml_example;
use storefront_preflight_probes::CheckOutcome;
use storefront_preflight_probes::CheckReport;
use storefront_preflight_probes::CheckStatus;
use storefront_preflight_probes::DeployProbe;
use storefront_preflight_probes::DiagnoseCredentials;
use storefront_preflight_probes::DiagnoseProbe;
use storefront_preflight_probes::Diagnosis;
use storefront_preflight_probes::DiagnosisVerdict;
use storefront_preflight_probes::FileAuditSink;
use storefront_preflight_probes::GitCommandInspector;
use storefront_preflight_probes::NoopAuditSink;
use storefront_preflight_probes::PreflightAuditSink;
use storefront_preflight_probes::StderrAuditSink;
use storefront_preflight_probes::WebhookProbe;
use storefront_preflight_probes::WebhookSecret;
use storefront_preflight_probes::lint_bundle;
use storefront_preflight_probes::lint_dev_server;
use storefront_preflight_probes::lint_themes;
use storefront_preflight_probes::sign_payload;
use storefront_preflight_probes::verify_signature;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "storefront-preflight",
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Config file path (defaults to storefront-preflight.toml or env override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Output format for reports.
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Lint theme tokens, dev-server policy, and bundle chunks.
    Lint(LintCommand),
    /// Webhook signature utilities and endpoint self-test.
    Webhook {
        /// Selected webhook subcommand.
        #[command(subcommand)]
        command: WebhookCommand,
    },
    /// Deployment shape verification.
    Deploy {
        /// Selected deploy subcommand.
        #[command(subcommand)]
        command: DeployCommand,
    },
    /// Diagnose backend login, admin profile, and product imports.
    Diagnose,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
    /// Print a canonical example configuration.
    Example,
}

/// Arguments for `lint`.
#[derive(Args, Debug)]
struct LintCommand {
    /// Run a single lint family.
    #[arg(long, value_enum, value_name = "FAMILY")]
    only: Option<LintTarget>,
}

/// Lint families selectable with `--only`.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum LintTarget {
    /// Theme token parity and hex values.
    Themes,
    /// CORS and proxy policy.
    DevServer,
    /// Manual chunk groupings.
    Bundle,
}

/// Webhook subcommands.
#[derive(Subcommand, Debug)]
enum WebhookCommand {
    /// Print the base64 HMAC-SHA256 signature of the payload.
    Sign(WebhookSignCommand),
    /// Check a captured signature against the payload.
    Verify(WebhookVerifyCommand),
    /// Deliver signed and mis-signed payloads to every endpoint.
    Test(WebhookTestCommand),
}

/// Arguments for `webhook sign`.
#[derive(Args, Debug)]
struct WebhookSignCommand {
    /// Sign this file instead of the configured payload.
    #[arg(long, value_name = "PATH")]
    payload_file: Option<PathBuf>,
}

/// Arguments for `webhook verify`.
#[derive(Args, Debug)]
struct WebhookVerifyCommand {
    /// Base64 signature taken from the HMAC header.
    #[arg(long, value_name = "SIGNATURE")]
    signature: String,
    /// Verify against this file instead of the configured payload.
    #[arg(long, value_name = "PATH")]
    payload_file: Option<PathBuf>,
}

/// Arguments for `webhook test`.
#[derive(Args, Debug)]
struct WebhookTestCommand {
    /// Exit non-zero when any endpoint check fails.
    #[arg(long, action = ArgAction::SetTrue)]
    strict: bool,
}

/// Deploy subcommands.
#[derive(Subcommand, Debug)]
enum DeployCommand {
    /// Verify deployment files and git metadata.
    Check(DeployCheckCommand),
}

/// Arguments for `deploy check`.
#[derive(Args, Debug)]
struct DeployCheckCommand {
    /// Deployment root directory.
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,
}

/// Output formats for reports.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

/// Options shared by every command.
struct Context {
    /// Explicit config path, if any.
    config: Option<PathBuf>,
    /// Selected output format.
    format: OutputFormat,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
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
    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    let context = Context {
        config: cli.config,
        format: cli.format,
    };

    match command {
        Commands::Config {
            command,
        } => command_config(&context, &command),
        Commands::Lint(command) => command_lint(&context, &command),
        Commands::Webhook {
            command,
        } => command_webhook(&context, &command),
        Commands::Deploy {
            command,
        } => command_deploy(&context, &command),
        Commands::Diagnose => command_diagnose(&context),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

impl Context {
    /// Loads and validates the configuration file.
    fn load_config(&self) -> CliResult<PreflightConfig> {
        PreflightConfig::load(self.config.as_deref())
            .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
    }

    /// Loads the configuration when one was requested or is present.
    fn load_optional_config(&self) -> CliResult<Option<PreflightConfig>> {
        PreflightConfig::load_optional(self.config.as_deref())
            .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(context: &Context, command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => {
            let _config = context.load_config()?;
            write_stdout_line(&t!("config.validate.ok"))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        ConfigCommand::Example => {
            write_stdout_bytes(config_toml_example().as_bytes())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Lint Command
// ============================================================================

/// Runs the selected lint families.
fn command_lint(context: &Context, command: &LintCommand) -> CliResult<ExitCode> {
    let config = context.load_config()?;
    let audit = audit_sink(&config.audit)?;
    let selected = |target: LintTarget| command.only.is_none_or(|only| only == target);

    let mut reports = Vec::new();
    if selected(LintTarget::Themes) {
        reports.push(lint_themes(&config.themes));
    }
    if selected(LintTarget::DevServer) {
        reports.push(lint_dev_server(&config.dev_server));
    }
    if selected(LintTarget::Bundle) {
        reports.push(lint_bundle(&config.bundle));
    }
    for report in &reports {
        audit.record_report(report);
    }

    match context.format {
        OutputFormat::Json => write_json(&reports)?,
        OutputFormat::Text => {
            for report in &reports {
                write_report_text(report)?;
            }
        }
    }
    Ok(exit_for(reports.iter().any(CheckReport::hard_failure)))
}

// ============================================================================
// SECTION: Webhook Commands
// ============================================================================

/// Dispatches webhook subcommands.
fn command_webhook(context: &Context, command: &WebhookCommand) -> CliResult<ExitCode> {
    match command {
        WebhookCommand::Sign(command) => command_webhook_sign(context, command),
        WebhookCommand::Verify(command) => command_webhook_verify(context, command),
        WebhookCommand::Test(command) => command_webhook_test(context, command),
    }
}

/// Payload and secret source for signing commands.
struct SigningInput {
    /// Raw payload bytes.
    payload: Vec<u8>,
    /// Environment variable holding the secret.
    secret_env: String,
}

/// Resolves the payload and secret variable from flags and optional config.
fn signing_input(context: &Context, payload_file: Option<&Path>) -> CliResult<SigningInput> {
    let webhook = context.load_optional_config()?.and_then(|config| config.webhook);
    let secret_env = webhook
        .as_ref()
        .map_or_else(|| DEFAULT_WEBHOOK_SECRET_ENV.to_string(), |hook| hook.secret_env.clone());
    let payload = match payload_file {
        Some(path) => read_payload_file(path)?,
        None => webhook
            .map_or_else(|| DEFAULT_WEBHOOK_PAYLOAD.to_string(), |hook| hook.payload)
            .into_bytes(),
    };
    Ok(SigningInput {
        payload,
        secret_env,
    })
}

/// Signature output for `webhook sign --format json`.
#[derive(Serialize)]
struct SignatureOutput {
    /// Base64 HMAC-SHA256 digest.
    signature: String,
    /// Payload length in bytes.
    payload_bytes: usize,
}

/// Prints the signature for the payload.
fn command_webhook_sign(context: &Context, command: &WebhookSignCommand) -> CliResult<ExitCode> {
    let input = signing_input(context, command.payload_file.as_deref())?;
    let secret = resolve_webhook_secret(&input.secret_env)?;
    let signature = sign_payload(secret.as_bytes(), &input.payload)
        .map_err(|err| CliError::new(t!("webhook.sign.failed", error = err)))?;
    match context.format {
        OutputFormat::Json => write_json(&SignatureOutput {
            signature,
            payload_bytes: input.payload.len(),
        })?,
        OutputFormat::Text => write_stdout_line(&signature)
            .map_err(|err| CliError::new(output_error("stdout", &err)))?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Verifies a captured signature against the payload.
fn command_webhook_verify(
    context: &Context,
    command: &WebhookVerifyCommand,
) -> CliResult<ExitCode> {
    let input = signing_input(context, command.payload_file.as_deref())?;
    let secret = resolve_webhook_secret(&input.secret_env)?;
    let valid = verify_signature(secret.as_bytes(), &input.payload, &command.signature);
    let message = if valid { t!("webhook.verify.match") } else { t!("webhook.verify.mismatch") };
    write_stdout_line(&message).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(exit_for(!valid))
}

/// Runs the endpoint self-test.
fn command_webhook_test(context: &Context, command: &WebhookTestCommand) -> CliResult<ExitCode> {
    let config = context.load_config()?;
    let Some(webhook) = config.webhook else {
        return Err(CliError::new(t!("config.section_missing", section = "webhook")));
    };
    let audit = audit_sink(&config.audit)?;
    let secret = resolve_webhook_secret(&webhook.secret_env)?;
    let probe = WebhookProbe::new(webhook)
        .map_err(|err| CliError::new(t!("webhook.test.init_failed", error = err)))?;
    write_stderr_line(&t!(
        "webhook.test.start",
        count = probe.config().endpoints.len()
    ))
    .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    let report = probe
        .run(&secret)
        .map_err(|err| CliError::new(t!("webhook.sign.failed", error = err)))?;
    audit.record_report(&report);

    match context.format {
        OutputFormat::Json => write_json(&report)?,
        OutputFormat::Text => {
            write_report_text(&report)?;
            if report.has_failures() && !command.strict {
                write_stdout_line(&t!("webhook.test.soft_failures"))
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
        }
    }
    Ok(exit_for(command.strict && report.has_failures()))
}

/// Reads the webhook secret from the environment or an interactive prompt.
fn resolve_webhook_secret(env_name: &str) -> CliResult<WebhookSecret> {
    let value = match std::env::var(env_name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => prompt_secret(env_name)?,
    };
    WebhookSecret::new(value)
        .map_err(|_| CliError::new(t!("webhook.secret.missing", env = env_name)))
}

/// Prompts for the secret on a terminal; fails when stdin is not interactive.
fn prompt_secret(env_name: &str) -> CliResult<String> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return Err(CliError::new(t!("webhook.secret.missing", env = env_name)));
    }
    write_stderr_inline(&t!("webhook.secret.prompt", env = env_name))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .map_err(|err| CliError::new(t!("webhook.secret.read_failed", error = err)))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Reads a payload file within the webhook payload limit.
fn read_payload_file(path: &Path) -> CliResult<Vec<u8>> {
    read_bytes_with_limit(path, MAX_WEBHOOK_PAYLOAD_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("input.read_failed", path = path.display(), error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!(
            "input.read_too_large",
            path = path.display(),
            size = size,
            limit = limit
        )),
    })
}

// ============================================================================
// SECTION: Deploy Command
// ============================================================================

/// Dispatches deploy subcommands.
fn command_deploy(context: &Context, command: &DeployCommand) -> CliResult<ExitCode> {
    match command {
        DeployCommand::Check(command) => command_deploy_check(context, command),
    }
}

/// Verifies deployment files and git metadata under the root.
fn command_deploy_check(context: &Context, command: &DeployCheckCommand) -> CliResult<ExitCode> {
    let config = context.load_config()?;
    let Some(deploy) = config.deploy.as_ref() else {
        return Err(CliError::new(t!("config.section_missing", section = "deploy")));
    };
    let audit = audit_sink(&config.audit)?;
    let git = GitCommandInspector::default();
    let probe = DeployProbe::new(deploy, &git)
        .map_err(|err| CliError::new(t!("deploy.check.init_failed", error = err)))?;
    let report = probe.run(&command.root);
    audit.record_report(&report);

    let failed = report.hard_failure();
    match context.format {
        OutputFormat::Json => write_json(&report)?,
        OutputFormat::Text => {
            write_report_text(&report)?;
            let verdict = if failed { t!("deploy.check.failed") } else { t!("deploy.check.ok") };
            write_stdout_line(&verdict)
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }
    Ok(exit_for(failed))
}

// ============================================================================
// SECTION: Diagnose Command
// ============================================================================

/// Runs the backend import diagnosis.
fn command_diagnose(context: &Context) -> CliResult<ExitCode> {
    let config = context.load_config()?;
    let Some(diagnose) = config.diagnose else {
        return Err(CliError::new(t!("config.section_missing", section = "diagnose")));
    };
    let audit = audit_sink(&config.audit)?;
    let anon_key = required_env(&diagnose.anon_key_env)?;
    let password = required_env(&diagnose.password_env)?;
    let credentials = DiagnoseCredentials::new(anon_key, password)
        .map_err(|err| CliError::new(t!("diagnose.init_failed", error = err)))?;
    let probe = DiagnoseProbe::new(diagnose)
        .map_err(|err| CliError::new(t!("diagnose.init_failed", error = err)))?;
    let diagnosis = probe.run(&credentials);
    audit.record_report(&diagnosis.report);

    match context.format {
        OutputFormat::Json => write_json(&diagnosis)?,
        OutputFormat::Text => write_diagnosis_text(&diagnosis)?,
    }
    Ok(exit_for(diagnosis.report.hard_failure()))
}

/// Reads a required, non-empty environment variable.
fn required_env(name: &str) -> CliResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CliError::new(t!("env.missing", env = name))),
    }
}

/// Writes the diagnosis report, recent products, and verdict guidance.
fn write_diagnosis_text(diagnosis: &Diagnosis) -> CliResult<()> {
    write_report_text(&diagnosis.report)?;
    let mut lines = Vec::new();
    for product in &diagnosis.products {
        lines.push(t!(
            "diagnose.product",
            name = product.name.as_deref().unwrap_or("?"),
            status = product.approval_status.as_deref().unwrap_or("?"),
            source = product.source.as_deref().unwrap_or("?"),
            created = product.created_at.as_deref().unwrap_or("?")
        ));
    }
    for log in &diagnosis.import_logs {
        lines.push(t!(
            "diagnose.import_log",
            created = log.created_at.as_deref().unwrap_or("?"),
            source = log.source.as_deref().unwrap_or("?"),
            total = log.total_products.unwrap_or(0),
            ok = log.successful_imports.unwrap_or(0),
            failed = log.failed_imports.unwrap_or(0)
        ));
    }
    lines.push(t!("diagnose.verdict", verdict = diagnosis.verdict.as_str()));
    lines.push(match diagnosis.verdict {
        DiagnosisVerdict::Healthy => t!("diagnose.hint.healthy"),
        DiagnosisVerdict::NoProducts => t!("diagnose.hint.no_products"),
        DiagnosisVerdict::NotAdmin => t!(
            "diagnose.hint.not_admin",
            user = diagnosis.user_id.as_deref().unwrap_or("?")
        ),
        DiagnosisVerdict::LoginFailed => t!("diagnose.hint.login_failed"),
    });
    for line in lines {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Builds the audit sink selected by configuration.
fn audit_sink(config: &AuditConfig) -> CliResult<Box<dyn PreflightAuditSink>> {
    if !config.enabled {
        return Ok(Box::new(NoopAuditSink));
    }
    match &config.path {
        None => Ok(Box::new(StderrAuditSink)),
        Some(path) => {
            let sink = FileAuditSink::new(path).map_err(|err| {
                CliError::new(t!("audit.open_failed", path = path.display(), error = err))
            })?;
            Ok(Box::new(sink))
        }
    }
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

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

// ============================================================================
// SECTION: Report Rendering
// ============================================================================

/// Maps a failure flag to an exit code.
const fn exit_for(failed: bool) -> ExitCode {
    if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

/// Renders one outcome as a text line.
fn render_outcome(outcome: &CheckOutcome) -> String {
    let status = match outcome.status {
        CheckStatus::Pass => t!("report.status.pass"),
        CheckStatus::Fail => t!("report.status.fail"),
        CheckStatus::Warn => t!("report.status.warn"),
        CheckStatus::Skip => t!("report.status.skip"),
    };
    match &outcome.detail {
        Some(detail) => t!(
            "report.outcome_detail",
            status = status,
            id = outcome.id,
            label = outcome.label,
            detail = detail
        ),
        None => t!("report.outcome", status = status, id = outcome.id, label = outcome.label),
    }
}

/// Renders a report as text lines (header, outcomes, summary).
fn render_report(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![t!("report.header", family = report.family.as_str())];
    lines.extend(report.outcomes.iter().map(render_outcome));
    let summary = report.summary();
    lines.push(t!(
        "report.summary",
        passed = summary.passed,
        failed = summary.failed,
        warned = summary.warned,
        skipped = summary.skipped
    ));
    lines
}

/// Writes a report as text to stdout.
fn write_report_text(report: &CheckReport) -> CliResult<()> {
    for line in render_report(report) {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes pretty JSON to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.json_failed", error = err)))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

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

/// Writes a prompt to stderr without a newline.
fn write_stderr_inline(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    write!(&mut stderr, "{message}")?;
    stderr.flush()
}

/// Formats an output error message.
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

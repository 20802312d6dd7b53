// crates/storefront-preflight-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Message catalog and placeholder substitution for CLI output.
// Purpose: Keep every operator-facing string in one table.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! Runtime output from the preflight CLI is routed through the
//! [`t!`](crate::t) macro, which looks up a template by key and substitutes
//! `{placeholder}` arguments. Unknown keys render as the key itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// Placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// Formatted value substituted for the placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries.
const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "storefront-preflight {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.json_failed", "Failed to render JSON output: {error}"),
    ("input.read_failed", "Failed to read {path}: {error}"),
    (
        "input.read_too_large",
        "Refusing to read {path} because it is {size} bytes (limit {limit}).",
    ),
    ("env.missing", "Environment variable {env} is not set."),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("config.section_missing", "Config has no [{section}] section."),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("report.header", "== {family} =="),
    ("report.status.pass", "PASS"),
    ("report.status.fail", "FAIL"),
    ("report.status.warn", "WARN"),
    ("report.status.skip", "SKIP"),
    ("report.outcome", "[{status}] {id} ({label})"),
    ("report.outcome_detail", "[{status}] {id} ({label}): {detail}"),
    (
        "report.summary",
        "{passed} passed, {failed} failed, {warned} warnings, {skipped} skipped",
    ),
    (
        "webhook.secret.missing",
        "Webhook secret is required: set {env} or run from a terminal to be prompted.",
    ),
    ("webhook.secret.prompt", "Webhook secret ({env}): "),
    ("webhook.secret.read_failed", "Failed to read webhook secret: {error}"),
    ("webhook.sign.failed", "Failed to sign payload: {error}"),
    ("webhook.verify.match", "Signature valid."),
    ("webhook.verify.mismatch", "Signature does not match payload."),
    ("webhook.test.init_failed", "Invalid webhook configuration: {error}"),
    ("webhook.test.start", "Testing {count} webhook endpoint(s)..."),
    (
        "webhook.test.soft_failures",
        "Some endpoints failed; rerun with --strict to fail the command.",
    ),
    ("deploy.check.init_failed", "Invalid deploy configuration: {error}"),
    ("deploy.check.ok", "Deployment check passed."),
    ("deploy.check.failed", "Deployment check failed: required items are missing."),
    ("diagnose.init_failed", "Cannot start diagnosis: {error}"),
    ("diagnose.product", "  {name} [{status}] source={source} created={created}"),
    (
        "diagnose.import_log",
        "  import {created} source={source}: {ok}/{total} imported, {failed} failed",
    ),
    ("diagnose.verdict", "Verdict: {verdict}"),
    ("diagnose.hint.healthy", "Products are present and the user is an admin."),
    (
        "diagnose.hint.no_products",
        "No products found. Check the import function logs and table permissions.",
    ),
    (
        "diagnose.hint.not_admin",
        "User {user} is not an admin. Set is_admin = true on their user_profiles row.",
    ),
    (
        "diagnose.hint.login_failed",
        "Login failed. Check the email, password, and anon key.",
    ),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key` using the catalog while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

/// Returns the static catalog.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
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

// crates/storefront-preflight-probes/tests/config_lint.rs
// ============================================================================
// Module: Configuration Lint Tests
// Description: Theme parity, CORS coverage, proxy, and bundle chunk lints.
// Purpose: Validate lint outcomes for the build configuration surface.
// Dependencies: storefront-preflight-probes, storefront-preflight-config
// ============================================================================

//! ## Overview
//! Lints run over parsed configuration values. The canonical example config
//! must lint clean; targeted mutations must surface the matching outcome.

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

use std::collections::BTreeMap;

use storefront_preflight_config::BundleConfig;
use storefront_preflight_config::PreflightConfig;
use storefront_preflight_config::ProxyRouteConfig;
use storefront_preflight_config::ThemeConfig;
use storefront_preflight_config::config_toml_example;
use storefront_preflight_probes::CheckSeverity;
use storefront_preflight_probes::CheckStatus;
use storefront_preflight_probes::lint_bundle;
use storefront_preflight_probes::lint_dev_server;
use storefront_preflight_probes::lint_themes;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn example() -> PreflightConfig {
    PreflightConfig::from_toml_str(&config_toml_example()).unwrap()
}

fn tokens(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

fn theme(name: &str, light: &[(&str, &str)], dark: &[(&str, &str)]) -> ThemeConfig {
    ThemeConfig {
        name: name.to_string(),
        light: tokens(light),
        dark: tokens(dark),
    }
}

// ============================================================================
// SECTION: Example Config
// ============================================================================

/// The canonical example passes every lint.
#[test]
fn example_config_lints_clean() {
    let config = example();
    for report in [
        lint_themes(&config.themes),
        lint_dev_server(&config.dev_server),
        lint_bundle(&config.bundle),
    ] {
        assert!(!report.has_failures(), "{report:?}");
        assert_eq!(report.summary().warned, 0, "{report:?}");
    }
}

// ============================================================================
// SECTION: Themes
// ============================================================================

/// Light and dark variants must define the same roles.
#[test]
fn key_parity_reports_missing_roles() {
    let report = lint_themes(&[theme(
        "tailwind.config.js",
        &[("background", "#ffffff"), ("hover", "#f3f4f6")],
        &[("background", "#0f172a"), ("active", "#1e293b")],
    )]);
    let parity = report.outcome("themes.tailwind.config.js.key_parity").unwrap();
    assert!(parity.is_hard_failure());
    assert_eq!(
        parity.detail.as_deref(),
        Some("missing in dark: hover; missing in light: active")
    );
}

/// Matching key sets pass parity.
#[test]
fn key_parity_passes_for_identical_key_sets() {
    let report = lint_themes(&[theme(
        "tokens",
        &[("background", "#fff"), ("border", "#e5e7eb")],
        &[("background", "#000"), ("border", "#334155")],
    )]);
    assert_eq!(report.outcome("themes.tokens.key_parity").unwrap().status, CheckStatus::Pass);
    assert!(!report.has_failures());
}

/// Non-hex values fail the value check.
#[test]
fn non_hex_values_fail() {
    let report = lint_themes(&[theme(
        "tokens",
        &[("background", "white")],
        &[("background", "#0f172a")],
    )]);
    let hex = report.outcome("themes.tokens.hex_values").unwrap();
    assert_eq!(hex.status, CheckStatus::Fail);
    assert!(hex.detail.as_deref().unwrap().contains("light.background=white"));
}

/// An empty variant fails even when parity trivially holds.
#[test]
fn empty_variants_fail() {
    let report = lint_themes(&[theme("tokens", &[], &[])]);
    let present = report.outcome("themes.tokens.variants_present").unwrap();
    assert_eq!(present.detail.as_deref(), Some("empty variant: light, dark"));
    assert!(report.hard_failure());
}

/// Differing values across theme sets warn without failing.
#[test]
fn drift_between_theme_sets_warns() {
    let report = lint_themes(&[
        theme("js", &[("surface", "#f9fafb")], &[("surface", "#1e293b")]),
        theme("ts", &[("surface", "#F9FAFB")], &[("surface", "#111827")]),
    ]);
    let drift = report.outcome("themes.drift").unwrap();
    assert_eq!(drift.status, CheckStatus::Warn);
    assert_eq!(drift.severity, CheckSeverity::Soft);
    assert_eq!(drift.detail.as_deref(), Some("roles differ between theme sets: dark.surface"));
    assert!(!report.has_failures());
}

/// No themes configured is a skip.
#[test]
fn no_themes_is_skipped() {
    let report = lint_themes(&[]);
    assert_eq!(report.summary().skipped, 1);
}

// ============================================================================
// SECTION: Dev Server
// ============================================================================

/// Every required method must be allowed.
#[test]
fn missing_cors_methods_fail() {
    let mut config = example().dev_server;
    config.cors.allowed_methods = vec!["get".to_string(), "POST".to_string()];
    let report = lint_dev_server(&config);
    let methods = report.outcome("dev_server.cors.methods").unwrap();
    assert!(methods.is_hard_failure());
    assert_eq!(methods.detail.as_deref(), Some("missing methods: PUT, DELETE, OPTIONS"));
}

/// Header matching ignores case.
#[test]
fn cors_headers_match_case_insensitively() {
    let mut config = example().dev_server;
    config.cors.allowed_headers = vec!["authorization".to_string(), "CONTENT-TYPE".to_string()];
    let report = lint_dev_server(&config);
    assert_eq!(report.outcome("dev_server.cors.headers").unwrap().status, CheckStatus::Pass);

    config.cors.allowed_headers = vec!["Content-Type".to_string()];
    let report = lint_dev_server(&config);
    let headers = report.outcome("dev_server.cors.headers").unwrap();
    assert_eq!(headers.detail.as_deref(), Some("missing headers: Authorization"));
}

/// Served origins missing from the allow list fail.
#[test]
fn uncovered_served_origin_fails() {
    let mut config = example().dev_server;
    config.cors.served_origins.push("https://preview.example.com".to_string());
    let report = lint_dev_server(&config);
    let origins = report.outcome("dev_server.cors.origins").unwrap();
    assert_eq!(
        origins.detail.as_deref(),
        Some("served origins not allowed: https://preview.example.com")
    );
}

/// Origin comparison ignores case and trailing slashes.
#[test]
fn origin_coverage_normalizes() {
    let mut config = example().dev_server;
    config.cors.allowed_origins = vec!["HTTPS://Shop.Example.com/".to_string()];
    config.cors.served_origins = vec!["https://shop.example.com".to_string()];
    let report = lint_dev_server(&config);
    assert_eq!(report.outcome("dev_server.cors.origins").unwrap().status, CheckStatus::Pass);
}

/// A wildcard origin cannot be combined with credentials.
#[test]
fn wildcard_with_credentials_fails() {
    let mut config = example().dev_server;
    config.cors.allowed_origins = vec!["*".to_string()];
    config.cors.allow_credentials = true;
    let report = lint_dev_server(&config);
    assert!(report.outcome("dev_server.cors.origins").unwrap().is_hard_failure());

    config.cors.allow_credentials = false;
    let report = lint_dev_server(&config);
    assert_eq!(report.outcome("dev_server.cors.origins").unwrap().status, CheckStatus::Pass);
}

/// Duplicate proxy prefixes fail; nested prefixes warn.
#[test]
fn proxy_prefix_rules() {
    let route = |prefix: &str| ProxyRouteConfig {
        prefix: prefix.to_string(),
        target: "http://localhost:54321".to_string(),
        change_origin: true,
    };
    let mut config = example().dev_server;
    config.proxy = vec![route("/api"), route("/api/")];
    let report = lint_dev_server(&config);
    let prefixes = report.outcome("dev_server.proxy.prefixes").unwrap();
    assert_eq!(prefixes.detail.as_deref(), Some("duplicate prefixes: /api"));

    config.proxy = vec![route("/api"), route("/api/admin")];
    let report = lint_dev_server(&config);
    assert_eq!(report.outcome("dev_server.proxy.overlap").unwrap().status, CheckStatus::Warn);
    assert!(!report.has_failures());
}

// ============================================================================
// SECTION: Bundle
// ============================================================================

/// A module listed in two chunks fails.
#[test]
fn shared_module_fails() {
    let mut manual_chunks = BTreeMap::new();
    manual_chunks.insert("vendor".to_string(), vec!["react".to_string(), "react-dom".to_string()]);
    manual_chunks.insert("ui".to_string(), vec!["react".to_string()]);
    let report = lint_bundle(&BundleConfig {
        manual_chunks,
    });
    let disjoint = report.outcome("bundle.disjoint_modules").unwrap();
    assert_eq!(disjoint.detail.as_deref(), Some("modules in several chunks: react in ui+vendor"));
}

/// Empty chunks fail.
#[test]
fn empty_chunk_fails() {
    let mut manual_chunks = BTreeMap::new();
    manual_chunks.insert("charts".to_string(), Vec::new());
    let report = lint_bundle(&BundleConfig {
        manual_chunks,
    });
    assert!(report.outcome("bundle.chunks_non_empty").unwrap().is_hard_failure());
}

// crates/storefront-preflight-probes/src/dev_server.rs
// ============================================================================
// Module: Dev Server and Bundle Lint
// Description: CORS coverage, proxy route sanity, and manual chunk checks.
// Purpose: Flag build configuration that breaks the storefront client-side.
// Dependencies: storefront-preflight-config
// ============================================================================

//! ## Overview
//! The storefront calls its API through a development proxy and directly
//! from the served origins in production. The CORS policy must allow the
//! methods and headers the client sends, and must list every origin the
//! storefront is served from; any gap surfaces as a browser-side failure.
//!
//! Bundle checks keep manual chunk groupings well formed: each chunk lists
//! at least one module and a module belongs to at most one chunk.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use storefront_preflight_config::BundleConfig;
use storefront_preflight_config::CorsConfig;
use storefront_preflight_config::DevServerConfig;
use storefront_preflight_config::ProxyRouteConfig;
use storefront_preflight_config::normalize_origin;

use crate::report::CheckFamily;
use crate::report::CheckOutcome;
use crate::report::CheckReport;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Methods the storefront client issues.
pub const REQUIRED_CORS_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "OPTIONS"];

/// Request headers the storefront client sends.
pub const REQUIRED_CORS_HEADERS: [&str; 2] = ["Authorization", "Content-Type"];

// ============================================================================
// SECTION: Dev Server
// ============================================================================

/// Lints the proxy routes and CORS policy.
#[must_use]
pub fn lint_dev_server(config: &DevServerConfig) -> CheckReport {
    let mut report = CheckReport::new(CheckFamily::DevServer);
    report.push(methods_outcome(&config.cors));
    report.push(headers_outcome(&config.cors));
    report.push(origins_outcome(&config.cors));
    report.push(prefixes_outcome(&config.proxy));
    if let Some(overlap) = overlap_outcome(&config.proxy) {
        report.push(overlap);
    }
    report
}

/// Checks that every method the client issues is allowed.
fn methods_outcome(cors: &CorsConfig) -> CheckOutcome {
    let outcome = CheckOutcome::hard("dev_server.cors.methods", "CORS allowed methods");
    let allowed: BTreeSet<String> =
        cors.allowed_methods.iter().map(|method| method.trim().to_ascii_uppercase()).collect();
    let missing: Vec<&str> = REQUIRED_CORS_METHODS
        .into_iter()
        .filter(|method| !allowed.contains(*method))
        .collect();
    if missing.is_empty() {
        outcome.pass()
    } else {
        outcome.fail(format!("missing methods: {}", missing.join(", ")))
    }
}

/// Checks that the client request headers are allowed.
fn headers_outcome(cors: &CorsConfig) -> CheckOutcome {
    let outcome = CheckOutcome::hard("dev_server.cors.headers", "CORS allowed headers");
    let allowed: BTreeSet<String> =
        cors.allowed_headers.iter().map(|header| header.trim().to_ascii_lowercase()).collect();
    if allowed.contains("*") && !cors.allow_credentials {
        return outcome.with_detail("all headers allowed");
    }
    let missing: Vec<&str> = REQUIRED_CORS_HEADERS
        .into_iter()
        .filter(|header| !allowed.contains(&header.to_ascii_lowercase()))
        .collect();
    if missing.is_empty() {
        outcome.pass()
    } else {
        outcome.fail(format!("missing headers: {}", missing.join(", ")))
    }
}

/// Checks that every served origin is allowed.
fn origins_outcome(cors: &CorsConfig) -> CheckOutcome {
    let outcome = CheckOutcome::hard("dev_server.cors.origins", "CORS allowed origins");
    if cors.allowed_origins.is_empty() {
        return outcome.fail("no allowed origins configured");
    }
    let wildcard = cors.allowed_origins.iter().any(|origin| origin.trim() == "*");
    if wildcard && cors.allow_credentials {
        return outcome.fail("wildcard origin cannot be combined with credentials");
    }
    if wildcard {
        return outcome.with_detail("any origin allowed");
    }
    let allowed: BTreeSet<String> =
        cors.allowed_origins.iter().map(|origin| normalize_origin(origin)).collect();
    let uncovered: Vec<&str> = cors
        .served_origins
        .iter()
        .filter(|origin| !allowed.contains(&normalize_origin(origin)))
        .map(String::as_str)
        .collect();
    if uncovered.is_empty() {
        outcome.pass()
    } else {
        outcome.fail(format!("served origins not allowed: {}", uncovered.join(", ")))
    }
}

/// Fails on duplicate proxy prefixes.
fn prefixes_outcome(routes: &[ProxyRouteConfig]) -> CheckOutcome {
    let outcome = CheckOutcome::hard("dev_server.proxy.prefixes", "proxy route prefixes");
    if routes.is_empty() {
        return outcome.skip("no proxy routes configured");
    }
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for route in routes {
        let prefix = normalize_prefix(&route.prefix);
        if !seen.insert(prefix.clone()) {
            duplicates.insert(prefix);
        }
    }
    if duplicates.is_empty() {
        outcome.pass()
    } else {
        outcome.fail(format!(
            "duplicate prefixes: {}",
            duplicates.into_iter().collect::<Vec<_>>().join(", ")
        ))
    }
}

/// Warns when one prefix shadows another (`/api` and `/api/v2`).
fn overlap_outcome(routes: &[ProxyRouteConfig]) -> Option<CheckOutcome> {
    let prefixes: BTreeSet<String> =
        routes.iter().map(|route| normalize_prefix(&route.prefix)).collect();
    let mut overlaps = Vec::new();
    for outer in &prefixes {
        for inner in &prefixes {
            if outer != inner && inner.starts_with(&format!("{outer}/")) {
                overlaps.push(format!("{outer} shadows {inner}"));
            }
        }
    }
    if overlaps.is_empty() {
        return None;
    }
    Some(
        CheckOutcome::soft("dev_server.proxy.overlap", "proxy route overlap")
            .warn(overlaps.join(", ")),
    )
}

/// Trims whitespace and trailing slashes from a prefix.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() }
}

// ============================================================================
// SECTION: Bundle
// ============================================================================

/// Lints manual chunk groupings.
#[must_use]
pub fn lint_bundle(config: &BundleConfig) -> CheckReport {
    let mut report = CheckReport::new(CheckFamily::Bundle);
    if config.manual_chunks.is_empty() {
        report.push(
            CheckOutcome::soft("bundle.manual_chunks", "manual chunks")
                .skip("no manual chunks configured"),
        );
        return report;
    }

    let empty: Vec<&str> = config
        .manual_chunks
        .iter()
        .filter(|(_, modules)| modules.iter().all(|module| module.trim().is_empty()))
        .map(|(name, _)| name.as_str())
        .collect();
    let non_empty = CheckOutcome::hard("bundle.chunks_non_empty", "chunks list modules");
    report.push(if empty.is_empty() {
        non_empty.pass()
    } else {
        non_empty.fail(format!("empty chunks: {}", empty.join(", ")))
    });

    let blank = config
        .manual_chunks
        .values()
        .flatten()
        .filter(|module| module.trim().is_empty())
        .count();
    let specifiers = CheckOutcome::soft("bundle.module_specifiers", "module specifiers");
    report.push(if blank == 0 {
        specifiers.pass()
    } else {
        specifiers.warn(format!("{blank} blank module specifier(s)"))
    });

    let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (chunk, modules) in &config.manual_chunks {
        let unique: BTreeSet<&str> =
            modules.iter().map(|module| module.trim()).filter(|m| !m.is_empty()).collect();
        for module in unique {
            owners.entry(module).or_default().push(chunk.as_str());
        }
    }
    let shared: Vec<String> = owners
        .into_iter()
        .filter(|(_, chunks)| chunks.len() > 1)
        .map(|(module, chunks)| format!("{module} in {}", chunks.join("+")))
        .collect();
    let disjoint = CheckOutcome::hard("bundle.disjoint_modules", "modules in one chunk");
    report.push(if shared.is_empty() {
        disjoint.pass()
    } else {
        disjoint.fail(format!("modules in several chunks: {}", shared.join(", ")))
    });
    report
}

// ============================================================================
// SECTION: Tests
// ============================================================================

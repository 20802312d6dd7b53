// crates/storefront-preflight-probes/src/lib.rs
// ============================================================================
// Module: Storefront Preflight Probes
// Description: Built-in preflight checks and the shared report model.
// Purpose: Verify storefront configuration and deployments with typed checks.
// Dependencies: storefront-preflight-config, reqwest, hmac, sha2, serde
// ============================================================================

//! ## Overview
//! This crate ships the preflight check families (theme tokens, dev-server
//! policy, bundle chunks, webhook signatures, deployment shape, backend
//! diagnosis) and the [`CheckReport`] model they share. Checks run
//! sequentially with one blocking call at a time.
//! Invariants:
//! - Check failures are reported as [`CheckOutcome`] data, never as errors.
//! - [`ProbeError`] is reserved for failed preconditions (bad config,
//!   missing secret, client construction).
//! - Secrets never appear in report details or audit events.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod deploy;
pub mod dev_server;
pub mod diagnose;
pub mod error;
pub mod git;
pub(crate) mod http;
pub mod report;
pub mod signature;
pub mod theme;
pub mod webhook;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::CheckAuditEvent;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::PreflightAuditSink;
pub use audit::StderrAuditSink;
pub use deploy::DeployProbe;
pub use dev_server::lint_bundle;
pub use dev_server::lint_dev_server;
pub use diagnose::DiagnoseCredentials;
pub use diagnose::DiagnoseProbe;
pub use diagnose::Diagnosis;
pub use diagnose::DiagnosisVerdict;
pub use error::ProbeError;
pub use git::AheadBehind;
pub use git::GitCommandInspector;
pub use git::GitInspector;
pub use report::CheckFamily;
pub use report::CheckOutcome;
pub use report::CheckReport;
pub use report::CheckSeverity;
pub use report::CheckStatus;
pub use report::ReportSummary;
pub use signature::sign_payload;
pub use signature::verify_signature;
pub use theme::lint_themes;
pub use webhook::WebhookProbe;
pub use webhook::WebhookSecret;


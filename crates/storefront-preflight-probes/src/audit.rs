// crates/storefront-preflight-probes/src/audit.rs
// ============================================================================
// Module: Preflight Audit Logging
// Description: Structured audit events for check outcomes.
// Purpose: Emit JSON-lines audit records without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines the audit event payload and sinks used to record check
//! outcomes. Sinks write one JSON object per line so operators can route the
//! stream into their own log pipeline. Details never carry secret material.

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

use serde::Serialize;

use crate::report::CheckFamily;
use crate::report::CheckOutcome;
use crate::report::CheckReport;
use crate::report::CheckSeverity;
use crate::report::CheckStatus;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event recorded for each check outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CheckAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Check family.
    pub family: CheckFamily,
    /// Check identifier.
    pub check_id: String,
    /// Check status.
    pub status: CheckStatus,
    /// Check severity.
    pub severity: CheckSeverity,
    /// Optional outcome detail.
    pub detail: Option<String>,
}

impl CheckAuditEvent {
    /// Creates an audit event from an outcome with a consistent timestamp.
    #[must_use]
    pub fn from_outcome(family: CheckFamily, outcome: &CheckOutcome) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "preflight_check",
            timestamp_ms,
            family,
            check_id: outcome.id.clone(),
            status: outcome.status,
            severity: outcome.severity,
            detail: outcome.detail.clone(),
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for check outcome events.
pub trait PreflightAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &CheckAuditEvent);

    /// Record every outcome of a report in order.
    fn record_report(&self, report: &CheckReport) {
        for outcome in &report.outcomes {
            self.record(&CheckAuditEvent::from_outcome(report.family, outcome));
        }
    }
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl PreflightAuditSink for StderrAuditSink {
    fn record(&self, event: &CheckAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl PreflightAuditSink for FileAuditSink {
    fn record(&self, event: &CheckAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl PreflightAuditSink for NoopAuditSink {
    fn record(&self, _event: &CheckAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

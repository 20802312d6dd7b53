// crates/storefront-preflight-probes/src/report.rs
// ============================================================================
// Module: Check Reports
// Description: Outcome and report types shared by every check family.
// Purpose: Accumulate per-check pass/fail results with hard/soft severity.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every check family produces a [`CheckReport`]: an ordered list of
//! [`CheckOutcome`] values. A failed outcome with [`CheckSeverity::Hard`]
//! marks a failed precondition; soft failures let the operator continue with
//! the next independent check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Check family that produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckFamily {
    /// Theme token lint.
    Themes,
    /// Dev-server proxy and CORS lint.
    DevServer,
    /// Bundle chunk lint.
    Bundle,
    /// Webhook HMAC self-test.
    Webhook,
    /// Deployment shape verification.
    Deploy,
    /// Backend import diagnosis.
    Diagnose,
}

impl CheckFamily {
    /// Returns the stable label for this family.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Themes => "themes",
            Self::DevServer => "dev_server",
            Self::Bundle => "bundle",
            Self::Webhook => "webhook",
            Self::Deploy => "deploy",
            Self::Diagnose => "diagnose",
        }
    }
}

/// Result of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Check succeeded.
    Pass,
    /// Check failed.
    Fail,
    /// Check found something worth attention that does not fail the run.
    Warn,
    /// Check did not run.
    Skip,
}

impl CheckStatus {
    /// Returns the stable label for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warn => "warn",
            Self::Skip => "skip",
        }
    }
}

/// Whether a failed check aborts the run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckSeverity {
    /// Failure makes the run fail (non-zero exit).
    Hard,
    /// Failure is reported; the run continues.
    Soft,
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Stable check identifier (dotted).
    pub id: String,
    /// Human-readable subject of the check.
    pub label: String,
    /// Check result.
    pub status: CheckStatus,
    /// Severity applied when the check fails.
    pub severity: CheckSeverity,
    /// Optional detail explaining the result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckOutcome {
    /// Starts a hard check that passes until marked otherwise.
    #[must_use]
    pub fn hard(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, CheckSeverity::Hard)
    }

    /// Starts a soft check that passes until marked otherwise.
    #[must_use]
    pub fn soft(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, CheckSeverity::Soft)
    }

    /// Starts a check with explicit severity.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, severity: CheckSeverity) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            status: CheckStatus::Pass,
            severity,
            detail: None,
        }
    }

    /// Marks the check as passed.
    #[must_use]
    pub fn pass(mut self) -> Self {
        self.status = CheckStatus::Pass;
        self
    }

    /// Marks the check as failed with a detail message.
    #[must_use]
    pub fn fail(mut self, detail: impl Into<String>) -> Self {
        self.status = CheckStatus::Fail;
        self.detail = Some(detail.into());
        self
    }

    /// Marks the check as a warning with a detail message.
    #[must_use]
    pub fn warn(mut self, detail: impl Into<String>) -> Self {
        self.status = CheckStatus::Warn;
        self.detail = Some(detail.into());
        self
    }

    /// Marks the check as skipped with a reason.
    #[must_use]
    pub fn skip(mut self, reason: impl Into<String>) -> Self {
        self.status = CheckStatus::Skip;
        self.detail = Some(reason.into());
        self
    }

    /// Attaches an informational detail without changing status.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Returns true when this outcome is a hard failure.
    #[must_use]
    pub fn is_hard_failure(&self) -> bool {
        self.status == CheckStatus::Fail && self.severity == CheckSeverity::Hard
    }
}

/// Counts of outcomes by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Passed checks.
    pub passed: usize,
    /// Failed checks (hard and soft).
    pub failed: usize,
    /// Warnings.
    pub warned: usize,
    /// Skipped checks.
    pub skipped: usize,
}

/// Ordered outcomes produced by one check family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Family that produced the outcomes.
    pub family: CheckFamily,
    /// Outcomes in execution order.
    pub outcomes: Vec<CheckOutcome>,
}

impl CheckReport {
    /// Creates an empty report for a family.
    #[must_use]
    pub const fn new(family: CheckFamily) -> Self {
        Self {
            family,
            outcomes: Vec::new(),
        }
    }

    /// Appends an outcome.
    pub fn push(&mut self, outcome: CheckOutcome) {
        self.outcomes.push(outcome);
    }

    /// Returns the outcome with the given identifier, if any.
    #[must_use]
    pub fn outcome(&self, id: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|outcome| outcome.id == id)
    }

    /// Summarizes outcomes by status.
    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for outcome in &self.outcomes {
            match outcome.status {
                CheckStatus::Pass => summary.passed += 1,
                CheckStatus::Fail => summary.failed += 1,
                CheckStatus::Warn => summary.warned += 1,
                CheckStatus::Skip => summary.skipped += 1,
            }
        }
        summary
    }

    /// Returns true when any outcome failed (hard or soft).
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|outcome| outcome.status == CheckStatus::Fail)
    }

    /// Returns true when any hard outcome failed.
    #[must_use]
    pub fn hard_failure(&self) -> bool {
        self.outcomes.iter().any(CheckOutcome::is_hard_failure)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

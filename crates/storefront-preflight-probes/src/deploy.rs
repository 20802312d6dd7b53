// crates/storefront-preflight-probes/src/deploy.rs
// ============================================================================
// Module: Deployment Shape Verification
// Description: File presence, literal content, and git metadata checks.
// Purpose: Confirm a checkout contains what a deployment needs.
// Dependencies: storefront-preflight-config
// ============================================================================

//! ## Overview
//! The deployment probe walks the configured file rules relative to a root
//! directory. Each rule yields an existence outcome plus one outcome per
//! required substring. Files are read as bytes and searched literally; they
//! are never parsed or executed. Required rules are hard, optional rules are
//! soft. Git metadata checks follow when configured.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use storefront_preflight_config::DeployConfig;
use storefront_preflight_config::DeployFileConfig;
use storefront_preflight_config::GitCheckConfig;

use crate::error::ProbeError;
use crate::git::GitInspector;
use crate::report::CheckFamily;
use crate::report::CheckOutcome;
use crate::report::CheckReport;
use crate::report::CheckSeverity;

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Deployment shape probe.
pub struct DeployProbe<'a> {
    /// Deployment rules.
    config: &'a DeployConfig,
    /// Git metadata source.
    git: &'a dyn GitInspector,
}

impl<'a> DeployProbe<'a> {
    /// Creates a probe after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Config`] when the configuration is invalid.
    pub fn new(config: &'a DeployConfig, git: &'a dyn GitInspector) -> Result<Self, ProbeError> {
        config.validate()?;
        Ok(Self {
            config,
            git,
        })
    }

    /// Runs every file and git check against `root`.
    #[must_use]
    pub fn run(&self, root: &Path) -> CheckReport {
        let mut report = CheckReport::new(CheckFamily::Deploy);
        let root_outcome = CheckOutcome::hard("deploy.root", root.display().to_string());
        if !root.is_dir() {
            report.push(root_outcome.fail("deployment root is not a directory"));
            return report;
        }
        report.push(root_outcome.pass());
        for rule in &self.config.files {
            self.check_file(root, rule, &mut report);
        }
        if let Some(git) = &self.config.git {
            self.check_git(root, git, &mut report);
        }
        report
    }

    /// Checks existence and literal content for one file rule.
    fn check_file(&self, root: &Path, rule: &DeployFileConfig, report: &mut CheckReport) {
        let severity = if rule.required { CheckSeverity::Hard } else { CheckSeverity::Soft };
        let path = root.join(rule.path.trim());
        let exists = CheckOutcome::new("deploy.file.exists", rule.path.clone(), severity);
        let contents = if path.is_file() {
            report.push(exists.pass());
            Some(self.read_limited(&path))
        } else if path.exists() {
            report.push(exists.fail("path exists but is not a regular file"));
            None
        } else {
            report.push(exists.fail("file not found"));
            None
        };

        for needle in &rule.contains {
            let outcome = CheckOutcome::new(
                "deploy.file.contains",
                format!("{} contains {needle:?}", rule.path),
                severity,
            );
            let outcome = match &contents {
                None => outcome.skip("file missing"),
                Some(Err(reason)) => outcome.fail(reason.clone()),
                Some(Ok(bytes)) if contains_bytes(bytes, needle.as_bytes()) => outcome.pass(),
                Some(Ok(_)) => outcome.fail("substring not found"),
            };
            report.push(outcome);
        }
    }

    /// Reads a file if it fits within the configured limit.
    fn read_limited(&self, path: &Path) -> Result<Vec<u8>, String> {
        let size = fs::metadata(path).map_err(|err| format!("cannot stat file: {err}"))?.len();
        let limit = u64::try_from(self.config.max_file_bytes).unwrap_or(u64::MAX);
        if size > limit {
            return Err(format!("file is {size} bytes, above read limit {limit}"));
        }
        fs::read(path).map_err(|err| format!("cannot read file: {err}"))
    }

    /// Checks branch, remote, and upstream divergence.
    fn check_git(&self, root: &Path, git: &GitCheckConfig, report: &mut CheckReport) {
        let severity = if git.required { CheckSeverity::Hard } else { CheckSeverity::Soft };

        let branch = CheckOutcome::new("deploy.git.branch", "current branch", severity);
        report.push(match (self.git.current_branch(root), &git.expected_branch) {
            (Err(err), _) => branch.fail(err.to_string()),
            (Ok(actual), Some(expected)) if &actual == expected => branch.with_detail(actual),
            (Ok(actual), Some(expected)) => {
                branch.fail(format!("on {actual}, expected {expected}"))
            }
            (Ok(actual), None) => branch.with_detail(actual),
        });

        let remote =
            CheckOutcome::new("deploy.git.remote", format!("remote {}", git.remote), severity);
        report.push(match (self.git.remote_url(root, &git.remote), &git.expected_remote) {
            (Err(err), _) => remote.fail(err.to_string()),
            (Ok(url), Some(expected)) if url.contains(expected.as_str()) => remote.with_detail(url),
            (Ok(url), Some(expected)) => remote.fail(format!("{url} does not contain {expected}")),
            (Ok(url), None) => remote.with_detail(url),
        });

        let upstream = CheckOutcome::new("deploy.git.upstream", "upstream sync", severity);
        report.push(match self.git.ahead_behind(root) {
            Err(err) => upstream.fail(err.to_string()),
            Ok(None) if git.require_in_sync => upstream.fail("no upstream branch configured"),
            Ok(None) => upstream.warn("no upstream branch configured"),
            Ok(Some(counts)) if counts.in_sync() => upstream.with_detail("up to date"),
            Ok(Some(counts)) => {
                let detail = format!("ahead {}, behind {}", counts.ahead, counts.behind);
                if git.require_in_sync { upstream.fail(detail) } else { upstream.warn(detail) }
            }
        });
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when `needle` occurs in `haystack`.
fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_bytes_finds_literal_substrings() {
        assert!(contains_bytes(b"supabase functions deploy", b"functions"));
        assert!(!contains_bytes(b"supabase", b"supabase functions"));
        assert!(contains_bytes(b"", b""));
    }
}

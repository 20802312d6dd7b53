// crates/storefront-preflight-probes/src/git.rs
// ============================================================================
// Module: Git Metadata
// Description: Reads branch, remote, and upstream divergence for a checkout.
// Purpose: Feed deployment shape checks without coupling them to a process.
// Dependencies: std::process
// ============================================================================

//! ## Overview
//! [`GitInspector`] is the seam between the deployment probe and the git
//! repository. [`GitCommandInspector`] shells out to the `git` binary, one
//! blocking command at a time; tests substitute an in-memory inspector.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use crate::error::ProbeError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Commits ahead of and behind the upstream branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AheadBehind {
    /// Local commits not on upstream.
    pub ahead: u32,
    /// Upstream commits not present locally.
    pub behind: u32,
}

impl AheadBehind {
    /// Returns true when local and upstream point at the same history.
    #[must_use]
    pub const fn in_sync(self) -> bool {
        self.ahead == 0 && self.behind == 0
    }
}

/// Source of git metadata for a checkout.
pub trait GitInspector {
    /// Returns the current branch name (`HEAD` when detached).
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the metadata cannot be read.
    fn current_branch(&self, root: &Path) -> Result<String, ProbeError>;

    /// Returns the URL configured for `remote`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the remote is missing or unreadable.
    fn remote_url(&self, root: &Path, remote: &str) -> Result<String, ProbeError>;

    /// Returns divergence from upstream, or `None` without an upstream branch.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the metadata cannot be read.
    fn ahead_behind(&self, root: &Path) -> Result<Option<AheadBehind>, ProbeError>;
}

// ============================================================================
// SECTION: Command Inspector
// ============================================================================

/// [`GitInspector`] backed by the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitCommandInspector {
    /// Program invoked for git commands.
    program: PathBuf,
}

impl Default for GitCommandInspector {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }
}

impl GitCommandInspector {
    /// Creates an inspector that invokes a specific git binary.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `git -C <root> <args>` and returns trimmed stdout.
    fn run(&self, root: &Path, args: &[&str]) -> Result<String, ProbeError> {
        let output = Command::new(&self.program)
            .arg("-C")
            .arg(root)
            .args(args)
            .output()
            .map_err(|err| ProbeError::Io(format!("failed to run git: {err}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ProbeError::Io(format!("git {} failed: {stderr}", args.join(" "))));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl GitInspector for GitCommandInspector {
    fn current_branch(&self, root: &Path) -> Result<String, ProbeError> {
        self.run(root, &["rev-parse", "--abbrev-ref", "HEAD"])
    }

    fn remote_url(&self, root: &Path, remote: &str) -> Result<String, ProbeError> {
        self.run(root, &["remote", "get-url", remote])
    }

    fn ahead_behind(&self, root: &Path) -> Result<Option<AheadBehind>, ProbeError> {
        if self.run(root, &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{upstream}"]).is_err()
        {
            return Ok(None);
        }
        let counts = self.run(root, &["rev-list", "--left-right", "--count", "HEAD...@{upstream}"])?;
        parse_ahead_behind(&counts)
            .map(Some)
            .ok_or_else(|| ProbeError::Io(format!("unexpected rev-list output: {counts}")))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses `git rev-list --left-right --count` output (`<ahead>\t<behind>`).
#[must_use]
pub fn parse_ahead_behind(output: &str) -> Option<AheadBehind> {
    let mut parts = output.split_whitespace();
    let ahead = parts.next()?.parse().ok()?;
    let behind = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(AheadBehind {
        ahead,
        behind,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

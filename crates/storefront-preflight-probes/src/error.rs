// crates/storefront-preflight-probes/src/error.rs
// ============================================================================
// Module: Probe Errors
// Description: Error type for failed probe preconditions.
// Purpose: Separate hard precondition failures from reported check outcomes.
// Dependencies: thiserror, storefront-preflight-config
// ============================================================================

//! ## Overview
//! [`ProbeError`] covers hard preconditions only. A check that runs and
//! fails is a [`crate::CheckOutcome`], not an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use storefront_preflight_config::ConfigError;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised before or outside of individual check outcomes.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Probe configuration was rejected.
    #[error("probe config error: {0}")]
    Config(String),
    /// HTTP client construction or transport failure.
    #[error("http error: {0}")]
    Http(String),
    /// Filesystem or process I/O failure.
    #[error("io error: {0}")]
    Io(String),
    /// A hard precondition was not met.
    #[error("precondition failed: {0}")]
    Precondition(String),
    /// Signature computation failed.
    #[error("signature error: {0}")]
    Signature(String),
}

impl From<ConfigError> for ProbeError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

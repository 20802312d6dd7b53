// crates/storefront-preflight-probes/src/http.rs
// ============================================================================
// Module: HTTP Helpers
// Description: Shared blocking HTTP client construction and bounded reads.
// Purpose: Keep outbound probe requests bounded and redirect-free.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! Probes issue blocking requests with a hard timeout, no redirects, and a
//! fixed user agent. Response bodies are read with a byte ceiling so a
//! misbehaving endpoint cannot exhaust memory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;

use crate::error::ProbeError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// User agent sent with every probe request.
pub(crate) const USER_AGENT: &str = "storefront-preflight/0.1";
/// Maximum body bytes kept for outcome details.
pub(crate) const MAX_DETAIL_BODY_BYTES: usize = 256;
/// Maximum JSON response size parsed by the diagnosis probe.
pub(crate) const MAX_JSON_RESPONSE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Client
// ============================================================================

/// Builds a blocking client with a timeout and redirects disabled.
pub(crate) fn build_http_client(timeout_ms: u64) -> Result<Client, ProbeError> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(USER_AGENT)
        .redirect(Policy::none())
        .build()
        .map_err(|err| ProbeError::Http(format!("http client build failed: {err}")))
}

// ============================================================================
// SECTION: Bodies
// ============================================================================

/// Reads the response body while enforcing a byte limit.
pub(crate) fn read_response_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, ProbeError> {
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| ProbeError::Http("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err(ProbeError::Http("http response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let mut handle = response.take(max_bytes_u64.saturating_add(1));
    handle
        .read_to_end(&mut buf)
        .map_err(|err| ProbeError::Http(format!("failed to read response: {err}")))?;
    if buf.len() > max_bytes {
        return Err(ProbeError::Http("http response exceeds size limit".to_string()));
    }
    Ok(buf)
}

/// Returns a short, lossy text prefix of the response body for details.
pub(crate) fn body_snippet(response: &mut Response) -> String {
    let mut buf = Vec::new();
    let limit = u64::try_from(MAX_DETAIL_BODY_BYTES).unwrap_or(u64::MAX);
    if response.take(limit).read_to_end(&mut buf).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&buf).trim().to_string()
}

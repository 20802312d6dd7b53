// crates/storefront-preflight-probes/src/webhook.rs
// ============================================================================
// Module: Webhook Self-Test
// Description: Submits signed and mis-signed payloads to webhook endpoints.
// Purpose: Confirm endpoints accept valid HMAC signatures and reject forgeries.
// Dependencies: storefront-preflight-config, reqwest
// ============================================================================

//! ## Overview
//! The webhook probe signs the configured payload once, then for each
//! endpoint sends two POST requests in sequence: one carrying the correct
//! digest and one carrying the configured invalid signature. The first must
//! return the expected success status (200 by default), the second the
//! expected rejection status (401 by default).
//!
//! There are no retries and no concurrency. A failing endpoint is a soft
//! failure; the probe moves on to the next endpoint.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use storefront_preflight_config::WebhookConfig;

use crate::error::ProbeError;
use crate::http::body_snippet;
use crate::http::build_http_client;
use crate::report::CheckFamily;
use crate::report::CheckOutcome;
use crate::report::CheckReport;
use crate::signature::sign_payload;

// ============================================================================
// SECTION: Secret
// ============================================================================

/// Shared webhook secret supplied by the operator.
///
/// # Invariants
/// - Never empty or whitespace-only.
/// - `Debug` output is redacted.
#[derive(Clone)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    /// Wraps an operator-supplied secret, rejecting empty input.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Precondition`] when the secret is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ProbeError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ProbeError::Precondition("webhook secret is empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the secret bytes used as the HMAC key.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(<redacted>)")
    }
}

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Webhook HMAC self-test probe.
pub struct WebhookProbe {
    /// Validated webhook configuration.
    config: WebhookConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl WebhookProbe {
    /// Creates a probe after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: WebhookConfig) -> Result<Self, ProbeError> {
        config.validate()?;
        let client = build_http_client(config.timeout_ms)?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Returns the probe configuration.
    #[must_use]
    pub const fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// Computes the signature for the configured payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Signature`] when signing fails.
    pub fn signature(&self, secret: &WebhookSecret) -> Result<String, ProbeError> {
        sign_payload(secret.as_bytes(), self.config.payload.as_bytes())
    }

    /// Runs the self-test against every configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Signature`] when the payload cannot be signed;
    /// endpoint failures are reported as outcomes.
    pub fn run(&self, secret: &WebhookSecret) -> Result<CheckReport, ProbeError> {
        let signature = self.signature(secret)?;
        let delivery_id = delivery_id();
        let mut report = CheckReport::new(CheckFamily::Webhook);
        for (index, endpoint) in self.config.endpoints.iter().enumerate() {
            report.push(self.expect_status(
                format!("webhook.endpoint[{index}].valid_signature"),
                endpoint,
                &signature,
                &delivery_id,
                self.config.expected_valid_status,
            ));
            report.push(self.expect_status(
                format!("webhook.endpoint[{index}].invalid_signature"),
                endpoint,
                &self.config.invalid_signature,
                &delivery_id,
                self.config.expected_invalid_status,
            ));
        }
        Ok(report)
    }

    /// Sends one delivery and compares the response status.
    fn expect_status(
        &self,
        id: String,
        endpoint: &str,
        signature: &str,
        delivery_id: &str,
        expected: u16,
    ) -> CheckOutcome {
        let outcome = CheckOutcome::soft(id, endpoint);
        match self.deliver(endpoint, signature, delivery_id) {
            Ok((status, _)) if status == expected => {
                outcome.pass().with_detail(format!("HTTP {status}"))
            }
            Ok((status, body)) if body.is_empty() => {
                outcome.fail(format!("expected HTTP {expected}, got HTTP {status}"))
            }
            Ok((status, body)) => {
                outcome.fail(format!("expected HTTP {expected}, got HTTP {status}: {body}"))
            }
            Err(err) => outcome.fail(err.to_string()),
        }
    }

    /// Posts the payload with webhook headers and returns status and body snippet.
    fn deliver(
        &self,
        endpoint: &str,
        signature: &str,
        delivery_id: &str,
    ) -> Result<(u16, String), ProbeError> {
        let mut response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(self.config.hmac_header.as_str(), signature)
            .header(self.config.shop_domain_header.as_str(), self.config.shop_domain.as_str())
            .header(self.config.topic_header.as_str(), self.config.topic.as_str())
            .header(self.config.webhook_id_header.as_str(), delivery_id)
            .body(self.config.payload.clone())
            .send()
            .map_err(|err| ProbeError::Http(format!("request to {endpoint} failed: {err}")))?;
        let status = response.status().as_u16();
        let body = body_snippet(&mut response);
        Ok((status, body))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a delivery identifier unique to this invocation.
fn delivery_id() -> String {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    format!("preflight-{millis}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

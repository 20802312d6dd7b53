// crates/storefront-preflight-probes/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Local HTTP endpoints and config builders for probe tests.
// Purpose: Exercise probes against deterministic in-process servers.
// Dependencies: storefront-preflight-probes, tiny_http
// ============================================================================

//! ## Overview
//! Fake webhook receivers verify the HMAC header the same way a compliant
//! edge function does, and a routed fake backend answers diagnosis requests
//! by path. Every server handles a fixed number of requests and then
//! returns what it recorded.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::thread;
use std::thread::JoinHandle;

use storefront_preflight_config::DiagnoseConfig;
use storefront_preflight_config::WebhookConfig;
use storefront_preflight_probes::verify_signature;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Recorded Requests
// ============================================================================

/// A request observed by a fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path and query.
    pub url: String,
    /// Header name/value pairs (names lowercased).
    pub headers: Vec<(String, String)>,
    /// Raw request body.
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Returns the first header value with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
    }
}

/// Reads method, URL, headers, and body from a tiny_http request.
fn record(request: &mut tiny_http::Request) -> RecordedRequest {
    let mut body = Vec::new();
    let _ = request.as_reader().read_to_end(&mut body);
    RecordedRequest {
        method: request.method().to_string(),
        url: request.url().to_string(),
        headers: request
            .headers()
            .iter()
            .map(|header| {
                (header.field.as_str().as_str().to_ascii_lowercase(), header.value.to_string())
            })
            .collect(),
        body,
    }
}

// ============================================================================
// SECTION: Webhook Receiver
// ============================================================================

/// Spawns a receiver that answers 200 for a valid HMAC header and 401 otherwise.
pub fn spawn_webhook_receiver(
    secret: &'static [u8],
    requests: usize,
) -> (String, JoinHandle<Vec<RecordedRequest>>) {
    spawn_webhook_receiver_with(secret, requests, 200, 401)
}

/// Spawns a receiver with explicit accept and reject statuses.
pub fn spawn_webhook_receiver_with(
    secret: &'static [u8],
    requests: usize,
    accept_status: u16,
    reject_status: u16,
) -> (String, JoinHandle<Vec<RecordedRequest>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let url = format!("http://{addr}/webhooks/orders");
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0 .. requests {
            let Ok(mut request) = server.recv() else {
                break;
            };
            let recorded = record(&mut request);
            let valid = recorded
                .header("x-shopify-hmac-sha256")
                .is_some_and(|signature| verify_signature(secret, &recorded.body, signature));
            let response = if valid {
                Response::from_string("ok").with_status_code(accept_status)
            } else {
                Response::from_string("invalid signature").with_status_code(reject_status)
            };
            let _ = request.respond(response);
            seen.push(recorded);
        }
        seen
    });
    (url, handle)
}

// ============================================================================
// SECTION: Routed Backend
// ============================================================================

/// A canned response for requests whose path starts with `path`.
#[derive(Debug, Clone)]
pub struct Route {
    /// Path prefix matched against the request URL.
    pub path: &'static str,
    /// Response status.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl Route {
    /// Creates a route.
    pub fn new(path: &'static str, status: u16, body: impl Into<String>) -> Self {
        Self {
            path,
            status,
            body: body.into(),
        }
    }
}

/// Spawns a backend that answers `requests` requests from the route table.
pub fn spawn_backend(
    routes: Vec<Route>,
    requests: usize,
) -> (String, JoinHandle<Vec<RecordedRequest>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let url = format!("http://{addr}");
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0 .. requests {
            let Ok(mut request) = server.recv() else {
                break;
            };
            let recorded = record(&mut request);
            let route = routes.iter().find(|route| recorded.url.starts_with(route.path));
            let response = match route {
                Some(route) => Response::from_string(route.body.clone())
                    .with_status_code(route.status),
                None => Response::from_string("no route").with_status_code(404),
            };
            let _ = request.respond(response);
            seen.push(recorded);
        }
        seen
    });
    (url, handle)
}

// ============================================================================
// SECTION: Config Builders
// ============================================================================

/// Webhook config pointing at local endpoints over plain HTTP.
pub fn local_webhook_config(endpoints: Vec<String>) -> WebhookConfig {
    let mut config = WebhookConfig::with_endpoints(endpoints, "demo-shop.myshopify.com");
    config.allow_http = true;
    config.timeout_ms = 5_000;
    config
}

/// Diagnosis config pointing at a local backend over plain HTTP.
pub fn local_diagnose_config(base_url: &str) -> DiagnoseConfig {
    DiagnoseConfig {
        base_url: base_url.to_string(),
        email: "ops@example.com".to_string(),
        password_env: "PREFLIGHT_ADMIN_PASSWORD".to_string(),
        anon_key_env: "SUPABASE_ANON_KEY".to_string(),
        product_limit: 10,
        import_log_limit: 5,
        timeout_ms: 5_000,
        allow_http: true,
    }
}

// crates/storefront-preflight-probes/src/diagnose.rs
// ============================================================================
// Module: Backend Import Diagnosis
// Description: Operator login, admin profile, product, and import log checks.
// Purpose: Explain why imported products are missing from the admin view.
// Dependencies: storefront-preflight-config, reqwest, serde, url
// ============================================================================

//! ## Overview
//! The diagnosis signs in to the backend REST surface with the operator's
//! password grant, then reads the operator profile, the most recent
//! products, and the most recent import logs. The result is a
//! [`Diagnosis`]: the per-step [`CheckReport`] plus a single
//! [`DiagnosisVerdict`] naming the most likely cause.
//!
//! Login failure is a hard precondition and skips the remaining steps. The
//! import log table may be unreadable for non-service roles, so a non-200
//! status there is a warning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use storefront_preflight_config::DiagnoseConfig;
use storefront_preflight_config::parse_http_url;
use url::Url;

use crate::error::ProbeError;
use crate::http::MAX_JSON_RESPONSE_BYTES;
use crate::http::body_snippet;
use crate::http::build_http_client;
use crate::http::read_response_limited;
use crate::report::CheckFamily;
use crate::report::CheckOutcome;
use crate::report::CheckReport;

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Operator credentials for the backend REST surface.
///
/// # Invariants
/// - Neither value is empty.
/// - `Debug` output is redacted.
#[derive(Clone)]
pub struct DiagnoseCredentials {
    /// Public anon API key sent as `apikey`.
    anon_key: String,
    /// Operator account password.
    password: String,
}

impl DiagnoseCredentials {
    /// Creates credentials, rejecting empty values.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Precondition`] when either value is empty.
    pub fn new(anon_key: impl Into<String>, password: impl Into<String>) -> Result<Self, ProbeError> {
        let anon_key = anon_key.into().trim().to_string();
        let password = password.into();
        if anon_key.is_empty() {
            return Err(ProbeError::Precondition("backend anon key is empty".to_string()));
        }
        if password.is_empty() {
            return Err(ProbeError::Precondition("operator password is empty".to_string()));
        }
        Ok(Self {
            anon_key,
            password,
        })
    }
}

impl fmt::Debug for DiagnoseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DiagnoseCredentials(<redacted>)")
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Most likely cause reported by a diagnosis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisVerdict {
    /// Login works, the operator is an admin, and products exist.
    Healthy,
    /// Admin setup is correct but no products were found.
    NoProducts,
    /// The account exists but lacks admin permissions.
    NotAdmin,
    /// The account could not sign in.
    LoginFailed,
}

impl DiagnosisVerdict {
    /// Returns the stable label for this verdict.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::NoProducts => "no_products",
            Self::NotAdmin => "not_admin",
            Self::LoginFailed => "login_failed",
        }
    }
}

/// A recently created product row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProductRow {
    /// Product identifier as returned by the backend.
    pub id: serde_json::Value,
    /// Product name.
    pub name: Option<String>,
    /// Approval workflow status.
    pub approval_status: Option<String>,
    /// Import source label.
    pub source: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
}

/// A recent import log row.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ImportLogRow {
    /// Import timestamp.
    pub created_at: Option<String>,
    /// Import source label.
    pub source: Option<String>,
    /// Products submitted.
    pub total_products: Option<u64>,
    /// Products imported.
    pub successful_imports: Option<u64>,
    /// Products rejected.
    pub failed_imports: Option<u64>,
}

/// Outcome of a diagnosis run.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    /// Most likely cause.
    pub verdict: DiagnosisVerdict,
    /// Signed-in user identifier, when login succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Recent products, newest first.
    pub products: Vec<ProductRow>,
    /// Recent import logs, newest first (empty when unreadable).
    pub import_logs: Vec<ImportLogRow>,
    /// Per-step outcomes.
    pub report: CheckReport,
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Password grant request body.
#[derive(Serialize)]
struct PasswordGrant<'a> {
    /// Account email.
    email: &'a str,
    /// Account password.
    password: &'a str,
}

/// Password grant response body (fields used here only).
#[derive(Deserialize)]
struct TokenResponse {
    /// Bearer token for REST calls.
    access_token: String,
    /// Signed-in user.
    #[serde(default)]
    user: Option<TokenUser>,
}

/// User object embedded in the token response.
#[derive(Deserialize)]
struct TokenUser {
    /// User identifier.
    id: String,
}

/// Operator profile row.
#[derive(Deserialize)]
struct ProfileRow {
    /// Admin flag (null treated as false).
    #[serde(default)]
    is_admin: Option<bool>,
    /// Admin role label.
    #[serde(default)]
    admin_role: Option<String>,
}

/// Signed-in session.
struct Session {
    /// Bearer token.
    token: String,
    /// User identifier.
    user_id: String,
}

/// Reply from a REST table read.
enum RestReply<T> {
    /// HTTP 200 with decoded rows.
    Rows(T),
    /// Any other status with a body snippet.
    Status(StatusCode, String),
}

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Backend import diagnosis probe.
pub struct DiagnoseProbe {
    /// Validated diagnosis configuration.
    config: DiagnoseConfig,
    /// Parsed backend base URL.
    base_url: Url,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl DiagnoseProbe {
    /// Creates a probe after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: DiagnoseConfig) -> Result<Self, ProbeError> {
        config.validate()?;
        let base_url = parse_http_url("diagnose.base_url", &config.base_url, config.allow_http)?;
        let client = build_http_client(config.timeout_ms)?;
        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    /// Returns the probe configuration.
    #[must_use]
    pub const fn config(&self) -> &DiagnoseConfig {
        &self.config
    }

    /// Runs every diagnosis step and derives a verdict.
    #[must_use]
    pub fn run(&self, credentials: &DiagnoseCredentials) -> Diagnosis {
        let mut report = CheckReport::new(CheckFamily::Diagnose);
        let login = CheckOutcome::hard("diagnose.login", self.config.email.as_str());
        let session = match self.login(credentials) {
            Ok(session) => {
                report.push(login.with_detail(format!("user {}", session.user_id)));
                session
            }
            Err(reason) => {
                report.push(login.fail(reason));
                for (id, label) in [
                    ("diagnose.admin_profile", "admin profile"),
                    ("diagnose.products", "recent products"),
                    ("diagnose.import_logs", "recent import logs"),
                ] {
                    report.push(CheckOutcome::soft(id, label).skip("login failed"));
                }
                return Diagnosis {
                    verdict: DiagnosisVerdict::LoginFailed,
                    user_id: None,
                    products: Vec::new(),
                    import_logs: Vec::new(),
                    report,
                };
            }
        };

        let (admin, outcome) = self.check_admin(credentials, &session);
        report.push(outcome);
        let (products, outcome) = self.check_products(credentials, &session);
        report.push(outcome);
        let (import_logs, outcome) = self.check_import_logs(credentials, &session);
        report.push(outcome);

        let verdict = if !admin {
            DiagnosisVerdict::NotAdmin
        } else if products.is_empty() {
            DiagnosisVerdict::NoProducts
        } else {
            DiagnosisVerdict::Healthy
        };
        Diagnosis {
            verdict,
            user_id: Some(session.user_id),
            products,
            import_logs,
            report,
        }
    }

    /// Signs in with the password grant.
    fn login(&self, credentials: &DiagnoseCredentials) -> Result<Session, String> {
        let mut url = self.endpoint("/auth/v1/token");
        url.query_pairs_mut().append_pair("grant_type", "password");
        let body = PasswordGrant {
            email: self.config.email.as_str(),
            password: credentials.password.as_str(),
        };
        let mut response = self
            .client
            .post(url)
            .header("apikey", credentials.anon_key.as_str())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .map_err(|err| format!("login request failed: {err}"))?;
        let status = response.status();
        if status != StatusCode::OK {
            let snippet = body_snippet(&mut response);
            return Err(format!("login returned HTTP {}: {snippet}", status.as_u16()));
        }
        let bytes = read_response_limited(&mut response, MAX_JSON_RESPONSE_BYTES)
            .map_err(|err| err.to_string())?;
        let token: TokenResponse = serde_json::from_slice(&bytes)
            .map_err(|err| format!("login response missing access token: {err}"))?;
        let user_id = token
            .user
            .map(|user| user.id)
            .ok_or_else(|| "login response missing user id".to_string())?;
        Ok(Session {
            token: token.access_token,
            user_id,
        })
    }

    /// Reads the operator profile and reports the admin flag.
    fn check_admin(
        &self,
        credentials: &DiagnoseCredentials,
        session: &Session,
    ) -> (bool, CheckOutcome) {
        let outcome = CheckOutcome::soft("diagnose.admin_profile", "admin profile");
        let mut url = self.endpoint("/rest/v1/user_profiles");
        url.query_pairs_mut()
            .append_pair("user_id", &format!("eq.{}", session.user_id))
            .append_pair("select", "*");
        match self.get_rows::<Vec<ProfileRow>>(url, credentials, session) {
            Ok(RestReply::Rows(rows)) => match rows.first() {
                None => (false, outcome.fail(format!("no profile for user {}", session.user_id))),
                Some(profile) if profile.is_admin.unwrap_or(false) => {
                    let role = profile.admin_role.as_deref().unwrap_or("none");
                    (true, outcome.with_detail(format!("admin role {role}")))
                }
                Some(_) => (false, outcome.fail("profile is_admin is false")),
            },
            Ok(RestReply::Status(status, body)) => (
                false,
                outcome.fail(format!("profile query returned HTTP {}: {body}", status.as_u16())),
            ),
            Err(err) => (false, outcome.fail(err.to_string())),
        }
    }

    /// Reads the most recent products.
    fn check_products(
        &self,
        credentials: &DiagnoseCredentials,
        session: &Session,
    ) -> (Vec<ProductRow>, CheckOutcome) {
        let outcome = CheckOutcome::soft("diagnose.products", "recent products");
        let mut url = self.endpoint("/rest/v1/products");
        url.query_pairs_mut()
            .append_pair("select", "id,name,approval_status,source,created_at")
            .append_pair("order", "created_at.desc")
            .append_pair("limit", &self.config.product_limit.to_string());
        match self.get_rows::<Vec<ProductRow>>(url, credentials, session) {
            Ok(RestReply::Rows(rows)) if rows.is_empty() => {
                (rows, outcome.warn("no products found"))
            }
            Ok(RestReply::Rows(rows)) => {
                let detail = format!("{} recent product(s)", rows.len());
                (rows, outcome.with_detail(detail))
            }
            Ok(RestReply::Status(status, body)) => (
                Vec::new(),
                outcome.fail(format!("product query returned HTTP {}: {body}", status.as_u16())),
            ),
            Err(err) => (Vec::new(), outcome.fail(err.to_string())),
        }
    }

    /// Reads the most recent import logs.
    fn check_import_logs(
        &self,
        credentials: &DiagnoseCredentials,
        session: &Session,
    ) -> (Vec<ImportLogRow>, CheckOutcome) {
        let outcome = CheckOutcome::soft("diagnose.import_logs", "recent import logs");
        let mut url = self.endpoint("/rest/v1/product_import_logs");
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc")
            .append_pair("limit", &self.config.import_log_limit.to_string());
        match self.get_rows::<Vec<ImportLogRow>>(url, credentials, session) {
            Ok(RestReply::Rows(rows)) => {
                let failed: u64 = rows.iter().filter_map(|row| row.failed_imports).sum();
                let detail = format!("{} import log(s), {failed} failed import(s)", rows.len());
                (rows, outcome.with_detail(detail))
            }
            Ok(RestReply::Status(status, _)) => (
                Vec::new(),
                outcome.warn(format!(
                    "import log query returned HTTP {} (may lack permissions)",
                    status.as_u16()
                )),
            ),
            Err(err) => (Vec::new(), outcome.fail(err.to_string())),
        }
    }

    /// Issues an authenticated REST read and decodes a 200 response.
    fn get_rows<T: DeserializeOwned>(
        &self,
        url: Url,
        credentials: &DiagnoseCredentials,
        session: &Session,
    ) -> Result<RestReply<T>, ProbeError> {
        let path = url.path().to_string();
        let mut response = self
            .authorized(self.client.get(url), credentials, session)
            .send()
            .map_err(|err| ProbeError::Http(format!("request to {path} failed: {err}")))?;
        let status = response.status();
        if status != StatusCode::OK {
            return Ok(RestReply::Status(status, body_snippet(&mut response)));
        }
        let bytes = read_response_limited(&mut response, MAX_JSON_RESPONSE_BYTES)?;
        let rows = serde_json::from_slice(&bytes)
            .map_err(|err| ProbeError::Http(format!("invalid json from {path}: {err}")))?;
        Ok(RestReply::Rows(rows))
    }

    /// Attaches API key and bearer token headers.
    fn authorized(
        &self,
        request: RequestBuilder,
        credentials: &DiagnoseCredentials,
        session: &Session,
    ) -> RequestBuilder {
        request
            .header("apikey", credentials.anon_key.as_str())
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&session.token)
    }

    /// Joins `path` onto the base URL, keeping any base path prefix.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}{path}"));
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

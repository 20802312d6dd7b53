// crates/storefront-preflight-config/src/config.rs
// ============================================================================
// Module: Storefront Preflight Configuration
// Description: Configuration loading and validation for preflight checks.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, serde_json, thiserror, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Structural problems (unparseable URLs, empty endpoint lists, escaping
//! deployment paths) fail the load. Semantic findings such as theme token
//! parity or CORS coverage are reported by the lint checks instead, so an
//! operator sees every finding in one run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "storefront-preflight.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "STOREFRONT_PREFLIGHT_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of theme sets.
pub(crate) const MAX_THEMES: usize = 16;
/// Maximum number of tokens per theme variant.
pub(crate) const MAX_THEME_TOKENS: usize = 512;
/// Maximum length of a theme or token name.
pub(crate) const MAX_NAME_LENGTH: usize = 128;
/// Maximum number of proxy routes.
pub(crate) const MAX_PROXY_ROUTES: usize = 64;
/// Maximum number of entries in any CORS list.
pub(crate) const MAX_CORS_ENTRIES: usize = 128;
/// Maximum number of manual chunks.
pub(crate) const MAX_MANUAL_CHUNKS: usize = 64;
/// Maximum number of webhook endpoints.
pub(crate) const MAX_WEBHOOK_ENDPOINTS: usize = 32;
/// Maximum webhook payload size in bytes.
pub const MAX_WEBHOOK_PAYLOAD_BYTES: usize = 64 * 1024;
/// Maximum number of deployment file rules.
pub(crate) const MAX_DEPLOY_FILES: usize = 256;
/// Maximum number of substring rules per deployment file.
pub(crate) const MAX_DEPLOY_CONTAINS: usize = 64;
/// Default maximum size of a deployment file read for substring checks.
pub(crate) const DEFAULT_DEPLOY_MAX_FILE_BYTES: usize = 1024 * 1024;
/// Hard ceiling for the deployment file read limit.
pub(crate) const MAX_DEPLOY_MAX_FILE_BYTES: usize = 16 * 1024 * 1024;
/// Minimum outbound HTTP timeout in milliseconds.
pub(crate) const MIN_HTTP_TIMEOUT_MS: u64 = 100;
/// Maximum outbound HTTP timeout in milliseconds.
pub(crate) const MAX_HTTP_TIMEOUT_MS: u64 = 60_000;
/// Maximum rows requested by diagnosis queries.
pub(crate) const MAX_DIAGNOSE_LIMIT: u32 = 100;
/// Default webhook payload used by the self-test.
pub const DEFAULT_WEBHOOK_PAYLOAD: &str = r##"{"id":12345,"name":"#1001"}"##;
/// Default environment variable holding the webhook secret.
pub const DEFAULT_WEBHOOK_SECRET_ENV: &str = "SHOPIFY_WEBHOOK_SECRET";
/// Default signature sent when probing rejection behavior.
pub const DEFAULT_INVALID_SIGNATURE: &str = "invalid_hmac_signature_12345678";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Storefront preflight configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreflightConfig {
    /// Theme token sets (one entry per theme configuration file).
    #[serde(default)]
    pub themes: Vec<ThemeConfig>,
    /// Development server proxy and CORS policy.
    #[serde(default)]
    pub dev_server: DevServerConfig,
    /// Bundle splitting rules.
    #[serde(default)]
    pub bundle: BundleConfig,
    /// Optional webhook self-test configuration.
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
    /// Optional deployment shape configuration.
    #[serde(default)]
    pub deploy: Option<DeployConfig>,
    /// Optional backend diagnosis configuration.
    #[serde(default)]
    pub diagnose: Option<DiagnoseConfig>,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl PreflightConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Loads configuration only when one was requested or the default file exists.
    ///
    /// Returns `Ok(None)` when no path was given, the environment override is
    /// unset, and no default file is present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a located file fails to load or validate.
    pub fn load_optional(path: Option<&Path>) -> Result<Option<Self>, ConfigError> {
        if path.is_none()
            && env::var_os(CONFIG_ENV_VAR).is_none()
            && !Path::new(DEFAULT_CONFIG_NAME).exists()
        {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for structural consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.themes.len() > MAX_THEMES {
            return Err(ConfigError::Invalid(format!("themes exceeds {MAX_THEMES} entries")));
        }
        let mut names = BTreeSet::new();
        for theme in &self.themes {
            theme.validate()?;
            if !names.insert(theme.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "themes.name must be unique: {}",
                    theme.name
                )));
            }
        }
        self.dev_server.validate()?;
        self.bundle.validate()?;
        if let Some(webhook) = &self.webhook {
            webhook.validate()?;
        }
        if let Some(deploy) = &self.deploy {
            deploy.validate()?;
        }
        if let Some(diagnose) = &self.diagnose {
            diagnose.validate()?;
        }
        self.audit.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Theme Tokens
// ============================================================================

/// A named theme token set with light and dark variants.
///
/// # Invariants
/// - Token values are not checked at load time; see the theme lint.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ThemeConfig {
    /// Theme identifier (typically the source configuration file).
    pub name: String,
    /// Light variant tokens keyed by semantic role.
    #[serde(default)]
    pub light: BTreeMap<String, String>,
    /// Dark variant tokens keyed by semantic role.
    #[serde(default)]
    pub dark: BTreeMap<String, String>,
}

impl ThemeConfig {
    /// Validates theme naming and size limits.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_name("themes.name", &self.name)?;
        for (variant, tokens) in [("light", &self.light), ("dark", &self.dark)] {
            if tokens.len() > MAX_THEME_TOKENS {
                return Err(ConfigError::Invalid(format!(
                    "themes.{variant} exceeds {MAX_THEME_TOKENS} tokens"
                )));
            }
            for key in tokens.keys() {
                validate_name(&format!("themes.{variant} token"), key)?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Dev Server
// ============================================================================

/// Development server configuration (proxy routes + CORS policy).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevServerConfig {
    /// Proxy routes keyed by path prefix.
    #[serde(default)]
    pub proxy: Vec<ProxyRouteConfig>,
    /// CORS policy applied to proxied and direct requests.
    #[serde(default)]
    pub cors: CorsConfig,
}

impl DevServerConfig {
    /// Validates proxy routes and CORS lists.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.proxy.len() > MAX_PROXY_ROUTES {
            return Err(ConfigError::Invalid(format!(
                "dev_server.proxy exceeds {MAX_PROXY_ROUTES} routes"
            )));
        }
        for route in &self.proxy {
            route.validate()?;
        }
        self.cors.validate()
    }
}

/// A single development proxy route.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyRouteConfig {
    /// Request path prefix that triggers the proxy (e.g. `/api`).
    pub prefix: String,
    /// Target origin requests are forwarded to.
    pub target: String,
    /// Rewrite the `Host`/`Origin` headers to the target origin.
    #[serde(default = "default_change_origin")]
    pub change_origin: bool,
}

impl ProxyRouteConfig {
    /// Validates the prefix shape and target origin.
    fn validate(&self) -> Result<(), ConfigError> {
        let prefix = self.prefix.trim();
        if !prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "dev_server.proxy.prefix must start with '/': {}",
                self.prefix
            )));
        }
        if prefix.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("dev_server.proxy.prefix too long".to_string()));
        }
        parse_http_url("dev_server.proxy.target", &self.target, true)?;
        Ok(())
    }
}

/// CORS policy for the storefront API surface.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API (`*` allows any origin).
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Request headers clients may send.
    #[serde(default)]
    pub allowed_headers: Vec<String>,
    /// HTTP methods clients may use.
    #[serde(default)]
    pub allowed_methods: Vec<String>,
    /// Origins the storefront is actually served from.
    #[serde(default)]
    pub served_origins: Vec<String>,
    /// Whether credentialed requests are allowed.
    #[serde(default)]
    pub allow_credentials: bool,
}

impl CorsConfig {
    /// Validates list sizes and origin syntax.
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, entries) in [
            ("dev_server.cors.allowed_origins", &self.allowed_origins),
            ("dev_server.cors.allowed_headers", &self.allowed_headers),
            ("dev_server.cors.allowed_methods", &self.allowed_methods),
            ("dev_server.cors.served_origins", &self.served_origins),
        ] {
            if entries.len() > MAX_CORS_ENTRIES {
                return Err(ConfigError::Invalid(format!(
                    "{field} exceeds {MAX_CORS_ENTRIES} entries"
                )));
            }
            for entry in entries {
                if entry.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!("{field} entries must be non-empty")));
                }
            }
        }
        for origin in &self.allowed_origins {
            if origin.trim() != "*" {
                parse_origin("dev_server.cors.allowed_origins", origin)?;
            }
        }
        for origin in &self.served_origins {
            parse_origin("dev_server.cors.served_origins", origin)?;
        }
        for method in &self.allowed_methods {
            if !method.trim().chars().all(|ch| ch.is_ascii_alphabetic()) {
                return Err(ConfigError::Invalid(format!(
                    "dev_server.cors.allowed_methods contains invalid method: {method}"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Bundle
// ============================================================================

/// Bundle splitting configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleConfig {
    /// Manual chunk groupings keyed by chunk name.
    #[serde(default)]
    pub manual_chunks: BTreeMap<String, Vec<String>>,
}

impl BundleConfig {
    /// Validates chunk naming and count limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.manual_chunks.len() > MAX_MANUAL_CHUNKS {
            return Err(ConfigError::Invalid(format!(
                "bundle.manual_chunks exceeds {MAX_MANUAL_CHUNKS} chunks"
            )));
        }
        for name in self.manual_chunks.keys() {
            validate_name("bundle.manual_chunks name", name)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Webhook
// ============================================================================

/// Webhook HMAC self-test configuration.
///
/// # Invariants
/// - `endpoints` is non-empty and every entry is an absolute URL.
/// - `payload` is valid JSON and is signed byte-for-byte as written.
/// - `expected_valid_status` differs from `expected_invalid_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint URLs receiving the signed payload.
    pub endpoints: Vec<String>,
    /// Shop domain sent in the shop-domain header.
    pub shop_domain: String,
    /// Webhook topic sent in the topic header.
    #[serde(default = "default_webhook_topic")]
    pub topic: String,
    /// Raw JSON payload to sign and submit.
    #[serde(default = "default_webhook_payload")]
    pub payload: String,
    /// Environment variable holding the shared secret.
    #[serde(default = "default_webhook_secret_env")]
    pub secret_env: String,
    /// Signature value used when probing rejection behavior.
    #[serde(default = "default_invalid_signature")]
    pub invalid_signature: String,
    /// Header carrying the base64 HMAC digest.
    #[serde(default = "default_hmac_header")]
    pub hmac_header: String,
    /// Header carrying the shop domain.
    #[serde(default = "default_shop_domain_header")]
    pub shop_domain_header: String,
    /// Header carrying the webhook topic.
    #[serde(default = "default_topic_header")]
    pub topic_header: String,
    /// Header carrying the webhook delivery identifier.
    #[serde(default = "default_webhook_id_header")]
    pub webhook_id_header: String,
    /// Status expected when the signature is valid.
    #[serde(default = "default_expected_valid_status")]
    pub expected_valid_status: u16,
    /// Status expected when the signature is invalid.
    #[serde(default = "default_expected_invalid_status")]
    pub expected_invalid_status: u16,
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Allow cleartext `http://` endpoints.
    #[serde(default)]
    pub allow_http: bool,
}

impl WebhookConfig {
    /// Builds a webhook config with defaults for the given endpoints.
    #[must_use]
    pub fn with_endpoints(endpoints: Vec<String>, shop_domain: impl Into<String>) -> Self {
        Self {
            endpoints,
            shop_domain: shop_domain.into(),
            topic: default_webhook_topic(),
            payload: default_webhook_payload(),
            secret_env: default_webhook_secret_env(),
            invalid_signature: default_invalid_signature(),
            hmac_header: default_hmac_header(),
            shop_domain_header: default_shop_domain_header(),
            topic_header: default_topic_header(),
            webhook_id_header: default_webhook_id_header(),
            expected_valid_status: default_expected_valid_status(),
            expected_invalid_status: default_expected_invalid_status(),
            timeout_ms: default_http_timeout_ms(),
            allow_http: false,
        }
    }

    /// Validates endpoints, payload, headers, and expected statuses.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the webhook configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoints.is_empty() {
            return Err(ConfigError::Invalid("webhook.endpoints must be non-empty".to_string()));
        }
        if self.endpoints.len() > MAX_WEBHOOK_ENDPOINTS {
            return Err(ConfigError::Invalid(format!(
                "webhook.endpoints exceeds {MAX_WEBHOOK_ENDPOINTS} entries"
            )));
        }
        for endpoint in &self.endpoints {
            parse_http_url("webhook.endpoints", endpoint, self.allow_http)?;
        }
        if self.shop_domain.trim().is_empty() {
            return Err(ConfigError::Invalid("webhook.shop_domain must be non-empty".to_string()));
        }
        if self.topic.trim().is_empty() {
            return Err(ConfigError::Invalid("webhook.topic must be non-empty".to_string()));
        }
        if self.payload.len() > MAX_WEBHOOK_PAYLOAD_BYTES {
            return Err(ConfigError::Invalid("webhook.payload exceeds size limit".to_string()));
        }
        serde_json::from_str::<serde_json::Value>(&self.payload).map_err(|err| {
            ConfigError::Invalid(format!("webhook.payload must be valid json: {err}"))
        })?;
        validate_env_name("webhook.secret_env", &self.secret_env)?;
        if self.invalid_signature.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "webhook.invalid_signature must be non-empty".to_string(),
            ));
        }
        for (field, header) in [
            ("webhook.hmac_header", &self.hmac_header),
            ("webhook.shop_domain_header", &self.shop_domain_header),
            ("webhook.topic_header", &self.topic_header),
            ("webhook.webhook_id_header", &self.webhook_id_header),
        ] {
            validate_header_name(field, header)?;
        }
        validate_status("webhook.expected_valid_status", self.expected_valid_status)?;
        validate_status("webhook.expected_invalid_status", self.expected_invalid_status)?;
        if self.expected_valid_status == self.expected_invalid_status {
            return Err(ConfigError::Invalid(
                "webhook.expected_valid_status must differ from expected_invalid_status"
                    .to_string(),
            ));
        }
        validate_timeout_range(
            "webhook.timeout_ms",
            self.timeout_ms,
            MIN_HTTP_TIMEOUT_MS,
            MAX_HTTP_TIMEOUT_MS,
        )
    }
}

// ============================================================================
// SECTION: Deployment Shape
// ============================================================================

/// Deployment shape verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    /// File rules evaluated relative to the deployment root.
    #[serde(default)]
    pub files: Vec<DeployFileConfig>,
    /// Maximum file size read for substring checks.
    #[serde(default = "default_deploy_max_file_bytes")]
    pub max_file_bytes: usize,
    /// Optional git metadata checks.
    #[serde(default)]
    pub git: Option<GitCheckConfig>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            max_file_bytes: default_deploy_max_file_bytes(),
            git: None,
        }
    }
}

impl DeployConfig {
    /// Validates file rules, read limits, and git settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the deployment configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.files.len() > MAX_DEPLOY_FILES {
            return Err(ConfigError::Invalid(format!(
                "deploy.files exceeds {MAX_DEPLOY_FILES} entries"
            )));
        }
        if self.max_file_bytes == 0 || self.max_file_bytes > MAX_DEPLOY_MAX_FILE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "deploy.max_file_bytes must be between 1 and {MAX_DEPLOY_MAX_FILE_BYTES}"
            )));
        }
        for file in &self.files {
            file.validate()?;
        }
        if let Some(git) = &self.git {
            git.validate()?;
        }
        Ok(())
    }
}

/// A file that must (or should) exist in the deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployFileConfig {
    /// Path relative to the deployment root.
    pub path: String,
    /// Hard requirement when true; soft check otherwise.
    #[serde(default = "default_deploy_required")]
    pub required: bool,
    /// Literal substrings that must appear in the file.
    #[serde(default)]
    pub contains: Vec<String>,
}

impl DeployFileConfig {
    /// Builds a required file rule without substring checks.
    #[must_use]
    pub fn required(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            required: true,
            contains: Vec::new(),
        }
    }

    /// Validates the relative path and substring rules.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_relative_path("deploy.files.path", &self.path)?;
        if self.contains.len() > MAX_DEPLOY_CONTAINS {
            return Err(ConfigError::Invalid(format!(
                "deploy.files.contains exceeds {MAX_DEPLOY_CONTAINS} entries"
            )));
        }
        if self.contains.iter().any(String::is_empty) {
            return Err(ConfigError::Invalid(
                "deploy.files.contains entries must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Git metadata expectations for the deployment checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct GitCheckConfig {
    /// Remote name inspected for URL checks.
    #[serde(default = "default_git_remote")]
    pub remote: String,
    /// Branch the checkout is expected to be on.
    #[serde(default)]
    pub expected_branch: Option<String>,
    /// Substring expected in the remote URL.
    #[serde(default)]
    pub expected_remote: Option<String>,
    /// Require zero commits ahead of and behind upstream.
    #[serde(default)]
    pub require_in_sync: bool,
    /// Treat git check failures as hard failures.
    #[serde(default)]
    pub required: bool,
}

impl Default for GitCheckConfig {
    fn default() -> Self {
        Self {
            remote: default_git_remote(),
            expected_branch: None,
            expected_remote: None,
            require_in_sync: false,
            required: false,
        }
    }
}

impl GitCheckConfig {
    /// Validates remote and branch names.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_name("deploy.git.remote", &self.remote)?;
        if let Some(branch) = &self.expected_branch {
            validate_name("deploy.git.expected_branch", branch)?;
        }
        if let Some(remote) = &self.expected_remote
            && remote.trim().is_empty()
        {
            return Err(ConfigError::Invalid(
                "deploy.git.expected_remote must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Backend Diagnosis
// ============================================================================

/// Backend import diagnosis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnoseConfig {
    /// Backend base URL (scheme + host).
    pub base_url: String,
    /// Operator account email.
    pub email: String,
    /// Environment variable holding the operator password.
    #[serde(default = "default_password_env")]
    pub password_env: String,
    /// Environment variable holding the public anon API key.
    #[serde(default = "default_anon_key_env")]
    pub anon_key_env: String,
    /// Number of recent products requested.
    #[serde(default = "default_product_limit")]
    pub product_limit: u32,
    /// Number of recent import logs requested.
    #[serde(default = "default_import_log_limit")]
    pub import_log_limit: u32,
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Allow cleartext `http://` base URLs.
    #[serde(default)]
    pub allow_http: bool,
}

impl DiagnoseConfig {
    /// Validates base URL, credentials wiring, and limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the diagnosis configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_http_url("diagnose.base_url", &self.base_url, self.allow_http)?;
        if !self.email.contains('@') {
            return Err(ConfigError::Invalid("diagnose.email must be an email".to_string()));
        }
        validate_env_name("diagnose.password_env", &self.password_env)?;
        validate_env_name("diagnose.anon_key_env", &self.anon_key_env)?;
        for (field, limit) in [
            ("diagnose.product_limit", self.product_limit),
            ("diagnose.import_log_limit", self.import_log_limit),
        ] {
            if limit == 0 || limit > MAX_DIAGNOSE_LIMIT {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be between 1 and {MAX_DIAGNOSE_LIMIT}"
                )));
            }
        }
        validate_timeout_range(
            "diagnose.timeout_ms",
            self.timeout_ms,
            MIN_HTTP_TIMEOUT_MS,
            MAX_HTTP_TIMEOUT_MS,
        )
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Enable JSON-lines audit events for check outcomes.
    #[serde(default)]
    pub enabled: bool,
    /// Optional audit log path (stderr when unset).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates the audit log path when present.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a deployment-relative path: no absolute roots, no parent hops.
fn validate_relative_path(field: &str, value: &str) -> Result<(), ConfigError> {
    validate_path_string(field, value)?;
    let path = Path::new(value.trim());
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(ConfigError::Invalid(format!(
                    "{field} must not contain '..': {value}"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ConfigError::Invalid(format!("{field} must be relative: {value}")));
            }
        }
    }
    Ok(())
}

/// Validates a short identifier (theme, token, chunk, branch, remote).
fn validate_name(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds {MAX_NAME_LENGTH} characters")));
    }
    Ok(())
}

/// Validates an environment variable name.
fn validate_env_name(field: &str, value: &str) -> Result<(), ConfigError> {
    validate_name(field, value)?;
    if !value.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
        return Err(ConfigError::Invalid(format!(
            "{field} must contain only ASCII letters, digits, and '_'"
        )));
    }
    Ok(())
}

/// Validates an HTTP header field name (RFC 9110 token subset).
fn validate_header_name(field: &str, value: &str) -> Result<(), ConfigError> {
    validate_name(field, value)?;
    if !value.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_') {
        return Err(ConfigError::Invalid(format!("{field} is not a valid header name: {value}")));
    }
    Ok(())
}

/// Validates an HTTP status code range.
fn validate_status(field: &str, status: u16) -> Result<(), ConfigError> {
    if !(100..=599).contains(&status) {
        return Err(ConfigError::Invalid(format!("{field} must be between 100 and 599")));
    }
    Ok(())
}

/// Validates a millisecond timeout against inclusive bounds.
fn validate_timeout_range(
    field: &str,
    value_ms: u64,
    min_ms: u64,
    max_ms: u64,
) -> Result<(), ConfigError> {
    if value_ms < min_ms || value_ms > max_ms {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {min_ms} and {max_ms} milliseconds",
        )));
    }
    Ok(())
}

/// Parses an absolute HTTP(S) URL and applies scheme and credential policy.
///
/// # Errors
///
/// Returns [`ConfigError`] when the URL is malformed, uses an unsupported
/// scheme, omits a host, or embeds credentials.
pub fn parse_http_url(field: &str, value: &str, allow_http: bool) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|err| ConfigError::Invalid(format!("{field} is not a valid url ({err}): {value}")))?;
    match url.scheme() {
        "https" => {}
        "http" if allow_http => {}
        "http" => {
            return Err(ConfigError::Invalid(format!(
                "{field} must use https unless allow_http is set: {value}"
            )));
        }
        other => {
            return Err(ConfigError::Invalid(format!("{field} has unsupported scheme {other}")));
        }
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid(format!("{field} requires a host: {value}")));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(format!("{field} must not embed credentials")));
    }
    Ok(url)
}

/// Parses a browser origin (scheme, host, optional port, no path).
fn parse_origin(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = parse_http_url(field, value, true)?;
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Invalid(format!(
            "{field} must be an origin without path: {value}"
        )));
    }
    Ok(url)
}

/// Normalizes an origin string for comparisons (lowercase, no trailing slash).
#[must_use]
pub fn normalize_origin(value: &str) -> String {
    value.trim().trim_end_matches('/').to_ascii_lowercase()
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default for proxy origin rewriting.
pub(crate) const fn default_change_origin() -> bool {
    true
}

/// Default webhook topic.
pub(crate) fn default_webhook_topic() -> String {
    "orders/create".to_string()
}

/// Default webhook payload.
pub(crate) fn default_webhook_payload() -> String {
    DEFAULT_WEBHOOK_PAYLOAD.to_string()
}

/// Default environment variable for the webhook secret.
pub(crate) fn default_webhook_secret_env() -> String {
    DEFAULT_WEBHOOK_SECRET_ENV.to_string()
}

/// Default invalid signature literal.
pub(crate) fn default_invalid_signature() -> String {
    DEFAULT_INVALID_SIGNATURE.to_string()
}

/// Default HMAC header name.
pub(crate) fn default_hmac_header() -> String {
    "X-Shopify-Hmac-Sha256".to_string()
}

/// Default shop-domain header name.
pub(crate) fn default_shop_domain_header() -> String {
    "X-Shopify-Shop-Domain".to_string()
}

/// Default topic header name.
pub(crate) fn default_topic_header() -> String {
    "X-Shopify-Topic".to_string()
}

/// Default webhook-id header name.
pub(crate) fn default_webhook_id_header() -> String {
    "X-Shopify-Webhook-Id".to_string()
}

/// Default status for valid signatures.
pub(crate) const fn default_expected_valid_status() -> u16 {
    200
}

/// Default status for invalid signatures.
pub(crate) const fn default_expected_invalid_status() -> u16 {
    401
}

/// Default outbound HTTP timeout.
pub(crate) const fn default_http_timeout_ms() -> u64 {
    10_000
}

/// Default deployment file read limit.
pub(crate) const fn default_deploy_max_file_bytes() -> usize {
    DEFAULT_DEPLOY_MAX_FILE_BYTES
}

/// Default for deployment file rules.
pub(crate) const fn default_deploy_required() -> bool {
    true
}

/// Default git remote name.
pub(crate) fn default_git_remote() -> String {
    "origin".to_string()
}

/// Default environment variable for the diagnosis password.
pub(crate) fn default_password_env() -> String {
    "PREFLIGHT_ADMIN_PASSWORD".to_string()
}

/// Default environment variable for the anon API key.
pub(crate) fn default_anon_key_env() -> String {
    "SUPABASE_ANON_KEY".to_string()
}

/// Default number of products listed by diagnosis.
pub(crate) const fn default_product_limit() -> u32 {
    10
}

/// Default number of import logs listed by diagnosis.
pub(crate) const fn default_import_log_limit() -> u32 {
    5
}

// ============================================================================
// SECTION: Tests
// ============================================================================

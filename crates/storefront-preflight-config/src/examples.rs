// crates/storefront-preflight-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic starting point for `config example` and tests.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for the storefront preflight configuration. The output
//! is deterministic, parses, validates, and passes every lint check.

/// Returns a canonical example `storefront-preflight.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r##"# Theme token sets. Each set must define the same keys for light and dark.
[[themes]]
name = "tailwind.config.js"
light = { background = "#ffffff", surface = "#f9fafb", border = "#e5e7eb", hover = "#f3f4f6", active = "#e5e7eb", primary = "#e11d48" }
dark = { background = "#0a0a0a", surface = "#171717", border = "#262626", hover = "#1f1f1f", active = "#2a2a2a", primary = "#f43f5e" }

[[themes]]
name = "tailwind.config.ts"
light = { background = "#ffffff", surface = "#f9fafb", border = "#e5e7eb", hover = "#f3f4f6", active = "#e5e7eb", primary = "#e11d48" }
dark = { background = "#0a0a0a", surface = "#171717", border = "#262626", hover = "#1f1f1f", active = "#2a2a2a", primary = "#f43f5e" }

[[dev_server.proxy]]
prefix = "/api"
target = "https://project-ref.supabase.co"
change_origin = true

[dev_server.cors]
allowed_origins = ["http://localhost:5173", "https://shop.example.com"]
allowed_headers = ["Authorization", "Content-Type", "apikey", "x-client-info"]
allowed_methods = ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
served_origins = ["http://localhost:5173", "https://shop.example.com"]
allow_credentials = true

[bundle.manual_chunks]
vendor = ["react", "react-dom", "react-router-dom"]
supabase = ["@supabase/supabase-js"]
charts = ["recharts"]

[webhook]
endpoints = [
  "https://project-ref.supabase.co/functions/v1/shopify-order-webhook",
  "https://project-ref.supabase.co/functions/v1/shopify-customer-webhook",
  "https://shop.example.com/api/webhooks/orders",
]
shop_domain = "demo-shop.myshopify.com"
topic = "orders/create"
secret_env = "SHOPIFY_WEBHOOK_SECRET"
timeout_ms = 10000

[deploy]
max_file_bytes = 1048576

[[deploy.files]]
path = ".github/workflows/deploy.yml"
required = true
contains = ["supabase functions deploy"]

[[deploy.files]]
path = "supabase/functions/shopify-order-webhook/index.ts"
required = true
contains = ["X-Shopify-Hmac-Sha256"]

[[deploy.files]]
path = "docs/runbooks/missing-customer-names.md"
required = false

[deploy.git]
remote = "origin"
expected_branch = "main"
require_in_sync = true
required = false

[diagnose]
base_url = "https://project-ref.supabase.co"
email = "ops@example.com"
password_env = "PREFLIGHT_ADMIN_PASSWORD"
anon_key_env = "SUPABASE_ANON_KEY"
product_limit = 10
import_log_limit = 5

[audit]
enabled = false
"##,
    )
}

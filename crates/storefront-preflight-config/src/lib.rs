// crates/storefront-preflight-config/src/lib.rs
// ============================================================================
// Module: Storefront Preflight Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for storefront-preflight.toml semantics.
// Dependencies: serde, serde_json, toml, url
// ============================================================================

//! ## Overview
//! `storefront-preflight-config` defines the configuration model consumed by
//! every preflight check: theme tokens, dev-server proxy and CORS policy,
//! bundle chunk groupings, webhook self-test targets, deployment shape rules,
//! and backend diagnosis settings. Loading is strict and fail-closed for
//! structural problems; semantic findings (token parity, CORS coverage) are
//! left to the lint checks so they can be reported per check.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;

// crates/storefront-preflight-cli/src/lib.rs
// ============================================================================
// Module: Storefront Preflight CLI Library
// Description: Shared helpers for the storefront preflight command line.
// Purpose: Provide the message catalog to the binary and its tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! The binary entry point (`src/main.rs`) imports the message catalog from
//! here so every operator-facing line goes through one place.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Message catalog and translation helpers.
pub mod i18n;

#[cfg(test)]
mod tests;

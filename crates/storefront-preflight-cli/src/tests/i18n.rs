// crates/storefront-preflight-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI Message Catalog Tests
// Description: Unit tests for catalog lookup and placeholder substitution.
// Purpose: Keep rendered CLI messages stable.
// Dependencies: storefront-preflight-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies placeholder substitution, key fallback, and the macro surface.

use crate::i18n::MessageArg;
use crate::i18n::translate;

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(
        "input.read_too_large",
        vec![
            MessageArg::new("path", "payload.json"),
            MessageArg::new("size", "70000"),
            MessageArg::new("limit", "65536"),
        ],
    );
    assert_eq!(
        output,
        "Refusing to read payload.json because it is 70000 bytes (limit 65536)."
    );
}

#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
}

#[test]
fn translate_leaves_unknown_placeholders() {
    let output = translate("env.missing", vec![MessageArg::new("other", "x")]);
    assert_eq!(output, "Environment variable {env} is not set.");
}

#[test]
fn macro_formats_display_values() {
    let output = crate::t!("report.summary", passed = 3, failed = 1, warned = 0, skipped = 2);
    assert_eq!(output, "3 passed, 1 failed, 0 warnings, 2 skipped");
}

// crates/storefront-preflight-probes/src/theme.rs
// ============================================================================
// Module: Theme Token Lint
// Description: Light/dark key parity and hex validity for color token sets.
// Purpose: Catch themes that define a role in one variant but not the other.
// Dependencies: storefront-preflight-config
// ============================================================================

//! ## Overview
//! Each theme set maps semantic color roles to hex values for a light and a
//! dark variant. Parity between the two key sets is a hard check: a role
//! missing from one variant renders with no color at runtime. When several
//! theme sets are configured (for example a JS and a TS build config), roles
//! that differ between them are reported as drift warnings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use storefront_preflight_config::ThemeConfig;

use crate::report::CheckFamily;
use crate::report::CheckOutcome;
use crate::report::CheckReport;

// ============================================================================
// SECTION: Lint
// ============================================================================

/// Lints every configured theme set.
#[must_use]
pub fn lint_themes(themes: &[ThemeConfig]) -> CheckReport {
    let mut report = CheckReport::new(CheckFamily::Themes);
    if themes.is_empty() {
        report.push(CheckOutcome::soft("themes", "theme token sets").skip("no themes configured"));
        return report;
    }
    for theme in themes {
        lint_theme(theme, &mut report);
    }
    if themes.len() > 1 {
        report.push(drift_outcome(themes));
    }
    report
}

/// Lints one theme set.
fn lint_theme(theme: &ThemeConfig, report: &mut CheckReport) {
    let name = theme.name.as_str();

    let present = CheckOutcome::hard(format!("themes.{name}.variants_present"), name);
    let empty: Vec<&str> = [("light", &theme.light), ("dark", &theme.dark)]
        .into_iter()
        .filter(|(_, tokens)| tokens.is_empty())
        .map(|(variant, _)| variant)
        .collect();
    report.push(if empty.is_empty() {
        present.pass()
    } else {
        present.fail(format!("empty variant: {}", empty.join(", ")))
    });

    let parity = CheckOutcome::hard(format!("themes.{name}.key_parity"), name);
    let missing_dark = missing_keys(&theme.light, &theme.dark);
    let missing_light = missing_keys(&theme.dark, &theme.light);
    report.push(if missing_dark.is_empty() && missing_light.is_empty() {
        parity.with_detail(format!("{} roles", theme.light.len()))
    } else {
        let mut parts = Vec::new();
        if !missing_dark.is_empty() {
            parts.push(format!("missing in dark: {}", missing_dark.join(", ")));
        }
        if !missing_light.is_empty() {
            parts.push(format!("missing in light: {}", missing_light.join(", ")));
        }
        parity.fail(parts.join("; "))
    });

    let hex = CheckOutcome::hard(format!("themes.{name}.hex_values"), name);
    let invalid: Vec<String> = [("light", &theme.light), ("dark", &theme.dark)]
        .into_iter()
        .flat_map(|(variant, tokens)| {
            tokens
                .iter()
                .filter(|(_, value)| !is_hex_color(value))
                .map(move |(key, value)| format!("{variant}.{key}={value}"))
        })
        .collect();
    report.push(if invalid.is_empty() {
        hex.pass()
    } else {
        hex.fail(format!("not hex colors: {}", invalid.join(", ")))
    });
}

/// Reports roles whose values or presence differ between theme sets.
fn drift_outcome(themes: &[ThemeConfig]) -> CheckOutcome {
    let outcome = CheckOutcome::soft("themes.drift", "theme sets agree");
    let mut drifted = BTreeSet::new();
    for variant in ["light", "dark"] {
        let mut seen: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for theme in themes {
            let tokens = if variant == "light" { &theme.light } else { &theme.dark };
            for (key, value) in tokens {
                seen.entry(key.as_str()).or_default().insert(value.trim().to_ascii_lowercase());
                *counts.entry(key.as_str()).or_default() += 1;
            }
        }
        for (key, values) in &seen {
            let everywhere = counts.get(key).copied().unwrap_or(0) == themes.len();
            if values.len() > 1 || !everywhere {
                drifted.insert(format!("{variant}.{key}"));
            }
        }
    }
    if drifted.is_empty() {
        outcome.pass()
    } else {
        outcome.warn(format!(
            "roles differ between theme sets: {}",
            drifted.into_iter().collect::<Vec<_>>().join(", ")
        ))
    }
}

/// Returns keys of `from` absent in `to`.
fn missing_keys<'a>(
    from: &'a BTreeMap<String, String>,
    to: &BTreeMap<String, String>,
) -> Vec<&'a str> {
    from.keys().filter(|key| !to.contains_key(*key)).map(String::as_str).collect()
}

// ============================================================================
// SECTION: Hex Colors
// ============================================================================

/// Returns true for `#rgb`, `#rgba`, `#rrggbb`, and `#rrggbbaa` values.
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.trim().strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|ch| ch.is_ascii_hexdigit())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_accepts_supported_lengths() {
        for value in ["#fff", "#FFFA", "#0f172a", "#0F172Acc"] {
            assert!(is_hex_color(value), "{value}");
        }
    }

    #[test]
    fn hex_color_rejects_other_forms() {
        for value in ["fff", "#ff", "#12345", "#ggg", "rgb(0,0,0)", ""] {
            assert!(!is_hex_color(value), "{value}");
        }
    }

    #[test]
    fn missing_keys_lists_only_absent_roles() {
        let mut light = BTreeMap::new();
        light.insert("background".to_string(), "#fff".to_string());
        light.insert("hover".to_string(), "#eee".to_string());
        let mut dark = BTreeMap::new();
        dark.insert("background".to_string(), "#000".to_string());
        assert_eq!(missing_keys(&light, &dark), vec!["hover"]);
        assert!(missing_keys(&dark, &light).is_empty());
    }
}

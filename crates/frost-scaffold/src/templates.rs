//! Scaffold file templates
//!
//! Generated sources are skeletons, not finished assertions: every template
//! embeds `CUSTOMIZE` markers so downstream tooling can tell a scaffold from
//! a completed verification test.

use frost_core::SchemaVersion;

/// Marker embedded in every generated scaffold
pub const CUSTOMIZE_MARKER: &str = "CUSTOMIZE";

/// Source of a drift-check test skeleton for one frozen version
#[must_use]
pub(crate) fn drift_test_source(version: &SchemaVersion, subject: &str) -> String {
    let safe = version.safe_name();
    let test_name = format!("{}_matches_frozen_{safe}", snake_case(subject));
    format!(
        r#"//! Drift check for `{subject}` (frozen schema {version}).
//!
//! Generated once by `frost`; this file is yours. It is never overwritten.

/// Fingerprint recorded when {version} was frozen.
const FROZEN_FINGERPRINT: &str = include_str!("../Fixtures/{version}/fingerprint-{safe}.sha256");

#[test]
fn {test_name}() {{
    // CUSTOMIZE: produce the structural manifest of the *current* `{subject}`
    // definition, e.g. via your frost-runtime helper:
    //
    //     let current = frost_runtime::structural_manifest::<{subject}>();
    //     let fingerprint = frost_runtime::fingerprint(&current);
    //
    let fingerprint = todo!("compute the current fingerprint for {subject}");

    assert_eq!(
        FROZEN_FINGERPRINT.trim(),
        fingerprint,
        "schema {version} has drifted from its frozen definition; \
         if the change is intentional, re-freeze with `frost freeze {version} --force`"
    );

    // CUSTOMIZE: add content-level assertions against the frozen snapshot
    // in Fixtures/{version}/ if structural equality is not enough.
}}
"#
    )
}

/// Source of a migration-pair test skeleton between two frozen versions
#[must_use]
pub(crate) fn migration_pair_source(
    from: &SchemaVersion,
    to: &SchemaVersion,
    plan_type: &str,
) -> String {
    let from_safe = from.safe_name();
    let to_safe = to.safe_name();
    let test_name = format!("migrate_{from_safe}_to_{to_safe}_succeeds");
    format!(
        r#"//! Migration check: {from} -> {to} via `{plan_type}`.
//!
//! Generated once by `frost`; this file is yours. It is never overwritten.

/// Frozen snapshot of the source version.
const SOURCE_SNAPSHOT: &[u8] = include_bytes!("../Fixtures/{from}/snapshot-{from_safe}.db");

#[test]
fn {test_name}() {{
    // CUSTOMIZE: open SOURCE_SNAPSHOT as a {from} store and run `{plan_type}`
    // up to {to}, e.g.:
    //
    //     let store = frost_runtime::open_snapshot(SOURCE_SNAPSHOT);
    //     frost_runtime::migrate::<{plan_type}>(&store, "{to}")
    //         .expect("migration path must execute without failure");
    //
    todo!("execute {plan_type} from {from} to {to} against the frozen snapshot");

    // CUSTOMIZE: assert on migrated content here. Structural success alone
    // does not prove user data survives the upgrade.
}}
"#
    )
}

/// Lower-snake-case form of a type identifier
///
/// `AppSchemaV1` becomes `app_schema_v1`; used for generated file and test
/// names.
#[must_use]
pub(crate) fn snake_case(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    let mut prev_lower = false;
    for ch in identifier.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            for low in ch.to_lowercase() {
                out.push(low);
            }
            prev_lower = false;
        } else {
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
            out.push(ch);
        }
    }
    out
}

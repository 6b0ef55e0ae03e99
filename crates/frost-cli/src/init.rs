//! The `init` subcommand
//!
//! One-time bootstrapping: creates the conventional directory layout and
//! inserts the `frost-runtime` dev-dependency. A missing build descriptor
//! is informational here, not fatal.

use anyhow::Context;
use std::path::Path;

const RUNTIME_DEPENDENCY: &str = "frost-runtime";
const RUNTIME_DEPENDENCY_LINE: &str = "frost-runtime = \"0.1\"";

/// Run init; returns the process exit code
pub(crate) fn run(skip_dependency: bool) -> anyhow::Result<i32> {
    let working_dir = std::env::current_dir().context("cannot determine working directory")?;

    for dir in ["Fixtures", "tests"] {
        let path = working_dir.join(dir);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        println!("ensured {}/", dir);
    }

    let descriptor = working_dir.join("Cargo.toml");
    if !descriptor.is_file() {
        tracing::warn!(dir = %working_dir.display(), "no Cargo.toml found; skipping dependency setup");
        println!("note: no Cargo.toml here; add {RUNTIME_DEPENDENCY_LINE} to your project manually");
        return Ok(0);
    }

    if skip_dependency {
        println!("skipped dependency insertion (--skip-dependency)");
        return Ok(0);
    }

    match insert_dev_dependency(&descriptor)? {
        true => println!("added {RUNTIME_DEPENDENCY} to [dev-dependencies]"),
        false => println!("{RUNTIME_DEPENDENCY} already declared; left untouched"),
    }
    Ok(0)
}

/// Insert the runtime dev-dependency, returning whether a write happened
///
/// The edit is textual (a line inserted under `[dev-dependencies]`, or the
/// section appended) so the user's manifest formatting survives; the result
/// is validated as TOML before it replaces the original.
fn insert_dev_dependency(descriptor: &Path) -> anyhow::Result<bool> {
    let original = std::fs::read_to_string(descriptor)
        .with_context(|| format!("cannot read {}", descriptor.display()))?;
    if original.contains(RUNTIME_DEPENDENCY) {
        return Ok(false);
    }

    let updated = match original.find("[dev-dependencies]") {
        Some(pos) => {
            let insert_at = original[pos..]
                .find('\n')
                .map_or(original.len(), |nl| pos + nl + 1);
            let mut text = original.clone();
            text.insert_str(insert_at, &format!("{RUNTIME_DEPENDENCY_LINE}\n"));
            text
        }
        None => format!("{original}\n[dev-dependencies]\n{RUNTIME_DEPENDENCY_LINE}\n"),
    };

    updated
        .parse::<toml::Value>()
        .context("dependency insertion produced invalid TOML; manifest left untouched")?;
    std::fs::write(descriptor, updated)
        .with_context(|| format!("cannot write {}", descriptor.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn inserts_into_existing_dev_dependencies_section() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = tmp.path().join("Cargo.toml");
        fs::write(
            &manifest,
            "[package]\nname = \"app\"\n\n[dev-dependencies]\ntempfile = \"3\"\n",
        )
        .unwrap();

        assert!(insert_dev_dependency(&manifest).unwrap());
        let text = fs::read_to_string(&manifest).unwrap();
        assert!(text.contains("frost-runtime = \"0.1\""));
        text.parse::<toml::Value>().unwrap();
    }

    #[test]
    fn appends_section_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = tmp.path().join("Cargo.toml");
        fs::write(&manifest, "[package]\nname = \"app\"\n").unwrap();

        assert!(insert_dev_dependency(&manifest).unwrap());
        let text = fs::read_to_string(&manifest).unwrap();
        let value: toml::Value = text.parse().unwrap();
        assert!(value
            .get("dev-dependencies")
            .and_then(|d| d.get("frost-runtime"))
            .is_some());
    }

    #[test]
    fn existing_declaration_is_left_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = tmp.path().join("Cargo.toml");
        let original = "[package]\nname = \"app\"\n\n[dev-dependencies]\nfrost-runtime = \"0.1\"\n";
        fs::write(&manifest, original).unwrap();

        assert!(!insert_dev_dependency(&manifest).unwrap());
        assert_eq!(fs::read_to_string(&manifest).unwrap(), original);
    }
}

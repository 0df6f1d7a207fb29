//! Test fixtures for common test scenarios.
//!
//! Small catalogs that cover every descriptor archetype, base manifests and
//! a throwaway project directory.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::catalog::Catalog;
use crate::core::descriptor::{EsShimDescriptor, ManualDescriptor, SingleFileDescriptor};

/// A catalog with one descriptor of each shape:
/// a static method, a prototype method, a receiver-bound static, a
/// single-file package and two manual names.
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        ManualDescriptor {
            name: "function-bind".into(),
        }
        .into(),
        ManualDescriptor {
            name: "has-symbols".into(),
        }
        .into(),
        EsShimDescriptor::new("object.assign", "Object.assign", true).into(),
        EsShimDescriptor::new("array-includes", "Array.prototype.includes", false).into(),
        EsShimDescriptor::new("promise.allsettled", "Promise.allSettled", true)
            .bind_to("Promise")
            .into(),
        SingleFileDescriptor::new(
            "is-symbol",
            "module.exports = (value) => typeof value === 'symbol';",
        )
        .into(),
    ])
}

/// Base manifest content with the given version.
///
/// Carries an unrelated field before and after the override sections so
/// pass-through and key order can be checked.
pub fn base_manifest(version: &str) -> String {
    format!(
        r#"{{
  "name": "nolyfill-monorepo",
  "version": "{version}",
  "private": true,
  "overrides": {{
    "stale": "npm:stale@1.0.0"
  }},
  "scripts": {{
    "build": "turbo run build"
  }}
}}
"#
    )
}

/// Write [`base_manifest`] as `package.json` into `dir`.
pub fn write_base_manifest(dir: &Path, version: &str) -> PathBuf {
    let path = dir.join("package.json");
    std::fs::write(&path, base_manifest(version)).expect("failed to write package.json");
    path
}

/// A temporary project root holding a base manifest at version `1.0.0`.
///
/// Returns the TempDir handle; dropping it removes the project.
pub fn temp_project() -> TempDir {
    let tmp = TempDir::new().expect("failed to create temp dir");
    write_base_manifest(tmp.path(), "1.0.0");
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_covers_every_kind() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.generated().len(), 4);
        assert!(catalog.validate("@nolyfill").is_ok());
    }

    #[test]
    fn test_temp_project_has_manifest() {
        let project = temp_project();
        let content = std::fs::read_to_string(project.path().join("package.json")).unwrap();
        assert!(content.contains("\"version\": \"1.0.0\""));
    }
}

//! Override manifest synthesis.
//!
//! The override manifest redirects every transitive request for a shimmed
//! package onto the generated replacement. It is written into the project's
//! `package.json` twice: once as registry specs under `overrides` (for npm
//! consumers) and once as workspace specs under `<tool>.overrides` (for the
//! monorepo itself).

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::core::descriptor::scoped_name;
use crate::core::errors::SynthError;

/// Computed override manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideManifest {
    /// Every package name, byte-wise lexicographic
    pub sorted_names: Vec<String>,

    /// `name -> npm:<scope>/<name>@latest`
    pub direct_overrides: BTreeMap<String, String>,

    /// `name -> workspace:<scope>/<name>@*`
    pub workspace_overrides: BTreeMap<String, String>,
}

/// Names occurring more than once, sorted.
pub fn find_duplicates<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_default() += 1;
    }

    let mut duplicates: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect();
    duplicates.sort();
    duplicates
}

/// Registry spec pointing at the latest published replacement.
pub fn registry_spec(scope: &str, name: &str) -> String {
    format!("npm:{}@latest", scoped_name(scope, name))
}

/// Workspace spec pointing at the local replacement.
pub fn workspace_spec(scope: &str, name: &str) -> String {
    format!("workspace:{}@*", scoped_name(scope, name))
}

/// Build the override manifest from every package name.
///
/// Duplicated input names are a catalog bug and are reported, not merged.
pub fn synthesize(all_names: Vec<String>, scope: &str) -> Result<OverrideManifest, SynthError> {
    let duplicates = find_duplicates(all_names.iter().map(String::as_str));
    if !duplicates.is_empty() {
        return Err(SynthError::DuplicateName { names: duplicates });
    }

    let mut sorted_names = all_names;
    sorted_names.sort();

    let direct_overrides = sorted_names
        .iter()
        .map(|name| (name.clone(), registry_spec(scope, name)))
        .collect();
    let workspace_overrides = sorted_names
        .iter()
        .map(|name| (name.clone(), workspace_spec(scope, name)))
        .collect();

    Ok(OverrideManifest {
        sorted_names,
        direct_overrides,
        workspace_overrides,
    })
}

fn to_json_object(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

/// The project `package.json` this run extends.
#[derive(Debug, Clone)]
pub struct BaseManifest {
    path: PathBuf,
    value: Value,
    version: String,
}

impl BaseManifest {
    /// Read and check the project manifest.
    pub fn load(path: &Path) -> Result<Self, SynthError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SynthError::io("read manifest", path, e))?;

        Self::parse(&content, path)
    }

    /// Parse manifest content. The manifest must be an object carrying a
    /// semver `version`, which every generated package inherits.
    pub fn parse(content: &str, path: &Path) -> Result<Self, SynthError> {
        let invalid = |message: String| SynthError::InvalidManifest {
            path: path.to_path_buf(),
            message,
        };

        let value: Value =
            serde_json::from_str(content).map_err(|e| invalid(format!("not valid JSON: {}", e)))?;

        let version = value
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("missing string field `version`".to_string()))?
            .to_string();

        semver::Version::parse(&version)
            .map_err(|e| invalid(format!("invalid version '{}': {}", version, e)))?;

        Ok(BaseManifest {
            path: path.to_path_buf(),
            value,
            version,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Render the extended manifest as it is written to disk.
    pub fn render_extended(
        &self,
        manifest: &OverrideManifest,
        workspace_tool: &str,
    ) -> Result<String, SynthError> {
        let extended = extend_base_manifest(&self.value, manifest, workspace_tool)
            .map_err(|message| SynthError::InvalidManifest {
                path: self.path.clone(),
                message,
            })?;

        Ok(to_json_pretty(&extended))
    }
}

/// Merge the override maps into a base manifest.
///
/// All other fields pass through untouched and keep their position; the
/// override sections are replaced wholesale.
pub fn extend_base_manifest(
    base: &Value,
    manifest: &OverrideManifest,
    workspace_tool: &str,
) -> Result<Value, String> {
    let Value::Object(base) = base else {
        return Err("top-level value must be an object".to_string());
    };

    let mut root = base.clone();
    root.insert(
        "overrides".to_string(),
        to_json_object(&manifest.direct_overrides),
    );

    let mut tool = match root.get(workspace_tool) {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(section)) => section.clone(),
        Some(_) => return Err(format!("`{}` must be an object", workspace_tool)),
    };
    tool.insert(
        "overrides".to_string(),
        to_json_object(&manifest.workspace_overrides),
    );
    root.insert(workspace_tool.to_string(), Value::Object(tool));

    Ok(Value::Object(root))
}

/// Two-space indented JSON with a trailing newline.
pub fn to_json_pretty(value: &Value) -> String {
    format!("{:#}\n", value)
}

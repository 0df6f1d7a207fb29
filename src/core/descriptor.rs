//! Package descriptors.
//!
//! A descriptor is the declarative input for one shim package. There are
//! three archetypes:
//!
//! - [`EsShimDescriptor`]: a single built-in exposed through the es-shim
//!   file convention (`implementation.js`, `polyfill.js`, `shim.js`,
//!   `auto.js`, `index.js`).
//! - [`SingleFileDescriptor`]: a self-contained module body written to
//!   `index.js`.
//! - [`ManualDescriptor`]: a hand-authored package that only takes part in
//!   the override manifest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::errors::SynthError;

/// Runtime floor used when a descriptor does not specify `node`.
pub const DEFAULT_NODE_VERSION: &str = ">=12.4.0";

/// A package descriptor of any archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PackageDescriptor {
    EsShim(EsShimDescriptor),
    SingleFile(SingleFileDescriptor),
    Manual(ManualDescriptor),
}

/// Descriptor for an es-shim style package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsShimDescriptor {
    /// Package name without scope (e.g. `object.assign`)
    pub name: String,

    /// Source expression evaluating to the implementation.
    ///
    /// Must be a valid standalone expression; it is spliced verbatim into
    /// every generated file.
    pub implementation: String,

    /// Static members are bound as-is; prototype methods go through
    /// `uncurryThis` first.
    #[serde(rename = "static", default)]
    pub is_static: bool,

    /// Extra dependencies on top of the shared helper package
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// `engines.node` requirement
    #[serde(default)]
    pub node: Option<String>,

    /// Global the export is permanently bound to (e.g. `Promise`)
    #[serde(default)]
    pub bind_to: Option<String>,
}

/// Descriptor for a single-file package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleFileDescriptor {
    /// Package name without scope
    pub name: String,

    /// Complete module body. Must do its own exporting.
    pub source: String,

    /// Dependencies, written to `package.json` exactly as given
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// `engines.node` requirement
    #[serde(default)]
    pub node: Option<String>,
}

/// Descriptor for a package maintained by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualDescriptor {
    /// Package name without scope
    pub name: String,
}

/// Descriptor archetype, for filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    EsShim,
    SingleFile,
    Manual,
}

impl DescriptorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptorKind::EsShim => "es-shim",
            DescriptorKind::SingleFile => "single-file",
            DescriptorKind::Manual => "manual",
        }
    }
}

impl std::str::FromStr for DescriptorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es-shim" => Ok(DescriptorKind::EsShim),
            "single-file" => Ok(DescriptorKind::SingleFile),
            "manual" => Ok(DescriptorKind::Manual),
            _ => Err(format!(
                "invalid descriptor kind '{}'; expected 'es-shim', 'single-file', or 'manual'",
                s
            )),
        }
    }
}

impl PackageDescriptor {
    /// Package name without scope.
    pub fn name(&self) -> &str {
        match self {
            PackageDescriptor::EsShim(d) => &d.name,
            PackageDescriptor::SingleFile(d) => &d.name,
            PackageDescriptor::Manual(d) => &d.name,
        }
    }

    pub fn kind(&self) -> DescriptorKind {
        match self {
            PackageDescriptor::EsShim(_) => DescriptorKind::EsShim,
            PackageDescriptor::SingleFile(_) => DescriptorKind::SingleFile,
            PackageDescriptor::Manual(_) => DescriptorKind::Manual,
        }
    }

    /// Whether this descriptor produces files on disk.
    pub fn is_generated(&self) -> bool {
        !matches!(self, PackageDescriptor::Manual(_))
    }

    fn dependencies(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            PackageDescriptor::EsShim(d) => Some(&d.dependencies),
            PackageDescriptor::SingleFile(d) => Some(&d.dependencies),
            PackageDescriptor::Manual(_) => None,
        }
    }

    fn node(&self) -> Option<&str> {
        match self {
            PackageDescriptor::EsShim(d) => d.node.as_deref(),
            PackageDescriptor::SingleFile(d) => d.node.as_deref(),
            PackageDescriptor::Manual(_) => None,
        }
    }

    /// Validate a single descriptor.
    ///
    /// `scope` is the npm scope the package is published under; a
    /// descriptor must not depend on its own scoped name.
    pub fn validate(&self, scope: &str) -> Result<(), SynthError> {
        let name = self.name();
        validate_package_name(name)?;

        let invalid = |reason: String| SynthError::InvalidDescriptor {
            name: name.to_string(),
            reason,
        };

        if let Some(deps) = self.dependencies() {
            let own = scoped_name(scope, name);
            if deps.contains_key(&own) || deps.contains_key(name) {
                return Err(invalid(format!("depends on itself (`{}`)", own)));
            }
        }

        // npm range syntax, passed through to `engines.node` as written
        if matches!(self.node(), Some(node) if node.trim().is_empty()) {
            return Err(invalid("node requirement is empty".to_string()));
        }

        if let PackageDescriptor::EsShim(d) = self {
            if d.implementation.trim().is_empty() {
                return Err(invalid("implementation expression is empty".to_string()));
            }
            if matches!(d.bind_to.as_deref(), Some(t) if t.trim().is_empty()) {
                return Err(invalid("bind_to is empty".to_string()));
            }
        }

        Ok(())
    }
}

impl EsShimDescriptor {
    /// Create a descriptor with no extra dependencies, the default runtime
    /// floor and no fixed receiver.
    pub fn new(name: impl Into<String>, implementation: impl Into<String>, is_static: bool) -> Self {
        EsShimDescriptor {
            name: name.into(),
            implementation: implementation.into(),
            is_static,
            dependencies: BTreeMap::new(),
            node: None,
            bind_to: None,
        }
    }

    /// Add an extra dependency.
    pub fn dependency(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), spec.into());
        self
    }

    /// Set the `engines.node` requirement.
    pub fn node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Permanently bind the export to a global.
    pub fn bind_to(mut self, target: impl Into<String>) -> Self {
        self.bind_to = Some(target.into());
        self
    }
}

impl SingleFileDescriptor {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        SingleFileDescriptor {
            name: name.into(),
            source: source.into(),
            dependencies: BTreeMap::new(),
            node: None,
        }
    }

    pub fn dependency(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), spec.into());
        self
    }
}

impl From<EsShimDescriptor> for PackageDescriptor {
    fn from(d: EsShimDescriptor) -> Self {
        PackageDescriptor::EsShim(d)
    }
}

impl From<SingleFileDescriptor> for PackageDescriptor {
    fn from(d: SingleFileDescriptor) -> Self {
        PackageDescriptor::SingleFile(d)
    }
}

impl From<ManualDescriptor> for PackageDescriptor {
    fn from(d: ManualDescriptor) -> Self {
        PackageDescriptor::Manual(d)
    }
}

/// Join a scope and a bare package name (`@nolyfill` + `has` -> `@nolyfill/has`).
pub fn scoped_name(scope: &str, name: &str) -> String {
    format!("{}/{}", scope.trim_end_matches('/'), name)
}

/// Validate a bare npm package name.
///
/// Names are lowercase and limited to `[a-z0-9._-]`, starting with a letter
/// or digit.
pub fn validate_package_name(name: &str) -> Result<(), SynthError> {
    let invalid = |reason: String| SynthError::InvalidDescriptor {
        name: name.to_string(),
        reason,
    };

    let Some(first_char) = name.chars().next() else {
        return Err(invalid("package name cannot be empty".to_string()));
    };

    if !first_char.is_ascii_lowercase() && !first_char.is_ascii_digit() {
        return Err(invalid(
            "package name must start with a lowercase letter or digit".to_string(),
        ));
    }

    if let Some(c) = name
        .chars()
        .find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '-'))
    {
        return Err(invalid(format!(
            "only [a-z0-9._-] allowed in package names, found '{}'",
            c
        )));
    }

    Ok(())
}

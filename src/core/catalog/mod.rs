//! The descriptor catalog.
//!
//! A [`Catalog`] is the immutable set of descriptors for one run. It is built
//! once at startup (from the built-in list or a TOML file) and handed to the
//! synthesis pipeline by reference.

mod builtin;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::descriptor::{DescriptorKind, PackageDescriptor};
use crate::core::errors::SynthError;
use crate::core::manifest::find_duplicates;

/// An ordered collection of package descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "package", default)]
    packages: Vec<PackageDescriptor>,
}

impl Catalog {
    /// Create a catalog from descriptors.
    pub fn new(packages: Vec<PackageDescriptor>) -> Self {
        Catalog { packages }
    }

    /// The catalog shipped with shimgen.
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    /// Load a catalog from a TOML file.
    ///
    /// ```toml
    /// [[package]]
    /// kind = "es-shim"
    /// name = "object.assign"
    /// implementation = "Object.assign"
    /// static = true
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

        Self::parse(&content, path)
    }

    /// Parse a catalog from TOML content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content)
            .with_context(|| format!("failed to parse catalog file: {}", path.display()))
    }

    /// Validate every descriptor and the uniqueness of names.
    pub fn validate(&self, scope: &str) -> Result<(), SynthError> {
        let duplicates = find_duplicates(self.packages.iter().map(|p| p.name()));
        if !duplicates.is_empty() {
            return Err(SynthError::DuplicateName { names: duplicates });
        }

        for package in &self.packages {
            package.validate(scope)?;
        }

        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageDescriptor> {
        self.packages.iter()
    }

    /// Descriptors that produce files on disk.
    pub fn generated(&self) -> Vec<&PackageDescriptor> {
        self.packages.iter().filter(|p| p.is_generated()).collect()
    }

    /// Descriptors of one archetype, in declaration order.
    pub fn by_kind(&self, kind: DescriptorKind) -> impl Iterator<Item = &PackageDescriptor> {
        self.packages.iter().filter(move |p| p.kind() == kind)
    }

    /// All names, manual packages first, in declaration order.
    ///
    /// Duplicates are kept so synthesis can report them.
    pub fn names(&self) -> Vec<String> {
        let manual = self.by_kind(DescriptorKind::Manual);
        let es_shim = self.by_kind(DescriptorKind::EsShim);
        let single_file = self.by_kind(DescriptorKind::SingleFile);

        manual
            .chain(es_shim)
            .chain(single_file)
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Find a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&PackageDescriptor> {
        self.packages.iter().find(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

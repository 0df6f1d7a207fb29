//! Package generation.
//!
//! Turns descriptors into package directories on disk. Each descriptor owns
//! its own directory, so packages are generated in parallel with no
//! coordination between them.

pub mod templates;

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::core::catalog::Catalog;
use crate::core::descriptor::PackageDescriptor;
use crate::core::errors::SynthError;
use crate::util::fs::materialize;

pub use templates::{render, RenderedFile, TemplateContext};

/// Where generated packages live.
#[derive(Debug, Clone)]
pub struct PackageLayout {
    packages_dir: PathBuf,
}

impl PackageLayout {
    /// Layout rooted at `root/<packages_dir>`.
    pub fn new(root: &Path, packages_dir: &str) -> Self {
        PackageLayout {
            packages_dir: root.join(packages_dir),
        }
    }

    pub fn packages_dir(&self) -> &Path {
        &self.packages_dir
    }

    /// Directory of one package.
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.packages_dir.join(name)
    }
}

/// What generating one package did on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    pub name: String,
    /// Files in the package
    pub files: usize,
    /// Files whose content changed
    pub written: usize,
}

impl PackageOutcome {
    pub fn is_fresh(&self) -> bool {
        self.written == 0
    }
}

/// Generate one package. Manual descriptors are skipped and yield `None`.
pub fn generate(
    descriptor: &PackageDescriptor,
    ctx: &TemplateContext,
    layout: &PackageLayout,
) -> Result<Option<PackageOutcome>, SynthError> {
    let Some(files) = render(descriptor, ctx) else {
        return Ok(None);
    };

    let name = descriptor.name();
    let dir = layout.package_dir(name);
    let mut outcome = PackageOutcome {
        name: name.to_string(),
        files: files.len(),
        written: 0,
    };

    for file in &files {
        let path = dir.join(file.path);
        if materialize(&path, &file.content)?.written {
            tracing::debug!("[{}] wrote {}", name, file.path);
            outcome.written += 1;
        }
    }

    tracing::info!("[{}] created", name);
    Ok(Some(outcome))
}

/// Generate every non-manual package of the catalog in parallel.
///
/// Fails on the first error; packages already written stay on disk.
pub fn generate_all(
    catalog: &Catalog,
    ctx: &TemplateContext,
    layout: &PackageLayout,
) -> Result<Vec<PackageOutcome>, SynthError> {
    let descriptors = catalog.generated();

    tracing::info!("Generating {} packages", descriptors.len());

    let mut outcomes = descriptors
        .par_iter()
        .map(|descriptor| generate(descriptor, ctx, layout))
        .filter_map(Result::transpose)
        .collect::<Result<Vec<_>, _>>()?;

    outcomes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(outcomes)
}

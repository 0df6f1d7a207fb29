//! The `sync` pipeline.
//!
//! Phases run strictly in order and the first failure aborts the rest:
//!
//! 1. Generate every package directory (in parallel).
//! 2. Synthesize the override manifest over every name.
//! 3. Look up the size of every original package.
//! 4. Write the extended `package.json` and the data module.
//! 5. Run the workspace package manager.
//!
//! Nothing is rolled back. Every write is content-compared, so re-running
//! after a failure only touches what is still out of date.

use std::path::Path;

use crate::builder::{generate_all, PackageLayout, PackageOutcome};
use crate::core::catalog::Catalog;
use crate::core::errors::SynthError;
use crate::core::manifest::{synthesize, BaseManifest, OverrideManifest};
use crate::ops::aggregate::render_data_module;
use crate::ops::install::Installer;
use crate::sources::enrich::enrich;
use crate::sources::http::SizeFetcher;
use crate::util::config::Config;
use crate::util::context::MANIFEST_FILE;
use crate::util::fs::materialize;

/// Options for a sync run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Skip the size lookup. The data module is left as it is.
    pub offline: bool,

    /// Skip the install step.
    pub no_install: bool,
}

/// What a sync run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Packages generated (manual ones excluded)
    pub packages: usize,
    /// Package files whose content changed
    pub files_written: usize,
    /// Names in the override manifest
    pub overrides: usize,
    /// Size lookups performed
    pub sizes_fetched: usize,
    pub manifest_written: bool,
    pub data_module_written: bool,
    pub installed: bool,
}

/// Validate the catalog and load the project manifest at `root`.
pub fn prepare(root: &Path, catalog: &Catalog, config: &Config) -> Result<BaseManifest, SynthError> {
    catalog.validate(config.scope())?;
    BaseManifest::load(&root.join(MANIFEST_FILE))
}

/// Generate every package of the catalog under `root`.
pub fn generate_packages(
    root: &Path,
    base: &BaseManifest,
    catalog: &Catalog,
    config: &Config,
) -> Result<Vec<PackageOutcome>, SynthError> {
    let ctx = config.template_context(base.version());
    let layout = PackageLayout::new(root, config.packages_dir());
    generate_all(catalog, &ctx, &layout)
}

/// Synthesize the override manifest for every catalog name.
pub fn overrides(catalog: &Catalog, config: &Config) -> Result<OverrideManifest, SynthError> {
    synthesize(catalog.names(), config.scope())
}

/// Run the whole pipeline on the project at `root`.
pub fn sync(
    root: &Path,
    catalog: &Catalog,
    config: &Config,
    fetcher: &dyn SizeFetcher,
    installer: &dyn Installer,
    opts: SyncOptions,
) -> Result<SyncReport, SynthError> {
    let base = prepare(root, catalog, config)?;
    let mut report = SyncReport::default();

    let outcomes = generate_packages(root, &base, catalog, config)?;
    report.packages = outcomes.len();
    report.files_written = outcomes.iter().map(|o| o.written).sum();

    let manifest = overrides(catalog, config)?;
    report.overrides = manifest.sorted_names.len();

    let sizes = if opts.offline {
        tracing::warn!("offline: skipping size lookup, {} is not updated", config.data_module());
        None
    } else {
        Some(enrich(
            &manifest.sorted_names,
            fetcher,
            config.endpoint(),
            config.window(),
        )?)
    };

    let extended = base.render_extended(&manifest, config.workspace_tool())?;
    report.manifest_written = materialize(base.path(), &extended)?.written;

    if let Some(sizes) = sizes {
        report.sizes_fetched = sizes.len();
        let module = render_data_module(&manifest.sorted_names, &sizes);
        report.data_module_written = materialize(&root.join(config.data_module()), &module)?.written;
    }

    if opts.no_install {
        tracing::info!("Skipping install");
    } else {
        installer.install(root)?;
        report.installed = true;
    }

    Ok(report)
}

//! Command implementations

pub mod completions;
pub mod generate;
pub mod list;
pub mod overrides;
pub mod sync;

use std::path::PathBuf;

use anyhow::Result;

use crate::GlobalOptions;
use shimgen::util::{Config, GlobalContext};
use shimgen::Catalog;

/// The project a command runs against.
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub catalog: Catalog,
}

impl Project {
    /// Locate the project root, then load its configuration and catalog.
    pub fn load(global: &GlobalOptions) -> Result<Self> {
        let mut ctx = GlobalContext::new()?.with_root(global.root.clone());
        ctx.set_verbose(global.verbose);

        let root = ctx.find_project_root()?;
        tracing::debug!("project root: {}", root.display());

        let config = ctx.load_config(&root)?;
        let catalog = load_catalog(global)?;

        Ok(Project {
            root,
            config,
            catalog,
        })
    }
}

/// The catalog given with `--catalog`, or the built-in one.
pub fn load_catalog(global: &GlobalOptions) -> Result<Catalog> {
    match &global.catalog {
        Some(path) => Catalog::load(path),
        None => Ok(Catalog::builtin()),
    }
}

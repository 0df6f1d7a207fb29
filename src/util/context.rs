//! Global context for shimgen operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{self, Config, PROJECT_CONFIG_FILE};
use crate::util::diagnostic::suggestions;

/// Name of the project manifest every run extends.
pub const MANIFEST_FILE: &str = "package.json";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global shimgen data (~/.shimgen/)
    home: PathBuf,

    /// Project root given on the command line
    root: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = config::global_config_dir().unwrap_or_else(|| PathBuf::from(".shimgen"));

        Ok(GlobalContext {
            cwd,
            home,
            root: None,
            verbose: false,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Pin the project root instead of searching for it.
    pub fn with_root(mut self, root: Option<PathBuf>) -> Self {
        self.root = root.map(|r| if r.is_absolute() { r } else { self.cwd.join(r) });
        self
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the shimgen home directory (~/.shimgen/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Find the project root.
    ///
    /// An explicit root wins. Otherwise the nearest ancestor of cwd holding
    /// `shimgen.toml` is used, then the nearest one holding `package.json`.
    pub fn find_project_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.root {
            if root.join(MANIFEST_FILE).is_file() {
                return Ok(root.clone());
            }
            anyhow::bail!(
                "no {} in {}\nhelp: {}",
                MANIFEST_FILE,
                root.display(),
                suggestions::NO_MANIFEST
            );
        }

        let configured = self
            .cwd
            .ancestors()
            .find(|dir| dir.join(PROJECT_CONFIG_FILE).is_file() && dir.join(MANIFEST_FILE).is_file());
        let nearest = || self.cwd.ancestors().find(|dir| dir.join(MANIFEST_FILE).is_file());

        configured
            .or_else(nearest)
            .map(Path::to_path_buf)
            .with_context(|| {
                format!(
                    "could not find {} in {} or any parent directory\nhelp: {}",
                    MANIFEST_FILE,
                    self.cwd.display(),
                    suggestions::NO_MANIFEST
                )
            })
    }

    /// Merged global and project configuration for `root`.
    pub fn load_config(&self, root: &Path) -> Result<Config> {
        config::load_config(&self.config_path(), &config::project_config_path(root))
    }
}

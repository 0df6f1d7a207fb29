//! Configuration file support for shimgen.
//!
//! shimgen supports two configuration file locations:
//! - Global: `~/.shimgen/config.toml` - User-wide defaults
//! - Project: `<root>/shimgen.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Every field is
//! optional; unset fields fall back to the stock nolyfill layout.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::TemplateContext;
use crate::core::descriptor::DEFAULT_NODE_VERSION;
use crate::sources::enrich::{DEFAULT_ENDPOINT, DEFAULT_WINDOW};

/// Name of the project config file.
pub const PROJECT_CONFIG_FILE: &str = "shimgen.toml";

const DEFAULT_SCOPE: &str = "@nolyfill";
const DEFAULT_REPOSITORY: &str = "https://github.com/SukkaW/nolyfill";
const DEFAULT_LICENSE: &str = "MIT";
const DEFAULT_PACKAGES_DIR: &str = "packages";
const DEFAULT_WORKSPACE_TOOL: &str = "pnpm";
const DEFAULT_DATA_MODULE: &str = "packages/cli/src/all-packages.ts";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_INSTALL_PROGRAM: &str = "pnpm";

/// shimgen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generated package settings
    pub package: PackageConfig,

    /// Project manifest settings
    pub manifest: ManifestConfig,

    /// Size lookup settings
    pub enrich: EnrichConfig,

    /// Install step settings
    pub install: InstallConfig,
}

/// Settings stamped into every generated package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// npm scope (e.g. `@nolyfill`)
    pub scope: Option<String>,

    /// Scoped name of the runtime helper package
    pub shared: Option<String>,

    /// git URL written to `repository.url`
    pub repository: Option<String>,

    pub license: Option<String>,

    /// Packages directory relative to the project root
    pub packages_dir: Option<String>,

    /// Default `engines.node`
    pub node: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Section that receives the workspace overrides (e.g. `pnpm`)
    pub workspace_tool: Option<String>,

    /// Path of the generated data module, relative to the project root
    pub data_module: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Size lookup endpoint
    pub endpoint: Option<String>,

    /// Concurrent lookups per window
    pub window: Option<usize>,

    /// Per-request deadline in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Package manager executable
    pub program: Option<String>,

    /// Arguments passed to the package manager
    pub args: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, or the defaults if the file doesn't exist.
    ///
    /// A file that exists but fails to parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Package settings
        if other.package.scope.is_some() {
            self.package.scope = other.package.scope;
        }
        if other.package.shared.is_some() {
            self.package.shared = other.package.shared;
        }
        if other.package.repository.is_some() {
            self.package.repository = other.package.repository;
        }
        if other.package.license.is_some() {
            self.package.license = other.package.license;
        }
        if other.package.packages_dir.is_some() {
            self.package.packages_dir = other.package.packages_dir;
        }
        if other.package.node.is_some() {
            self.package.node = other.package.node;
        }

        // Manifest settings
        if other.manifest.workspace_tool.is_some() {
            self.manifest.workspace_tool = other.manifest.workspace_tool;
        }
        if other.manifest.data_module.is_some() {
            self.manifest.data_module = other.manifest.data_module;
        }

        // Enrich settings
        if other.enrich.endpoint.is_some() {
            self.enrich.endpoint = other.enrich.endpoint;
        }
        if other.enrich.window.is_some() {
            self.enrich.window = other.enrich.window;
        }
        if other.enrich.timeout_secs.is_some() {
            self.enrich.timeout_secs = other.enrich.timeout_secs;
        }

        // Install settings
        if other.install.program.is_some() {
            self.install.program = other.install.program;
        }
        if other.install.args.is_some() {
            self.install.args = other.install.args;
        }
    }

    pub fn scope(&self) -> &str {
        self.package.scope.as_deref().unwrap_or(DEFAULT_SCOPE)
    }

    /// Scoped name of the shared helper package. Follows `scope` when unset.
    pub fn shared_package(&self) -> String {
        match &self.package.shared {
            Some(shared) => shared.clone(),
            None => format!("{}/shared", self.scope()),
        }
    }

    pub fn packages_dir(&self) -> &str {
        self.package
            .packages_dir
            .as_deref()
            .unwrap_or(DEFAULT_PACKAGES_DIR)
    }

    pub fn workspace_tool(&self) -> &str {
        self.manifest
            .workspace_tool
            .as_deref()
            .unwrap_or(DEFAULT_WORKSPACE_TOOL)
    }

    pub fn data_module(&self) -> &str {
        self.manifest
            .data_module
            .as_deref()
            .unwrap_or(DEFAULT_DATA_MODULE)
    }

    pub fn endpoint(&self) -> &str {
        self.enrich.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Lookup window, never below 1.
    pub fn window(&self) -> usize {
        self.enrich.window.unwrap_or(DEFAULT_WINDOW).max(1)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.enrich.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn install_program(&self) -> &str {
        self.install
            .program
            .as_deref()
            .unwrap_or(DEFAULT_INSTALL_PROGRAM)
    }

    pub fn install_args(&self) -> Vec<String> {
        self.install
            .args
            .clone()
            .unwrap_or_else(|| vec!["i".to_string()])
    }

    /// Template context for packages stamped with `version`.
    pub fn template_context(&self, version: &str) -> TemplateContext {
        TemplateContext {
            scope: self.scope().to_string(),
            shared_package: self.shared_package(),
            version: version.to_string(),
            repository: self
                .package
                .repository
                .clone()
                .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string()),
            license: self
                .package
                .license
                .clone()
                .unwrap_or_else(|| DEFAULT_LICENSE.to_string()),
            packages_dir: self.packages_dir().to_string(),
            default_node: self
                .package
                .node
                .clone()
                .unwrap_or_else(|| DEFAULT_NODE_VERSION.to_string()),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`<root>/shimgen.toml`)
/// 2. Global config (`~/.shimgen/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Result<Config> {
    let mut config = Config::load_or_default(global_path)?;
    config.merge(Config::load_or_default(project_path)?);
    Ok(config)
}

/// Get the global shimgen config directory (`~/.shimgen`).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".shimgen"))
}

/// Get the global config path (`~/.shimgen/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (`<root>/shimgen.toml`).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_FILE)
}

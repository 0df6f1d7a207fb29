//! Install trigger.
//!
//! After the manifest is rewritten the workspace package manager has to
//! relink every override. The installer is injected so tests never spawn a
//! real package manager.

use std::path::Path;

use crate::core::errors::SynthError;
use crate::util::process::ProcessBuilder;

/// Runs the workspace package manager.
pub trait Installer {
    /// Install dependencies of the project at `root`.
    fn install(&self, root: &Path) -> Result<(), SynthError>;
}

/// [`Installer`] that spawns a package manager with inherited stdio.
#[derive(Debug, Clone)]
pub struct ProcessInstaller {
    program: String,
    args: Vec<String>,
}

impl ProcessInstaller {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        ProcessInstaller {
            program: program.into(),
            args,
        }
    }

    fn command(&self, root: &Path) -> ProcessBuilder {
        ProcessBuilder::new(&self.program)
            .args(&self.args)
            .cwd(root)
    }
}

impl Default for ProcessInstaller {
    fn default() -> Self {
        ProcessInstaller::new("pnpm", vec!["i".to_string()])
    }
}

impl Installer for ProcessInstaller {
    fn install(&self, root: &Path) -> Result<(), SynthError> {
        let command = self.command(root);
        let shown = command.display_command();

        tracing::info!("Running `{}`", shown);
        let status = command.status()?;

        if !status.success() {
            return Err(SynthError::InstallationFailure {
                command: shown,
                code: status.code(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_runs_pnpm_install() {
        let installer = ProcessInstaller::default();
        assert_eq!(installer.command(Path::new(".")).display_command(), "pnpm i");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_installation_failure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let installer = ProcessInstaller::new("sh", vec!["-c".into(), "exit 7".into()]);

        let err = installer.install(tmp.path()).unwrap_err();
        match err {
            SynthError::InstallationFailure { ref command, code } => {
                assert_eq!(command, "sh -c exit 7");
                assert_eq!(code, Some(7));
            }
            ref other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.exit_code(), 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_project_root() {
        let tmp = tempfile::TempDir::new().unwrap();
        let installer = ProcessInstaller::new("sh", vec!["-c".into(), "touch installed".into()]);

        installer.install(tmp.path()).unwrap();
        assert!(tmp.path().join("installed").exists());
    }
}

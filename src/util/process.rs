//! Subprocess execution utilities.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crate::core::errors::SynthError;

/// A command line to run in some directory with inherited stdio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        ProcessBuilder {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Full path of the program when it is on PATH.
    ///
    /// Going through `which` also picks up `pnpm.cmd` style shims on Windows,
    /// which `Command` alone does not.
    pub fn resolve(&self) -> PathBuf {
        find_executable(&self.program).unwrap_or_else(|| PathBuf::from(&self.program))
    }

    /// Run and wait for the exit status.
    pub fn status(&self) -> Result<ExitStatus, SynthError> {
        let mut cmd = Command::new(self.resolve());
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        tracing::debug!("running `{}`", self.display_command());
        cmd.status()
            .map_err(|e| SynthError::io("execute", Path::new(&self.program), e))
    }

    /// The command line as typed, for logs and error messages.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("pnpm").args(["i", "--frozen-lockfile"]);

        assert_eq!(pb.display_command(), "pnpm i --frozen-lockfile");
        assert_eq!(pb.get_args(), ["i", "--frozen-lockfile"]);
    }

    #[test]
    fn test_unknown_program_resolves_to_itself() {
        let pb = ProcessBuilder::new("shimgen-definitely-not-installed");
        assert_eq!(pb.resolve(), PathBuf::from("shimgen-definitely-not-installed"));
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let err = ProcessBuilder::new("shimgen-definitely-not-installed")
            .status()
            .unwrap_err();

        assert!(matches!(err, SynthError::Io { action: "execute", .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_status_reports_exit_code() {
        let status = ProcessBuilder::new("sh").args(["-c", "exit 3"]).status().unwrap();
        assert_eq!(status.code(), Some(3));
    }
}

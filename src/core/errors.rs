//! Synthesis error types and diagnostics.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Fatal error raised by any synthesis phase.
///
/// None of these are retried or downgraded; the first one aborts the run.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("failed to {action} `{}`", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("duplicate package name(s) in catalog: {}", names.join(", "))]
    DuplicateName { names: Vec<String> },

    #[error("invalid descriptor `{name}`: {reason}")]
    InvalidDescriptor { name: String, reason: String },

    #[error("invalid manifest `{}`: {message}", path.display())]
    InvalidManifest { path: PathBuf, message: String },

    #[error("size lookup for `{package}` failed: {message}")]
    NetworkFailure { package: String, message: String },

    #[error("size lookup for `{package}` returned a malformed response: {message}")]
    MalformedResponse { package: String, message: String },

    #[error("failed to start the size lookup workers: {message}")]
    FetchPool { message: String },

    #[error("`{command}` failed with exit code {code:?}")]
    InstallationFailure { command: String, code: Option<i32> },
}

impl SynthError {
    /// Wrap an I/O error with the action and path it happened on.
    pub fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        SynthError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Exit code the CLI should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SynthError::InstallationFailure { code: Some(code), .. } => *code,
            _ => 1,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SynthError::Io { source, path, .. } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context(source.to_string())
                .with_suggestion(suggestions::RERUN_SAFE),

            SynthError::DuplicateName { names } => {
                let mut diag = Diagnostic::error("package names must be unique across the catalog");
                for name in names {
                    diag = diag.with_context(format!("`{}` is declared more than once", name));
                }
                diag.with_suggestion(suggestions::DUPLICATE_NAME)
            }

            SynthError::InvalidDescriptor { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::FIX_CATALOG)
            }

            SynthError::InvalidManifest { path, message } => {
                Diagnostic::error("the project manifest cannot be extended")
                    .with_location(path)
                    .with_context(message.clone())
            }

            SynthError::NetworkFailure { .. } | SynthError::MalformedResponse { .. } => {
                Diagnostic::error(self.to_string())
                    .with_context("no partial size data is written when a lookup fails")
                    .with_suggestion(suggestions::FETCH_FAILED)
                    .with_suggestion(suggestions::OFFLINE)
            }

            SynthError::FetchPool { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::OFFLINE)
            }

            SynthError::InstallationFailure { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::NO_INSTALL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_lists_every_name() {
        let err = SynthError::DuplicateName {
            names: vec!["has".into(), "object-keys".into()],
        };
        assert_eq!(
            err.to_string(),
            "duplicate package name(s) in catalog: has, object-keys"
        );

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("`has` is declared more than once"));
        assert!(output.contains("`object-keys` is declared more than once"));
    }

    #[test]
    fn test_fetch_pool_failure_names_no_path() {
        let err = SynthError::FetchPool {
            message: "could not spawn thread".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to start the size lookup workers: could not spawn thread"
        );

        let output = err.to_diagnostic().format(false);
        assert!(!output.contains("-->"));
        assert!(output.contains("sync --offline"));
    }

    #[test]
    fn test_exit_code_follows_installer() {
        let err = SynthError::InstallationFailure {
            command: "pnpm i".into(),
            code: Some(3),
        };
        assert_eq!(err.exit_code(), 3);

        let killed = SynthError::InstallationFailure {
            command: "pnpm i".into(),
            code: None,
        };
        assert_eq!(killed.exit_code(), 1);
    }
}

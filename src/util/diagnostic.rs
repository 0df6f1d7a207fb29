//! User-friendly diagnostic messages.
//!
//! Every fatal error is rendered with its root cause, the facts that led to
//! it and what to do next:
//!
//! ```text
//! error: size lookup for `has` failed: connection refused
//!   = no partial size data is written when a lookup fails
//!
//! help: consider:
//!   1. Check your network connection and try `shimgen sync` again
//!   2. Run `shimgen sync --offline` to skip the size lookup
//! ```

use std::fmt::{self, Write};
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when two descriptors share a name.
    pub const DUPLICATE_NAME: &str =
        "Remove or rename one of the duplicated descriptors in the catalog";

    /// Suggestion when a descriptor fails validation.
    pub const FIX_CATALOG: &str = "Fix the descriptor and run `shimgen list` to check the catalog";

    /// Suggestion for size lookup failures.
    pub const FETCH_FAILED: &str = "Check your network connection and try `shimgen sync` again";

    /// Suggestion to bypass the size lookup entirely.
    pub const OFFLINE: &str = "Run `shimgen sync --offline` to skip the size lookup";

    /// Suggestion when the install step fails.
    pub const NO_INSTALL: &str =
        "Run `shimgen sync --no-install` and invoke the package manager by hand";

    /// Reassurance after a filesystem error.
    pub const RERUN_SAFE: &str =
        "Files written so far are idempotent; fix the cause and re-run `shimgen sync`";

    /// Suggestion when no project manifest is found.
    pub const NO_MANIFEST: &str = "Run from a directory containing `package.json` or pass `--root`";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    /// Bold red for errors, bold yellow for warnings.
    fn ansi(self) -> &'static str {
        match self {
            Severity::Error => "\x1b[1;31m",
            Severity::Warning => "\x1b[1;33m",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rendered error or warning.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// File the problem is in
    pub location: Option<PathBuf>,
    /// Facts shown under the message, one per line
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            location: None,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    ///
    /// A single suggestion is printed inline; several are numbered.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("{}{}\x1b[0m", code, text)
            } else {
                text.to_string()
            }
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {}",
            paint(self.severity.ansi(), self.severity.label()),
            self.message
        );

        if let Some(path) = &self.location {
            let _ = writeln!(out, "  --> {}", path.display());
        }
        for line in &self.context {
            let _ = writeln!(out, "  = {}", line);
        }

        let help = paint("\x1b[1;32m", "help");
        match self.suggestions.as_slice() {
            [] => {}
            [only] => {
                let _ = write!(out, "\n{}: {}\n", help, only);
            }
            many => {
                let _ = write!(out, "\n{}: consider:\n", help);
                for (i, suggestion) in many.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {}", i + 1, suggestion);
                }
            }
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

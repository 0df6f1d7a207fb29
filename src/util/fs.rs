//! Filesystem utilities.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::core::errors::SynthError;

/// Result of a [`materialize`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Whether the file content changed on disk
    pub written: bool,
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), SynthError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| SynthError::io("create directory", path, e))?;
    }
    Ok(())
}

/// Read a file if it exists. `Ok(None)` means there is no file yet.
pub fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, SynthError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SynthError::io("read", path, e)),
    }
}

/// Write `content` to `path` unless the file already holds exactly that.
///
/// The new content goes to a temporary file next to the target and is
/// renamed over it, so a reader sees either the old or the new file.
///
/// A replaced file keeps its permissions. New files get `0o644` on unix
/// instead of the temporary file's owner-only mode.
pub fn materialize(path: &Path, content: &str) -> Result<WriteOutcome, SynthError> {
    if let Some(existing) = read_if_exists(path)? {
        if existing == content.as_bytes() {
            tracing::trace!("unchanged: {}", path.display());
            return Ok(WriteOutcome { written: false });
        }
    }
    let permissions = target_permissions(path)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    ensure_dir(parent)?;

    let mut tmp =
        NamedTempFile::new_in(parent).map_err(|e| SynthError::io("create temporary file in", parent, e))?;
    tmp.write_all(content.as_bytes())
        .and_then(|_| tmp.flush())
        .map_err(|e| SynthError::io("write", path, e))?;
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| SynthError::io("set permissions of", path, e))?;
    }
    tmp.persist(path)
        .map_err(|e| SynthError::io("replace", path, e.error))?;

    tracing::trace!("written: {}", path.display());
    Ok(WriteOutcome { written: true })
}

/// Permissions the file at `path` should end up with.
fn target_permissions(path: &Path) -> Result<Option<fs::Permissions>, SynthError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(SynthError::io("stat", path, e)),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

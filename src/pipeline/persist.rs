//! Writing results: backups and atomic JSON output.
//!
//! Every overwrite goes through a temp file in the destination directory
//! followed by a rename, so an interrupted run leaves either the old file or
//! the complete new one, never half a document. A replaced file keeps its
//! permissions.

use crate::error::{MigrateError, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// `<dir>/<name>.bak.<stamp>` for `<dir>/<name>`.
pub fn backup_path(path: &Path, stamp: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.bak.{stamp}"))
}

/// Copy `path` to its backup location and return that location.
pub fn backup_file(path: &Path, stamp: &str) -> Result<PathBuf> {
    let backup = backup_path(path, stamp);
    info!("Creating backup: {}", backup.display());
    std::fs::copy(path, &backup).map_err(|e| MigrateError::BackupFailed {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source: e,
    })?;
    Ok(backup)
}

/// Back up `path` only if it already exists.
pub fn backup_if_exists(path: &Path, stamp: &str) -> Result<Option<PathBuf>> {
    if path.exists() {
        backup_file(path, stamp).map(Some)
    } else {
        Ok(None)
    }
}

/// Pretty-print `value` with two-space indentation and a final newline.
///
/// Non-ASCII text is written as-is, not `\u` escaped.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// Serialise `value` and atomically replace `path` with it.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let write_err = |source: std::io::Error| MigrateError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let text = to_pretty_json(value).map_err(|e| write_err(e.into()))?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(write_err)?;

    let mut tmp = new_temp_file(&dir).map_err(write_err)?;
    // An existing target keeps its mode; the rename would otherwise leave
    // the owner-only mode of the temp file behind.
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?;
    }
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// A temp file in `dir` created with the same mode a plain `File::create`
/// would give it (0666 less the umask on Unix).
fn new_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use fs2::FileExt;
use tracing::warn;

use crate::{Error, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial file.
/// Acquires an advisory lock on the temp file while writing.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let result = fill_locked(temp_file, path, &temp_path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));
    if result.is_err() {
        discard_temp(&temp_path);
    }
    result
}

/// Write and sync `content` under an exclusive lock, then close the file.
fn fill_locked(mut file: File, path: &Path, temp_path: &Path, content: &[u8]) -> Result<()> {
    file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    file.write_all(content).map_err(|e| Error::io(temp_path, e))?;
    file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })
}

fn discard_temp(temp_path: &Path) {
    match fs::remove_file(temp_path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %temp_path.display(), "Failed to remove temp file: {e}"),
    }
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write a file that must not exist yet.
///
/// Fails with [`Error::AlreadyExists`] instead of truncating an existing file.
pub fn write_new(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                Error::AlreadyExists {
                    path: path.to_path_buf(),
                }
            } else {
                Error::io(path, e)
            }
        })?;

    file.write_all(content.as_bytes())
        .map_err(|e| Error::io(path, e))
}

/// Mark a file as executable by everyone (`0o755`). No-op off Unix.
pub fn make_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)
            .map_err(|e| Error::io(path, e))?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).map_err(|e| Error::io(path, e))?;
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    Ok(())
}

//! Overwrite-aware copies of files and directory trees
//!
//! A destination that already exists is either left untouched
//! ([`Overwrite::Skip`]) or deleted and copied again as a whole
//! ([`Overwrite::Replace`]). Directory copies never merge into an existing
//! tree, so a replaced destination holds exactly the source contents.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, Result};

/// What to do when the destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overwrite {
    /// Leave the existing destination as it is.
    #[default]
    Skip,
    /// Delete the existing destination, then copy.
    Replace,
}

impl Overwrite {
    /// Map a `--force` style flag to a policy.
    pub fn from_force(force: bool) -> Self {
        if force {
            Overwrite::Replace
        } else {
            Overwrite::Skip
        }
    }
}

/// Result of a single copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The destination did not exist and was created.
    Created,
    /// The destination existed and was replaced.
    Replaced,
    /// The destination existed and was left untouched.
    Skipped,
}

/// Result of removing a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotPresent,
}

/// Copy the directory tree at `src` to `dest`.
///
/// `dest` names the copy itself, not its parent. Missing parents are created.
pub fn copy_dir(src: &Path, dest: &Path, overwrite: Overwrite) -> Result<CopyOutcome> {
    if !src.exists() {
        return Err(Error::SourceNotFound {
            path: src.to_path_buf(),
        });
    }
    if !src.is_dir() {
        return Err(Error::NotADirectory {
            path: src.to_path_buf(),
        });
    }

    let existed = path_exists(dest);
    if existed {
        match overwrite {
            Overwrite::Skip => {
                tracing::debug!(dest = %dest.display(), "Destination exists, skipping copy");
                return Ok(CopyOutcome::Skipped);
            }
            Overwrite::Replace => remove_existing(dest)?,
        }
    }

    copy_tree(src, dest)?;

    Ok(if existed {
        CopyOutcome::Replaced
    } else {
        CopyOutcome::Created
    })
}

/// Copy the file at `src` to `dest`.
pub fn copy_file(src: &Path, dest: &Path, overwrite: Overwrite) -> Result<CopyOutcome> {
    if !src.is_file() {
        return Err(Error::SourceNotFound {
            path: src.to_path_buf(),
        });
    }

    let existed = path_exists(dest);
    if existed {
        match overwrite {
            Overwrite::Skip => {
                tracing::debug!(dest = %dest.display(), "Destination exists, skipping copy");
                return Ok(CopyOutcome::Skipped);
            }
            Overwrite::Replace => remove_existing(dest)?,
        }
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::copy(src, dest).map_err(|e| Error::io(dest, e))?;

    Ok(if existed {
        CopyOutcome::Replaced
    } else {
        CopyOutcome::Created
    })
}

/// Remove a file or directory tree if it exists.
pub fn remove_path(path: &Path) -> Result<RemoveOutcome> {
    if !path_exists(path) {
        return Ok(RemoveOutcome::NotPresent);
    }
    remove_existing(path)?;
    Ok(RemoveOutcome::Removed)
}

/// True for anything at `path`, including dangling symlinks.
fn path_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

fn remove_existing(path: &Path) -> Result<()> {
    let meta = path.symlink_metadata().map_err(|e| Error::io(path, e))?;
    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
    } else {
        fs::remove_file(path).map_err(|e| Error::io(path, e))
    }
}

fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| Error::Walk {
            path: e.path().unwrap_or(src).to_path_buf(),
            message: e.to_string(),
        })?;

        // WalkDir yields paths rooted at `src`
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::Walk {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(&target, e))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_force() {
        assert_eq!(Overwrite::from_force(true), Overwrite::Replace);
        assert_eq!(Overwrite::from_force(false), Overwrite::Skip);
        assert_eq!(Overwrite::default(), Overwrite::Skip);
    }

    #[test]
    fn test_copy_dir_rejects_file_source() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = copy_dir(&file, &temp.path().join("out"), Overwrite::Skip).unwrap_err();
        assert!(matches!(err, Error::NotADirectory { .. }));
    }

    #[test]
    fn test_copy_file_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = copy_file(
            &temp.path().join("missing.json"),
            &temp.path().join("out.json"),
            Overwrite::Replace,
        )
        .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound { .. }));
    }

    #[test]
    fn test_remove_path_not_present() {
        let temp = TempDir::new().unwrap();
        let outcome = remove_path(&temp.path().join("nothing")).unwrap();
        assert_eq!(outcome, RemoveOutcome::NotPresent);
    }
}

//! Repository discovery and `origin` remote handling

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository};
use tracing::debug;

use crate::remote::{ProtocolChange, to_https, toggle_url};
use crate::{Error, Result};

const ORIGIN: &str = "origin";

/// Location of a path inside its enclosing git repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitDetails {
    /// Working directory root of the repository
    pub root: PathBuf,
    /// The inspected path relative to `root` (empty for the root itself)
    pub relative_path: PathBuf,
    /// URL of the `origin` remote, if configured
    pub remote_url: Option<String>,
}

impl GitDetails {
    /// The `origin` URL in HTTPS form.
    pub fn https_remote_url(&self) -> Result<String> {
        let url = self.remote_url.as_deref().ok_or_else(|| Error::NoOrigin {
            path: self.root.clone(),
        })?;
        to_https(url)
    }
}

/// Discover the repository enclosing `path`.
pub fn git_details(path: &Path) -> Result<GitDetails> {
    let canonical = dunce::canonicalize(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let repo = open_enclosing(&canonical)?;
    let workdir = repo.workdir().ok_or_else(|| Error::BareRepository {
        path: canonical.clone(),
    })?;
    let root = dunce::canonicalize(workdir).map_err(|e| Error::Io {
        path: workdir.to_path_buf(),
        source: e,
    })?;

    let relative_path = canonical
        .strip_prefix(&root)
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let remote_url = origin_url(&repo)?;

    debug!(
        root = %root.display(),
        relative = %relative_path.display(),
        "Discovered git repository"
    );

    Ok(GitDetails {
        root,
        relative_path,
        remote_url,
    })
}

/// URL of the `origin` remote, or `None` when the remote does not exist.
pub fn origin_url(repo: &Repository) -> Result<Option<String>> {
    match repo.find_remote(ORIGIN) {
        Ok(remote) => Ok(remote.url().map(str::to_string)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Switch the `origin` remote of the repository enclosing `path` between
/// HTTPS and SSH.
pub fn toggle_origin_protocol(path: &Path) -> Result<ProtocolChange> {
    let repo = open_enclosing(path)?;
    let current = origin_url(&repo)?.ok_or_else(|| Error::NoOrigin {
        path: path.to_path_buf(),
    })?;

    let change = toggle_url(&current)?;
    repo.remote_set_url(ORIGIN, &change.new_url)?;

    debug!(from = %change.old_url, to = %change.new_url, "Updated origin remote");
    Ok(change)
}

fn open_enclosing(path: &Path) -> Result<Repository> {
    Repository::discover(path).map_err(|e| {
        if e.code() == ErrorCode::NotFound {
            Error::NotARepository {
                path: path.to_path_buf(),
            }
        } else {
            Error::Git(e)
        }
    })
}

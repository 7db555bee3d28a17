//! Toolchain version scanning
//!
//! PlatformIO keeps one directory per installed version of a package:
//! `<package>` for the newest install and `<package>@<version>` for pinned
//! ones.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Result};

/// Label of the unversioned package directory.
pub const LATEST: &str = "latest";

/// Installed versions of one package under a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainVersions {
    package: String,
    versions: BTreeMap<String, PathBuf>,
}

impl ToolchainVersions {
    /// Scan `base` for directories named `package` or `package@<version>`.
    ///
    /// The bare directory maps to [`LATEST`], versioned ones to the text after
    /// the last `@`. The bare directory is read first and versioned ones in
    /// name order, so a later label overwrites an earlier one. Files and
    /// empty versions are ignored. A missing `base` is [`Error::NotFound`].
    pub fn scan(base: &Path, package: &str) -> Result<Self> {
        if !base.is_dir() {
            return Err(Error::NotFound {
                path: base.to_path_buf(),
            });
        }

        let mut versions = BTreeMap::new();

        let bare = base.join(package);
        if bare.is_dir() {
            versions.insert(LATEST.to_string(), bare);
        }

        let prefix = format!("{package}@");
        let mut pinned: Vec<(String, PathBuf)> = fs::read_dir(base)
            .map_err(|e| Error::Io {
                path: base.to_path_buf(),
                source: e,
            })?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                name.starts_with(&prefix).then(|| (name, entry.path()))
            })
            .collect();
        pinned.sort();

        for (name, path) in pinned {
            let label = name.rsplit('@').next().unwrap_or_default();
            if label.is_empty() {
                continue;
            }
            versions.insert(label.to_string(), path);
        }

        debug!(
            base = %base.display(),
            package,
            count = versions.len(),
            "Scanned toolchain versions"
        );

        Ok(Self {
            package: package.to_string(),
            versions,
        })
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Labels in display order, see [`compare_labels`].
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.versions.keys().cloned().collect();
        labels.sort_by(|a, b| compare_labels(a, b));
        labels
    }

    pub fn get(&self, label: &str) -> Option<&Path> {
        self.versions.get(label).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Raw label to path mapping.
    pub fn as_map(&self) -> &BTreeMap<String, PathBuf> {
        &self.versions
    }
}

/// Display order of version labels: `latest` first, then semantic versions
/// ascending, then anything else lexically.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a == LATEST, b == LATEST) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    match (semver::Version::parse(a), semver::Version::parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

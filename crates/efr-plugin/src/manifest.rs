//! The `plugins.toml` manifest of externally registered plugins
//!
//! ```toml
//! [[plugin]]
//! name = "plink"
//! command = "/opt/plink/bin/efr-plink"
//! package = "efr-plink"      # default: efr-<name>
//! group = "efr.plugins"      # default
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::ExtensionPoint;
use crate::{Error, Result};

/// One `[[plugin]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub command: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl ManifestEntry {
    /// Package name, defaulting to `<prefix><name>`.
    pub fn package_name(&self, point: &ExtensionPoint) -> String {
        self.package
            .clone()
            .unwrap_or_else(|| format!("{}{}", point.prefix, self.name))
    }

    /// Whether this entry registers under `point`.
    pub fn belongs_to(&self, point: &ExtensionPoint) -> bool {
        self.group.as_deref().unwrap_or(ExtensionPoint::DEFAULT_GROUP) == point.group
    }
}

/// Parsed manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, rename = "plugin")]
    pub plugins: Vec<ManifestEntry>,
}

impl Manifest {
    /// Load a manifest; a missing file is an empty manifest.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No plugin manifest");
            return Ok(Self::default());
        }
        let content = efr_fs::io::read_text(path)?;
        toml::from_str(&content).map_err(|e| Error::ManifestParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        efr_fs::io::write_atomic(path, content.as_bytes())?;
        Ok(())
    }

    /// Add an entry, replacing any entry with the same name.
    pub fn upsert(&mut self, entry: ManifestEntry) {
        self.plugins.retain(|existing| existing.name != entry.name);
        self.plugins.push(entry);
    }

    /// Remove every entry named `name`. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|entry| entry.name != name);
        self.plugins.len() != before
    }
}

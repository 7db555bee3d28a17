//! The hosted registry document

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// `{"description": ..., "install_url": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub description: String,
    pub install_url: String,
}

/// Plugin name to entry, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
}

impl Registry {
    pub fn fetch(client: &efr_http::HttpClient, url: &str) -> Result<Self> {
        let registry: Registry = client.get_json(url)?;
        debug!(count = registry.entries.len(), "Fetched plugin registry");
        Ok(registry)
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, RegistryEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Look up `name`, failing with the list of known plugins.
    pub fn get(&self, name: &str) -> Result<&RegistryEntry> {
        self.entries.get(name).ok_or_else(|| Error::UnknownPlugin {
            name: name.to_string(),
            known: self.names(),
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegistryEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

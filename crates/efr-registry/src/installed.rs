//! Installed-state of registry plugins

use std::collections::HashSet;

use crate::registry::Registry;

/// Package names of the plugins present in this process.
///
/// Plugin `x` counts as installed when a package named `<prefix>x` is
/// present, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InstalledPackages {
    prefix: String,
    packages: HashSet<String>,
}

/// Registry plugin with its installed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginStatus {
    pub name: String,
    pub description: String,
    pub installed: bool,
}

impl InstalledPackages {
    pub fn new<I, S>(prefix: &str, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefix: prefix.to_string(),
            packages: packages
                .into_iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_installed(&self, plugin: &str) -> bool {
        let candidate = format!("{}{}", self.prefix, plugin).to_lowercase();
        self.packages.contains(&candidate)
    }

    /// Every registry plugin with its installed state, in name order.
    pub fn classify(&self, registry: &Registry) -> Vec<PluginStatus> {
        registry
            .iter()
            .map(|(name, entry)| PluginStatus {
                name: name.clone(),
                description: entry.description.clone(),
                installed: self.is_installed(name),
            })
            .collect()
    }
}

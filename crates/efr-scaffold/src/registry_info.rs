//! Registry entries for plugin projects

use std::collections::BTreeMap;
use std::path::Path;

use efr_registry::RegistryEntry;
use serde::Deserialize;

use crate::{Error, Result};

const INSTALL_SCRIPT: &str = "install.sh";
const BRANCH: &str = "main";

#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: Option<String>,
    description: Option<String>,
}

/// The registry entry a plugin project would publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryInfo {
    pub name: String,
    pub entry: RegistryEntry,
}

impl RegistryInfo {
    /// `{"<name>": {"description": ..., "install_url": ...}}`
    pub fn to_json(&self) -> Result<String> {
        let document = BTreeMap::from([(&self.name, &self.entry)]);
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

/// Build the registry entry of the plugin project at `project_dir`.
///
/// The plugin name is the package name without its `efr-` prefix and the
/// install URL points at the raw `install.sh` on the `main` branch.
pub fn registry_info(project_dir: &Path) -> Result<RegistryInfo> {
    let manifest_path = project_dir.join("Cargo.toml");
    if !manifest_path.is_file() {
        return Err(Error::NotAPluginProject {
            path: project_dir.to_path_buf(),
        });
    }

    let content = efr_fs::io::read_text(&manifest_path)?;
    let manifest: CargoManifest =
        toml::from_str(&content).map_err(|source| Error::ManifestParse {
            path: manifest_path.clone(),
            source,
        })?;
    let package = manifest.package.ok_or_else(|| Error::MissingField {
        path: manifest_path.clone(),
        field: "name",
    })?;
    let package_name = package.name.ok_or_else(|| Error::MissingField {
        path: manifest_path.clone(),
        field: "name",
    })?;
    let description = package.description.ok_or_else(|| Error::MissingField {
        path: manifest_path.clone(),
        field: "description",
    })?;

    let details = efr_git::git_details(project_dir)?;
    let remote = details.https_remote_url()?;
    let install_url =
        efr_git::github_raw_url(&remote, BRANCH, &details.relative_path, INSTALL_SCRIPT)?;

    let name = package_name
        .strip_prefix("efr-")
        .unwrap_or(&package_name)
        .to_string();

    Ok(RegistryInfo {
        name,
        entry: RegistryEntry {
            description,
            install_url,
        },
    })
}

//! User configuration
//!
//! Loaded from `--config`, `EFR_CONFIG`, or `<config dir>/efr/config.toml`.
//! A missing file means defaults; every key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, Result};

pub const DEFAULT_ORG: &str = "Every-Flavor-Robotics";
pub const DEFAULT_REGISTRY_URL: &str = "https://raw.githubusercontent.com/Every-Flavor-Robotics/efr/refs/heads/main/efr-plugins/efr-plugins/plugins/plugin_registry.json";
pub const DEFAULT_BOARD_INDEX_URL: &str = "https://raw.githubusercontent.com/Every-Flavor-Robotics/motorgo-experimental-boards/refs/heads/main/efr_board_index.json";
pub const DEFAULT_BOARDS_REPO: &str =
    "https://github.com/Every-Flavor-Robotics/motorgo-experimental-boards/";

const CONFIG_FILE: &str = "config.toml";
const MANIFEST_FILE: &str = "plugins.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub github: GithubConfig,
    pub platformio: PlatformIoConfig,
    pub motorgo: MotorgoConfig,
    pub plugins: PluginsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    pub org: String,
    pub api_url: String,
    pub token: Option<String>,
    /// Base URL of the hardware/software license texts
    pub license_url: String,
    /// Base URL of the `.gitignore` template API
    pub gitignore_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            org: DEFAULT_ORG.to_string(),
            api_url: efr_github::org::DEFAULT_API_URL.to_string(),
            token: None,
            license_url: efr_github::resources::DEFAULT_LICENSE_BASE.to_string(),
            gitignore_url: efr_github::resources::DEFAULT_GITIGNORE_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformIoConfig {
    /// PlatformIO core directory; falls back to `PLATFORMIO_CORE_DIR`, then `~/.platformio`
    pub home: Option<PathBuf>,
    pub framework_package: String,
    pub platform_package: String,
}

impl Default for PlatformIoConfig {
    fn default() -> Self {
        Self {
            home: None,
            framework_package: efr_boards::layout::DEFAULT_FRAMEWORK_PACKAGE.to_string(),
            platform_package: efr_boards::layout::DEFAULT_PLATFORM_PACKAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotorgoConfig {
    pub board_index_url: String,
    pub boards_repo: String,
    /// Variant directories, relative to the boards repository
    pub variants_path: PathBuf,
    /// Board JSON files, relative to the boards repository
    pub board_json_path: PathBuf,
}

impl Default for MotorgoConfig {
    fn default() -> Self {
        Self {
            board_index_url: DEFAULT_BOARD_INDEX_URL.to_string(),
            boards_repo: DEFAULT_BOARDS_REPO.to_string(),
            variants_path: PathBuf::from(efr_boards::source::DEFAULT_VARIANTS_PATH),
            board_json_path: PathBuf::from(efr_boards::source::DEFAULT_BOARD_JSON_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginsConfig {
    pub registry_url: String,
    /// Program run as `<program> uninstall efr-<name>`
    pub package_manager: String,
    /// Plugin manifest; defaults to `plugins.toml` next to the config file
    pub manifest: Option<PathBuf>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            package_manager: efr_registry::PackageManager::default().program,
            manifest: None,
        }
    }
}

impl Config {
    /// `<config dir>/efr/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("efr").join(CONFIG_FILE))
    }

    /// Load `path`, or defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = efr_fs::io::read_text(path)?;
        let config = toml::from_str(&content).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Fill settings left unset in the file from the environment.
    pub fn with_env(mut self, github_token: Option<String>) -> Self {
        if self.github.token.is_none() {
            self.github.token = github_token.filter(|t| !t.is_empty());
        }
        self
    }

    /// Plugin manifest location for a config file at `config_path`.
    pub fn manifest_path(&self, config_path: &Path) -> PathBuf {
        match &self.plugins.manifest {
            Some(path) => path.clone(),
            None => config_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(MANIFEST_FILE),
        }
    }
}

//! Location of a PlatformIO installation

use std::path::{Path, PathBuf};

use crate::Result;
use crate::scan::ToolchainVersions;

pub const DEFAULT_FRAMEWORK_PACKAGE: &str = "framework-arduinoespressif32";
pub const DEFAULT_PLATFORM_PACKAGE: &str = "espressif32";

/// A PlatformIO home (`~/.platformio` by default) and the two packages
/// board definitions are installed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformIoLayout {
    pub home: PathBuf,
    pub framework_package: String,
    pub platform_package: String,
}

impl PlatformIoLayout {
    /// Layout with the Arduino-ESP32 framework and espressif32 platform.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            framework_package: DEFAULT_FRAMEWORK_PACKAGE.to_string(),
            platform_package: DEFAULT_PLATFORM_PACKAGE.to_string(),
        }
    }

    pub fn with_packages(mut self, framework: impl Into<String>, platform: impl Into<String>) -> Self {
        self.framework_package = framework.into();
        self.platform_package = platform.into();
        self
    }

    /// Pick the home directory: explicit setting, then `PLATFORMIO_CORE_DIR`,
    /// then `~/.platformio`.
    pub fn resolve_home(
        configured: Option<&Path>,
        core_dir_env: Option<&Path>,
        user_home: Option<&Path>,
    ) -> Option<PathBuf> {
        configured
            .or(core_dir_env)
            .map(Path::to_path_buf)
            .or_else(|| user_home.map(|home| home.join(".platformio")))
    }

    /// Directory holding framework packages.
    pub fn packages_dir(&self) -> PathBuf {
        self.home.join("packages")
    }

    /// Directory holding platforms.
    pub fn platforms_dir(&self) -> PathBuf {
        self.home.join("platforms")
    }

    pub fn framework_versions(&self) -> Result<ToolchainVersions> {
        ToolchainVersions::scan(&self.packages_dir(), &self.framework_package)
    }

    pub fn platform_versions(&self) -> Result<ToolchainVersions> {
        ToolchainVersions::scan(&self.platforms_dir(), &self.platform_package)
    }
}

//! A fake PlatformIO home directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const FRAMEWORK_PACKAGE: &str = "framework-arduinoespressif32";
pub const PLATFORM_PACKAGE: &str = "espressif32";

/// Temporary `~/.platformio` with `packages/` and `platforms/` populated on
/// demand.
///
/// ```rust,no_run
/// use efr_test_utils::platformio::FakePlatformIo;
///
/// let pio = FakePlatformIo::new()
///     .with_framework("latest")
///     .with_framework("3.0.7")
///     .with_platform("latest");
/// assert!(pio.framework_dir("3.0.7").join("variants").is_dir());
/// ```
pub struct FakePlatformIo {
    temp_dir: TempDir,
}

impl Default for FakePlatformIo {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePlatformIo {
    /// Empty home with `packages/` and `platforms/` directories.
    pub fn new() -> Self {
        let temp_dir =
            TempDir::new().unwrap_or_else(|e| panic!("FakePlatformIo: temp dir: {e}"));
        for dir in ["packages", "platforms"] {
            fs::create_dir_all(temp_dir.path().join(dir))
                .unwrap_or_else(|e| panic!("FakePlatformIo: create {dir}: {e}"));
        }
        Self { temp_dir }
    }

    pub fn home(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a framework package version with an empty `variants/` directory.
    /// `latest` creates the bare package directory.
    pub fn with_framework(self, version: &str) -> Self {
        let dir = self.framework_dir(version);
        mkdir(&dir.join("variants"));
        self
    }

    /// Add a framework package version without a `variants/` directory.
    pub fn with_broken_framework(self, version: &str) -> Self {
        mkdir(&self.framework_dir(version));
        self
    }

    /// Add a platform package version with an empty `boards/` directory.
    pub fn with_platform(self, version: &str) -> Self {
        let dir = self.platform_dir(version);
        mkdir(&dir.join("boards"));
        self
    }

    pub fn framework_dir(&self, version: &str) -> PathBuf {
        self.home()
            .join("packages")
            .join(versioned(FRAMEWORK_PACKAGE, version))
    }

    pub fn platform_dir(&self, version: &str) -> PathBuf {
        self.home()
            .join("platforms")
            .join(versioned(PLATFORM_PACKAGE, version))
    }

    /// Installed variant directory of `board` for a framework version.
    pub fn variant_dir(&self, version: &str, board: &str) -> PathBuf {
        self.framework_dir(version).join("variants").join(board)
    }

    /// Installed board JSON of `board` for a platform version.
    pub fn board_json(&self, version: &str, board: &str) -> PathBuf {
        self.platform_dir(version)
            .join("boards")
            .join(format!("{board}.json"))
    }
}

fn versioned(package: &str, version: &str) -> String {
    if version == "latest" {
        package.to_string()
    } else {
        format!("{package}@{version}")
    }
}

fn mkdir(path: &Path) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("FakePlatformIo: create {}: {e}", path.display()));
}

//! Host package manager used to uninstall plugins

use std::process::Command;

use tracing::debug;

use crate::{Error, Result};

/// Program invoked as `<program> uninstall <package>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManager {
    pub program: String,
}

impl Default for PackageManager {
    fn default() -> Self {
        Self {
            program: "cargo".to_string(),
        }
    }
}

impl PackageManager {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Uninstall `package`, inheriting stdio.
    pub fn uninstall(&self, package: &str) -> Result<()> {
        debug!(program = %self.program, package, "Uninstalling package");
        let status = Command::new(&self.program)
            .args(["uninstall", package])
            .status()
            .map_err(|e| Error::PackageManager {
                program: self.program.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(Error::UninstallFailed {
                program: self.program.clone(),
                package: package.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

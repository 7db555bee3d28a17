//! Downloading and running plugin install scripts

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::registry::RegistryEntry;
use crate::{Error, Result};

/// Script flavor for the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// `install.sh` run with `sh`
    Shell,
    /// `install.ps1` run with `powershell -ExecutionPolicy Bypass -File`
    PowerShell,
}

impl ScriptKind {
    pub fn for_host() -> Self {
        if cfg!(windows) {
            ScriptKind::PowerShell
        } else {
            ScriptKind::Shell
        }
    }

    /// Registry URLs point at `install.sh`; PowerShell uses the sibling
    /// `install.ps1`.
    pub fn script_url(self, install_url: &str) -> String {
        match self {
            ScriptKind::Shell => install_url.to_string(),
            ScriptKind::PowerShell => install_url.replace("install.sh", "install.ps1"),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ScriptKind::Shell => ".sh",
            ScriptKind::PowerShell => ".ps1",
        }
    }

    pub fn interpreter(self) -> &'static str {
        match self {
            ScriptKind::Shell => "sh",
            ScriptKind::PowerShell => "powershell",
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.interpreter())
    }
}

/// Exit state of a script run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptOutcome {
    pub success: bool,
    pub code: Option<i32>,
}

/// Runs a downloaded script file.
pub trait ScriptRunner {
    fn run(&self, kind: ScriptKind, script: &Path) -> std::io::Result<ScriptOutcome>;
}

/// Runs scripts with the platform interpreter, inheriting stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ScriptRunner for SystemRunner {
    fn run(&self, kind: ScriptKind, script: &Path) -> std::io::Result<ScriptOutcome> {
        let mut command = Command::new(kind.interpreter());
        if kind == ScriptKind::PowerShell {
            command.args(["-ExecutionPolicy", "Bypass", "-File"]);
        }
        let status = command.arg(script).status()?;
        Ok(ScriptOutcome {
            success: status.success(),
            code: status.code(),
        })
    }
}

/// Download the install script of `entry` and run it.
///
/// The script lives in a temporary file that is deleted after the run,
/// whether the script succeeded, failed, or could not be started.
pub fn install_plugin(
    client: &efr_http::HttpClient,
    entry: &RegistryEntry,
    kind: ScriptKind,
    runner: &dyn ScriptRunner,
) -> Result<()> {
    let url = kind.script_url(&entry.install_url);
    let body = client.get_text(&url)?;

    let mut file = tempfile::Builder::new()
        .prefix("efr-install-")
        .suffix(kind.extension())
        .tempfile()
        .map_err(|e| Error::Script {
            path: std::env::temp_dir(),
            source: e,
        })?;
    file.as_file_mut()
        .write_all(body.as_bytes())
        .map_err(|e| Error::Script {
            path: file.path().to_path_buf(),
            source: e,
        })?;
    efr_fs::io::make_executable(file.path())?;

    // Closes the handle so the interpreter can open the file on every platform
    let script = file.into_temp_path();
    debug!(%url, script = %script.display(), "Running install script");
    let result = runner.run(kind, &script);

    let script_path = script.to_path_buf();
    if let Err(e) = script.close() {
        warn!(path = %script_path.display(), "Failed to remove install script: {e}");
    }

    let outcome = result.map_err(|e| Error::Interpreter {
        interpreter: kind.interpreter().to_string(),
        source: e,
    })?;
    if !outcome.success {
        return Err(Error::ScriptFailed {
            url,
            code: outcome.code,
        });
    }
    Ok(())
}

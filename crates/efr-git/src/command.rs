//! `git` subprocess wrappers

use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

use crate::{Error, Result};

/// Run `git clone <url> [dest]` from `cwd`.
pub fn clone(url: &str, cwd: &Path, dest: Option<&Path>) -> Result<()> {
    let mut args = vec!["clone".to_string(), url.to_string()];
    if let Some(dest) = dest {
        args.push(dest.to_string_lossy().into_owned());
    }
    run_git(cwd, &args)?;
    Ok(())
}

/// Stage every change in `root` and commit it with `message`.
pub fn commit_all(root: &Path, message: &str) -> Result<()> {
    run_git(root, &["add".to_string(), ".".to_string()])?;
    run_git(
        root,
        &["commit".to_string(), "-m".to_string(), message.to_string()],
    )?;
    Ok(())
}

fn run_git(cwd: &Path, args: &[String]) -> Result<Output> {
    let command = format!("git {}", args.join(" "));
    debug!(cwd = %cwd.display(), %command, "Running git");

    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| Error::GitUnavailable { source: e })?;

    if !output.status.success() {
        return Err(Error::CommandFailed {
            command,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}

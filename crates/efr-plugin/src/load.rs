//! Isolated loading of plugin entries

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

use crate::command::{CommandLeaf, CommandNode, Invocation};
use crate::discovery::{PluginEntry, PluginTarget};
use crate::{LoadError, RunError};

/// Result of loading one entry. A failure never aborts composition.
pub enum LoadOutcome<C, E> {
    Loaded {
        name: String,
        package: String,
        node: CommandNode<C, E>,
    },
    Failed {
        name: String,
        package: String,
        error: LoadError,
    },
}

impl<C, E> LoadOutcome<C, E> {
    pub fn name(&self) -> &str {
        match self {
            LoadOutcome::Loaded { name, .. } | LoadOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

/// Resolve `entry` into a command node.
///
/// Built-in constructors run under `catch_unwind`, so a panicking plugin
/// becomes [`LoadOutcome::Failed`] like any other load error. External
/// entries must point at an executable file.
pub fn load<C, E>(entry: &PluginEntry<C, E>) -> LoadOutcome<C, E>
where
    C: 'static,
    E: From<RunError> + 'static,
{
    debug!(plugin = %entry.name, source = %entry.source, "Loading plugin");

    let result = efr_fs::validate_identifier("plugin name", &entry.name)
        .map_err(|e| LoadError::InvalidName {
            name: entry.name.clone(),
            reason: e.to_string(),
        })
        .and_then(|()| match &entry.target {
            PluginTarget::Builtin(ctor) => construct(*ctor).and_then(validate),
            PluginTarget::External(command) => external_command(&entry.name, command),
        });

    match result {
        Ok(node) => LoadOutcome::Loaded {
            name: entry.name.clone(),
            package: entry.package.clone(),
            node,
        },
        Err(error) => {
            warn!(plugin = %entry.name, "Failed to load plugin: {error}");
            LoadOutcome::Failed {
                name: entry.name.clone(),
                package: entry.package.clone(),
                error,
            }
        }
    }
}

/// Leaf that runs `command` with the remaining argv and inherited stdio.
pub fn external_command<C, E>(name: &str, command: &Path) -> Result<CommandNode<C, E>, LoadError>
where
    C: 'static,
    E: From<RunError> + 'static,
{
    check_executable(command)?;

    let program = command.to_path_buf();
    let about = format!("External plugin ({})", program.display());
    let leaf = CommandLeaf::new(name, about, move |_ctx: &mut C, invocation: &Invocation| {
        run_external(&program, &invocation.args).map_err(E::from)
    });
    Ok(leaf.into())
}

fn construct<C, E>(
    ctor: fn() -> Result<CommandNode<C, E>, LoadError>,
) -> Result<CommandNode<C, E>, LoadError> {
    panic::catch_unwind(AssertUnwindSafe(ctor)).unwrap_or_else(|payload| {
        Err(LoadError::Panicked {
            message: panic_message(payload.as_ref()),
        })
    })
}

fn validate<C, E>(node: CommandNode<C, E>) -> Result<CommandNode<C, E>, LoadError> {
    if let Err(e) = efr_fs::validate_identifier("command name", node.name()) {
        return Err(LoadError::InvalidName {
            name: node.name().to_string(),
            reason: e.to_string(),
        });
    }
    if !node.is_invocable() {
        return Err(LoadError::NotInvocable {
            name: node.name().to_string(),
        });
    }
    Ok(node)
}

fn check_executable(command: &Path) -> Result<(), LoadError> {
    let path = || command.to_path_buf();
    let metadata =
        std::fs::metadata(command).map_err(|_| LoadError::CommandNotFound { path: path() })?;
    if !metadata.is_file() {
        return Err(LoadError::NotAFile { path: path() });
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(LoadError::NotExecutable { path: path() });
        }
    }

    Ok(())
}

fn run_external(program: &Path, args: &[String]) -> Result<(), RunError> {
    debug!(program = %program.display(), ?args, "Running external plugin");
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| RunError::Spawn {
            program: program.to_path_buf(),
            source: e,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(RunError::Exited {
            program: program.to_path_buf(),
            code: status.code(),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

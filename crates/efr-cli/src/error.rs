//! Error types for efr-cli

use std::path::PathBuf;

use efr_plugin::{DispatchError, RunError};

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Plugin(#[from] efr_plugin::Error),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Boards(#[from] efr_boards::Error),

    #[error(transparent)]
    Registry(#[from] efr_registry::Error),

    #[error(transparent)]
    Github(#[from] efr_github::Error),

    #[error(transparent)]
    Git(#[from] efr_git::Error),

    #[error(transparent)]
    Http(#[from] efr_http::Error),

    #[error(transparent)]
    Scaffold(#[from] efr_scaffold::Error),

    #[error(transparent)]
    Fs(#[from] efr_fs::Error),

    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// Argument parsing failed, or help/version was requested
    #[error(transparent)]
    Clap(#[from] clap::Error),

    /// Bad input from the user
    #[error("{message}")]
    User { message: String },

    /// The operation ran but left the environment incomplete; details were
    /// already printed
    #[error("{message}")]
    Incomplete { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::Incomplete {
            message: message.into(),
        }
    }

    /// `0` for help and version output, `1` for user errors, `2` for the
    /// environment.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Clap(e) if !e.use_stderr() => 0,
            CliError::Clap(_) | CliError::User { .. } => 1,
            CliError::Fs(e) | CliError::Boards(efr_boards::Error::Fs(e)) => fs_exit_code(e),
            CliError::Registry(e) => match e {
                efr_registry::Error::UnknownPlugin { .. }
                | efr_registry::Error::AlreadyInstalled { .. } => 1,
                efr_registry::Error::Fs(e) => fs_exit_code(e),
                _ => 2,
            },
            CliError::Github(efr_github::Error::UnknownChoice { .. }) => 1,
            CliError::Scaffold(e) => match e {
                efr_scaffold::Error::MissingPlaceholders { .. }
                | efr_scaffold::Error::AlreadyExists { .. }
                | efr_scaffold::Error::NotAPluginProject { .. } => 1,
                efr_scaffold::Error::Fs(e) => fs_exit_code(e),
                _ => 2,
            },
            _ => 2,
        }
    }

    /// Captured stderr of a failed subprocess, if any.
    pub fn subprocess_stderr(&self) -> Option<&str> {
        match self {
            CliError::Git(efr_git::Error::CommandFailed { stderr, .. }) => Some(stderr),
            _ => None,
        }
    }
}

fn fs_exit_code(e: &efr_fs::Error) -> i32 {
    match e {
        efr_fs::Error::InvalidIdentifier { .. } | efr_fs::Error::AlreadyExists { .. } => 1,
        _ => 2,
    }
}

impl From<DispatchError<CliError>> for CliError {
    fn from(e: DispatchError<CliError>) -> Self {
        match e {
            DispatchError::Command(inner) => inner,
            unknown @ DispatchError::UnknownCommand { .. } => CliError::user(unknown.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_user_error_message() {
        let error = CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_unknown_command_is_a_user_error() {
        let error: CliError = DispatchError::<CliError>::UnknownCommand {
            path: "efr".to_string(),
            name: "nope".to_string(),
            available: vec!["gh".to_string(), "motorgo".to_string()],
        }
        .into();

        assert_eq!(error.exit_code(), 1);
        assert!(error.to_string().contains("available: gh, motorgo"));
    }

    #[test]
    fn test_environment_errors_exit_2() {
        let missing = CliError::from(efr_boards::Error::NotFound {
            path: PathBuf::from("/pio/packages"),
        });
        assert_eq!(missing.exit_code(), 2);

        let not_repo = CliError::from(efr_git::Error::NotARepository {
            path: PathBuf::from("/tmp"),
        });
        assert_eq!(not_repo.exit_code(), 2);

        assert_eq!(CliError::incomplete("2 steps failed").exit_code(), 2);
    }

    #[test]
    fn test_invalid_board_name_is_a_user_error() {
        let error = CliError::from(efr_boards::Error::Fs(efr_fs::Error::InvalidIdentifier {
            kind: "board name".to_string(),
            value: "../x".to_string(),
            reason: "bad".to_string(),
        }));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_subprocess_stderr() {
        let error = CliError::from(efr_git::Error::CommandFailed {
            command: "git clone x".to_string(),
            code: Some(128),
            stderr: "fatal: repository not found".to_string(),
        });
        assert_eq!(error.subprocess_stderr(), Some("fatal: repository not found"));
        assert_eq!(error.exit_code(), 2);
    }
}

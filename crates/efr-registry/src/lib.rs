//! Plugin registry for efr
//!
//! The registry is a hosted JSON object mapping plugin names to a
//! description and an install script URL. Installing runs that script;
//! uninstalling goes through the host package manager.

pub mod error;
pub mod installed;
pub mod package;
pub mod registry;
pub mod script;

pub use error::{Error, Result};
pub use installed::{InstalledPackages, PluginStatus};
pub use package::PackageManager;
pub use registry::{Registry, RegistryEntry};
pub use script::{ScriptKind, ScriptOutcome, ScriptRunner, SystemRunner, install_plugin};

//! Plugin model for efr
//!
//! Plugins register under an [`ExtensionPoint`]. The host
//! [discovers](Discovery::discover) every [`PluginEntry`], [loads](load) each
//! one behind a recoverable boundary, and [composes](compose) the resulting
//! command trees under a root [`CommandGroup`] that dispatches argv.
//!
//! Entries come from three sources, in order:
//!
//! - built-in constructors compiled into the binary
//! - the `plugins.toml` manifest
//! - `efr-<name>` executables on `PATH`

pub mod command;
pub mod compose;
pub mod discovery;
pub mod error;
pub mod load;
pub mod manifest;

pub use command::{CommandGroup, CommandLeaf, CommandNode, Dispatch, Handler, Invocation};
pub use compose::{CompositionReport, FailedPlugin, LoadedPlugin, Override, compose};
pub use discovery::{Discovery, ExtensionPoint, PluginEntry, PluginSource, PluginTarget};
pub use error::{DispatchError, Error, LoadError, Result, RunError};
pub use load::{LoadOutcome, external_command, load};
pub use manifest::{Manifest, ManifestEntry};

//! Built-in plugins and composition of the root command tree

pub mod gh;
pub mod manager;
pub mod motorgo;

use std::ffi::OsString;
use std::path::Path;

use clap::Parser;
use efr_plugin::{
    CommandGroup, CommandNode, Discovery, ExtensionPoint, Invocation, PluginEntry, compose, load,
};
use tracing::warn;

use crate::banner;
use crate::context::PluginState;
use crate::context::Session;
use crate::error::{CliError, Result};

pub type Node = CommandNode<Session, CliError>;
pub type Root = CommandGroup<Session, CliError>;

/// Package name prefix of efr plugins.
pub const PACKAGE_PREFIX: &str = ExtensionPoint::DEFAULT_PREFIX;

fn discovery(manifest: Option<&Path>, search_path: Option<OsString>) -> Discovery<Session, CliError> {
    let mut discovery = Discovery::new(ExtensionPoint::default())
        .with_builtin(PluginEntry::builtin("gh", "efr-gh", gh::command))
        .with_builtin(PluginEntry::builtin("motorgo", "efr-motorgo", motorgo::command))
        .with_builtin(PluginEntry::builtin("plugins", "efr-plugins", manager::command))
        .with_search_path(search_path);
    if let Some(manifest) = manifest {
        discovery = discovery.with_manifest(manifest);
    }
    discovery
}

/// Discover, load and attach every plugin under a fresh `efr` root.
///
/// A manifest that cannot be read is reported and left out; the remaining
/// sources still load.
pub fn compose_root(manifest: &Path, search_path: Option<OsString>) -> (Root, PluginState) {
    let entries = match discovery(Some(manifest), search_path.clone()).discover() {
        Ok(entries) => entries,
        Err(e) => {
            warn!(manifest = %manifest.display(), "Ignoring plugin manifest: {e}");
            discovery(None, search_path).discover().unwrap_or_default()
        }
    };

    attach(&entries)
}

/// The built-in plugins alone, without manifest or `PATH` entries.
pub fn compose_builtins() -> Root {
    let entries = discovery(None, None).discover().unwrap_or_default();
    attach(&entries).0
}

fn attach(entries: &[PluginEntry<Session, CliError>]) -> (Root, PluginState) {
    let packages = entries.iter().map(|entry| entry.package.clone()).collect();
    let mut root = Root::new("efr", banner::ABOUT).with_fallback(banner::show);
    let report = compose(&mut root, entries.iter().map(load));

    (root, PluginState { report, packages })
}

/// Parse a handler's arguments with clap.
///
/// `--help` and `--version` come back as [`CliError::Clap`] and are printed
/// with exit code 0 by `main`.
pub fn parse<T: Parser>(invocation: &Invocation) -> Result<T> {
    Ok(invocation.parse::<T>()?)
}

/// `(name, about)` of every root command, for `efr --help`.
pub fn listing(root: &Root) -> Vec<(String, String)> {
    root.child_names()
        .into_iter()
        .filter_map(|name| {
            let about = root.get(&name)?.about().to_string();
            Some((name, about))
        })
        .collect()
}

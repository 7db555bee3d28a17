//! Shell completion through `COMPLETE=<shell> efr`
//!
//! The completer sees the composed plugin tree as nested clap commands.
//! Only `gh clone` completes argument values; other leaves accept anything.

use std::path::PathBuf;

use clap::{Arg, Command, CommandFactory};
use efr_plugin::CommandNode;
use tracing::debug;

use crate::cli::Cli;
use crate::config::{Config, GithubConfig};
use crate::plugins::{self, Node, Root, gh};

/// Command definition handed to [`clap_complete::CompleteEnv`].
pub fn command() -> Command {
    let config_path = std::env::var_os("EFR_CONFIG")
        .map(PathBuf::from)
        .or_else(Config::default_path);
    let (config, manifest) = match config_path {
        Some(path) => {
            let config = Config::load(&path).unwrap_or_else(|e| {
                debug!("Completing with default config: {e}");
                Config::default()
            });
            let manifest = config.manifest_path(&path);
            (config, Some(manifest))
        }
        None => (Config::default(), None),
    };
    let config = config.with_env(std::env::var("GITHUB_TOKEN").ok());

    let root = match manifest {
        Some(manifest) => plugins::compose_root(&manifest, std::env::var_os("PATH")).0,
        None => plugins::compose_builtins(),
    };
    from_tree(&root, &config.github)
}

fn from_tree(root: &Root, github: &GithubConfig) -> Command {
    let mut command = Cli::command();
    for name in root.child_names() {
        if let Some(node) = root.get(&name) {
            command = command.subcommand(node_command(node, root.name(), github));
        }
    }
    command
}

fn node_command(node: &Node, parent: &str, github: &GithubConfig) -> Command {
    if parent == "gh" && node.name() == "clone" {
        return gh::clone_completion(github.clone()).about(node.about().to_string());
    }

    let mut command = Command::new(node.name().to_string()).about(node.about().to_string());
    match node {
        CommandNode::Group(group) => {
            for name in group.child_names() {
                if let Some(child) = group.get(&name) {
                    command = command.subcommand(node_command(child, group.name(), github));
                }
            }
        }
        CommandNode::Leaf(_) => {
            command = command.arg(
                Arg::new("args")
                    .num_args(0..)
                    .trailing_var_arg(true)
                    .allow_hyphen_values(true),
            );
        }
    }
    command
}

//! Top-level argument parsing
//!
//! Only the global options are parsed here. Everything from the first
//! non-option token on is handed to the plugin command tree untouched.

use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};

/// Every Flavor Robotics command line tool
#[derive(Parser, Debug)]
#[command(name = "efr", version, about, long_about = None)]
#[command(disable_help_flag = true, disable_help_subcommand = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file [default: <config dir>/efr/config.toml]
    #[arg(long, env = "EFR_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print help
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub help: bool,

    #[command(subcommand)]
    pub command: Option<PluginCommand>,
}

/// Whatever follows the global options, plugin name first.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PluginCommand {
    #[command(external_subcommand)]
    Args(Vec<String>),
}

impl Cli {
    /// Argv for the root command group.
    pub fn command_args(&self) -> &[String] {
        match &self.command {
            Some(PluginCommand::Args(args)) => args,
            None => &[],
        }
    }

    /// `efr --help`, with the composed plugins listed after the options.
    pub fn render_help(plugins: &[(String, String)]) -> String {
        let mut listing = String::from("Plugins:\n");
        if plugins.is_empty() {
            listing.push_str("  (no plugins loaded)\n");
        }
        let width = plugins.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, about) in plugins {
            listing.push_str(&format!("  {name:<width$}  {about}\n"));
        }

        Cli::command()
            .override_usage("efr [OPTIONS] [COMMAND] [ARGS]...")
            .after_help(listing)
            .render_help()
            .to_string()
    }
}

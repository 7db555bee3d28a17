//! efr: the Every Flavor Robotics command line tool
//!
//! Every command is a plugin. The built-in `gh`, `motorgo` and `plugins`
//! plugins are composed with those registered in the plugin manifest and
//! `efr-*` executables on `PATH`.

mod banner;
mod cli;
mod completion;
mod config;
mod context;
mod error;
mod interactive;
mod plugins;

use std::path::PathBuf;

use clap::Parser;
use clap_complete::CompleteEnv;
use colored::Colorize;
use efr_plugin::Dispatch;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use context::Session;
use error::{CliError, Result};

fn main() {
    CompleteEnv::with_factory(completion::command).complete();

    if let Err(e) = run() {
        report(&e);
        std::process::exit(e.exit_code());
    }
}

fn report(e: &CliError) {
    if let CliError::Clap(clap_error) = e {
        // Help and version land here too and go to stdout
        if let Err(print_error) = clap_error.print() {
            tracing::debug!("Failed to print clap output: {print_error}");
        }
        return;
    }
    eprintln!("{}: {}", "error".red().bold(), e);
    if let Some(stderr) = e.subprocess_stderr() {
        for line in stderr.lines() {
            eprintln!("    {}", line.red());
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("EFR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
    if let Err(e) = result {
        eprintln!("{} failed to set up logging: {e}", "warning:".yellow().bold());
    }
}

fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => Config::default_path().ok_or_else(|| {
            CliError::user("Cannot locate the user config directory; pass --config <PATH>")
        }),
    }
}

fn run() -> Result<()> {
    let cli = Cli::try_parse()?;
    init_logging(cli.verbose);
    tracing::debug!(args = ?cli.command_args(), "Starting efr");

    let config_path = config_path(&cli)?;
    let config = Config::load(&config_path)?.with_env(std::env::var("GITHUB_TOKEN").ok());
    let mut session = Session::new(config, config_path)?;

    let (root, state) = plugins::compose_root(&session.manifest_path(), std::env::var_os("PATH"));
    session.plugins = state;

    if cli.help {
        print!("{}", Cli::render_help(&plugins::listing(&root)));
        return Ok(());
    }

    match root.dispatch(&mut session, cli.command_args())? {
        Dispatch::Ran => {}
        Dispatch::Help(text) => print!("{text}"),
    }
    Ok(())
}

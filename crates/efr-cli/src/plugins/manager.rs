//! `efr plugins`: create, list, install and remove efr plugins

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use efr_plugin::{CommandGroup, CommandLeaf, Invocation, LoadError, Manifest};
use efr_registry::{
    InstalledPackages, PackageManager, PluginStatus, Registry, ScriptKind, SystemRunner,
    install_plugin,
};
use efr_scaffold::{InstallScripts, TemplateSet, create_plugin_project, registry_info};
use tabled::settings::object::Columns;
use tabled::settings::{Modify, Style, Width};
use tabled::{Table, Tabled};
use tracing::debug;

use super::{Node, PACKAGE_PREFIX, parse};
use crate::context::Session;
use crate::error::{CliError, Result};
use crate::interactive;

const DESCRIPTION_WIDTH: usize = 60;

pub fn command() -> std::result::Result<Node, LoadError> {
    Ok(CommandGroup::new("plugins", "Create and manage efr plugins")
        .with_fallback(summary)
        .with_child(CommandLeaf::new(
            "init",
            "Create a new plugin project",
            init,
        ))
        .with_child(CommandLeaf::new(
            "list",
            "List plugins available in the registry",
            list,
        ))
        .with_child(CommandLeaf::new(
            "install",
            "Install a plugin from the registry",
            install,
        ))
        .with_child(CommandLeaf::new(
            "uninstall",
            "Uninstall a plugin",
            uninstall,
        ))
        .with_child(CommandLeaf::new(
            "get-registry-info",
            "Print the registry entry for a plugin project",
            get_registry_info,
        ))
        .into())
}

/// Create a new plugin project
#[derive(Parser, Debug)]
struct InitArgs {
    /// Plugin name; the project is created as efr-<NAME>
    name: String,

    /// Directory to create the project in (defaults to the current directory)
    #[arg(long)]
    path: Option<PathBuf>,

    /// One-line description of the plugin
    #[arg(long)]
    description: Option<String>,
}

/// List plugins available in the registry
#[derive(Parser, Debug)]
struct ListArgs {}

/// Install a plugin from the registry
#[derive(Parser, Debug)]
struct InstallArgs {
    /// Registry name of the plugin
    name: String,

    /// Reinstall even if the plugin is already installed
    #[arg(long)]
    upgrade: bool,
}

/// Uninstall a plugin
#[derive(Parser, Debug)]
struct UninstallArgs {
    /// Name of the plugin
    name: String,
}

/// Print the registry entry for a plugin project
#[derive(Parser, Debug)]
struct RegistryInfoArgs {
    /// Plugin project directory (defaults to the current directory)
    #[arg(long)]
    path: Option<PathBuf>,
}

#[derive(Tabled)]
struct PluginRow {
    #[tabled(rename = "Plugin")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Installed")]
    installed: &'static str,
}

impl From<PluginStatus> for PluginRow {
    fn from(status: PluginStatus) -> Self {
        Self {
            name: status.name,
            description: status.description,
            installed: if status.installed { "yes" } else { "no" },
        }
    }
}

fn summary(_session: &mut Session, _invocation: &Invocation) -> Result<()> {
    println!("{}", "🔌  efr plugins  🔌".green().bold());
    println!();
    println!(
        "{}",
        "Create new plugins, browse the plugin registry and manage installed plugins.".cyan()
    );
    println!();
    println!("{}", "Commands:".cyan().bold());
    for (name, about) in [
        ("init", "Create a new plugin project"),
        ("list", "List plugins available in the registry"),
        ("install", "Install a plugin from the registry"),
        ("uninstall", "Uninstall a plugin"),
        ("get-registry-info", "Print the registry entry for a plugin project"),
    ] {
        println!("  {}", format!("{name:<20} {about}").yellow());
    }
    println!();
    println!("{}", "Examples:".cyan().bold());
    println!("  efr plugins list");
    println!("  efr plugins init blink --description \"Blink an LED\"");
    Ok(())
}

fn current_dir_or(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => Ok(std::env::current_dir()?),
    }
}

fn init(_session: &mut Session, invocation: &Invocation) -> Result<()> {
    let args: InitArgs = parse(invocation)?;
    efr_fs::validate_identifier("plugin name", &args.name)?;

    let parent = current_dir_or(args.path)?;
    if !parent.is_dir() {
        return Err(CliError::user(format!(
            "Directory '{}' does not exist",
            parent.display()
        )));
    }
    let description = match args.description {
        Some(description) => description,
        None => interactive::text("Plugin description", None)?,
    };

    let templates = TemplateSet::embedded()?;
    let scaffold = create_plugin_project(&templates, &parent, &args.name, &description)?;

    println!(
        "{} Created plugin '{}' in {}",
        "OK".green().bold(),
        scaffold.name,
        scaffold.dir.display()
    );
    for file in &scaffold.files {
        println!("   {}", file.display().to_string().dimmed());
    }
    if let InstallScripts::Skipped { reason } = &scaffold.install_scripts {
        eprintln!(
            "{} install scripts were not generated: {reason}",
            "warning:".yellow().bold()
        );
    }

    println!();
    println!("{}", "Next steps:".cyan().bold());
    println!("  cd {}", scaffold.dir.display());
    println!("  cargo install --path .");
    println!("  efr {} --help", scaffold.name);
    Ok(())
}

fn list(session: &mut Session, invocation: &Invocation) -> Result<()> {
    let _args: ListArgs = parse(invocation)?;
    let registry = Registry::fetch(session.http(), &session.config.plugins.registry_url)?;
    if registry.is_empty() {
        println!("{}", "The plugin registry is empty.".yellow());
        return Ok(());
    }

    let installed = InstalledPackages::new(PACKAGE_PREFIX, &session.plugins.packages);
    let rows: Vec<PluginRow> = installed
        .classify(&registry)
        .into_iter()
        .map(PluginRow::from)
        .collect();

    println!("{}", "Available plugins:".cyan().bold());
    let mut table = Table::new(rows);
    table.with(Style::sharp()).with(
        Modify::new(Columns::new(1..2)).with(Width::wrap(DESCRIPTION_WIDTH).keep_words(true)),
    );
    println!("{table}");
    Ok(())
}

fn install(session: &mut Session, invocation: &Invocation) -> Result<()> {
    let args: InstallArgs = parse(invocation)?;
    let registry = Registry::fetch(session.http(), &session.config.plugins.registry_url)?;
    let entry = registry.get(&args.name)?;

    let installed = InstalledPackages::new(PACKAGE_PREFIX, &session.plugins.packages);
    if installed.is_installed(&args.name) && !args.upgrade {
        return Err(efr_registry::Error::AlreadyInstalled { name: args.name }.into());
    }

    let kind = ScriptKind::for_host();
    println!(
        "{} Installing plugin '{}' with {kind}...",
        "=>".blue().bold(),
        args.name
    );
    install_plugin(session.http(), entry, kind, &SystemRunner)?;
    println!(
        "{} Installed plugin '{}'. Run 'efr {}' to use it.",
        "OK".green().bold(),
        args.name,
        args.name
    );
    Ok(())
}

fn uninstall(session: &mut Session, invocation: &Invocation) -> Result<()> {
    let args: UninstallArgs = parse(invocation)?;
    efr_fs::validate_identifier("plugin name", &args.name)?;

    let manifest_path = session.manifest_path();
    let unregistered = match Manifest::load(&manifest_path) {
        Ok(mut manifest) => {
            let removed = manifest.remove(&args.name);
            if removed {
                manifest.save(&manifest_path)?;
                debug!(manifest = %manifest_path.display(), plugin = %args.name, "Removed manifest entry");
                println!(
                    "{} Removed '{}' from {}",
                    "OK".green().bold(),
                    args.name,
                    manifest_path.display()
                );
            }
            removed
        }
        // A broken manifest must not block removing the package itself
        Err(e) => {
            eprintln!(
                "{} ignoring plugin manifest {}: {e}",
                "warning:".yellow().bold(),
                manifest_path.display()
            );
            false
        }
    };

    let package = format!("{PACKAGE_PREFIX}{}", args.name);
    let manager = PackageManager::new(&session.config.plugins.package_manager);
    println!(
        "{} Uninstalling {package} with {}...",
        "=>".blue().bold(),
        manager.program
    );
    match manager.uninstall(&package) {
        Ok(()) => {
            println!("{} Uninstalled plugin '{}'", "OK".green().bold(), args.name);
            Ok(())
        }
        Err(e) if unregistered => {
            eprintln!("{} {e}", "warning:".yellow().bold());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn get_registry_info(_session: &mut Session, invocation: &Invocation) -> Result<()> {
    let args: RegistryInfoArgs = parse(invocation)?;
    let project = current_dir_or(args.path)?;
    let info = registry_info(&project)?;

    println!(
        "{}",
        "Add this entry to the plugin registry:".cyan().bold()
    );
    println!("{}", info.to_json()?);
    Ok(())
}

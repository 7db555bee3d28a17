//! `efr motorgo`: MotorGo board definitions for PlatformIO

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use efr_boards::{BoardIndex, InstallReport, Installer, Selection, Step, StepStatus};
use efr_plugin::{CommandGroup, CommandLeaf, Invocation, LoadError};
use tracing::{debug, warn};

use super::{Node, parse};
use crate::context::Session;
use crate::error::{CliError, Result};
use crate::interactive::PromptSelector;

const BOARD_DOCS_URL: &str = "https://docs.motorgo.net/standalone_mode/board_setup";

pub fn command() -> std::result::Result<Node, LoadError> {
    let boards = CommandGroup::new(
        "boards",
        "Tools for interacting with custom board definitions",
    )
    .with_fallback(boards_summary)
    .with_child(CommandLeaf::new(
        "list",
        "Print the available boards and their identifiers",
        list,
    ))
    .with_child(CommandLeaf::new(
        "install",
        "Install a custom board definition for PlatformIO",
        install,
    ))
    .with_child(CommandLeaf::new(
        "uninstall",
        "Remove a custom board definition from PlatformIO",
        uninstall,
    ));

    Ok(CommandGroup::new(
        "motorgo",
        "Tools for MotorGo hardware and software development",
    )
    .with_fallback(summary)
    .with_child(boards)
    .into())
}

/// Install a custom board definition for PlatformIO
///
/// If you don't know which versions of the platform and framework to install
/// to, use --all to install to every installed version. This is generally safe!
#[derive(Parser, Debug)]
struct InstallArgs {
    /// Identifier of the board to install, e.g. motorgo_plink
    #[arg(long)]
    board_name: String,

    /// Install to every installed framework and platform version
    #[arg(short, long)]
    all: bool,

    /// Overwrite existing board installations
    #[arg(long)]
    force: bool,

    /// Use a local checkout of the boards repository instead of cloning it
    #[arg(long, value_name = "PATH")]
    custom_board_path: Option<PathBuf>,
}

/// Remove a custom board definition from PlatformIO
#[derive(Parser, Debug)]
struct UninstallArgs {
    /// Identifier of the board to remove
    #[arg(long)]
    board_name: String,

    /// Remove from every installed framework and platform version
    #[arg(short, long)]
    all: bool,
}

/// Print the available boards and their identifiers
#[derive(Parser, Debug)]
struct ListArgs {}

fn summary(_session: &mut Session, _invocation: &Invocation) -> Result<()> {
    println!("{}", "⚙️  efr motorgo  ⚙️".green().bold());
    println!();
    println!(
        "{}",
        "The motorgo plugin provides tools for managing MotorGo hardware and software development."
            .cyan()
    );
    println!();
    println!("{}", "List of software dev commands:".cyan().bold());
    println!(
        "  {}",
        "boards               Tools for interacting with custom board definitions".yellow()
    );
    println!();
    println!("{}", "Examples:".cyan().bold());
    println!("  efr motorgo boards install --help");
    println!("  efr motorgo boards list");
    println!();
    println!("Invoke any subcommand with --help for more details on usage.");
    println!("{}", "Happy MotorGo hacking!".magenta().bold());
    Ok(())
}

fn boards_summary(session: &mut Session, _invocation: &Invocation) -> Result<()> {
    println!(
        "{}",
        "Tools for working with experimental board definitions.\n"
            .green()
            .bold()
    );
    println!(
        "{}",
        format!(
            "To check if a board is experimental or production, refer to the docs at: {BOARD_DOCS_URL}\n"
        )
        .cyan()
    );
    println!("{}", "Available Commands:".cyan().bold());
    println!(
        "{}",
        "\tinstall\t\tInstall custom board definitions for PlatformIO".yellow()
    );
    println!(
        "{}",
        "\tuninstall\tRemove custom board definitions from PlatformIO".yellow()
    );
    println!(
        "{}",
        "\tlist\t\tPrint the available boards and their identifiers".yellow()
    );
    println!();
    println!("{}", "Available Boards:".cyan().bold());
    match BoardIndex::fetch(session.http(), &session.config.motorgo.board_index_url) {
        Ok(index) => {
            for board in &index.boards {
                println!("{}", format!("\t{}: {}", board.name, board.identifier).yellow());
            }
        }
        Err(e) => println!("{}", format!("\tError fetching board list: {e}").red()),
    }
    Ok(())
}

fn list(session: &mut Session, invocation: &Invocation) -> Result<()> {
    let _args: ListArgs = parse(invocation)?;
    let index = BoardIndex::fetch(session.http(), &session.config.motorgo.board_index_url)?;
    if index.boards.is_empty() {
        println!("{}", "No boards available.".yellow());
    }
    for board in &index.boards {
        println!("{}", format!("{}: {}", board.name, board.identifier).yellow());
    }
    Ok(())
}

fn install(session: &mut Session, invocation: &Invocation) -> Result<()> {
    let args: InstallArgs = parse(invocation)?;
    efr_fs::validate_identifier("board name", &args.board_name)?;
    if let Some(path) = &args.custom_board_path {
        if !path.is_dir() {
            return Err(CliError::user(format!(
                "Custom board path '{}' does not exist",
                path.display()
            )));
        }
    }

    println!(
        "{} Installing board '{}'...",
        "=>".blue().bold(),
        args.board_name
    );
    check_board_in_index(session, &args.board_name, args.custom_board_path.is_some())?;

    let installer = Installer::new(session.platformio_layout()?);
    let selector = PromptSelector;
    let selection = if args.all {
        Selection::All
    } else {
        Selection::Choose(&selector)
    };

    let report = match &args.custom_board_path {
        Some(path) => install_from(session, &installer, path, &args, selection)?,
        None => {
            let checkout = tempfile::Builder::new().prefix("efr-boards-").tempdir()?;
            let root = checkout.path().join("boards");
            println!(
                "{} Cloning {}...",
                "=>".blue().bold(),
                session.config.motorgo.boards_repo
            );
            let result = efr_git::clone(
                &session.config.motorgo.boards_repo,
                checkout.path(),
                Some(&root),
            )
            .map_err(CliError::from)
            .and_then(|()| install_from(session, &installer, &root, &args, selection));

            let checkout_path = checkout.path().to_path_buf();
            if let Err(e) = checkout.close() {
                warn!(path = %checkout_path.display(), "Failed to remove boards checkout: {e}");
            }
            result?
        }
    };

    print_report(&report);
    finish(&report, "install")
}

fn install_from(
    session: &Session,
    installer: &Installer,
    root: &Path,
    args: &InstallArgs,
    selection: Selection<'_>,
) -> Result<InstallReport> {
    let assets = session.board_source(root).resolve(&args.board_name)?;
    debug!(board = %assets.board, variant = %assets.variant_dir.display(), "Resolved board assets");
    Ok(installer.install(&assets, selection, args.force)?)
}

/// Refuse boards missing from the hosted index.
///
/// When the index is unreachable and a local checkout was given the check is
/// skipped.
fn check_board_in_index(session: &Session, board: &str, has_local_source: bool) -> Result<()> {
    match BoardIndex::fetch(session.http(), &session.config.motorgo.board_index_url) {
        Ok(index) if index.contains(board) => Ok(()),
        Ok(_) => Err(CliError::user(format!(
            "Board '{board}' not found in the list of available boards. \
             Run 'efr motorgo boards list' to see the list of available boards."
        ))),
        Err(e) if has_local_source => {
            eprintln!(
                "{} could not fetch the board index, skipping the board check: {e}",
                "warning:".yellow().bold()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn uninstall(session: &mut Session, invocation: &Invocation) -> Result<()> {
    let args: UninstallArgs = parse(invocation)?;
    efr_fs::validate_identifier("board name", &args.board_name)?;

    println!(
        "{} Uninstalling board '{}'...",
        "=>".blue().bold(),
        args.board_name
    );
    let installer = Installer::new(session.platformio_layout()?);
    let selector = PromptSelector;
    let selection = if args.all {
        Selection::All
    } else {
        Selection::Choose(&selector)
    };

    let report = installer.uninstall(&args.board_name, selection)?;
    print_report(&report);
    finish(&report, "uninstall")
}

fn print_report(report: &InstallReport) {
    for step in &report.steps {
        print_step(step);
    }
    for note in &report.notes {
        eprintln!("{} {note}", "warning:".yellow().bold());
    }
}

fn print_step(step: &Step) {
    let label = format!("[{} {}]", step.target, step.version);
    let destination = step.destination.display();
    match &step.status {
        StepStatus::Installed | StepStatus::Replaced | StepStatus::Removed => println!(
            "{} {label} {}: {destination}",
            "OK".green().bold(),
            step.status
        ),
        StepStatus::NotPresent => println!("{} {label} not present: {destination}", "--".dimmed()),
        StepStatus::Skipped => eprintln!(
            "{} {label} {destination} already exists, skipping (use --force to overwrite)",
            "warning:".yellow().bold()
        ),
        StepStatus::Failed(reason) => eprintln!("{} {label} {reason}", "error:".red().bold()),
    }
}

fn finish(report: &InstallReport, action: &str) -> Result<()> {
    if report.has_failures() {
        return Err(CliError::incomplete(format!(
            "Board {action} failed for some toolchain versions"
        )));
    }
    if report.stopped_early {
        return Err(CliError::incomplete(format!(
            "Board {action} stopped: no installed toolchain versions found"
        )));
    }
    println!(
        "{} Board '{}' {action} finished.",
        "OK".green().bold(),
        report.board
    );
    Ok(())
}

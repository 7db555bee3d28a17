//! `efr gh`: convenience commands over the organization's repositories

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use clap_complete::engine::{ArgValueCandidates, CompletionCandidate};
use colored::Colorize;
use efr_git::RemoteProtocol;
use efr_github::{GitignoreTemplate, OrgClient, ProjectType, fuzzy_filter};
use efr_http::HttpClient;
use efr_plugin::{CommandGroup, CommandLeaf, Invocation, LoadError};
use efr_scaffold::TemplateSet;
use tabled::settings::object::Columns;
use tabled::settings::{Modify, Style, Width};
use tabled::{Table, Tabled};
use tracing::debug;

use super::{Node, parse};
use crate::config::GithubConfig;
use crate::context::Session;
use crate::error::{CliError, Result};
use crate::interactive;

const DEFAULT_EMOJI: &str = "🤖";
const COMMIT_MESSAGE: &str = "Initialize repository with efr";
const DESCRIPTION_WIDTH: usize = 70;

pub fn command() -> std::result::Result<Node, LoadError> {
    Ok(CommandGroup::new(
        "gh",
        "Convenience commands for the organization's GitHub repositories",
    )
    .with_fallback(summary)
    .with_child(CommandLeaf::new(
        "list",
        "List repositories, optionally filtered by a fuzzy pattern",
        list,
    ))
    .with_child(CommandLeaf::new(
        "clone",
        "Clone a repository of the organization",
        clone,
    ))
    .with_child(CommandLeaf::new(
        "init",
        "Add a README, LICENSE and .gitignore to the current repository",
        init,
    ))
    .with_child(CommandLeaf::new(
        "toggle-protocol",
        "Switch the origin remote between HTTPS and SSH",
        toggle_protocol,
    ))
    .into())
}

/// List repositories, optionally filtered by a fuzzy pattern
#[derive(Parser, Debug)]
struct ListArgs {
    /// Fuzzy search pattern
    pattern: Option<String>,
}

/// Clone a repository of the organization
#[derive(Parser, Debug)]
struct CloneArgs {
    /// Repository name
    repo: String,

    /// Clone over SSH instead of HTTPS
    #[arg(long)]
    ssh: bool,
}

/// Add a README, LICENSE and .gitignore to the current repository
///
/// Values not given as options are prompted for.
#[derive(Parser, Debug)]
struct InitArgs {
    /// Repository name shown in the README [default: directory name]
    #[arg(long)]
    name: Option<String>,

    /// One-line description for the README
    #[arg(long)]
    description: Option<String>,

    /// Emoji framing the README title
    #[arg(long)]
    emoji: Option<String>,

    /// License to add: hardware or software
    #[arg(long, value_name = "TYPE")]
    project_type: Option<String>,

    /// .gitignore templates to concatenate: python, platformio, rust
    #[arg(long, value_name = "TEMPLATE", num_args = 1..)]
    gitignore: Vec<String>,

    /// Overwrite existing files
    #[arg(long)]
    force: bool,

    /// Commit the new files
    #[arg(long)]
    commit: bool,
}

/// Switch the origin remote between HTTPS and SSH
#[derive(Parser, Debug)]
struct ToggleArgs {
    /// Any path inside the repository
    #[arg(long, default_value = ".")]
    path: PathBuf,
}

#[derive(Tabled)]
struct RepoRow {
    #[tabled(rename = "Repository")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn summary(session: &mut Session, _invocation: &Invocation) -> Result<()> {
    println!("{}", "🐙  efr gh  🐙".green().bold());
    println!();
    println!(
        "{}",
        format!(
            "Convenience tools for the {} GitHub organization.",
            session.config.github.org
        )
        .cyan()
    );
    println!();
    println!("{}", "Commands:".cyan().bold());
    println!("  {}", "list [PATTERN]       List repositories, fuzzy filtered".yellow());
    println!("  {}", "clone <REPO> [--ssh] Clone a repository".yellow());
    println!("  {}", "init                 Add README, LICENSE and .gitignore".yellow());
    println!("  {}", "toggle-protocol      Switch origin between HTTPS and SSH".yellow());
    println!();
    println!("Run 'efr gh <COMMAND> --help' for details.");
    Ok(())
}

fn list(session: &mut Session, invocation: &Invocation) -> Result<()> {
    let args: ListArgs = parse(invocation)?;
    let repos = session.github().repositories()?;
    let matches = fuzzy_filter(&repos, args.pattern.as_deref());

    if matches.is_empty() {
        let message = if args.pattern.is_some() {
            "No matches found."
        } else {
            "No repositories found."
        };
        println!("{}", message.red());
        return Ok(());
    }

    if args.pattern.is_some() {
        println!("{}", "Matching repositories:".green().bold());
    } else {
        println!("{}", "All repositories:".green().bold());
        println!("{}", "To filter the list, provide a search pattern.".yellow());
        println!("{}", "\tExample: efr gh list <pattern>".yellow());
    }

    let rows = matches.into_iter().map(|repo| RepoRow {
        name: repo.name,
        description: repo.description.unwrap_or_default(),
    });
    let mut table = Table::new(rows);
    table.with(Style::sharp()).with(
        Modify::new(Columns::new(1..2)).with(Width::wrap(DESCRIPTION_WIDTH).keep_words(true)),
    );
    println!("{table}");
    Ok(())
}

fn clone(session: &mut Session, invocation: &Invocation) -> Result<()> {
    let args: CloneArgs = parse(invocation)?;
    if args.repo.is_empty() || args.repo == ".." || args.repo.contains(['/', '\\']) {
        return Err(CliError::user(format!(
            "Invalid repository name '{}'",
            args.repo
        )));
    }

    let protocol = if args.ssh {
        RemoteProtocol::Ssh
    } else {
        RemoteProtocol::Https
    };
    let github = session.github();
    let url = github.clone_url(&args.repo, protocol);
    let display = format!("{}/{}", github.org(), args.repo);

    println!("{} Cloning repository '{}'...", "=>".blue().bold(), display);
    let cwd = std::env::current_dir()?;
    efr_git::clone(&url, &cwd, None)?;
    println!(
        "{} Repository '{}' cloned successfully.",
        "OK".green().bold(),
        display
    );
    Ok(())
}

/// `gh clone` as seen by the shell completer.
///
/// Repository names are listed from the organization each time the shell
/// asks, with their descriptions as help.
pub fn clone_completion(github: GithubConfig) -> clap::Command {
    CloneArgs::command().name("clone").mut_arg("repo", |arg| {
        arg.add(ArgValueCandidates::new(move || {
            match HttpClient::new(env!("CARGO_PKG_VERSION")) {
                Ok(http) => {
                    let client = OrgClient::new(http.with_token(github.token.clone()), &github.org)
                        .with_api_url(&github.api_url);
                    repo_candidates(&client)
                }
                Err(e) => {
                    debug!("Repository completion unavailable: {e}");
                    Vec::new()
                }
            }
        }))
    })
}

/// Completion candidates for every repository `client` lists.
///
/// An unreachable API yields no candidates instead of an error.
pub fn repo_candidates(client: &OrgClient) -> Vec<CompletionCandidate> {
    match client.repositories() {
        Ok(repos) => repos
            .into_iter()
            .map(|repo| {
                let candidate = CompletionCandidate::new(repo.name);
                match repo.description {
                    Some(description) => candidate.help(Some(description.into())),
                    None => candidate,
                }
            })
            .collect(),
        Err(e) => {
            debug!(org = %client.org(), "Repository completion unavailable: {e}");
            Vec::new()
        }
    }
}

fn init(session: &mut Session, invocation: &Invocation) -> Result<()> {
    let args: InitArgs = parse(invocation)?;

    // Validate explicit choices before prompting for anything
    let project_type = args
        .project_type
        .as_deref()
        .map(str::parse::<ProjectType>)
        .transpose()?;
    let gitignore = args
        .gitignore
        .iter()
        .map(|t| t.parse::<GitignoreTemplate>())
        .collect::<efr_github::Result<Vec<_>>>()?;

    let cwd = std::env::current_dir()?;
    let details = efr_git::git_details(&cwd)?;
    let root = details.root;

    let default_name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    let name = match args.name {
        Some(name) => name,
        None => interactive::text("Repository name", default_name.as_deref())?,
    };
    let description = match args.description {
        Some(description) => description,
        None => interactive::text("Short description", None)?,
    };
    let emoji = match args.emoji {
        Some(emoji) => emoji,
        None => interactive::text("Emoji", Some(DEFAULT_EMOJI))?,
    };
    let project_type = match project_type {
        Some(project_type) => project_type,
        None => interactive::project_type()?,
    };
    let gitignore = if gitignore.is_empty() {
        interactive::gitignore_templates()?
    } else {
        gitignore
    };

    // Everything is rendered and downloaded before the first write
    let templates = TemplateSet::embedded()?;
    let readme = efr_scaffold::repo_readme(&templates, &name, &description, &emoji)?;
    let resources = session.resources();
    println!(
        "{} Fetching {} license and .gitignore templates...",
        "=>".blue().bold(),
        project_type
    );
    let license = resources.fetch_license(session.http(), project_type)?;
    let gitignore_text = if gitignore.is_empty() {
        None
    } else {
        Some(resources.fetch_gitignore(session.http(), &gitignore)?)
    };

    write_init_file(&root.join("README.md"), &readme, args.force)?;
    write_init_file(&root.join("LICENSE"), &license, args.force)?;
    if let Some(text) = gitignore_text {
        write_init_file(&root.join(".gitignore"), &text, args.force)?;
    }

    if args.commit {
        efr_git::commit_all(&root, COMMIT_MESSAGE)?;
        println!("{} Committed: {}", "OK".green().bold(), COMMIT_MESSAGE);
    }
    Ok(())
}

fn write_init_file(path: &Path, content: &str, force: bool) -> Result<()> {
    if path.exists() && !force {
        eprintln!(
            "{} {} already exists, skipping (use --force to overwrite)",
            "warning:".yellow().bold(),
            path.display()
        );
        return Ok(());
    }
    efr_fs::io::write_atomic(path, content.as_bytes())?;
    println!("{} Wrote {}", "OK".green().bold(), path.display());
    Ok(())
}

fn toggle_protocol(_session: &mut Session, invocation: &Invocation) -> Result<()> {
    let args: ToggleArgs = parse(invocation)?;
    let change = efr_git::toggle_origin_protocol(&args.path)?;
    println!(
        "{} Switched origin from {} to {}",
        "OK".green().bold(),
        change.from,
        change.to
    );
    println!("   {} {}", "Old:".dimmed(), change.old_url);
    println!("   {} {}", "New:".dimmed(), change.new_url);
    Ok(())
}

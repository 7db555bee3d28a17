//! What `efr` prints without a command

use colored::Colorize;
use efr_plugin::Invocation;

use crate::context::Session;
use crate::error::Result;

pub const ABOUT: &str = "Every Flavor Robotics command line tool";
pub const DOCS_URL: &str = "https://github.com/Every-Flavor-Robotics/efr";

pub fn show(session: &mut Session, _invocation: &Invocation) -> Result<()> {
    println!(
        "\n{}",
        "🚀 | Every Flavor Robotics Command Line Tool | 🚀".cyan().bold()
    );
    println!(
        "{}\n",
        format!("Version: {}", env!("CARGO_PKG_VERSION")).green().bold()
    );
    println!(
        "{}",
        "Plugins are the heart of efr: they provide the functionality for all of the various tasks."
            .bright_magenta()
    );

    let report = &session.plugins.report;
    println!("{}", "Installed plugins:".bright_magenta().bold());
    if report.loaded.is_empty() {
        println!("  {}", "(No plugins found)".yellow());
    }
    for plugin in &report.loaded {
        println!("  • {}", plugin.name);
    }

    if !report.failed.is_empty() {
        println!("{}", "Plugins that failed to load:".yellow().bold());
        for plugin in &report.failed {
            println!("  • {} ({})", plugin.name, plugin.reason.dimmed());
        }
    }

    println!(
        "\n{}",
        "To see what each plugin does, run 'efr <plugin_name>'".bright_magenta()
    );
    println!(
        "{}",
        "To see a list of installable plugins, run 'efr plugins list'".bright_magenta()
    );
    println!("\nFor more documentation, check out:\n  {DOCS_URL}");
    println!("\n{}", "Usage:".bold());
    println!("  efr [COMMAND] [ARGS]...");
    println!("Run 'efr --help' for more info.");
    Ok(())
}

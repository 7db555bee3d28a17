//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based interactive selection.

use dialoguer::{Input, MultiSelect, Select};
use efr_boards::{Target, VersionSelector};
use efr_github::{GitignoreTemplate, ProjectType};

use crate::error::Result;

/// Lets the user tick toolchain versions in a checklist.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptSelector;

impl VersionSelector for PromptSelector {
    fn select(&self, target: Target, available: &[String]) -> efr_boards::Result<Vec<String>> {
        let prompt = match target {
            Target::Framework => "Select framework versions (space to toggle, enter to confirm)",
            Target::Platform => "Select platform versions (space to toggle, enter to confirm)",
        };
        let indices = MultiSelect::new()
            .with_prompt(prompt)
            .items(available)
            .interact()
            .map_err(|e| efr_boards::Error::Selection {
                message: e.to_string(),
            })?;
        Ok(indices.into_iter().map(|i| available[i].clone()).collect())
    }
}

pub fn text(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    Ok(input.interact_text()?)
}

pub fn project_type() -> Result<ProjectType> {
    let idx = Select::new()
        .with_prompt("Project type")
        .items(&ProjectType::ALL)
        .default(0)
        .interact()?;
    Ok(ProjectType::ALL[idx])
}

pub fn gitignore_templates() -> Result<Vec<GitignoreTemplate>> {
    let indices = MultiSelect::new()
        .with_prompt("Select .gitignore templates (space to toggle, enter to confirm)")
        .items(&GitignoreTemplate::ALL)
        .interact()?;
    Ok(indices
        .into_iter()
        .map(|i| GitignoreTemplate::ALL[i])
        .collect())
}

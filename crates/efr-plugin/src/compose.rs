//! Attaching loaded plugins to the root command group

use std::collections::HashMap;

use tracing::{info, warn};

use crate::command::CommandGroup;
use crate::load::LoadOutcome;

/// A plugin attached to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPlugin {
    pub name: String,
    pub package: String,
}

/// A plugin that failed to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPlugin {
    pub name: String,
    pub package: String,
    pub reason: String,
}

/// A root child replaced by a later plugin of the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub name: String,
    /// Package of the replaced plugin; `None` when the root already had the
    /// command before composition
    pub replaced: Option<String>,
    pub package: String,
}

/// What [`compose`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionReport {
    /// Plugins reachable from the root, in attachment order
    pub loaded: Vec<LoadedPlugin>,
    pub failed: Vec<FailedPlugin>,
    pub overridden: Vec<Override>,
}

impl CompositionReport {
    /// Package names of every attached plugin.
    pub fn packages(&self) -> Vec<String> {
        self.loaded.iter().map(|p| p.package.clone()).collect()
    }
}

/// Attach every loaded node to `root`.
///
/// On a name collision the later node wins and the replacement is recorded
/// in [`CompositionReport::overridden`]. Failed outcomes are recorded and
/// skipped.
pub fn compose<C, E>(
    root: &mut CommandGroup<C, E>,
    outcomes: impl IntoIterator<Item = LoadOutcome<C, E>>,
) -> CompositionReport {
    let mut report = CompositionReport::default();
    let mut attached: HashMap<String, String> = HashMap::new();

    for outcome in outcomes {
        match outcome {
            LoadOutcome::Loaded {
                name,
                package,
                node,
            } => {
                let command = node.name().to_string();
                if root.insert(node).is_some() {
                    let replaced = attached.get(&command).cloned();
                    warn!(
                        command = %command,
                        replaced = ?replaced,
                        by = %package,
                        "Plugin command overrides an earlier registration"
                    );
                    report.loaded.retain(|p| p.name != command);
                    report.overridden.push(Override {
                        name: command.clone(),
                        replaced,
                        package: package.clone(),
                    });
                }
                info!(plugin = %name, command = %command, "Registered plugin");
                attached.insert(command.clone(), package.clone());
                report.loaded.push(LoadedPlugin {
                    name: command,
                    package,
                });
            }
            LoadOutcome::Failed {
                name,
                package,
                error,
            } => {
                report.failed.push(FailedPlugin {
                    name,
                    package,
                    reason: error.to_string(),
                });
            }
        }
    }

    report
}

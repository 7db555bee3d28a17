//! Installing and removing board assets across toolchain versions

use std::fmt;
use std::path::{Path, PathBuf};

use efr_fs::{CopyOutcome, Overwrite, RemoveOutcome};
use tracing::{debug, warn};

use crate::Result;
use crate::layout::PlatformIoLayout;
use crate::scan::ToolchainVersions;
use crate::source::BoardAssets;

/// Which package a step touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Framework package, receives the variant directory
    Framework,
    /// Platform package, receives the board JSON
    Platform,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Framework => write!(f, "framework"),
            Target::Platform => write!(f, "platform"),
        }
    }
}

/// Picks a subset of installed versions.
pub trait VersionSelector {
    /// Choose among `available` labels, given in display order.
    fn select(&self, target: Target, available: &[String]) -> Result<Vec<String>>;
}

/// How versions are chosen.
#[derive(Clone, Copy)]
pub enum Selection<'a> {
    /// Every installed version.
    All,
    /// Whatever the selector returns.
    Choose(&'a dyn VersionSelector),
}

impl fmt::Debug for Selection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "All"),
            Selection::Choose(_) => write!(f, "Choose"),
        }
    }
}

/// Result of one copy or removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Installed,
    Replaced,
    /// Destination existed and `force` was not set
    Skipped,
    Removed,
    NotPresent,
    Failed(String),
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Installed => write!(f, "installed"),
            StepStatus::Replaced => write!(f, "replaced"),
            StepStatus::Skipped => write!(f, "skipped"),
            StepStatus::Removed => write!(f, "removed"),
            StepStatus::NotPresent => write!(f, "not present"),
            StepStatus::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// One version touched by an install or uninstall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub target: Target,
    pub version: String,
    pub destination: PathBuf,
    pub status: StepStatus,
}

/// Something the user should know that is not tied to one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    NoVersions(Target),
    NothingSelected(Target),
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::NoVersions(target) => write!(f, "No {target} versions found"),
            Note::NothingSelected(target) => write!(f, "No {target} versions selected"),
        }
    }
}

/// Everything an install or uninstall did, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub board: String,
    pub steps: Vec<Step>,
    pub notes: Vec<Note>,
    /// Set when `All` found no versions of a package and nothing was copied
    pub stopped_early: bool,
}

impl InstallReport {
    fn new(board: &str) -> Self {
        Self {
            board: board.to_string(),
            steps: Vec::new(),
            notes: Vec::new(),
            stopped_early: false,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.steps
            .iter()
            .any(|step| matches!(step.status, StepStatus::Failed(_)))
    }

    pub fn steps_for(&self, target: Target) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |step| step.target == target)
    }

    /// Number of steps with exactly `status`.
    pub fn count(&self, status: &StepStatus) -> usize {
        self.steps.iter().filter(|step| &step.status == status).count()
    }
}

/// Copies board assets into a PlatformIO installation.
///
/// Holds no state between runs; every call scans the installed versions
/// again.
#[derive(Debug, Clone)]
pub struct Installer {
    layout: PlatformIoLayout,
}

impl Installer {
    pub fn new(layout: PlatformIoLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &PlatformIoLayout {
        &self.layout
    }

    /// Copy the variant into `<framework>/variants/<board>` and the JSON
    /// into `<platform>/boards/<board>.json` for each selected version.
    ///
    /// Existing destinations are skipped unless `force`, in which case they
    /// are replaced whole. A version lacking its `variants` or `boards`
    /// directory becomes a failed step and the rest continue. Nothing is
    /// copied when either package cannot be scanned or the selector fails,
    /// or when [`Selection::All`] finds no versions of a package.
    pub fn install(
        &self,
        assets: &BoardAssets,
        selection: Selection<'_>,
        force: bool,
    ) -> Result<InstallReport> {
        let overwrite = Overwrite::from_force(force);
        let mut report = InstallReport::new(&assets.board);

        // Scan and choose both packages before the first copy
        let frameworks = self.layout.framework_versions()?;
        let platforms = self.layout.platform_versions()?;
        let Some(framework_labels) =
            choose(Target::Framework, &frameworks, selection, &mut report)?
        else {
            report.stopped_early = true;
            return Ok(report);
        };
        let Some(platform_labels) = choose(Target::Platform, &platforms, selection, &mut report)?
        else {
            report.stopped_early = true;
            return Ok(report);
        };

        for label in framework_labels {
            let Some(version_dir) = frameworks.get(&label) else {
                continue;
            };
            let step = copy_step(
                Target::Framework,
                &label,
                &version_dir.join("variants"),
                &assets.board,
                |dest| efr_fs::copy_dir(&assets.variant_dir, dest, overwrite),
            );
            report.steps.push(step);
        }

        for label in platform_labels {
            let Some(version_dir) = platforms.get(&label) else {
                continue;
            };
            let step = copy_step(
                Target::Platform,
                &label,
                &version_dir.join("boards"),
                &assets.json_file_name(),
                |dest| efr_fs::copy_file(&assets.board_json, dest, overwrite),
            );
            report.steps.push(step);
        }

        Ok(report)
    }

    /// Remove the variant directory and board JSON of `board` from the
    /// selected versions.
    pub fn uninstall(&self, board: &str, selection: Selection<'_>) -> Result<InstallReport> {
        efr_fs::validate_identifier("board name", board)?;
        let mut report = InstallReport::new(board);

        let frameworks = self.layout.framework_versions()?;
        let chosen = choose(Target::Framework, &frameworks, selection, &mut report)?;
        for label in chosen.unwrap_or_default() {
            if let Some(version_dir) = frameworks.get(&label) {
                let destination = version_dir.join("variants").join(board);
                report
                    .steps
                    .push(remove_step(Target::Framework, &label, destination));
            }
        }

        let platforms = self.layout.platform_versions()?;
        let chosen = choose(Target::Platform, &platforms, selection, &mut report)?;
        for label in chosen.unwrap_or_default() {
            if let Some(version_dir) = platforms.get(&label) {
                let destination = version_dir.join("boards").join(format!("{board}.json"));
                report
                    .steps
                    .push(remove_step(Target::Platform, &label, destination));
            }
        }

        Ok(report)
    }
}

/// Versions to process, or `None` to stop the run.
fn choose(
    target: Target,
    versions: &ToolchainVersions,
    selection: Selection<'_>,
    report: &mut InstallReport,
) -> Result<Option<Vec<String>>> {
    let labels = versions.labels();
    if labels.is_empty() {
        warn!(%target, package = versions.package(), "No installed versions");
        report.notes.push(Note::NoVersions(target));
        return Ok(match selection {
            Selection::All => None,
            Selection::Choose(_) => Some(Vec::new()),
        });
    }

    let chosen = match selection {
        Selection::All => labels,
        Selection::Choose(selector) => {
            let picked = selector.select(target, &labels)?;
            let (known, unknown): (Vec<String>, Vec<String>) =
                picked.into_iter().partition(|label| labels.contains(label));
            for label in unknown {
                warn!(%target, version = %label, "Ignoring unknown version");
            }
            if known.is_empty() {
                report.notes.push(Note::NothingSelected(target));
            }
            known
        }
    };

    debug!(%target, versions = ?chosen, "Selected versions");
    Ok(Some(chosen))
}

fn copy_step(
    target: Target,
    version: &str,
    parent: &Path,
    name: &str,
    copy: impl FnOnce(&Path) -> efr_fs::Result<CopyOutcome>,
) -> Step {
    let destination = parent.join(name);

    let status = if !parent.is_dir() {
        let kind = match target {
            Target::Framework => "Variants",
            Target::Platform => "Boards",
        };
        StepStatus::Failed(format!("{kind} directory not found: {}", parent.display()))
    } else {
        match copy(&destination) {
            Ok(CopyOutcome::Created) => StepStatus::Installed,
            Ok(CopyOutcome::Replaced) => StepStatus::Replaced,
            Ok(CopyOutcome::Skipped) => StepStatus::Skipped,
            Err(e) => StepStatus::Failed(e.to_string()),
        }
    };

    match &status {
        StepStatus::Failed(reason) => warn!(%target, version, "Install step failed: {reason}"),
        StepStatus::Skipped => {
            warn!(%target, version, destination = %destination.display(), "Already installed")
        }
        _ => debug!(%target, version, %status, destination = %destination.display(), "Install step"),
    }

    Step {
        target,
        version: version.to_string(),
        destination,
        status,
    }
}

fn remove_step(target: Target, version: &str, destination: PathBuf) -> Step {
    let status = match efr_fs::remove_path(&destination) {
        Ok(RemoveOutcome::Removed) => StepStatus::Removed,
        Ok(RemoveOutcome::NotPresent) => StepStatus::NotPresent,
        Err(e) => StepStatus::Failed(e.to_string()),
    };
    debug!(%target, version, %status, "Uninstall step");

    Step {
        target,
        version: version.to_string(),
        destination,
        status,
    }
}

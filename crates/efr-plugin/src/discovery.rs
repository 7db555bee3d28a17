//! Plugin discovery across built-ins, the manifest and `PATH`

use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::command::CommandNode;
use crate::manifest::Manifest;
use crate::{LoadError, Result};

/// Named slot plugins register under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionPoint {
    /// Group name, e.g. `efr.plugins`
    pub group: String,
    /// Prefix shared by plugin package and executable names, e.g. `efr-`
    pub prefix: String,
}

impl ExtensionPoint {
    pub const DEFAULT_GROUP: &'static str = "efr.plugins";
    pub const DEFAULT_PREFIX: &'static str = "efr-";

    /// Package name conventionally carrying plugin `name`.
    pub fn package_for(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

impl Default for ExtensionPoint {
    fn default() -> Self {
        Self {
            group: Self::DEFAULT_GROUP.to_string(),
            prefix: Self::DEFAULT_PREFIX.to_string(),
        }
    }
}

/// Where an entry was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginSource {
    Builtin,
    Manifest,
    Path,
}

impl fmt::Display for PluginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginSource::Builtin => write!(f, "built-in"),
            PluginSource::Manifest => write!(f, "manifest"),
            PluginSource::Path => write!(f, "PATH"),
        }
    }
}

/// What loading an entry resolves.
pub enum PluginTarget<C, E> {
    /// Constructor compiled into the binary.
    Builtin(fn() -> std::result::Result<CommandNode<C, E>, LoadError>),
    /// Executable run with the remaining argv.
    External(PathBuf),
}

impl<C, E> Clone for PluginTarget<C, E> {
    fn clone(&self) -> Self {
        match self {
            PluginTarget::Builtin(ctor) => PluginTarget::Builtin(*ctor),
            PluginTarget::External(path) => PluginTarget::External(path.clone()),
        }
    }
}

impl<C, E> fmt::Debug for PluginTarget<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginTarget::Builtin(_) => write!(f, "Builtin"),
            PluginTarget::External(path) => f.debug_tuple("External").field(path).finish(),
        }
    }
}

/// A registered plugin, not yet loaded.
pub struct PluginEntry<C, E> {
    pub name: String,
    pub package: String,
    pub source: PluginSource,
    pub target: PluginTarget<C, E>,
}

impl<C, E> PluginEntry<C, E> {
    pub fn builtin(
        name: impl Into<String>,
        package: impl Into<String>,
        ctor: fn() -> std::result::Result<CommandNode<C, E>, LoadError>,
    ) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            source: PluginSource::Builtin,
            target: PluginTarget::Builtin(ctor),
        }
    }

    pub fn external(
        name: impl Into<String>,
        package: impl Into<String>,
        source: PluginSource,
        command: PathBuf,
    ) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            source,
            target: PluginTarget::External(command),
        }
    }
}

impl<C, E> Clone for PluginEntry<C, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            package: self.package.clone(),
            source: self.source,
            target: self.target.clone(),
        }
    }
}

impl<C, E> fmt::Debug for PluginEntry<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginEntry")
            .field("name", &self.name)
            .field("package", &self.package)
            .field("source", &self.source)
            .field("target", &self.target)
            .finish()
    }
}

/// Enumerates plugin entries for one extension point.
///
/// ```rust,ignore
/// let entries = Discovery::new(ExtensionPoint::default())
///     .with_builtin(PluginEntry::builtin("gh", "efr-gh", gh::command))
///     .with_manifest(config_dir.join("plugins.toml"))
///     .with_search_path(std::env::var_os("PATH"))
///     .discover()?;
/// ```
pub struct Discovery<C, E> {
    point: ExtensionPoint,
    builtins: Vec<PluginEntry<C, E>>,
    manifest: Option<PathBuf>,
    search_path: Option<OsString>,
}

impl<C, E> Discovery<C, E> {
    pub fn new(point: ExtensionPoint) -> Self {
        Self {
            point,
            builtins: Vec::new(),
            manifest: None,
            search_path: None,
        }
    }

    pub fn point(&self) -> &ExtensionPoint {
        &self.point
    }

    pub fn with_builtin(mut self, entry: PluginEntry<C, E>) -> Self {
        self.builtins.push(entry);
        self
    }

    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = Some(path.into());
        self
    }

    /// Directories to scan for `<prefix><name>` executables, in `PATH` syntax.
    pub fn with_search_path(mut self, path: Option<OsString>) -> Self {
        self.search_path = path;
        self
    }

    /// Every entry in source order: built-ins, manifest, then `PATH`.
    ///
    /// Entries with invalid names are skipped with a warning. A malformed
    /// manifest is an error.
    pub fn discover(&self) -> Result<Vec<PluginEntry<C, E>>> {
        let mut entries: Vec<PluginEntry<C, E>> = self.builtins.clone();

        if let Some(path) = &self.manifest {
            let manifest = Manifest::load(path)?;
            for entry in manifest.plugins.iter().filter(|e| e.belongs_to(&self.point)) {
                if let Err(e) = efr_fs::validate_identifier("plugin name", &entry.name) {
                    warn!(manifest = %path.display(), "Skipping manifest entry: {e}");
                    continue;
                }
                entries.push(PluginEntry::external(
                    &entry.name,
                    entry.package_name(&self.point),
                    PluginSource::Manifest,
                    entry.command.clone(),
                ));
            }
        }

        if let Some(search_path) = &self.search_path {
            entries.extend(self.scan_search_path(search_path));
        }

        debug!(count = entries.len(), group = %self.point.group, "Discovered plugins");
        Ok(entries)
    }

    fn scan_search_path(&self, search_path: &OsString) -> Vec<PluginEntry<C, E>> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for dir in std::env::split_paths(search_path) {
            let Ok(read_dir) = fs::read_dir(&dir) else {
                continue;
            };
            let mut candidates: Vec<PathBuf> = read_dir
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file())
                .collect();
            candidates.sort();

            for path in candidates {
                let Some(name) = self.plugin_name(&path) else {
                    continue;
                };
                // Earlier PATH directories shadow later ones
                if !seen.insert(name.clone()) {
                    continue;
                }
                debug!(plugin = %name, path = %path.display(), "Found plugin executable");
                found.push(PluginEntry::external(
                    &name,
                    self.point.package_for(&name),
                    PluginSource::Path,
                    path,
                ));
            }
        }

        found
    }

    fn plugin_name(&self, path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        let stem = if cfg!(windows) {
            executable_stem(file_name)?
        } else {
            file_name
        };
        let name = stem.strip_prefix(&self.point.prefix)?;
        efr_fs::validate_identifier("plugin name", name).ok()?;
        Some(name.to_string())
    }
}

fn executable_stem(file_name: &str) -> Option<&str> {
    let pathext = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    let (stem, ext) = file_name.rsplit_once('.')?;
    pathext
        .split(';')
        .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
        .then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandLeaf;
    use pretty_assertions::assert_eq;

    type Entry = PluginEntry<(), String>;

    fn noop() -> std::result::Result<CommandNode<(), String>, LoadError> {
        Ok(CommandLeaf::new("noop", "", |_: &mut (), _: &crate::Invocation| Ok(())).into())
    }

    fn names(entries: &[Entry]) -> Vec<(String, PluginSource)> {
        entries.iter().map(|e| (e.name.clone(), e.source)).collect()
    }

    #[test]
    fn test_builtins_only() {
        let entries = Discovery::new(ExtensionPoint::default())
            .with_builtin(PluginEntry::builtin("gh", "efr-gh", noop))
            .with_builtin(PluginEntry::builtin("motorgo", "efr-motorgo", noop))
            .discover()
            .unwrap();

        assert_eq!(
            names(&entries),
            vec![
                ("gh".to_string(), PluginSource::Builtin),
                ("motorgo".to_string(), PluginSource::Builtin),
            ]
        );
        assert_eq!(entries[1].package, "efr-motorgo");
    }

    #[test]
    fn test_package_for_uses_prefix() {
        assert_eq!(ExtensionPoint::default().package_for("gh"), "efr-gh");
    }

    #[cfg(windows)]
    #[test]
    fn test_executable_stem_strips_known_extension() {
        assert_eq!(executable_stem("efr-plink.exe"), Some("efr-plink"));
        assert_eq!(executable_stem("efr-plink.txt"), None);
    }
}

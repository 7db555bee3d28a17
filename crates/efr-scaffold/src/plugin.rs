//! New plugin project skeletons

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::templates::{
    INSTALL_PS1, INSTALL_SH, PLUGIN_CLI, PLUGIN_MAIN, PLUGIN_MANIFEST, PLUGIN_README, TemplateSet,
    Values,
};
use crate::{Error, Result};

/// Whether `install.sh` / `install.ps1` were generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallScripts {
    Written,
    Skipped { reason: String },
}

/// Result of [`create_plugin_project`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginScaffold {
    pub name: String,
    /// The new `efr-<name>` directory
    pub dir: PathBuf,
    /// Written files, relative to `dir`
    pub files: Vec<PathBuf>,
    pub install_scripts: InstallScripts,
}

/// Directory name of the project for plugin `name`.
pub fn project_dir_name(name: &str) -> String {
    format!("efr-{name}")
}

/// Create `<parent>/efr-<name>` with a buildable plugin skeleton.
///
/// Install scripts need the `origin` of the enclosing git repository; when
/// `parent` is not inside one they are skipped and the skip is reported.
/// Every template is rendered before the first file is written.
pub fn create_plugin_project(
    templates: &TemplateSet,
    parent: &Path,
    name: &str,
    description: &str,
) -> Result<PluginScaffold> {
    efr_fs::validate_identifier("plugin name", name)?;

    let dir_name = project_dir_name(name);
    let dir = parent.join(&dir_name);
    if dir.exists() {
        return Err(Error::AlreadyExists { path: dir });
    }

    let mut values = Values::new()
        .with("name", name)
        .with("description", description);

    let mut plan = vec![
        ("Cargo.toml", PLUGIN_MANIFEST),
        ("README.md", PLUGIN_README),
        ("src/main.rs", PLUGIN_MAIN),
        ("src/cli.rs", PLUGIN_CLI),
    ];

    let install_scripts = match install_values(parent, &dir_name) {
        Ok((repo, plugin_dir)) => {
            values.insert("plugin_repo", repo);
            values.insert("plugin_dir", plugin_dir);
            plan.push(("install.sh", INSTALL_SH));
            plan.push(("install.ps1", INSTALL_PS1));
            InstallScripts::Written
        }
        Err(e) => {
            warn!(error = %e, "Skipping install scripts");
            InstallScripts::Skipped {
                reason: e.to_string(),
            }
        }
    };

    let rendered = plan
        .into_iter()
        .map(|(file, template)| Ok((PathBuf::from(file), templates.render(template, &values)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut files = Vec::with_capacity(rendered.len());
    for (file, content) in rendered {
        let path = dir.join(&file);
        efr_fs::io::write_new(&path, &content)?;
        if file == Path::new("install.sh") {
            efr_fs::io::make_executable(&path)?;
        }
        debug!(path = %path.display(), "Wrote plugin file");
        files.push(file);
    }

    Ok(PluginScaffold {
        name: name.to_string(),
        dir,
        files,
        install_scripts,
    })
}

/// HTTPS origin URL and the project path inside the repository.
fn install_values(parent: &Path, dir_name: &str) -> Result<(String, String)> {
    let details = efr_git::git_details(parent)?;
    let repo = details.https_remote_url()?;
    let relative = details.relative_path.join(dir_name);
    let plugin_dir = relative.to_string_lossy().replace('\\', "/");
    Ok((repo, plugin_dir))
}

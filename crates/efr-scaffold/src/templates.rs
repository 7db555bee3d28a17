//! Embedded templates with declared placeholders

use std::collections::BTreeMap;

use tera::{Context, Tera};
use tracing::debug;

use crate::{Error, Result};

pub const REPO_README: &str = "repo/README.md";
pub const PLUGIN_README: &str = "plugin/README.md";
pub const PLUGIN_MANIFEST: &str = "plugin/Cargo.toml";
pub const PLUGIN_MAIN: &str = "plugin/src/main.rs";
pub const PLUGIN_CLI: &str = "plugin/src/cli.rs";
pub const INSTALL_SH: &str = "plugin/install.sh";
pub const INSTALL_PS1: &str = "plugin/install.ps1";

struct Embedded {
    name: &'static str,
    body: &'static str,
    required: &'static [&'static str],
}

const EMBEDDED: &[Embedded] = &[
    Embedded {
        name: REPO_README,
        body: include_str!("../templates/repo/README.md.tera"),
        required: &["name", "description", "emoji"],
    },
    Embedded {
        name: PLUGIN_README,
        body: include_str!("../templates/plugin/README.md.tera"),
        required: &["name", "description"],
    },
    Embedded {
        name: PLUGIN_MANIFEST,
        body: include_str!("../templates/plugin/Cargo.toml.tera"),
        required: &["name", "description"],
    },
    Embedded {
        name: PLUGIN_MAIN,
        body: include_str!("../templates/plugin/main.rs.tera"),
        required: &[],
    },
    Embedded {
        name: PLUGIN_CLI,
        body: include_str!("../templates/plugin/cli.rs.tera"),
        required: &["name", "description"],
    },
    Embedded {
        name: INSTALL_SH,
        body: include_str!("../templates/plugin/install.sh.tera"),
        required: &["name", "plugin_repo", "plugin_dir"],
    },
    Embedded {
        name: INSTALL_PS1,
        body: include_str!("../templates/plugin/install.ps1.tera"),
        required: &["name", "plugin_repo", "plugin_dir"],
    },
];

/// Placeholder values for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(BTreeMap<String, String>);

impl Values {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    fn is_filled(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.trim().is_empty())
    }
}

/// The embedded templates, ready to render.
pub struct TemplateSet {
    tera: Tera,
    required: BTreeMap<&'static str, &'static [&'static str]>,
}

impl TemplateSet {
    pub fn embedded() -> Result<Self> {
        let mut tera = Tera::default();
        let mut required = BTreeMap::new();
        for template in EMBEDDED {
            tera.add_raw_template(template.name, template.body)?;
            required.insert(template.name, template.required);
        }
        Ok(Self { tera, required })
    }

    /// Names of all templates, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.required.keys().copied().collect()
    }

    /// Placeholders that must be present and non-empty to render `name`.
    pub fn required(&self, name: &str) -> Option<&'static [&'static str]> {
        self.required.get(name).copied()
    }

    /// Placeholders of `name` that `values` leaves absent or blank.
    pub fn missing(&self, name: &str, values: &Values) -> Result<Vec<String>> {
        let required = self.required(name).ok_or_else(|| Error::UnknownTemplate {
            name: name.to_string(),
        })?;
        Ok(required
            .iter()
            .filter(|key| !values.is_filled(key))
            .map(|key| key.to_string())
            .collect())
    }

    pub fn render(&self, name: &str, values: &Values) -> Result<String> {
        let missing = self.missing(name, values)?;
        if !missing.is_empty() {
            return Err(Error::MissingPlaceholders {
                template: name.to_string(),
                missing,
            });
        }

        let mut context = Context::new();
        for (key, value) in &values.0 {
            context.insert(key.as_str(), value);
        }
        debug!(template = name, "Rendering template");
        Ok(self.tera.render(name, &context)?)
    }
}

/// README for a freshly initialized organization repository.
pub fn repo_readme(
    templates: &TemplateSet,
    name: &str,
    description: &str,
    emoji: &str,
) -> Result<String> {
    let values = Values::new()
        .with("name", name)
        .with("description", description)
        .with("emoji", emoji);
    templates.render(REPO_README, &values)
}

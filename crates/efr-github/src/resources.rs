//! License texts and `.gitignore` templates for new repositories

use std::fmt;
use std::str::FromStr;

use efr_http::HttpClient;
use tracing::debug;

use crate::{Error, Result};

pub const DEFAULT_LICENSE_BASE: &str =
    "https://raw.githubusercontent.com/Every-Flavor-Robotics/licenses/refs/heads/main";
pub const DEFAULT_GITIGNORE_BASE: &str = "https://www.toptal.com/developers/gitignore/api";

/// Which license a new repository gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Hardware,
    Software,
}

impl ProjectType {
    pub const ALL: [ProjectType; 2] = [ProjectType::Hardware, ProjectType::Software];

    fn slug(self) -> &'static str {
        match self {
            ProjectType::Hardware => "hardware",
            ProjectType::Software => "software",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ProjectType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownChoice {
                kind: "project type",
                value: s.to_string(),
                expected: Self::ALL.iter().map(ToString::to_string).collect(),
            })
    }
}

/// A `.gitignore` template offered by `gh init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitignoreTemplate {
    Python,
    PlatformIO,
    Rust,
}

impl GitignoreTemplate {
    pub const ALL: [GitignoreTemplate; 3] = [
        GitignoreTemplate::Python,
        GitignoreTemplate::PlatformIO,
        GitignoreTemplate::Rust,
    ];

    fn api_name(self) -> &'static str {
        match self {
            GitignoreTemplate::Python => "python",
            GitignoreTemplate::PlatformIO => "platformio",
            GitignoreTemplate::Rust => "rust",
        }
    }
}

impl fmt::Display for GitignoreTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitignoreTemplate::Python => write!(f, "Python"),
            GitignoreTemplate::PlatformIO => write!(f, "PlatformIO"),
            GitignoreTemplate::Rust => write!(f, "Rust"),
        }
    }
}

impl FromStr for GitignoreTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.api_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownChoice {
                kind: "gitignore template",
                value: s.to_string(),
                expected: Self::ALL.iter().map(ToString::to_string).collect(),
            })
    }
}

/// Where license and `.gitignore` texts are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    pub license_base: String,
    pub gitignore_base: String,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            license_base: DEFAULT_LICENSE_BASE.to_string(),
            gitignore_base: DEFAULT_GITIGNORE_BASE.to_string(),
        }
    }
}

impl Resources {
    pub fn license_url(&self, project_type: ProjectType) -> String {
        format!("{}/{}_license.md", self.license_base, project_type.slug())
    }

    pub fn gitignore_url(&self, template: GitignoreTemplate) -> String {
        format!("{}/{}", self.gitignore_base, template.api_name())
    }

    pub fn fetch_license(&self, client: &HttpClient, project_type: ProjectType) -> Result<String> {
        Ok(client.get_text(&self.license_url(project_type))?)
    }

    /// The selected templates concatenated in the given order.
    pub fn fetch_gitignore(
        &self,
        client: &HttpClient,
        templates: &[GitignoreTemplate],
    ) -> Result<String> {
        let mut content = String::new();
        for template in templates {
            debug!(%template, "Fetching gitignore template");
            content.push_str(&client.get_text(&self.gitignore_url(*template))?);
        }
        Ok(content)
    }
}

//! Project scaffolding for efr
//!
//! Templates are embedded in the binary and rendered with Tera. Each
//! template declares the placeholders it needs, and rendering refuses to
//! produce output while any of them is missing or empty.

pub mod error;
pub mod plugin;
pub mod registry_info;
pub mod templates;

pub use error::{Error, Result};
pub use plugin::{InstallScripts, PluginScaffold, create_plugin_project};
pub use registry_info::{RegistryInfo, registry_info};
pub use templates::{TemplateSet, Values, repo_readme};

//! GitHub helpers for efr
//!
//! - [`OrgClient`]: lists the organization's repositories once per client
//! - [`fuzzy_filter`]: ranks repository names against a search pattern
//! - [`Resources`]: license texts and `.gitignore` templates for new
//!   repositories

pub mod error;
pub mod org;
pub mod resources;
pub mod search;

pub use error::{Error, Result};
pub use org::{OrgClient, Repository, clone_url};
pub use resources::{GitignoreTemplate, ProjectType, Resources};
pub use search::fuzzy_filter;

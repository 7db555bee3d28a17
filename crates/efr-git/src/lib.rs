//! Git helpers for efr
//!
//! Repository discovery and `origin` handling go through `git2`. Clone and
//! commit shell out to the `git` binary so the user's credential helpers,
//! SSH agent and hooks apply exactly as they would on the command line.

pub mod command;
pub mod error;
pub mod remote;
pub mod repo;

pub use command::{clone, commit_all};
pub use error::{Error, Result};
pub use remote::{ProtocolChange, RemoteProtocol, github_raw_url, to_https, to_ssh, toggle_url};
pub use repo::{GitDetails, git_details, origin_url, toggle_origin_protocol};

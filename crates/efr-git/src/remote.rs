//! Remote URL conversions between HTTPS and SSH forms

use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// Transport used by a remote URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteProtocol {
    Https,
    Ssh,
}

impl RemoteProtocol {
    /// Detect the protocol of a remote URL.
    pub fn detect(url: &str) -> Option<Self> {
        if url.starts_with("git@") || url.starts_with("ssh://") {
            Some(RemoteProtocol::Ssh)
        } else if url.starts_with("https://") || url.starts_with("http://") {
            Some(RemoteProtocol::Https)
        } else {
            None
        }
    }

    /// The other protocol.
    pub fn toggled(self) -> Self {
        match self {
            RemoteProtocol::Https => RemoteProtocol::Ssh,
            RemoteProtocol::Ssh => RemoteProtocol::Https,
        }
    }
}

impl fmt::Display for RemoteProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteProtocol::Https => write!(f, "https"),
            RemoteProtocol::Ssh => write!(f, "ssh"),
        }
    }
}

/// A completed protocol switch of a remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolChange {
    pub from: RemoteProtocol,
    pub to: RemoteProtocol,
    pub old_url: String,
    pub new_url: String,
}

/// Convert an SSH remote URL to its HTTPS form.
///
/// `git@github.com:org/repo.git` and `ssh://git@github.com/org/repo.git`
/// both become `https://github.com/org/repo.git`. HTTPS URLs are returned
/// unchanged.
pub fn to_https(url: &str) -> Result<String> {
    match RemoteProtocol::detect(url) {
        Some(RemoteProtocol::Https) => Ok(url.to_string()),
        Some(RemoteProtocol::Ssh) => {
            if let Some(rest) = url.strip_prefix("ssh://") {
                let rest = rest.split_once('@').map_or(rest, |(_, host_path)| host_path);
                return Ok(format!("https://{rest}"));
            }
            let rest = url.trim_start_matches("git@");
            let (host, path) = rest.split_once(':').ok_or_else(|| Error::UnrecognizedRemote {
                url: url.to_string(),
            })?;
            Ok(format!("https://{host}/{path}"))
        }
        None => Err(Error::UnrecognizedRemote {
            url: url.to_string(),
        }),
    }
}

/// Convert an HTTPS remote URL to its scp-like SSH form.
///
/// `https://github.com/org/repo.git` becomes `git@github.com:org/repo.git`.
/// SSH URLs are returned unchanged.
pub fn to_ssh(url: &str) -> Result<String> {
    match RemoteProtocol::detect(url) {
        Some(RemoteProtocol::Ssh) => Ok(url.to_string()),
        Some(RemoteProtocol::Https) => {
            let rest = url
                .trim_start_matches("https://")
                .trim_start_matches("http://");
            // Credentials embedded in HTTPS remotes do not carry over
            let rest = rest.split_once('@').map_or(rest, |(_, host_path)| host_path);
            let (host, path) = rest.split_once('/').ok_or_else(|| Error::UnrecognizedRemote {
                url: url.to_string(),
            })?;
            Ok(format!("git@{host}:{path}"))
        }
        None => Err(Error::UnrecognizedRemote {
            url: url.to_string(),
        }),
    }
}

/// Swap a remote URL to the other protocol.
pub fn toggle_url(url: &str) -> Result<ProtocolChange> {
    let from = RemoteProtocol::detect(url).ok_or_else(|| Error::UnrecognizedRemote {
        url: url.to_string(),
    })?;
    let to = from.toggled();
    let new_url = match to {
        RemoteProtocol::Https => to_https(url)?,
        RemoteProtocol::Ssh => to_ssh(url)?,
    };

    Ok(ProtocolChange {
        from,
        to,
        old_url: url.to_string(),
        new_url,
    })
}

/// Build the raw.githubusercontent.com URL of a file in a GitHub repository.
///
/// `relative_dir` is the directory of the file relative to the repository
/// root; an empty path or `.` means the root itself.
pub fn github_raw_url(
    remote_url: &str,
    branch: &str,
    relative_dir: &Path,
    file_name: &str,
) -> Result<String> {
    let https = to_https(remote_url)?;
    let trimmed = https.trim_end_matches('/');
    let without_suffix = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let raw_base = without_suffix.replacen("github.com", "raw.githubusercontent.com", 1);

    let mut url = format!("{raw_base}/refs/heads/{branch}");

    let relative = relative_dir.to_string_lossy().replace('\\', "/");
    let relative = relative.trim_matches('/');
    if !relative.is_empty() && relative != "." {
        url.push('/');
        url.push_str(relative);
    }
    url.push('/');
    url.push_str(file_name);

    Ok(url)
}

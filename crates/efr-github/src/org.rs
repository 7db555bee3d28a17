//! Organization repository listing

use std::cell::RefCell;

use efr_git::RemoteProtocol;
use efr_http::HttpClient;
use serde::Deserialize;
use tracing::debug;

use crate::Result;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// The fields of a GitHub repository efr uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Lists repositories of one organization.
///
/// The first successful listing is kept for the lifetime of the client, so
/// completing, filtering and cloning within one invocation hit the API once.
#[derive(Debug)]
pub struct OrgClient {
    http: HttpClient,
    api_url: String,
    org: String,
    repos: RefCell<Option<Vec<Repository>>>,
}

impl OrgClient {
    pub fn new(http: HttpClient, org: impl Into<String>) -> Self {
        Self {
            http,
            api_url: DEFAULT_API_URL.to_string(),
            org: org.into(),
            repos: RefCell::new(None),
        }
    }

    /// Point at another API root, e.g. GitHub Enterprise or a test server.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    /// All repositories, following `rel="next"` pagination.
    pub fn repositories(&self) -> Result<Vec<Repository>> {
        if let Some(repos) = self.repos.borrow().as_ref() {
            return Ok(repos.clone());
        }

        let mut repos = Vec::new();
        let mut next = Some(format!("{}/orgs/{}/repos", self.api_url, self.org));
        while let Some(url) = next {
            let page = self.http.get_page::<Vec<Repository>>(&url)?;
            debug!(%url, count = page.items.len(), "Fetched repository page");
            repos.extend(page.items);
            next = page.next;
        }

        *self.repos.borrow_mut() = Some(repos.clone());
        Ok(repos)
    }

    pub fn clone_url(&self, repo: &str, protocol: RemoteProtocol) -> String {
        clone_url(&self.org, repo, protocol)
    }
}

/// `https://github.com/<org>/<repo>.git` or `git@github.com:<org>/<repo>.git`.
pub fn clone_url(org: &str, repo: &str, protocol: RemoteProtocol) -> String {
    match protocol {
        RemoteProtocol::Https => format!("https://github.com/{org}/{repo}.git"),
        RemoteProtocol::Ssh => format!("git@github.com:{org}/{repo}.git"),
    }
}

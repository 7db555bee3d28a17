//! [`HttpClient`] and pagination helpers

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{AUTHORIZATION, LINK};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One page of a paginated JSON listing.
#[derive(Debug)]
pub struct Page<T> {
    pub items: T,
    /// URL of the following page, from the `Link: <...>; rel="next"` header
    pub next: Option<String>,
}

/// Thin wrapper over a blocking `reqwest` client with a fixed user agent,
/// timeout and optional token.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    token: Option<String>,
}

impl HttpClient {
    /// Create a client identifying itself as `efr/<version>`.
    pub fn new(version: &str) -> Result<Self> {
        Self::with_timeout(version, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(version: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("efr/{version}"))
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;
        Ok(Self {
            client,
            token: None,
        })
    }

    /// Send `Authorization: token <token>` with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Fetch `url` as text.
    pub fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url)?;
        response.text().map_err(|e| Error::Request {
            url: url.to_string(),
            source: e,
        })
    }

    /// Fetch `url` and decode its JSON body.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_text(url)?;
        serde_json::from_str(&body).map_err(|e| Error::Decode {
            url: url.to_string(),
            source: e,
        })
    }

    /// Fetch one page of a paginated JSON listing.
    pub fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>> {
        let response = self.send(url)?;
        let next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_link);
        let body = response.text().map_err(|e| Error::Request {
            url: url.to_string(),
            source: e,
        })?;
        let items = serde_json::from_str(&body).map_err(|e| Error::Decode {
            url: url.to_string(),
            source: e,
        })?;
        Ok(Page { items, next })
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("token {token}")),
            None => request,
        }
    }

    fn send(&self, url: &str) -> Result<Response> {
        debug!(%url, "GET");
        let response = self.request(url).send().map_err(|e| Error::Request {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header.
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments.next()?.trim();
        let is_next = segments.any(|param| {
            let param = param.trim();
            param == "rel=\"next\"" || param == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(
        r#"<https://api.github.com/orgs/o/repos?page=2>; rel="next", <https://api.github.com/orgs/o/repos?page=5>; rel="last""#,
        Some("https://api.github.com/orgs/o/repos?page=2")
    )]
    #[case(
        r#"<https://api.github.com/orgs/o/repos?page=1>; rel="prev", <https://api.github.com/orgs/o/repos?page=1>; rel="first""#,
        None
    )]
    #[case("", None)]
    fn test_next_link(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(next_link(header).as_deref(), expected);
    }
}

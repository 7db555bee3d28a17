//! The hosted board index

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;

/// One installable board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardIndexEntry {
    pub name: String,
    pub identifier: String,
}

/// `{"boards": [{"name": ..., "identifier": ...}]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardIndex {
    pub boards: Vec<BoardIndexEntry>,
}

impl BoardIndex {
    pub fn fetch(client: &efr_http::HttpClient, url: &str) -> Result<Self> {
        let index: BoardIndex = client.get_json(url)?;
        debug!(count = index.boards.len(), "Fetched board index");
        Ok(index)
    }

    pub fn find(&self, identifier: &str) -> Option<&BoardIndexEntry> {
        self.boards.iter().find(|board| board.identifier == identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.find(identifier).is_some()
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.boards.iter().map(|b| b.identifier.as_str()).collect()
    }
}

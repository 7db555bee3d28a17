//! Blocking HTTP client shared by efr crates
//!
//! Every remote resource efr touches (board index, plugin registry, license
//! texts, install scripts, the GitHub API) is fetched through [`HttpClient`].

pub mod client;
pub mod error;

pub use client::{HttpClient, Page, next_link};
pub use error::{Error, Result};

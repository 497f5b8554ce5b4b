//! Article model and reader errors.

use serde::Serialize;

/// Readable content extracted from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpecArticle {
    /// Document `<title>`, whitespace-normalised; empty when absent.
    pub title: String,
    /// Main article text, paragraphs separated by a blank line; empty when
    /// no candidate scored.
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("Invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Failed to parse markup: {0}")]
    Parse(String),
}

impl ReaderError {
    /// True for errors caused by the caller's input rather than the remote page.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. })
    }
}

//! Fetch + extract facade used by the HTTP layer.

use reqwest::Client;
use url::Url;

use crate::conf::C_USER_AGENT;
use crate::extract::extract_article;
use crate::fetch::fetch_markup;
use crate::spec::{ReaderError, SpecArticle};

/// Parse `raw` as an absolute `http`/`https` URL.
pub fn parse_article_url(raw: &str) -> Result<Url, ReaderError> {
    let url = Url::parse(raw.trim()).map_err(|e| ReaderError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ReaderError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {scheme:?}"),
        }),
    }
}

/// Reads the main article of a single page.
#[derive(Debug, Clone)]
pub struct ArticleReader {
    client: Client,
}

impl ArticleReader {
    pub fn new() -> Result<Self, ReaderError> {
        let client = Client::builder()
            .user_agent(C_USER_AGENT)
            .build()
            .map_err(|source| ReaderError::Fetch {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// One attempt: fetch `raw_url`, then extract its title and content.
    pub async fn read(&self, raw_url: &str) -> Result<SpecArticle, ReaderError> {
        let url = parse_article_url(raw_url)?;
        let markup = fetch_markup(&self.client, &url).await?;
        extract_article(&markup)
    }
}

// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP and extracts their links.
//
// Key functionality:
// - One shared reqwest Client for the whole crawl (connection pooling)
// - A per-request timeout so a dead server does not hold a slot forever
// - Non-2xx responses count as failures; their bodies are never parsed
// - Every failure is logged and turned into "no links on this page"
// =============================================================================

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{info, warn};

use super::{extract_hrefs, Fetcher};
use crate::crawl::{NormalizedLink, RawLink};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Everything that can go wrong between "GET url" and "here are the hrefs"
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection refused, DNS failure, timeout, ...
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("server answered HTTP {}", .0.as_u16())]
    Status(StatusCode),

    /// The body could not be read or decoded as text
    #[error("failed to read document: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to parse document: {0}")]
    Document(String),
}

impl FetchError {
    // Network/HTTP failures vs. documents we got but could not read
    pub fn is_document_failure(&self) -> bool {
        matches!(self, FetchError::Body(_) | FetchError::Document(_))
    }
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    // Performs one GET and returns the hrefs on the page, or why it could not
    pub async fn fetch_links(&self, url: &NormalizedLink) -> Result<HashSet<RawLink>, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await.map_err(FetchError::Body)?;
        extract_hrefs(&body)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn find_all_links(&self, url: &NormalizedLink) -> HashSet<RawLink> {
        info!(%url, "visit url");

        match self.fetch_links(url).await {
            Ok(links) => links,
            Err(err) => {
                warn!(
                    %url,
                    error = %err,
                    document = err.is_document_failure(),
                    "page yielded no links"
                );
                HashSet::new()
            }
        }
    }
}

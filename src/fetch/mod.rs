// src/fetch/mod.rs
// =============================================================================
// This module turns a URL into the set of hrefs found on that page.
//
// Submodules:
// - http: Fetches a page with reqwest and reports what went wrong, if anything
// - html: Pulls every anchor href out of an HTML document
//
// The crawl engine only sees the Fetcher trait, so tests can swap in an
// in-memory site instead of a real network.
// =============================================================================

mod html;
mod http;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::crawl::{NormalizedLink, RawLink};

pub use html::extract_hrefs;
pub use http::{FetchError, HttpFetcher};

/// Given an absolute URL, returns the distinct hrefs of every anchor on it.
///
/// Implementations never fail: a page that cannot be fetched or parsed
/// yields an empty set.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn find_all_links(&self, url: &NormalizedLink) -> HashSet<RawLink>;
}

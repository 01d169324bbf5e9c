// src/fetch/html.rs
// =============================================================================
// This module extracts anchor hrefs from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser), which recovers from
//   broken markup instead of failing
//
// Unlike a link checker we do NOT resolve anything here: hrefs are returned
// exactly as written, and the crawl engine normalizes them against the domain.
// =============================================================================

use std::collections::HashSet;

use scraper::{Html, Selector};

use super::FetchError;
use crate::crawl::RawLink;

// Returns the distinct href values of every <a> element in the document
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='/docs'>Again</a><img src='/x.png'>"
//   result = {"/docs"}
pub fn extract_hrefs(html: &str) -> Result<HashSet<RawLink>, FetchError> {
    let selector =
        Selector::parse("a[href]").map_err(|e| FetchError::Document(e.to_string()))?;

    let document = Html::parse_document(html);

    let hrefs = document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(RawLink::from)
        .collect();

    Ok(hrefs)
}

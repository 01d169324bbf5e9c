// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a single domain.
//
// Features:
// - Depth-first recursion where sibling pages are fetched concurrently: each
//   new same-domain link becomes its own task instead of being visited one
//   after another, and a page still waits for all of its children
// - A fixed cap on how many fetches are in flight at once
// - Links are normalized before dedup, so "/a", "/a/" and "/a#top" are one page
// - Links to other hosts are recorded but never followed
//
// Submodules:
// - link: Domain, RawLink/NormalizedLink and the normalization rules
// - engine: The concurrent crawl itself
// - sink: Where discovered links are written (CSV)
// =============================================================================

mod engine;
mod link;
mod sink;

pub use engine::{crawl, CrawlError, Report, DEFAULT_CONCURRENCY};
pub use link::{normalize, Domain, DomainError, NormalizeError, NormalizedLink, RawLink};
pub use sink::{result_file_name, CsvSink};

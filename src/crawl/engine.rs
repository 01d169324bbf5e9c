// src/crawl/engine.rs
// =============================================================================
// This module implements the crawl itself: a tree of concurrent branches.
//
// How it works:
// 1. Fetch the domain root
// 2. Under one lock: normalize every href, keep the ones never seen before,
//    write them to the sink and flush
// 3. Release the lock, then spawn one branch per new same-domain link
// 4. A branch returns only when all of its children have returned
//
// Resources shared by every branch live in CrawlState:
// - a semaphore that caps how many fetches are in flight
// - an atomic fetch counter
// - the Ledger (visited set + sink) behind a single mutex, so "seen" and
//   "written" can never disagree
// =============================================================================

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::{BoxFuture, FutureExt};
use thiserror::Error;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, trace, warn};

use super::link::{normalize, Domain, NormalizedLink, RawLink};
use super::sink::{Sink, SinkError};
use crate::fetch::Fetcher;

/// How many fetches may be in flight at once unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 19;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("crawl branch failed: {0}")]
    Branch(#[from] JoinError),
}

/// What a finished run reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub elapsed: Duration,
    pub fetches: u64,
    pub recorded: usize,
}

struct Ledger {
    visited: HashSet<NormalizedLink>,
    sink: Box<dyn Sink>,
}

struct CrawlState {
    domain: Domain,
    fetcher: Arc<dyn Fetcher>,
    limiter: Semaphore,
    fetches: AtomicU64,
    ledger: Mutex<Ledger>,
    started: Instant,
}

impl CrawlState {
    async fn fetch(&self, link: &NormalizedLink) -> HashSet<RawLink> {
        // The limiter is never closed, so acquire cannot actually fail
        let Ok(_permit) = self.limiter.acquire().await else {
            return HashSet::new();
        };
        self.fetches.fetch_add(1, Ordering::Relaxed);

        self.fetcher.find_all_links(link).await
    }

    // Normalizes one page's hrefs, keeps the first-time ones and writes them out.
    // The whole batch runs under the ledger lock.
    async fn record(&self, hrefs: HashSet<RawLink>) -> Result<Vec<NormalizedLink>, SinkError> {
        let mut ledger = self.ledger.lock().await;
        let mut discovered = Vec::new();

        for raw in hrefs {
            let link = match normalize(&raw, &self.domain) {
                Ok(link) => link,
                Err(err) if err.is_filtered() => {
                    info!(href = %raw, reason = %err, "skipping link");
                    continue;
                }
                Err(err) => {
                    warn!(href = %raw, reason = %err, "skipping link");
                    continue;
                }
            };

            if !ledger.visited.insert(link.clone()) {
                trace!(%link, "already visited");
                continue;
            }

            info!(
                %link,
                fetches = self.fetches.load(Ordering::Relaxed),
                elapsed = ?self.started.elapsed(),
                "found new link"
            );
            ledger.sink.write_link(&link)?;
            discovered.push(link);
        }

        ledger.sink.flush()?;
        Ok(discovered)
    }
}

// One branch of the crawl. Boxed because it spawns itself.
fn visit(state: Arc<CrawlState>, link: NormalizedLink) -> BoxFuture<'static, Result<(), CrawlError>> {
    async move {
        let hrefs = state.fetch(&link).await;
        if hrefs.is_empty() {
            return Ok(());
        }

        let discovered = state.record(hrefs).await?;

        let mut branches = JoinSet::new();
        for child in discovered {
            if state.domain.owns(&child) {
                branches.spawn(visit(Arc::clone(&state), child));
            } else {
                debug!(link = %child, "off-domain link recorded, not followed");
            }
        }

        // Dropping the set on error aborts the remaining siblings
        while let Some(branch) = branches.join_next().await {
            branch??;
        }

        Ok(())
    }
    .boxed()
}

/// Crawls `domain` from its root, writing every newly discovered link to `sink`.
///
/// At most `concurrency` fetches run at once (a value of 0 is treated as 1).
/// Returns once the root's whole transitive recursion has finished.
pub async fn crawl(
    domain: Domain,
    fetcher: Arc<dyn Fetcher>,
    sink: Box<dyn Sink>,
    concurrency: usize,
) -> Result<Report, CrawlError> {
    let start = domain.start_link();
    info!(%domain, %start, concurrency, "starting crawl");

    let state = Arc::new(CrawlState {
        domain,
        fetcher,
        limiter: Semaphore::new(concurrency.max(1)),
        fetches: AtomicU64::new(0),
        ledger: Mutex::new(Ledger {
            visited: HashSet::new(),
            sink,
        }),
        started: Instant::now(),
    });

    visit(Arc::clone(&state), start).await?;

    let recorded = state.ledger.lock().await.visited.len();
    Ok(Report {
        elapsed: state.started.elapsed(),
        fetches: state.fetches.load(Ordering::Relaxed),
        recorded,
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<CrawlState>?
//    - Every spawned branch needs the same limiter, counter and ledger
//    - Arc is a thread-safe reference counter: cloning it copies a pointer,
//      not the state
//
// 2. What is a Semaphore?
//    - A pool of N permits; acquire() waits while all N are taken
//    - The permit is released when `_permit` goes out of scope, which is
//      right after the fetch returns
//
// 3. Why BoxFuture for visit()?
//    - An async fn that calls itself would have an infinitely sized future
//    - Boxing puts each level on the heap so the size is known
//
// 4. What is JoinSet?
//    - A collection of spawned tasks we can await one by one
//    - join_next() returns None once every task has finished
//    - Dropping a JoinSet aborts whatever is still running
//
// 5. What does `branch??` mean?
//    - The first ? handles the task itself failing (a panic -> JoinError)
//    - The second ? handles the branch returning a CrawlError
// -----------------------------------------------------------------------------

// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command: crawl one domain. The domain can be passed as
// an argument or through the DOMAIN environment variable.
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates the parsing code
// - Attributes: #[arg(...)] configures each flag (defaults, env fallback)
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::Parser;

use crate::crawl::DEFAULT_CONCURRENCY;

#[derive(Parser, Debug)]
#[command(
    name = "domain-crawler",
    version,
    about = "Crawl one web domain and record every link reachable from its root",
    long_about = "domain-crawler starts at the root of a domain, follows every anchor that stays \
                  on that domain, and writes each distinct link it finds to \
                  <domain>_result.csv. Links to other hosts are recorded but not followed."
)]
pub struct Cli {
    /// Domain to crawl, optionally with a port (e.g. monzo.com or 127.0.0.1:8080)
    ///
    /// A domain with an explicit port is crawled over plain HTTP, anything
    /// else over HTTPS.
    #[arg(env = "DOMAIN", default_value = "monzo.com")]
    pub domain: String,

    /// Maximum number of page fetches in flight at once
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Directory the result file is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Print the final report as JSON instead of a text summary
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (RUST_LOG controls verbosity, default "info")
// 2. Parse command-line arguments using clap
// 3. Create the result file; if that fails nothing else is attempted
// 4. Crawl the domain and print a summary
// 5. Exit with proper code (0 = run completed, 2 = error)
// =============================================================================

mod cli;
mod crawl;
mod fetch;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use crawl::{CsvSink, Domain, Report};
use fetch::HttpFetcher;

// What --json prints once the run is over
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    domain: &'a str,
    elapsed_ms: u128,
    fetches: u64,
    recorded: usize,
    result_file: &'a str,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let domain = Domain::parse(&cli.domain).context("invalid domain")?;
    tracing::info!(%domain, "checking domain");

    let result_path = cli.output_dir.join(crawl::result_file_name(&domain));
    let sink = CsvSink::create(&result_path)?;

    let fetcher = HttpFetcher::new(cli.timeout())?;

    let report = crawl::crawl(
        domain.clone(),
        Arc::new(fetcher),
        Box::new(sink),
        cli.concurrency,
    )
    .await
    .context("crawl aborted")?;

    let result_file = result_path.display().to_string();
    print_report(&domain, &report, &result_file, cli.json)
}

fn print_report(domain: &Domain, report: &Report, result_file: &str, json: bool) -> Result<()> {
    if json {
        let summary = RunSummary {
            domain: domain.as_str(),
            elapsed_ms: report.elapsed.as_millis(),
            fetches: report.fetches,
            recorded: report.recorded,
            result_file,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        eprintln!(
            "total time: {:?}, request counter: {}, links recorded: {}, result file: {}",
            report.elapsed, report.fetches, report.recorded, result_file
        );
    }
    Ok(())
}

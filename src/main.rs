//! tatdict main entry point
//!
//! This is the command-line interface for the Tatar–Russian dictionary scraper.

use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tatdict::config::{load_or_default, Config};
use tatdict::crawler::{crawl, Coordinator};
use tatdict::output::{print_statistics, PersistenceSink};
use tatdict::storage::ResultStore;
use tracing_subscriber::EnvFilter;

/// tatdict: a Tatar–Russian dictionary scraper
///
/// Crawls every section of the dictionary site, follows pagination down to
/// each word page, and saves the headword → translation map as JSON and CSV.
#[derive(Parser, Debug)]
#[command(name = "tatdict")]
#[command(version = "1.0.0")]
#[command(about = "Scrapes the Tatar–Russian dictionary", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using defaults"),
    }
    let config = load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tatdict=info,warn"),
            1 => EnvFilter::new("tatdict=debug,info"),
            2 => EnvFilter::new("tatdict=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the crawl and always flushes whatever was collected
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let started = Instant::now();

    let coordinator =
        Coordinator::from_config(&config).context("Failed to set up the crawler")?;
    let store = ResultStore::new();
    let sink = PersistenceSink::from_config(&config.output);

    let crawl_result = crawl(&coordinator, &store, shutdown_signal()).await;
    match &crawl_result {
        Ok(()) => tracing::info!("Crawl completed successfully"),
        Err(e) if e.is_transient() => tracing::error!(
            "Crawl aborted: {}. The site is not keeping up, reduce max-concurrent-fetches",
            e
        ),
        Err(e) => tracing::error!("Crawl failed: {}", e),
    }

    tracing::info!("Saving {} words...", store.len());
    let flush_result = sink.flush(&store);

    println!();
    print_statistics(&coordinator.statistics(), coordinator.budget().peak());
    match &flush_result {
        Ok(count) => {
            println!("Words saved: {}", count);
            println!("  JSON: {}", config.output.json_path);
            println!("  CSV: {}", config.output.csv_path);
        }
        Err(e) => println!("Saving failed: {}", e),
    }
    println!("Elapsed: {:.2?}", started.elapsed());

    match (crawl_result, flush_result) {
        (Ok(()), Ok(_)) => Ok(()),
        (Err(e), _) => Err(anyhow!(e).context("Crawl did not finish")),
        (Ok(()), Err(e)) => Err(anyhow!(e).context("Failed to save results")),
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, stopping crawl"),
        _ = terminate => tracing::info!("Received SIGTERM, stopping crawl"),
    }
}

// subsearch: run one subtitle search against a local directory tree
//
// Directories under --root act as object-store prefixes. Configuration comes
// from the environment (see `SearchConfig::from_env`) with CLI overrides.
// The outcome is printed as JSON on stdout; logs go to stderr (RUST_LOG).

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use subtitle_search::{
    ListingStrategy, LocalObjectStore, SearchCache, SearchConfig, SearchConfigBuilder,
    SearchOrchestrator, WorkerPool,
};

#[derive(Debug, Parser)]
#[command(name = "subsearch", version, about = "Search subtitle files for a phrase")]
struct Args {
    /// Directory holding the subtitle tree
    #[arg(long, env = "SUBSEARCH_DIR")]
    root: PathBuf,

    /// How to enumerate documents
    #[arg(long)]
    strategy: Option<ListingStrategy>,

    /// Document suffix to search
    #[arg(long)]
    suffix: Option<String>,

    /// Concurrent fetches
    #[arg(long)]
    concurrency: Option<usize>,

    /// Hard cap on returned occurrences
    #[arg(long)]
    limit: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Phrase to search for (at least 2 characters)
    query: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    let store = Arc::new(
        LocalObjectStore::open(&args.root)
            .with_context(|| format!("Failed to open subtitle directory {}", args.root.display()))?,
    );
    let pool = WorkerPool::new(config.concurrency(), config.task_timeout());
    let cache = Arc::new(SearchCache::from_config(&config));
    let cleanup = cache.start_cleanup_task(config.cache_cleanup_interval());

    let orchestrator = SearchOrchestrator::new(store, config, pool, cache);
    let outcome = orchestrator
        .handle_search(&args.query)
        .await
        .with_context(|| format!("Search for '{}' failed", args.query))?;

    cleanup.abort();

    let json = if args.pretty {
        serde_json::to_string_pretty(outcome.as_ref())
    } else {
        serde_json::to_string(outcome.as_ref())
    }
    .context("Failed to serialise search outcome")?;
    println!("{json}");

    Ok(())
}

fn build_config(args: &Args) -> Result<SearchConfig> {
    let base = SearchConfig::from_env().context("Invalid search configuration in environment")?;
    let mut builder = SearchConfigBuilder::from(base);

    if let Some(strategy) = args.strategy {
        builder = builder.listing_strategy(strategy);
    }
    if let Some(suffix) = &args.suffix {
        builder = builder.document_suffix(suffix.clone());
    }
    if let Some(concurrency) = args.concurrency {
        builder = builder.concurrency(concurrency);
    }
    if args.limit.is_some() {
        builder = builder.max_results(args.limit);
    }

    builder.build().context("Invalid search configuration")
}

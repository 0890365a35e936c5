//! Quill main entry point
//!
//! This is the command-line interface for the Quill crawl-and-rank search engine.

use anyhow::Context;
use clap::Parser;
use quill_search::config::{load_config_with_hash, validate, Config};
use quill_search::crawler::Crawler;
use quill_search::lexer::Lexer;
use quill_search::ranker::Model;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quill: a minimal crawl-and-rank search engine
///
/// Quill fetches a seed page and every page it links to, reduces them to
/// readable text, and prints the pages that best match the query terms,
/// best first.
#[derive(Parser, Debug)]
#[command(name = "quill-search")]
#[command(version)]
#[command(about = "Crawl a seed page and rank its neighbourhood with TF-IDF", long_about = None)]
struct Cli {
    /// URL of the page to start from
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Query terms to rank the crawled pages by
    #[arg(value_name = "TERMS")]
    terms: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
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

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let config = Config::default();
            validate(&config).context("default configuration is invalid")?;
            config
        }
    };

    let crawler = Crawler::from_config(&config).context("failed to build HTTP client")?;

    tracing::info!("Scraping {}", cli.seed);
    let pages = crawler
        .scrape(&cli.seed)
        .await
        .with_context(|| format!("failed to scrape {}", cli.seed))?;

    let mut model = Model::default();
    for (url, content) in pages {
        model.add_documents([(url, Lexer::new(content))]);
    }
    tracing::info!("Indexed {} pages", model.len());

    let terms = Lexer::new(&cli.terms).all();
    if terms.is_empty() {
        tracing::warn!("No query terms given, nothing to rank");
        return Ok(());
    }

    for path in model.rank(&terms) {
        println!("{}", path);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quill_search=info,warn"),
            1 => EnvFilter::new("quill_search=debug,info"),
            2 => EnvFilter::new("quill_search=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

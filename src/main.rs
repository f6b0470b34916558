//! Quote-Harvest main entry point
//!
//! This is the command-line interface for the Quote-Harvest scraper.

use clap::Parser;
use quote_harvest::config::{load_config_with_hash, validate, Config};
use quote_harvest::crawler::{run_crawl, CrawlRunner};
use quote_harvest::output::{print_quotes, print_report, CrawlReport};
use quote_harvest::renderer::SnapshotRenderer;
use quote_harvest::storage::open_storage;
use quote_harvest::HarvestError;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Quote-Harvest: a paginated quote scraper
///
/// Quote-Harvest renders a client-side listing in a headless browser, follows
/// its next-page control and appends every quote it finds to a SQLite store.
#[derive(Parser, Debug)]
#[command(name = "quote-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A paginated quote scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "list")]
    dry_run: bool,

    /// Print the quotes already in the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    list: bool,

    /// Crawl saved HTML pages from this directory instead of a live browser
    #[arg(long, value_name = "DIR")]
    snapshot_dir: Option<PathBuf>,

    /// Override the target listing URL
    #[arg(long)]
    url: Option<String>,

    /// Override the maximum number of pages
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Override the database path
    #[arg(long, value_name = "PATH")]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.list {
        handle_list(&config)?;
    } else {
        handle_crawl(config, cli.snapshot_dir.as_deref()).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quote_harvest=info,warn"),
            1 => EnvFilter::new("quote_harvest=debug,info"),
            2 => EnvFilter::new("quote_harvest=trace,debug"),
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

/// Loads the configuration file (or defaults) and applies CLI overrides
fn load_effective_config(cli: &Cli) -> Result<Config, HarvestError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, cli);
    validate(&config)?;
    Ok(config)
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ref url) = cli.url {
        config.target.url = url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(ref database) = cli.database {
        config.output.database_path = database.clone();
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Quote-Harvest Dry Run ===\n");

    println!("Target:");
    println!("  URL: {}", config.target.url);

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Wait timeout: {}s", config.crawler.wait_timeout_secs);
    println!("  Settle delay: {}ms", config.crawler.settle_delay_ms);
    println!("  Settle mode: {:?}", config.crawler.settle_mode);

    println!("\nSelectors:");
    println!("  Quote block: {}", config.selectors.quote);
    println!("  Text: {}", config.selectors.text);
    println!("  Author: {}", config.selectors.author);
    println!("  Tag: {}", config.selectors.tag);
    println!("  Next page: {}", config.selectors.next_page);

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);
    if let Some(ref path) = config.browser.chrome_executable {
        println!("  Executable: {}", path);
    }
    if let Some(ref url) = config.browser.remote_debugging_url {
        println!("  Remote: {}", url);
    }
    println!("  Request timeout: {}s", config.browser.request_timeout_secs);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --list mode: prints stored quotes
fn handle_list(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    print_quotes(&storage)?;

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    snapshot_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Target: {}, max pages: {}, database: {}",
        config.target.url,
        config.crawler.max_pages,
        config.output.database_path
    );

    let result = match snapshot_dir {
        Some(dir) => crawl_snapshots(config, dir).await,
        None => run_crawl(config).await,
    };

    match result {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Crawls saved pages instead of a live site
async fn crawl_snapshots(
    config: Config,
    dir: &Path,
) -> Result<CrawlReport, HarvestError> {
    tracing::info!("Crawling snapshots from {}", dir.display());

    let mut renderer = SnapshotRenderer::from_dir(dir)?;
    let storage = open_storage(Path::new(&config.output.database_path))?;

    let mut runner = CrawlRunner::new(config, storage);
    runner.run(&mut renderer).await
}

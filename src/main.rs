//! Lot-Harvest main entry point
//!
//! Command-line interface for the auction catalog harvester.

use anyhow::bail;
use clap::Parser;
use lot_harvest::config::load_config;
use lot_harvest::output::write_report;
use lot_harvest::walker::CatalogWalker;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lot-Harvest: an incremental auction catalog harvester
///
/// Walks a paginated auction catalog page by page, collects one record
/// per lot tile, and renders the collected records into a static HTML
/// report.
#[derive(Parser, Debug)]
#[command(name = "lot-harvest")]
#[command(version)]
#[command(about = "Harvest a paginated auction catalog into an HTML report", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the configured page limit
    #[arg(long, value_name = "N")]
    page_limit: Option<u32>,

    /// Write a report even if the walk ended in a fetch failure
    /// (the report then covers only the pages before the failure)
    #[arg(long)]
    allow_partial: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,

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

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // CLI page limit wins over the config file
    if cli.page_limit.is_some() {
        config.catalog.page_limit = cli.page_limit;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config, cli.allow_partial).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lot_harvest=info,warn"),
            1 => EnvFilter::new("lot_harvest=debug,info"),
            2 => EnvFilter::new("lot_harvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the walk plan
fn handle_dry_run(config: &lot_harvest::config::Config) {
    println!("=== Lot-Harvest Dry Run ===\n");

    println!("Catalog:");
    println!("  Base URL: {}", config.catalog.base_url);
    println!("  Page parameter: {}", config.catalog.page_param);
    match config.catalog.page_limit {
        Some(limit) => println!("  Page limit: {}", limit),
        None => println!("  Page limit: none (walk until the catalog ends)"),
    }

    println!("\nFetch:");
    println!("  Max retries: {}", config.fetch.max_retries);
    println!("  Retry delay: {}ms", config.fetch.retry_delay_ms);
    println!("  Request timeout: {}s", config.fetch.request_timeout_secs);
    println!("  Page delay: {}ms", config.fetch.page_delay_ms);
    println!("  User agent: {}", config.fetch.user_agent);

    println!("\nOutput:");
    println!("  Report: {}", config.output.report_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start at {}?{}=1",
        config.catalog.base_url, config.catalog.page_param
    );
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: lot_harvest::config::Config,
    allow_partial: bool,
) -> anyhow::Result<()> {
    let report_path = PathBuf::from(&config.output.report_path);

    let walker = CatalogWalker::new(&config)?;
    let outcome = walker.walk().await;

    tracing::info!(
        "Walk finished: {} records from {} page(s), stopped because: {}",
        outcome.records.len(),
        outcome.pages_fetched,
        outcome.termination
    );

    if outcome.termination.is_fatal() {
        if !allow_partial {
            bail!(
                "walk aborted ({}); {} records harvested before the failure were \
                 discarded (pass --allow-partial to render them anyway)",
                outcome.termination,
                outcome.records.len()
            );
        }
        tracing::warn!(
            "Rendering PARTIAL report: {} records harvested before the failure",
            outcome.records.len()
        );
    }

    let generated_at = chrono::Local::now().format("%d/%m/%Y %H:%M:%S").to_string();
    write_report(&outcome, &generated_at, &report_path)?;

    println!(
        "Found {} lots ({}); report written to {}",
        outcome.records.len(),
        outcome.termination,
        report_path.display()
    );

    Ok(())
}

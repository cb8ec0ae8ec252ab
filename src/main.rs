//! Bubble-Scrape main entry point

use anyhow::Context;
use bubble_scrape::config::load_config;
use bubble_scrape::scraper::scrape;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bubble-Scrape: collect review ratings and text into a CSV file
///
/// Drives a headless Chromium session over the configured target pages,
/// walking each review section page by page. Selectors, targets, and
/// retry/wait budgets all come from the TOML configuration file.
#[derive(Parser, Debug)]
#[command(name = "bubble-scrape")]
#[command(version = "0.3.0")]
#[command(about = "Review scraper for paginated listing pages", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without launching a browser
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    tracing::info!("Scraping {} target(s)", config.targets.len());
    scrape(config).await.context("scrape failed")?;
    tracing::info!("Scrape completed successfully");

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bubble_scrape=info,warn"),
            1 => EnvFilter::new("bubble_scrape=debug,info"),
            2 => EnvFilter::new("bubble_scrape=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the plan
fn handle_dry_run(config: &bubble_scrape::Config) {
    println!("=== Bubble-Scrape Dry Run ===\n");

    println!("Scraper:");
    println!("  Max attempts per target: {}", config.scraper.max_attempts);
    println!("  Click retries: {}", config.scraper.click_retries);
    println!(
        "  Clickable timeout: {}ms",
        config.scraper.clickable_timeout_ms
    );
    println!("  Section timeout: {}ms", config.scraper.section_timeout_ms);
    println!("  Expand timeout: {}ms", config.scraper.expand_timeout_ms);

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);
    match &config.browser.chrome_path {
        Some(path) => println!("  Chrome path: {}", path),
        None => println!("  Chrome path: (auto-detect)"),
    }

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\nTargets ({}):", config.targets.len());
    for target in &config.targets {
        println!("  - {}", target.url);
    }

    println!("\nSelectors:");
    println!("  Review section: {}", config.selectors.review_section);
    println!("  Containers: {}", config.selectors.review_containers);
    println!(
        "  Expand controls: {}",
        config.selectors.expand_controls.len()
    );
    println!(
        "  Text candidates: {}",
        config.selectors.text_candidates.len()
    );

    println!("\n✓ Configuration is valid");
}

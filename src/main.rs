//! PixThief main entry point
//!
//! This is the command-line interface for the PixThief image harvester.

use anyhow::Context;
use clap::Parser;
use pixthief::config::{load_options_file, resolve_options, CrawlMode, RawOptions, ScraperConfig};
use pixthief::output::print_statistics;
use pixthief::Scraper;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// PixThief: a polite web image harvester
///
/// PixThief downloads every image it can find on a page, or on every page
/// of a site when run with --domain. Images are discovered in img/picture
/// tags, inline and embedded CSS, lazy-loading attributes, media posters,
/// and URLs embedded in scripts or JSON.
#[derive(Parser, Debug)]
#[command(name = "pixthief")]
#[command(version = "1.0.0")]
#[command(about = "A polite web image harvester", long_about = None)]
struct Cli {
    /// Page to harvest (may instead come from the config file)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Crawl every page on the same host, breadth-first
    #[arg(short, long)]
    domain: bool,

    /// Maximum number of pages to process in domain mode [default: 100]
    #[arg(short, long, value_name = "N")]
    max_pages: Option<u32>,

    /// Output folder (default: derived from the page title or URL)
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Also download animated GIFs
    #[arg(long)]
    include_gifs: bool,

    /// Pace requests with randomized delays and send browser-like headers
    #[arg(long)]
    stealth: bool,

    /// Fixed delay between requests in milliseconds (enables stealth pacing)
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Convert every image to this format (jpg, jpeg, png, gif)
    #[arg(long, value_name = "FORMAT")]
    convert_to: Option<String>,

    /// JPEG quality used with --convert-to jpg, 1-100 [default: 90]
    #[arg(long, value_name = "N")]
    jpeg_quality: Option<u32>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// TOML file with default options; command-line values take precedence
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate options and show what would be done without fetching anything
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Options given on the command line; unset flags stay `None` so a
    /// config file value can show through
    fn options(&self) -> RawOptions {
        RawOptions {
            url: self.url.clone(),
            domain: self.domain.then_some(true),
            out: self.out.clone(),
            max_pages: self.max_pages,
            include_gifs: self.include_gifs.then_some(true),
            stealth: self.stealth.then_some(true),
            delay: self.delay,
            convert_to: self.convert_to.clone(),
            jpeg_quality: self.jpeg_quality,
            timeout: self.timeout,
            verbose: (self.verbose > 0).then_some(true),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_options = match &cli.config {
        Some(path) => load_options_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => RawOptions::default(),
    };

    let config =
        resolve_options(file_options.overlay(cli.options())).context("Invalid options")?;

    // A config file can ask for verbose output; -v on the command line wins
    let verbosity = if cli.verbose == 0 && config.verbose {
        1
    } else {
        cli.verbose
    };
    setup_logging(verbosity, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let mut scraper = Scraper::new(config).context("Failed to initialize HTTP client")?;
    let report = scraper.run().await.context("Scrape failed")?;

    if !cli.quiet {
        println!();
        print_statistics(&report);
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
            0 => EnvFilter::new("pixthief=info,warn"),
            1 => EnvFilter::new("pixthief=debug,info"),
            2 => EnvFilter::new("pixthief=trace,debug"),
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

/// Handles --dry-run: shows the resolved configuration
fn print_dry_run(config: &ScraperConfig) {
    println!("=== PixThief Dry Run ===\n");

    println!("Target:");
    println!("  URL: {}", config.url);
    match config.mode {
        CrawlMode::SinglePage => println!("  Mode: single page"),
        CrawlMode::Domain => {
            println!("  Mode: domain crawl");
            println!("  Max pages: {}", config.max_pages);
        }
    }

    println!("\nOutput:");
    match &config.output_dir {
        Some(dir) => println!("  Folder: {}", dir.display()),
        None => println!("  Folder: derived from the page title or URL"),
    }
    match config.convert_to {
        Some(format) => println!("  Convert to: {}", format),
        None => println!("  Convert to: (keep original format)"),
    }
    println!("  JPEG quality: {}", config.jpeg_quality);
    println!(
        "  Animated GIFs: {}",
        if config.include_animated_gifs { "included" } else { "skipped" }
    );

    println!("\nRequests:");
    if config.stealth {
        let delay_type = if config.randomize_delays { "randomized" } else { "fixed" };
        println!("  Stealth: on ({}ms {} delay)", config.delay_ms, delay_type);
    } else {
        println!("  Stealth: off");
    }
    println!("  Timeout: {}s", config.timeout_secs);

    println!("\n✓ Options are valid");
}

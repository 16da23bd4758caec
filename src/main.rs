//! Sumi-Sitemap main entry point
//!
//! This is the command-line interface for the Sumi-Sitemap site crawler.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use sumi_sitemap::config::{compute_config_hash, parse_header, read_config, validate, Config};
use sumi_sitemap::crawler::crawl_until;
use sumi_sitemap::output::{print_statistics, NamespaceStyle};
use tracing_subscriber::EnvFilter;

/// Sumi-Sitemap: a single-site sitemap builder
///
/// Sumi-Sitemap crawls a website starting from its homepage, follows every
/// link that stays on the site, and writes an XML sitemap of every URL it
/// visited. Unreachable pages are kept in the sitemap and marked invalid.
#[derive(Parser, Debug)]
#[command(name = "sumi-sitemap")]
#[command(version)]
#[command(about = "A single-site sitemap builder", long_about = None)]
struct Cli {
    /// Homepage to crawl (overrides `site.homepage` from the config file)
    #[arg(value_name = "HOMEPAGE")]
    homepage: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file name without extension (".xml" is appended)
    #[arg(short, long, value_name = "NAME")]
    output: Option<String>,

    /// Extra request header, repeatable (e.g. -H "Accept-Language: en-GB")
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// Stop after this many URLs have been visited
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Maximum number of queued URLs
    #[arg(long, value_name = "N")]
    max_frontier: Option<usize>,

    /// Number of pages fetched concurrently
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Stop the whole crawl after this many seconds
    #[arg(long, value_name = "SECS")]
    crawl_timeout: Option<u64>,

    /// Use the sitemaps.org namespace instead of the homepage
    #[arg(long)]
    standard_namespace: bool,

    /// Validate config and show what would be crawled without actually crawling
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

    let config = build_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_sitemap=info,warn"),
            1 => EnvFilter::new("sumi_sitemap=debug,info"),
            2 => EnvFilter::new("sumi_sitemap=trace,debug"),
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

/// Loads the config file if one was given, then applies command-line overrides
///
/// The file is only validated after the overrides are applied, so flags can
/// fill in or correct values the file leaves out or gets wrong.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = read_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(homepage) = &cli.homepage {
        config.site.homepage = homepage.clone();
    }
    if config.site.homepage.is_empty() {
        bail!("no homepage given; pass one as an argument or set site.homepage in the config");
    }

    if let Some(name) = &cli.output {
        config.output.file_name = name.clone();
    }
    for header in &cli.headers {
        let (name, value) = parse_header(header)?;
        config.headers.insert(name, value);
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
    if let Some(max_frontier) = cli.max_frontier {
        config.crawler.max_frontier = max_frontier;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout_secs = timeout;
    }
    if let Some(crawl_timeout) = cli.crawl_timeout {
        config.crawler.crawl_timeout_secs = Some(crawl_timeout);
    }
    if cli.standard_namespace {
        config.output.namespace = NamespaceStyle::SitemapsOrg;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Sitemap Dry Run ===\n");

    println!("Site:");
    println!("  Homepage: {}", config.site.homepage);

    println!("\nCrawler Configuration:");
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    match config.crawler.crawl_timeout_secs {
        Some(secs) => println!("  Crawl timeout: {}s", secs),
        None => println!("  Crawl timeout: none"),
    }
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    println!("  Max frontier: {}", config.crawler.max_frontier);

    println!("\nRequest Headers:");
    for (name, value) in config.request_headers() {
        println!("  {}: {}", name, value);
    }

    let file = format!("{}.xml", config.output.file_name);
    let path = match &config.output.directory {
        Some(directory) => PathBuf::from(directory).join(file),
        None => PathBuf::from(file),
    };
    println!("\nOutput:");
    println!("  File: {}", path.display());
    println!(
        "  Namespace: {}",
        config.output.namespace.resolve(&config.site.homepage)
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> anyhow::Result<()> {
    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::warn!("Could not listen for Ctrl-C; the crawl can only stop on its own");
            std::future::pending::<()>().await;
        }
    };

    let report = match crawl_until(config, shutdown).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if report.stats.stop_reason.is_cancelled() {
        tracing::warn!(
            "Crawl stopped early ({}); the sitemap may be incomplete",
            report.stats.stop_reason
        );
    }

    if !quiet {
        print_statistics(&report.stats);
        println!(
            "\n✓ Sitemap of {} links written to: {}",
            report.document.len(),
            report.document.path().display()
        );
    }

    Ok(())
}

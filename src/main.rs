//! Signal Scout - Multi-Source Token Signal Aggregator
//!
//! Runs aggregation cycles against the configured providers and prints the
//! ranked signals, the market overview, or a continuous feed.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

use signal_scout::adapters::cli::{self, Command, OutputFormat, OverviewCmd, SignalsCmd, WatchCmd, DEFAULT_CONFIG_PATH};
use signal_scout::adapters::{build_providers, HttpFetcher, HttpFetcherConfig};
use signal_scout::application::{AggregatorSettings, CycleReport, SignalAggregator};
use signal_scout::config::{load_config, Config};
use signal_scout::domain::{MarketOverview, ScoredSignal};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (API keys go here, not in the config file)
    dotenvy::dotenv().ok();

    let app = cli::init();
    let config = resolve_config(app.config.as_deref())?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    let aggregator = build_aggregator(&config)?;

    match app.command {
        Command::Signals(cmd) => signals_command(&aggregator, cmd).await,
        Command::Overview(cmd) => overview_command(&aggregator, cmd).await,
        Command::Watch(cmd) => watch_command(aggregator, &config, cmd).await,
    }
}

/// Explicit path must load; the default path is optional
fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string());
            load_config(&expanded)
                .with_context(|| format!("Failed to load configuration from {}", expanded.display()))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(DEFAULT_CONFIG_PATH).context("Failed to load default configuration")
        }
        None => Ok(Config::default()),
    }
}

fn init_logging(verbose: bool, debug: bool, config_level: &str) -> Result<()> {
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        config_level
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{}'", level))?;

    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

fn build_aggregator(config: &Config) -> Result<SignalAggregator> {
    let limiter = Arc::new(config.rate_limiter());
    let http = HttpFetcher::new(limiter, HttpFetcherConfig::from(config))
        .context("Failed to create HTTP client")?;

    let providers = build_providers(config, &http);
    if providers.is_empty() {
        tracing::warn!("All providers are disabled; every cycle will be empty");
    }

    Ok(SignalAggregator::new(providers, AggregatorSettings::from(config)))
}

async fn signals_command(aggregator: &SignalAggregator, cmd: SignalsCmd) -> Result<()> {
    let signals = if cmd.low_cap {
        aggregator.get_low_cap_signals().await
    } else {
        aggregator.get_latest_signals().await
    };

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&signals)?),
        OutputFormat::Text => print_signals(&signals),
    }
    Ok(())
}

async fn overview_command(aggregator: &SignalAggregator, cmd: OverviewCmd) -> Result<()> {
    let overview = aggregator.get_market_overview().await;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&overview)?),
        OutputFormat::Text => print_overview(&overview),
    }
    Ok(())
}

async fn watch_command(aggregator: SignalAggregator, config: &Config, cmd: WatchCmd) -> Result<()> {
    let interval = cmd
        .interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.aggregator.poll_interval());

    // Setup Ctrl+C handler
    let agg = aggregator.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutdown signal received");
        agg.stop().await;
    });

    let format = cmd.format;
    aggregator
        .run(interval, move |report| print_report(&report, format))
        .await;

    tracing::info!("signal-scout stopped");
    Ok(())
}

fn print_report(report: &CycleReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string(&report.signals) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!("Failed to serialize cycle: {}", e),
        },
        OutputFormat::Text => {
            println!(
                "=== {} | providers {}/{} | {} signals ===",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                report.providers_responding,
                report.providers_total,
                report.signals.len()
            );
            print_signals(&report.signals);
        }
    }
}

fn print_signals(signals: &[ScoredSignal]) {
    if signals.is_empty() {
        println!("No signals this cycle.");
        return;
    }

    println!(
        "{:>3}  {:<10} {:>5}  {:<9} {:>14} {:>9} {:>14} {:>14} {:>8}  {}",
        "#", "SYMBOL", "SCORE", "RISK", "PRICE", "24H %", "VOLUME", "MCAP", "HOLDERS", "SOURCE"
    );
    for (i, s) in signals.iter().enumerate() {
        println!(
            "{:>3}  {:<10} {:>5}  {:<9} {:>14.8} {:>+8.2}% {:>14.0} {:>14.0} {:>8}  {}{}",
            i + 1,
            truncate(&s.symbol, 10),
            s.score.total,
            s.risk_level.to_string(),
            s.price_usd,
            s.price_change_24h_pct,
            s.volume_usd_24h,
            s.market_cap_usd,
            s.holder_count.map_or_else(|| "-".to_string(), |h| h.to_string()),
            s.source,
            if s.is_premium { "  *premium*" } else { "" }
        );
        if !s.analysis.is_empty() {
            println!("       {}", s.analysis);
        }
    }
}

fn print_overview(overview: &MarketOverview) {
    if overview.is_empty() {
        println!("No signals this cycle.");
        return;
    }

    println!("Hot signals:");
    for e in &overview.hot_signals {
        println!("  {:<10} momentum {:>3}  {:>+8.2}%", truncate(&e.symbol, 10), e.momentum, e.price_change);
    }
    println!("Volume leaders:");
    for e in &overview.volume_leaders {
        println!("  {:<10} ${:>14.0}  {:>+8.2}%", truncate(&e.symbol, 10), e.volume, e.price_change);
    }
    println!("Premium picks:");
    for e in &overview.premium_picks {
        println!("  {:<10} score {:>3}  mcap ${:.0}", truncate(&e.symbol, 10), e.score, e.market_cap);
    }
    println!("Trending:");
    for e in &overview.trending {
        println!("  {:<10} momentum {:>3}  {:>+8.2}%", truncate(&e.symbol, 10), e.momentum, e.price_change);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).chain(std::iter::once('~')).collect()
    }
}

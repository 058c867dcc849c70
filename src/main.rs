// =============================================================================
// Signal Scanner — Main Entry Point
// =============================================================================
//
// Scans a universe of tickers for potential buys.  Results go to stdout;
// logs go to stderr so the output can be piped.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod errors;
mod indicators;
mod market_data;
mod provider;
mod runtime_config;
mod scan_outcome;
mod scanner;
mod signals;
mod strategies;
mod types;

use std::io::Write;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::provider::YahooClient;
use crate::runtime_config::ScanConfig;
use crate::signals::VotingAggregator;
use crate::types::OutputFormat;

const DEFAULT_CONFIG_PATH: &str = "scanner_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── 2. Config ────────────────────────────────────────────────────────
    let config_path =
        std::env::var("SCANNER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());

    let mut config = ScanConfig::load_or_default(&config_path)?;
    config
        .apply_overrides(|key| std::env::var(key).ok())
        .context("invalid environment override")?;
    config.normalize_tickers();
    config.validate()?;

    info!(
        tickers = config.tickers.len(),
        start = %config.start_date,
        end = %config.end_date_or_today(),
        min_votes = config.min_votes,
        output = %config.output,
        strict = config.strict,
        "scan configured"
    );

    // ── 3. Provider & aggregator ─────────────────────────────────────────
    let provider = YahooClient::new()?;
    let aggregator = VotingAggregator::standard(&config.strategies, config.min_votes);

    // ── 4. Scan ──────────────────────────────────────────────────────────
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut write_failed = None;
    let output = config.output;

    let summary = scanner::run_scan(&provider, &aggregator, &config, shutdown, |outcome| {
        if write_failed.is_some() {
            return;
        }
        let written = match output {
            OutputFormat::Text => match outcome.buy_line() {
                Some(line) => writeln!(out, "{line}"),
                None => Ok(()),
            },
            OutputFormat::Json => match serde_json::to_string(outcome) {
                Ok(json) => writeln!(out, "{json}"),
                Err(e) => Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            },
        };
        if let Err(e) = written {
            write_failed = Some(e);
        }
    })
    .await;

    if let Some(e) = write_failed {
        return Err(e).context("failed to write scan results");
    }
    out.flush().context("failed to flush stdout")?;

    if summary.cancelled {
        info!("scan interrupted");
    }

    Ok(())
}

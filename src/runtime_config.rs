// =============================================================================
// Runtime Configuration — scan universe, date window, and strategy settings
// =============================================================================
//
// Every tunable parameter of a scan lives here.  The config is read once at
// startup from an optional JSON file, then overlaid with environment
// variables, then validated.  A malformed configuration is a hard error: the
// scan never starts with parameters the strategies cannot honour.
//
// All fields carry `#[serde(default)]` so a partial (or empty) file is valid.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::ScanError;
use crate::strategies::{
    BollingerParams, MaCrossoverParams, MacdParams, RsiParams, VolumeSurgeParams,
    STANDARD_STRATEGY_COUNT,
};
use crate::types::OutputFormat;

/// Environment variables that override file settings.
pub const ENV_TICKERS: &str = "SCANNER_TICKERS";
pub const ENV_START: &str = "SCANNER_START";
pub const ENV_END: &str = "SCANNER_END";
pub const ENV_STRICT: &str = "SCANNER_STRICT";
pub const ENV_OUTPUT: &str = "SCANNER_OUTPUT";
pub const ENV_CONCURRENCY: &str = "SCANNER_CONCURRENCY";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_tickers() -> Vec<String> {
    [
        "AAPL", "MSFT", "GOOG", "AMZN", "FB", "TSLA", "BRK.B", "JPM", "JNJ", "V", "PG", "NVDA",
        "MA", "HD", "DIS", "UNH", "PYPL", "BAC", "ADBE", "CMCSA", "INTC", "NFLX", "XOM", "VZ",
        "CRM", "ABT", "T", "PEP", "KO", "MRK", "CVX", "CSCO", "NKE", "ABBV", "TMUS", "PFE", "MDT",
        "ACN", "WMT", "TMO", "NEE", "AVGO", "IBM", "TXN", "QCOM", "UNP", "LIN", "DHR", "PM",
        "LOW", "ORCL", "NOW", "GE", "LMT", "UPS", "HON", "INTU", "AMGN", "SBUX", "AMD", "BA",
        "FIS", "CAT", "MMM", "CVS", "MS", "AXP", "BDX", "D", "FDX", "ANTM", "GILD", "CCI", "RTX",
        "BKNG", "ISRG", "DE", "BLK", "CHTR", "ZTS", "SPGI", "SCHW", "MO", "PLD", "TFC", "APD",
        "COST", "TJX", "CB", "EW", "CL", "GD", "WM", "MMC", "ETN", "TROW", "CMI", "ROP", "VFC",
        "ECL", "AON", "SYK", "REGN", "DUK", "GM", "KMB", "IQV", "LHX", "SO", "IDXX", "NOC",
        "ROST", "SHW", "CTSH", "AEP", "CTAS", "LRCX", "COF", "MET",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

fn default_min_votes() -> usize {
    2
}

fn default_concurrency() -> usize {
    4
}

// =============================================================================
// StrategyParams
// =============================================================================

/// Tunable parameters for the six strategies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    #[serde(default)]
    pub ma_crossover: MaCrossoverParams,

    #[serde(default)]
    pub rsi: RsiParams,

    #[serde(default)]
    pub volume_surge: VolumeSurgeParams,

    #[serde(default)]
    pub macd: MacdParams,

    #[serde(default)]
    pub bollinger: BollingerParams,
}

impl StrategyParams {
    fn validate(&self) -> Result<(), String> {
        let ma = &self.ma_crossover;
        if ma.short_window == 0 || ma.long_window == 0 {
            return Err("ma_crossover windows must be at least 1".into());
        }

        let rsi = &self.rsi;
        if rsi.period == 0 {
            return Err("rsi.period must be at least 1".into());
        }
        if !rsi.oversold_threshold.is_finite() || rsi.oversold_threshold < 0.0 {
            return Err(format!(
                "rsi.oversold_threshold must be >= 0, got {}",
                rsi.oversold_threshold
            ));
        }

        let vol = self.volume_surge.volume_threshold;
        if !vol.is_finite() || vol < 0.0 {
            return Err(format!("volume_surge.volume_threshold must be >= 0, got {vol}"));
        }

        let macd = &self.macd;
        if macd.fast == 0 || macd.signal == 0 || macd.fast >= macd.slow {
            return Err(format!(
                "macd needs 0 < fast < slow and signal > 0, got {}/{}/{}",
                macd.fast, macd.slow, macd.signal
            ));
        }

        let bb = &self.bollinger;
        if bb.length == 0 {
            return Err("bollinger.length must be at least 1".into());
        }
        if !bb.width.is_finite() || bb.width < 0.0 {
            return Err(format!("bollinger.width must be >= 0, got {}", bb.width));
        }

        Ok(())
    }
}

// =============================================================================
// ScanConfig
// =============================================================================

/// Top-level configuration for one scan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    // --- Universe & window --------------------------------------------------

    /// Tickers to scan, in report order.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,

    /// First day of history to request.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    /// Day after the last bar to request (exclusive).  `None` means today.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    // --- Decision & execution -----------------------------------------------

    /// Minimum number of agreeing strategies for a potential buy.
    #[serde(default = "default_min_votes")]
    pub min_votes: usize,

    /// Maximum number of tickers fetched at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Log every skipped ticker at warn level instead of debug.
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub output: OutputFormat,

    // --- Strategy parameters ------------------------------------------------

    #[serde(default)]
    pub strategies: StrategyParams,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            start_date: default_start_date(),
            end_date: None,
            min_votes: default_min_votes(),
            concurrency: default_concurrency(),
            strict: false,
            output: OutputFormat::default(),
            strategies: StrategyParams::default(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scan config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scan config from {}", path.display()))?;

        info!(
            path = %path.display(),
            tickers = config.tickers.len(),
            "scan config loaded"
        );

        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "scan config not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Overlay settings from environment-style key lookups.
    ///
    /// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(list) = lookup(ENV_TICKERS) {
            self.tickers = list.split(',').map(str::to_string).collect();
        }
        if let Some(start) = lookup(ENV_START) {
            self.start_date = parse_date(ENV_START, &start)?;
        }
        if let Some(end) = lookup(ENV_END) {
            self.end_date = Some(parse_date(ENV_END, &end)?);
        }
        if let Some(strict) = lookup(ENV_STRICT) {
            self.strict = matches!(
                strict.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(output) = lookup(ENV_OUTPUT) {
            self.output = output
                .parse()
                .map_err(|e: String| anyhow::anyhow!("{ENV_OUTPUT}: {e}"))?;
        }
        if let Some(concurrency) = lookup(ENV_CONCURRENCY) {
            self.concurrency = concurrency
                .trim()
                .parse()
                .with_context(|| format!("{ENV_CONCURRENCY}: '{concurrency}' is not a number"))?;
        }
        Ok(())
    }

    /// Trim and upper-case tickers, dropping blanks and repeats (first
    /// occurrence wins).
    pub fn normalize_tickers(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.tickers = self
            .tickers
            .iter()
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .filter(|t| seen.insert(t.clone()))
            .collect();
    }

    /// Exclusive end of the history window.
    pub fn end_date_or_today(&self) -> NaiveDate {
        self.end_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }

    /// Reject configurations the scan cannot honour.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.tickers.is_empty() {
            return Err(ScanError::InvalidConfig("ticker list is empty".into()));
        }
        if self.min_votes == 0 || self.min_votes > STANDARD_STRATEGY_COUNT {
            return Err(ScanError::InvalidConfig(format!(
                "min_votes must be between 1 and {STANDARD_STRATEGY_COUNT}, got {}",
                self.min_votes
            )));
        }
        if self.concurrency == 0 {
            return Err(ScanError::InvalidConfig("concurrency must be at least 1".into()));
        }
        let end = self.end_date_or_today();
        if self.start_date >= end {
            return Err(ScanError::InvalidConfig(format!(
                "start_date {} must be before end_date {end}",
                self.start_date
            )));
        }
        self.strategies.validate().map_err(ScanError::InvalidConfig)
    }
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("{key}: '{value}' is not a YYYY-MM-DD date"))
}

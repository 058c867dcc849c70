// =============================================================================
// Yahoo Finance v8 chart client
// =============================================================================
//
// GET {base}/{symbol}?period1={start}&period2={end}&interval=1d
//
// The response carries parallel arrays (timestamp, open, high, low, close,
// volume) in which any element may be null.  Rows with a missing field are
// dropped; the rest are sorted by exchange-local date, and a repeated date
// keeps the last row.
// =============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::SeriesProvider;
use crate::errors::ScanError;
use crate::market_data::{Bar, Series};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Seconds east of UTC for the listing exchange.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Yahoo Finance chart endpoint.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different chart endpoint (mirrors, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client for Yahoo Finance")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    fn chart_url(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            provider_symbol(ticker),
            midnight_utc(start),
            midnight_utc(end),
        )
    }
}

#[async_trait]
impl SeriesProvider for YahooClient {
    #[instrument(skip(self), name = "yahoo::fetch")]
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Series, ScanError> {
        let url = self.chart_url(ticker, start, end);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScanError::data_unavailable(ticker, format!("request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ScanError::data_unavailable(ticker, format!("reading body failed: {e}")))?;

        // Unknown symbols come back as 404 with a chart.error body.
        if !status.is_success() {
            let reason = chart_error(&body).unwrap_or_else(|| format!("HTTP {status}"));
            return Err(ScanError::data_unavailable(ticker, reason));
        }

        let series = parse_chart(ticker, &body)?;
        debug!(bars = series.len(), "chart fetched");
        Ok(series)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Yahoo spells share classes with a dash (`BRK-B`).
fn provider_symbol(ticker: &str) -> String {
    ticker.replace('.', "-")
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// The `chart.error` message of a response body, if it has one.
fn chart_error(body: &str) -> Option<String> {
    let response: ChartResponse = serde_json::from_str(body).ok()?;
    response
        .chart
        .error
        .map(|err| format!("{}: {}", err.code, err.description))
}

/// Turn a chart response body into a validated [`Series`].
pub(crate) fn parse_chart(ticker: &str, body: &str) -> Result<Series, ScanError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| ScanError::data_unavailable(ticker, format!("parse error: {e}")))?;

    if let Some(err) = response.chart.error {
        return Err(ScanError::data_unavailable(
            ticker,
            format!("{}: {}", err.code, err.description),
        ));
    }

    let data = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ScanError::data_unavailable(ticker, "no chart result"))?;

    let offset = data.meta.as_ref().map_or(0, |m| m.gmtoffset);
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

    // Keyed by date so later rows overwrite earlier ones and iteration is
    // ascending.
    let mut rows: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
    let mut skipped = 0usize;

    for (i, &ts) in data.timestamp.iter().enumerate() {
        let field = |col: &[Option<f64>]| col.get(i).copied().flatten();
        let row = (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
            field(&quote.volume),
            DateTime::from_timestamp(ts + offset, 0),
        );

        match row {
            (Some(o), Some(h), Some(l), Some(c), Some(v), Some(at)) if v >= 0.0 => {
                let date = at.date_naive();
                rows.insert(date, Bar::new(date, o, h, l, c, v.round() as u64));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(ticker, skipped, "chart rows with missing fields dropped");
    }

    if rows.is_empty() {
        return Err(ScanError::data_unavailable(
            ticker,
            "no data found, symbol may be delisted",
        ));
    }

    Series::new(rows.into_values().collect())
        .map_err(|e| ScanError::data_unavailable(ticker, e.to_string()))
}

// =============================================================================
// Series Provider — where daily history comes from
// =============================================================================
//
// The scan driver only talks to `dyn SeriesProvider`, so the live Yahoo
// client and the in-memory stubs used in tests are interchangeable.
// =============================================================================

pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::ScanError;
use crate::market_data::Series;

pub use yahoo::YahooClient;

/// Source of daily OHLCV history.
#[async_trait]
pub trait SeriesProvider: Send + Sync {
    /// Fetch daily bars for `ticker` from `start` (inclusive) to `end`
    /// (exclusive).
    ///
    /// Every failure (network, unknown symbol, empty or malformed response)
    /// is reported as [`ScanError::DataUnavailable`].
    async fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Series, ScanError>;
}

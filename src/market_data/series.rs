use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One trading day of OHLCV data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Reasons a list of bars cannot form a [`Series`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,

    #[error("bar {index} ({date}) is not after the previous bar")]
    OutOfOrder { index: usize, date: NaiveDate },

    #[error("bar {date} has a non-positive or non-finite price")]
    InvalidPrice { date: NaiveDate },
}

// ---------------------------------------------------------------------------
// Series -- immutable, validated daily history for one ticker
// ---------------------------------------------------------------------------

/// Daily bars for a single ticker, strictly ascending by date with at least
/// one element.
///
/// The bars are private so every `Series` in circulation has passed
/// [`Series::new`]; strategies only ever see it through `&Series`.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Validate and wrap `bars`.
    ///
    /// * Dates must be strictly increasing (ascending and unique).
    /// * Every OHLC price must be finite and positive.
    pub fn new(bars: Vec<Bar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (index, bar) in bars.iter().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close];
            if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
                return Err(SeriesError::InvalidPrice { date: bar.date });
            }
            if index > 0 && bars[index - 1].date >= bar.date {
                return Err(SeriesError::OutOfOrder {
                    index,
                    date: bar.date,
                });
            }
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// The most recent bar.  Never fails because a `Series` is non-empty.
    pub fn last(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }

    /// Close prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes as `f64`, oldest first.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

/// Build a series from close prices and volumes, one bar per calendar day
/// starting 2023-01-02.  Open/high/low mirror the close.
#[cfg(test)]
pub fn series_from(closes: &[f64], volumes: &[u64]) -> Series {
    assert_eq!(closes.len(), volumes.len(), "closes/volumes length mismatch");
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let bars = closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| {
            let date = start + chrono::Duration::days(i as i64);
            Bar::new(date, c, c, c, c, v)
        })
        .collect();
    Series::new(bars).unwrap()
}

/// Series of closes with a constant volume of 1 000.
#[cfg(test)]
pub fn series_from_closes(closes: &[f64]) -> Series {
    series_from(closes, &vec![1_000; closes.len()])
}

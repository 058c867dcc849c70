// =============================================================================
// Strategies — six independent buy-signal votes
// =============================================================================
//
// Each strategy reads an immutable `Series` and returns a `Reading`: the vote
// plus the handful of derived values it was based on.  Nothing is cached
// between calls and nothing is written back to the series, so evaluating
// the same series twice always gives the same answer.
//
// Votes:
//   1. ma_crossover  : SMA(50) crosses above SMA(200) on the latest bar
//   2. rsi           : RSI(14) below 30
//   3. volume_surge  : latest volume above 2x the whole-history mean
//   4. breakout      : latest close above the previous close
//   5. bollinger     : latest close above the upper band (20, 2.0)
//   6. macd          : MACD(12, 26) above its 9-period signal line
// =============================================================================

pub mod bollinger_breakout;
pub mod breakout;
pub mod ma_crossover;
pub mod macd_signal;
pub mod rsi_oversold;
pub mod volume_surge;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::IndicatorError;
use crate::market_data::Series;
use crate::runtime_config::StrategyParams;

pub use bollinger_breakout::{BollingerBreakout, BollingerParams};
pub use breakout::Breakout;
pub use ma_crossover::{MaCrossover, MaCrossoverParams};
pub use macd_signal::{MacdParams, MacdSignal};
pub use rsi_oversold::{RsiOversold, RsiParams};
pub use volume_surge::{VolumeSurge, VolumeSurgeParams};

/// Outcome of one strategy on one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// `true` when the strategy votes "buy".
    pub fired: bool,
    /// Derived values behind the vote, for diagnostics only.
    pub values: BTreeMap<&'static str, f64>,
}

impl Reading {
    pub fn new(fired: bool) -> Self {
        Self {
            fired,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: f64) -> Self {
        self.values.insert(key, value);
        self
    }
}

/// A single buy-signal vote over a daily series.
pub trait Strategy: Send + Sync {
    /// Stable identifier used in logs and JSON output.
    fn name(&self) -> &'static str;

    /// Evaluate the strategy on `series`.
    ///
    /// Errors mean "indeterminate"; the caller decides how to count them.
    fn evaluate(&self, series: &Series) -> Result<Reading, IndicatorError>;
}

/// Number of strategies returned by [`standard_strategies`].
pub const STANDARD_STRATEGY_COUNT: usize = 6;

/// Build the standard six-vote set in its canonical order.
pub fn standard_strategies(params: &StrategyParams) -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(MaCrossover::new(params.ma_crossover.clone())),
        Box::new(RsiOversold::new(params.rsi.clone())),
        Box::new(VolumeSurge::new(params.volume_surge.clone())),
        Box::new(Breakout),
        Box::new(BollingerBreakout::new(params.bollinger.clone())),
        Box::new(MacdSignal::new(params.macd.clone())),
    ]
}

/// Fail with `InsufficientHistory` unless `series` has at least `required` bars.
pub(crate) fn require_len(
    strategy: &'static str,
    series: &Series,
    required: usize,
) -> Result<(), IndicatorError> {
    if series.len() < required {
        return Err(IndicatorError::insufficient(strategy, required, series.len()));
    }
    Ok(())
}

/// Fail with `NumericDegeneracy` if any of `values` is NaN or infinite.
pub(crate) fn require_finite(
    strategy: &'static str,
    values: &[(&str, f64)],
) -> Result<(), IndicatorError> {
    match values.iter().find(|(_, v)| !v.is_finite()) {
        Some((label, v)) => Err(IndicatorError::degenerate(strategy, format!("{label} is {v}"))),
        None => Ok(()),
    }
}

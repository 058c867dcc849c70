// =============================================================================
// Moving Average Crossover (golden cross)
// =============================================================================
//
// Fires only when the short SMA crosses above the long SMA on the latest bar:
//   short[-1] >  long[-1]
//   short[-2] <= long[-2]
// A short SMA that has been above the long SMA for a while does not fire.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::{require_finite, require_len, Reading, Strategy};
use crate::errors::IndicatorError;
use crate::indicators::rolling::rolling_mean;
use crate::market_data::Series;

const NAME: &str = "ma_crossover";

fn default_short_window() -> usize {
    50
}

fn default_long_window() -> usize {
    200
}

/// Window lengths for the crossover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaCrossoverParams {
    #[serde(default = "default_short_window")]
    pub short_window: usize,

    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

impl Default for MaCrossoverParams {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
        }
    }
}

pub struct MaCrossover {
    params: MaCrossoverParams,
}

impl MaCrossover {
    pub fn new(params: MaCrossoverParams) -> Self {
        Self { params }
    }
}

impl Strategy for MaCrossover {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, series: &Series) -> Result<Reading, IndicatorError> {
        let (short_window, long_window) = (self.params.short_window, self.params.long_window);
        if short_window == 0 || long_window == 0 {
            return Err(IndicatorError::invalid_parameter(NAME, "windows must be at least 1"));
        }

        // Two valid points of the longer average are needed to see a cross.
        require_len(NAME, series, short_window.max(long_window) + 1)?;

        let closes = series.closes();
        let short = rolling_mean(&closes, short_window);
        let long = rolling_mean(&closes, long_window);
        let n = closes.len();

        let (short_now, long_now) = (short[n - 1], long[n - 1]);
        let (short_prev, long_prev) = (short[n - 2], long[n - 2]);
        require_finite(
            NAME,
            &[
                ("short_ma", short_now),
                ("long_ma", long_now),
                ("prev_short_ma", short_prev),
                ("prev_long_ma", long_prev),
            ],
        )?;

        let fired = short_now > long_now && short_prev <= long_prev;

        Ok(Reading::new(fired)
            .with("short_ma", short_now)
            .with("long_ma", long_now)
            .with("prev_short_ma", short_prev)
            .with("prev_long_ma", long_prev))
    }
}

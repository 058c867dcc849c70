// =============================================================================
// Breakout (simplified)
// =============================================================================
//
// Placeholder for resistance-level breakout detection: fires when the latest
// bar closed above the previous bar's close.  This is a weak heuristic and is
// kept that way on purpose.
// =============================================================================

use super::{require_len, Reading, Strategy};
use crate::errors::IndicatorError;
use crate::market_data::Series;

const NAME: &str = "breakout";

pub struct Breakout;

impl Strategy for Breakout {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, series: &Series) -> Result<Reading, IndicatorError> {
        require_len(NAME, series, 2)?;

        let bars = series.bars();
        let close = bars[bars.len() - 1].close;
        let prev_close = bars[bars.len() - 2].close;

        Ok(Reading::new(close > prev_close)
            .with("close", close)
            .with("prev_close", prev_close))
    }
}

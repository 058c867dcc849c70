// =============================================================================
// MACD Signal
// =============================================================================
//
// Fires while the MACD line is strictly above its signal line on the latest
// bar.  Unlike the moving-average crossover this is a "currently above" test,
// not a fresh-cross test; both behaviours are intentional.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::{require_finite, require_len, Reading, Strategy};
use crate::errors::IndicatorError;
use crate::indicators::ema::{current_macd, macd_min_len};
use crate::market_data::Series;

const NAME: &str = "macd";

fn default_fast() -> usize {
    12
}

fn default_slow() -> usize {
    26
}

fn default_signal() -> usize {
    9
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdParams {
    #[serde(default = "default_fast")]
    pub fast: usize,

    #[serde(default = "default_slow")]
    pub slow: usize,

    #[serde(default = "default_signal")]
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: default_fast(),
            slow: default_slow(),
            signal: default_signal(),
        }
    }
}

pub struct MacdSignal {
    params: MacdParams,
}

impl MacdSignal {
    pub fn new(params: MacdParams) -> Self {
        Self { params }
    }
}

impl Strategy for MacdSignal {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, series: &Series) -> Result<Reading, IndicatorError> {
        let MacdParams { fast, slow, signal } = self.params.clone();
        if fast == 0 || signal == 0 || fast >= slow {
            return Err(IndicatorError::invalid_parameter(
                NAME,
                format!("need 0 < fast < slow and signal > 0, got {fast}/{slow}/{signal}"),
            ));
        }
        require_len(NAME, series, macd_min_len(slow, signal))?;

        let reading = current_macd(&series.closes(), fast, slow, signal)
            .ok_or_else(|| IndicatorError::degenerate(NAME, "EMA produced a non-finite value"))?;
        require_finite(
            NAME,
            &[("macd", reading.macd), ("signal", reading.signal)],
        )?;

        Ok(Reading::new(reading.macd > reading.signal)
            .with("macd", reading.macd)
            .with("signal", reading.signal)
            .with("histogram", reading.histogram))
    }
}

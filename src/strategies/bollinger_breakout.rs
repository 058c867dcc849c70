// =============================================================================
// Bollinger Bands Breakout
// =============================================================================
//
// Fires when the latest close is strictly above the upper band
// (SMA(length) + width * population σ).
// =============================================================================

use serde::{Deserialize, Serialize};

use super::{require_len, Reading, Strategy};
use crate::errors::IndicatorError;
use crate::indicators::bollinger::latest_bands;
use crate::market_data::Series;

const NAME: &str = "bollinger";

fn default_length() -> usize {
    20
}

fn default_width() -> f64 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerParams {
    #[serde(default = "default_length")]
    pub length: usize,

    /// Band distance from the middle, in standard deviations.
    #[serde(default = "default_width")]
    pub width: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            length: default_length(),
            width: default_width(),
        }
    }
}

pub struct BollingerBreakout {
    params: BollingerParams,
}

impl BollingerBreakout {
    pub fn new(params: BollingerParams) -> Self {
        Self { params }
    }
}

impl Strategy for BollingerBreakout {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, series: &Series) -> Result<Reading, IndicatorError> {
        let BollingerParams { length, width } = self.params.clone();
        if length == 0 || !width.is_finite() || width < 0.0 {
            return Err(IndicatorError::invalid_parameter(
                NAME,
                format!("need length > 0 and a finite non-negative width, got {length}/{width}"),
            ));
        }
        require_len(NAME, series, length)?;

        let bands = latest_bands(&series.closes(), length, width)
            .ok_or_else(|| IndicatorError::degenerate(NAME, "bands are not finite"))?;
        let close = series.last().close;

        Ok(Reading::new(close > bands.upper)
            .with("close", close)
            .with("upper", bands.upper)
            .with("middle", bands.middle)
            .with("lower", bands.lower)
            .with("bandwidth_pct", bands.bandwidth_pct()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::series_from_closes;

    fn default_strategy() -> BollingerBreakout {
        BollingerBreakout::new(BollingerParams::default())
    }

    #[test]
    fn spike_above_band_fires() {
        let mut closes = vec![100.0; 39];
        closes.push(110.0);
        let reading = default_strategy().evaluate(&series_from_closes(&closes)).unwrap();
        assert!(reading.fired);
        // middle = 100.5, σ = sqrt(4.75)
        assert!((reading.values["middle"] - 100.5).abs() < 1e-10);
        assert!((reading.values["upper"] - (100.5 + 2.0 * 4.75_f64.sqrt())).abs() < 1e-10);
    }

    #[test]
    fn flat_series_sits_on_the_band() {
        let reading = default_strategy()
            .evaluate(&series_from_closes(&[100.0; 40]))
            .unwrap();
        assert!(!reading.fired);
        assert_eq!(reading.values["upper"], 100.0);
    }

    #[test]
    fn gentle_uptrend_stays_inside() {
        let closes: Vec<f64> = (1..=40).map(|x| 100.0 + x as f64 * 0.1).collect();
        assert!(!default_strategy().evaluate(&series_from_closes(&closes)).unwrap().fired);
    }

    #[test]
    fn needs_length_bars() {
        let err = default_strategy()
            .evaluate(&series_from_closes(&[100.0; 19]))
            .unwrap_err();
        assert_eq!(err, IndicatorError::insufficient(NAME, 20, 19));
    }
}

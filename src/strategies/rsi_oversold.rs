// =============================================================================
// RSI Oversold
// =============================================================================
//
// Votes buy when the latest RSI is strictly below the oversold threshold.
// An all-gains window saturates at RSI 100 and never fires; a window with no
// movement at all has no defined RSI and is reported as degenerate.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::{require_len, Reading, Strategy};
use crate::errors::IndicatorError;
use crate::indicators::rsi::calculate_rsi;
use crate::market_data::Series;

const NAME: &str = "rsi";

fn default_period() -> usize {
    14
}

fn default_oversold_threshold() -> f64 {
    30.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiParams {
    #[serde(default = "default_period")]
    pub period: usize,

    /// RSI strictly below this value counts as oversold.
    #[serde(default = "default_oversold_threshold")]
    pub oversold_threshold: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: default_period(),
            oversold_threshold: default_oversold_threshold(),
        }
    }
}

pub struct RsiOversold {
    params: RsiParams,
}

impl RsiOversold {
    pub fn new(params: RsiParams) -> Self {
        Self { params }
    }
}

impl Strategy for RsiOversold {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, series: &Series) -> Result<Reading, IndicatorError> {
        let period = self.params.period;
        if period == 0 {
            return Err(IndicatorError::invalid_parameter(NAME, "period must be at least 1"));
        }
        require_len(NAME, series, period + 1)?;

        let rsi = calculate_rsi(&series.closes(), period);
        let latest = match rsi.last() {
            Some(v) if v.is_finite() => *v,
            _ => {
                return Err(IndicatorError::degenerate(
                    NAME,
                    "no price movement in the averaging window",
                ))
            }
        };

        Ok(Reading::new(latest < self.params.oversold_threshold).with("rsi", latest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::series_from_closes;

    fn default_strategy() -> RsiOversold {
        RsiOversold::new(RsiParams::default())
    }

    #[test]
    fn all_gains_saturates_and_does_not_fire() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let reading = default_strategy().evaluate(&series_from_closes(&closes)).unwrap();
        assert!((reading.values["rsi"] - 100.0).abs() < 1e-10);
        assert!(!reading.fired);
    }

    #[test]
    fn steady_decline_fires() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let reading = default_strategy().evaluate(&series_from_closes(&closes)).unwrap();
        assert!(reading.values["rsi"] < 30.0);
        assert!(reading.fired);
    }

    #[test]
    fn threshold_is_strict() {
        // Last 4 deltas: +2, -1, +1, -2 => RSI exactly 50.
        let closes = vec![10.0, 12.0, 11.0, 12.0, 10.0];
        let at = RsiOversold::new(RsiParams {
            period: 4,
            oversold_threshold: 50.0,
        });
        assert!(!at.evaluate(&series_from_closes(&closes)).unwrap().fired);

        let above = RsiOversold::new(RsiParams {
            period: 4,
            oversold_threshold: 50.5,
        });
        assert!(above.evaluate(&series_from_closes(&closes)).unwrap().fired);
    }

    #[test]
    fn flat_window_is_degenerate() {
        let err = default_strategy()
            .evaluate(&series_from_closes(&[100.0; 30]))
            .unwrap_err();
        assert!(matches!(err, IndicatorError::NumericDegeneracy { .. }));
        assert!(err.is_expected());
    }

    #[test]
    fn needs_period_plus_one_bars() {
        let closes: Vec<f64> = (1..=14).rev().map(|x| x as f64).collect();
        let err = default_strategy().evaluate(&series_from_closes(&closes)).unwrap_err();
        assert_eq!(err, IndicatorError::insufficient(NAME, 15, 14));
    }
}

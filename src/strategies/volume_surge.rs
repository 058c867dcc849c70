// =============================================================================
// Volume Surge
// =============================================================================
//
// Compares the latest volume with the mean volume of the *entire* supplied
// series (not a rolling window).  Fires when
//   latest_volume > volume_threshold * mean_volume
// =============================================================================

use serde::{Deserialize, Serialize};

use super::{Reading, Strategy};
use crate::errors::IndicatorError;
use crate::market_data::Series;

const NAME: &str = "volume_surge";

fn default_volume_threshold() -> f64 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSurgeParams {
    /// Multiple of the mean volume the latest bar must exceed.
    #[serde(default = "default_volume_threshold")]
    pub volume_threshold: f64,
}

impl Default for VolumeSurgeParams {
    fn default() -> Self {
        Self {
            volume_threshold: default_volume_threshold(),
        }
    }
}

pub struct VolumeSurge {
    params: VolumeSurgeParams,
}

impl VolumeSurge {
    pub fn new(params: VolumeSurgeParams) -> Self {
        Self { params }
    }
}

impl Strategy for VolumeSurge {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, series: &Series) -> Result<Reading, IndicatorError> {
        let threshold = self.params.volume_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(IndicatorError::invalid_parameter(
                NAME,
                format!("volume_threshold must be a finite non-negative number, got {threshold}"),
            ));
        }

        // A Series always has at least one bar.
        let volumes = series.volumes();
        let average = volumes.iter().sum::<f64>() / volumes.len() as f64;
        let latest = series.last().volume as f64;

        Ok(Reading::new(latest > threshold * average)
            .with("volume", latest)
            .with("average_volume", average))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::series_from;

    #[test]
    fn final_spike_fires() {
        let mut volumes = vec![100; 29];
        volumes.push(500);
        let series = series_from(&vec![50.0; 30], &volumes);

        let reading = VolumeSurge::new(VolumeSurgeParams::default())
            .evaluate(&series)
            .unwrap();
        assert!(reading.fired);
        // (29 * 100 + 500) / 30
        assert!((reading.values["average_volume"] - 3_400.0 / 30.0).abs() < 1e-10);
    }

    #[test]
    fn mean_uses_whole_history() {
        // A rolling 20-bar mean would be 110 and fire; the full-history mean
        // is dragged up by the early heavy bars.
        let mut volumes = vec![10_000; 20];
        volumes.extend(vec![100; 19]);
        volumes.push(300);
        let series = series_from(&vec![50.0; 40], &volumes);

        let reading = VolumeSurge::new(VolumeSurgeParams::default())
            .evaluate(&series)
            .unwrap();
        assert!(!reading.fired);
    }

    #[test]
    fn constant_volume_does_not_fire() {
        let series = series_from(&vec![50.0; 10], &vec![1_000; 10]);
        let reading = VolumeSurge::new(VolumeSurgeParams::default())
            .evaluate(&series)
            .unwrap();
        assert!(!reading.fired);
    }

    #[test]
    fn zero_volume_history_does_not_fire() {
        let series = series_from(&[1.0, 1.0], &[0, 0]);
        let reading = VolumeSurge::new(VolumeSurgeParams::default())
            .evaluate(&series)
            .unwrap();
        assert!(!reading.fired);
    }

    #[test]
    fn negative_threshold_is_invalid() {
        let series = series_from(&[1.0], &[10]);
        let err = VolumeSurge::new(VolumeSurgeParams {
            volume_threshold: -1.0,
        })
        .evaluate(&series)
        .unwrap_err();
        assert!(!err.is_expected());
    }
}

// =============================================================================
// Bollinger Bands
// =============================================================================
//
// middle = SMA(length), upper/lower = middle ± k·σ with σ the population
// standard deviation of the same trailing window.

use super::rolling::{rolling_mean, rolling_std};

/// Band levels at one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl Bands {
    /// Distance between the outer bands as a percentage of the middle band.
    pub fn bandwidth_pct(&self) -> f64 {
        (self.upper - self.lower) / self.middle * 100.0
    }
}

/// Bands for the most recent bar of `closes`.
///
/// `None` for a zero `length`, fewer than `length` closes, a zero middle band,
/// or any non-finite level.
pub fn latest_bands(closes: &[f64], length: usize, k: f64) -> Option<Bands> {
    if length == 0 || closes.len() < length {
        return None;
    }

    let tail = &closes[closes.len() - length..];
    let middle = *rolling_mean(tail, length).last()?;
    let sigma = *rolling_std(tail, length).last()?;

    let bands = Bands {
        upper: middle + k * sigma,
        middle,
        lower: middle - k * sigma,
    };

    let finite = [bands.upper, bands.middle, bands.lower]
        .iter()
        .all(|v| v.is_finite());
    (finite && middle != 0.0).then_some(bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_window() {
        // [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population σ 2.
        let bands = latest_bands(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8, 2.0).unwrap();
        assert!((bands.middle - 5.0).abs() < 1e-10);
        assert!((bands.upper - 9.0).abs() < 1e-10);
        assert!((bands.lower - 1.0).abs() < 1e-10);
        assert!((bands.bandwidth_pct() - 160.0).abs() < 1e-10);
    }

    #[test]
    fn only_the_trailing_window_counts() {
        let mut closes = vec![1_000.0; 30];
        closes.extend(std::iter::repeat(50.0).take(20));
        let bands = latest_bands(&closes, 20, 2.0).unwrap();
        assert_eq!(bands, Bands { upper: 50.0, middle: 50.0, lower: 50.0 });
    }

    #[test]
    fn too_short_or_zero_length() {
        assert!(latest_bands(&[1.0, 2.0, 3.0], 20, 2.0).is_none());
        assert!(latest_bands(&[1.0, 2.0, 3.0], 0, 2.0).is_none());
    }

    #[test]
    fn flat_window_collapses_bands() {
        let bands = latest_bands(&[100.0; 20], 20, 2.0).unwrap();
        assert_eq!(bands.upper, 100.0);
        assert_eq!(bands.bandwidth_pct(), 0.0);
    }
}

// =============================================================================
// Rolling window statistics — SMA and population standard deviation
// =============================================================================
//
// Both functions return a vector aligned 1:1 with the input.  The first
// `period - 1` positions (the warm-up) are NaN so callers can index by bar
// and must explicitly skip undefined values.
// =============================================================================

/// Simple moving average over a trailing window of `period` values.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `data.len() < period` => all NaN
pub fn rolling_mean(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }

    let mut result = vec![f64::NAN; data.len()];
    for (i, window) in data.windows(period).enumerate() {
        result[i + period - 1] = window.iter().sum::<f64>() / period as f64;
    }
    result
}

/// Population (ddof = 0) standard deviation over a trailing window.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `data.len() < period` => all NaN
pub fn rolling_std(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }

    let mut result = vec![f64::NAN; data.len()];
    for (i, window) in data.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        result[i + period - 1] = variance.sqrt();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_warmup_is_nan() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = rolling_mean(&data, 3);
        assert_eq!(sma.len(), 5);
        assert!(sma[0].is_nan());
        assert!(sma[1].is_nan());
        assert!((sma[2] - 2.0).abs() < 1e-10);
        assert!((sma[3] - 3.0).abs() < 1e-10);
        assert!((sma[4] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn mean_short_input_all_nan() {
        let sma = rolling_mean(&[1.0, 2.0], 5);
        assert_eq!(sma.len(), 2);
        assert!(sma.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn zero_period_is_empty() {
        assert!(rolling_mean(&[1.0, 2.0], 0).is_empty());
        assert!(rolling_std(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn std_is_population() {
        // Window [2, 4, 4, 4, 5, 5, 7, 9]: mean 5, population std 2.
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = rolling_std(&data, 8);
        assert!((std[7] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn std_flat_is_zero() {
        let std = rolling_std(&[100.0; 25], 20);
        assert!(std[24].abs() < 1e-12);
    }
}

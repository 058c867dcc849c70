// =============================================================================
// Relative Strength Index (RSI) — simple rolling averages
// =============================================================================
//
// Gains and losses are averaged with a plain SMA over the trailing `period`
// deltas (no Wilder smoothing):
//
//   RS  = mean(gains) / mean(losses)
//   RSI = 100 - 100 / (1 + RS)
//
// RSI < 30 is conventionally read as OVERSOLD.
// =============================================================================

/// Compute the full RSI series for the given `closes` and `period`.
///
/// One value per close starting at index `period`.  Windows where the RSI is
/// undefined (no movement at all) are NaN.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `closes.len() < period + 1` => empty vec (need at least `period` deltas)
/// - Average loss of zero with positive gains saturates to 100.0.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period + 1 {
        return Vec::new();
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let period_f = period as f64;

    deltas
        .windows(period)
        .map(|window| {
            let (sum_gain, sum_loss) = window.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
                if d > 0.0 {
                    (g + d, l)
                } else {
                    (g, l - d)
                }
            });
            rsi_from_averages(sum_gain / period_f, sum_loss / period_f).unwrap_or(f64::NAN)
        })
        .collect()
}

/// RSI from the two window averages; `None` when there was no movement.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        return None;
    }

    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi)
    } else {
        None
    }
}

// =============================================================================
// EMA and MACD
// =============================================================================
//
//   alpha  = 2 / (span + 1)
//   ema[0] = mean(x[0..span])
//   ema[t] = ema[t-1] + alpha * (x[t] - ema[t-1])
//
//   macd   = ema(close, fast) - ema(close, slow)
//   signal = ema(macd, signal_span)
// =============================================================================

/// EMA of `values` with the given `span`, seeded by the mean of the first
/// `span` values.
///
/// The output starts at `values[span - 1]`, so it is `values.len() - span + 1`
/// long.  It is empty for a zero span or short input, and stops early at the
/// first non-finite value.  A constant input stays exactly constant.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.len() < span {
        return Vec::new();
    }

    let alpha = 2.0 / (span + 1) as f64;
    let seed = values[..span].iter().sum::<f64>() / span as f64;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(values.len() - span + 1);
    out.push(seed);
    for &x in &values[span..] {
        let prev = out[out.len() - 1];
        let next = prev + alpha * (x - prev);
        if !next.is_finite() {
            break;
        }
        out.push(next);
    }
    out
}

/// MACD and signal lines, both ending at the last close.
///
/// `macd[i]` and `signal[j]` are aligned from the right: the last element of
/// each refers to the most recent bar.
#[derive(Debug, Clone)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Latest MACD reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Minimum number of closes needed to produce one signal value.
pub fn macd_min_len(slow: usize, signal: usize) -> usize {
    slow + signal - 1
}

/// Compute the MACD line and its signal line.
///
/// Returns `None` when:
/// - any period is zero, or `fast >= slow`
/// - there are fewer than `slow + signal - 1` closes
/// - an EMA truncated on a non-finite value
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdLines> {
    if fast == 0 || signal == 0 || fast >= slow {
        return None;
    }
    if closes.len() < macd_min_len(slow, signal) {
        return None;
    }

    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);
    if fast_ema.len() != closes.len() - fast + 1 || slow_ema.len() != closes.len() - slow + 1 {
        return None;
    }

    // fast_ema starts `slow - fast` bars earlier than slow_ema.
    let offset = slow - fast;
    let macd: Vec<f64> = slow_ema
        .iter()
        .enumerate()
        .map(|(k, s)| fast_ema[k + offset] - s)
        .collect();

    let signal_line = calculate_ema(&macd, signal);
    if signal_line.len() != macd.len() - signal + 1 {
        return None;
    }

    Some(MacdLines {
        macd,
        signal: signal_line,
    })
}

/// Convenience function: return the most recent MACD / signal / histogram.
pub fn current_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdReading> {
    let lines = calculate_macd(closes, fast, slow, signal)?;
    let macd = *lines.macd.last()?;
    let signal = *lines.signal.last()?;
    Some(MacdReading {
        macd,
        signal,
        histogram: macd - signal,
    })
}

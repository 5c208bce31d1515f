//! Stateless transforms over an ordered price sequence. Outputs are
//! index-aligned with the input; warm-up indices carry NaN so callers can
//! never consume a value computed from a partially filled window.

/// Arithmetic mean of the trailing `window` values. NaN until the window
/// fills (indices < window - 1). The value at index i depends only on
/// indices <= i.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut sma_values = vec![f64::NAN; n];
    if window == 0 || n < window {
        return sma_values;
    }

    let mut window_sum: f64 = values[..window].iter().sum();
    sma_values[window - 1] = window_sum / window as f64;
    for i in window..n {
        window_sum += values[i] - values[i - window];
        sma_values[i] = window_sum / window as f64;
    }

    sma_values
}

/// RSI over a simple rolling mean of gains and losses, not Wilder's
/// exponential smoothing. Over the trailing `period` close-to-close deltas:
/// gain = mean of positive deltas, loss = mean of magnitudes of negative
/// deltas, RSI = 100 - 100 / (1 + gain / loss).
///
/// NaN for indices < period. When the rolling loss is exactly zero
/// (including the all-flat case) the value is NaN as well: the signal layer
/// treats it as non-actionable instead of comparing against thresholds.
pub fn rolling_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut rsi_values = vec![f64::NAN; n];
    if period == 0 || n <= period {
        return rsi_values;
    }

    for i in period..n {
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        let window_start = i + 1 - period;
        for j in window_start..=i {
            let delta = closes[j] - closes[j - 1];
            if delta > 0.0 {
                gain_sum += delta;
            } else {
                loss_sum += -delta;
            }
        }

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;
        if avg_loss == 0.0 {
            continue;
        }
        rsi_values[i] = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
    }

    rsi_values
}

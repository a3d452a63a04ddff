//! RSI (Relative Strength Index) with Wilder smoothing.
//!
//! delta[t] = x[t] - x[t-1] (taken as 0 at t = 0), gain = max(delta, 0),
//! loss = max(-delta, 0). avg_gain / avg_loss are exponentially smoothed with
//! alpha = 1/n, seeded with the first value.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the first n bars are `None`.

use crate::domain::error::NotifyError;
use crate::domain::indicator::ema::smooth;

pub const DEFAULT_RSI_LENGTH: usize = 14;

pub fn calculate_rsi(prices: &[f64], length: usize) -> Result<Vec<Option<f64>>, NotifyError> {
    if length == 0 {
        return Err(NotifyError::invalid_parameter("length", "must be positive"));
    }

    let mut gains = Vec::with_capacity(prices.len());
    let mut losses = Vec::with_capacity(prices.len());
    for (i, &price) in prices.iter().enumerate() {
        let delta = if i == 0 { 0.0 } else { price - prices[i - 1] };
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let alpha = 1.0 / length as f64;
    let avg_gain = smooth(&gains, alpha);
    let avg_loss = smooth(&losses, alpha);

    Ok(avg_gain
        .iter()
        .zip(&avg_loss)
        .enumerate()
        .map(|(i, (&g, &l))| {
            if i < length {
                None
            } else if l == 0.0 {
                Some(100.0)
            } else {
                Some(100.0 - 100.0 / (1.0 + g / l))
            }
        })
        .collect())
}

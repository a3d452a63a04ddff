//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first value, then EMA[i] = x[i]*k + EMA[i-1]*(1-k).
//! No warmup: every bar carries a value.

use crate::domain::error::NotifyError;

/// Recursive exponential smoothing with factor `alpha`, seeded with `values[0]`.
///
/// Evaluated strictly in input order.
pub fn smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &x in values {
        let next = match prev {
            None => x,
            Some(p) => alpha * x + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

pub fn calculate_ema(prices: &[f64], span: usize) -> Result<Vec<f64>, NotifyError> {
    if span == 0 {
        return Err(NotifyError::invalid_parameter("span", "must be positive"));
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    Ok(smooth(prices, alpha))
}

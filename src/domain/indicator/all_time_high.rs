//! Running all-time-high of a price series.

pub fn calculate_all_time_high(prices: &[f64]) -> Vec<f64> {
    prices
        .iter()
        .scan(f64::NEG_INFINITY, |high, &price| {
            *high = high.max(price);
            Some(*high)
        })
        .collect()
}

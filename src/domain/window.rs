//! Trailing boolean windows over a single series.
//!
//! Two distinct aggregates with easily confused semantics:
//! - [`sustained`]: every bar in the window is true (band containment)
//! - [`recent_occurrence`]: at least one bar in the window is true

use crate::domain::config::ShortWindowPolicy;

/// `out[t]` is true iff `values[t+1-window..=t]` are all true.
///
/// Under [`ShortWindowPolicy::RequireFull`] positions with fewer than `window`
/// bars available are undefined (`None`).
pub fn sustained(values: &[bool], window: usize, policy: ShortWindowPolicy) -> Vec<Option<bool>> {
    // length of the current run of trues ending at t
    let mut run = 0usize;
    values
        .iter()
        .enumerate()
        .map(|(t, &v)| {
            run = if v { run + 1 } else { 0 };
            let available = (t + 1).min(window);
            match policy {
                ShortWindowPolicy::RequireFull if t + 1 < window => None,
                _ => Some(window > 0 && run >= available),
            }
        })
        .collect()
}

/// `out[t]` is true iff `values[t+1-window..=t]` are all defined and any of
/// them is true.
///
/// A window that reaches back into undefined values (warmup, or the start of
/// the series) is false.
pub fn recent_occurrence(values: &[Option<bool>], window: usize) -> Vec<bool> {
    let mut defined_run = 0usize;
    let mut last_true: Option<usize> = None;
    values
        .iter()
        .enumerate()
        .map(|(t, &v)| {
            match v {
                Some(flag) => {
                    defined_run += 1;
                    if flag {
                        last_true = Some(t);
                    }
                }
                None => defined_run = 0,
            }
            window > 0
                && defined_run >= window
                && matches!(last_true, Some(i) if t - i < window)
        })
        .collect()
}

/// Edge trigger: true only on the first bar of each maximal run of trues.
///
/// The first element counts as a rising edge when it is true.
pub fn rising_edges(values: &[bool]) -> Vec<bool> {
    let mut prev = false;
    values
        .iter()
        .map(|&v| {
            let edge = v && !prev;
            prev = v;
            edge
        })
        .collect()
}

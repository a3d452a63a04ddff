//! Flag evaluator: three independent per-bar predicates.
//!
//! Undefined operands never propagate: any predicate that touches a missing
//! value (no previous bar, RSI in warmup) is false. See [`defined_and`].

use crate::domain::config::{FAST_EMA, LONG_EMA, SLOW_EMA, SignalConfig};
use crate::domain::error::NotifyError;
use crate::domain::frame::{AugmentedBar, Column, Frame};
use crate::domain::window::sustained;

/// Collapse a three-valued predicate to two values: undefined is false.
pub fn defined_and<T>(operand: Option<T>, predicate: impl FnOnce(T) -> bool) -> bool {
    operand.is_some_and(predicate)
}

/// EMA-5 crosses above EMA-20 on a qualifying green candle, preceded by a
/// green candle.
pub fn is_ema_cross(prev: Option<&AugmentedBar>, cur: &AugmentedBar, config: &SignalConfig) -> bool {
    let (Some(prev), Some(fast), Some(slow)) = (prev, cur.ema(FAST_EMA), cur.ema(SLOW_EMA)) else {
        return false;
    };
    let bar = &cur.bar;

    let was_below = defined_and(prev.ema(FAST_EMA).zip(prev.ema(SLOW_EMA)), |(f, s)| f <= s);
    let crossed = fast > slow;
    let green = bar.adjusted_close > bar.open;
    let near_high = bar.adjusted_close >= config.cross_close_to_high_ratio * bar.high;
    let body_on_fast = bar.open >= config.cross_body_to_ema5_ratio * fast
        && bar.low >= config.cross_body_to_ema5_ratio * fast;
    let above_slow = bar.open >= slow && bar.high >= slow;
    let prev_green = prev.bar.is_green();

    was_below && crossed && green && near_high && body_on_fast && above_slow && prev_green
}

/// adjusted_close in (ema_200, ema_200 * (1 + tolerance)] on a single bar.
pub fn is_inside_ema200_band(row: &AugmentedBar, tolerance: f64) -> bool {
    defined_and(row.ema(LONG_EMA), |ema| {
        row.bar.adjusted_close > ema && row.bar.adjusted_close <= ema * (1.0 + tolerance)
    })
}

pub fn add_ema_cross_flag(frame: &Frame, config: &SignalConfig) -> Result<Frame, NotifyError> {
    frame.require(
        "flag_ema_cross",
        &[Column::Ema(FAST_EMA), Column::Ema(SLOW_EMA)],
    )?;
    Ok(frame.with_column(Column::FlagEmaCross, |series| {
        let flags: Vec<bool> = (0..series.rows.len())
            .map(|t| {
                let prev = t.checked_sub(1).map(|p| &series.rows[p]);
                is_ema_cross(prev, &series.rows[t], config)
            })
            .collect();
        for (row, flag) in series.rows.iter_mut().zip(flags) {
            row.flag_ema_cross = flag;
        }
    }))
}

pub fn add_ema200_band_flag(frame: &Frame, config: &SignalConfig) -> Result<Frame, NotifyError> {
    frame.require("flag_ema200_band", &[Column::Ema(LONG_EMA)])?;
    Ok(frame.with_column(Column::FlagEma200Band, |series| {
        let inside: Vec<bool> = series
            .rows
            .iter()
            .map(|row| is_inside_ema200_band(row, config.ema200_band_tolerance))
            .collect();
        let flags = sustained(&inside, config.confirmation_window, config.short_window);
        for (row, flag) in series.rows.iter_mut().zip(flags) {
            row.flag_ema200_band = flag;
        }
    }))
}

pub fn add_rsi_flag(frame: &Frame, config: &SignalConfig) -> Result<Frame, NotifyError> {
    frame.require("flag_rsi_above_50", &[Column::Rsi(config.rsi_length)])?;
    Ok(frame.with_column(Column::FlagRsiAbove50, |series| {
        for row in series.rows.iter_mut() {
            row.flag_rsi_above_50 = row
                .rsi(config.rsi_length)
                .map(|rsi| rsi > config.rsi_threshold);
        }
    }))
}

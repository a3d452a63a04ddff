//! Indicator engine.
//!
//! Every function here computes over adjusted close, one series at a time, and
//! returns a new frame with one more column:
//! - [`add_ema_column`]: `ema_{span}`
//! - [`add_rsi_column`]: `rsi_{length}`, undefined during warmup
//! - [`add_all_time_high`]: running maximum

pub mod all_time_high;
pub mod ema;
pub mod rsi;

use crate::domain::error::NotifyError;
use crate::domain::frame::{Column, Frame};
use all_time_high::calculate_all_time_high;
use ema::calculate_ema;
use rsi::calculate_rsi;

pub fn add_ema_column(frame: &Frame, span: usize) -> Result<Frame, NotifyError> {
    if span == 0 {
        return Err(NotifyError::invalid_parameter("span", "must be positive"));
    }
    tracing::debug!(span, rows = frame.row_count(), "computing ema");
    Ok(frame.with_column(Column::Ema(span), |series| {
        // span is validated above, so this cannot fail
        let values = calculate_ema(&series.adjusted_closes(), span).unwrap_or_default();
        for (row, value) in series.rows.iter_mut().zip(values) {
            row.emas.insert(span, value);
        }
    }))
}

pub fn add_rsi_column(frame: &Frame, length: usize) -> Result<Frame, NotifyError> {
    if length == 0 {
        return Err(NotifyError::invalid_parameter("length", "must be positive"));
    }
    tracing::debug!(length, rows = frame.row_count(), "computing rsi");
    Ok(frame.with_column(Column::Rsi(length), |series| {
        let values = calculate_rsi(&series.adjusted_closes(), length).unwrap_or_default();
        for (row, value) in series.rows.iter_mut().zip(values) {
            row.rsis.insert(length, value);
        }
    }))
}

pub fn add_all_time_high(frame: &Frame) -> Frame {
    frame.with_column(Column::AllTimeHigh, |series| {
        let values = calculate_all_time_high(&series.adjusted_closes());
        for (row, value) in series.rows.iter_mut().zip(values) {
            row.all_time_high = Some(value);
        }
    })
}

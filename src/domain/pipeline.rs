//! Full indicator → flag → signal pipeline over a batch of bars.

use crate::domain::config::SignalConfig;
use crate::domain::error::NotifyError;
use crate::domain::flags::{add_ema200_band_flag, add_ema_cross_flag, add_rsi_flag};
use crate::domain::frame::Frame;
use crate::domain::indicator::{add_all_time_high, add_ema_column, add_rsi_column};
use crate::domain::notification::add_notification_flag;
use crate::domain::ohlcv::Bar;

/// Build the frame from raw bars and run every stage.
pub fn run_pipeline(bars: Vec<Bar>, config: &SignalConfig) -> Result<Frame, NotifyError> {
    config.validate()?;
    let frame = Frame::from_bars(bars)?;
    tracing::info!(
        entities = frame.series().len(),
        rows = frame.row_count(),
        "running signal pipeline"
    );
    augment(&frame, config)
}

/// Run every stage on an existing frame.
pub fn augment(frame: &Frame, config: &SignalConfig) -> Result<Frame, NotifyError> {
    let mut frame = frame.clone();
    for &span in &config.ema_spans {
        frame = add_ema_column(&frame, span)?;
    }
    let frame = add_rsi_column(&frame, config.rsi_length)?;
    let frame = add_all_time_high(&frame);

    let frame = add_ema200_band_flag(&frame, config)?;
    let frame = add_ema_cross_flag(&frame, config)?;
    let frame = add_rsi_flag(&frame, config)?;
    let frame = add_notification_flag(&frame, config)?;

    tracing::debug!(
        raw = frame.rows().filter(|r| r.flag_notification).count(),
        deduplicated = frame.rows().filter(|r| r.flag_notification_deduplicated).count(),
        "signals evaluated"
    );
    Ok(frame)
}

//! Signal combiner.
//!
//! Raw notification at bar t:
//!   recent_occurrence(flag_ema200_band)[t] && flag_ema_cross[t]
//!     && recent_occurrence(flag_rsi_above_50)[t]
//!
//! `flag_ema200_band` is itself a sustained (all-true) window, so the band
//! condition is an OR over overlapping AND windows. The cross must hold on the
//! trigger bar exactly. The raw flag is then edge-triggered so each episode
//! notifies once.
//!
//! Both trailing windows must cover `confirmation_window` defined flag values,
//! so nothing fires while the band or RSI flags are still warming up.

use crate::domain::config::SignalConfig;
use crate::domain::error::NotifyError;
use crate::domain::frame::{Column, Frame};
use crate::domain::window::{recent_occurrence, rising_edges};

pub fn add_notification_flag(frame: &Frame, config: &SignalConfig) -> Result<Frame, NotifyError> {
    frame.require(
        "flag_notification",
        &[
            Column::FlagEma200Band,
            Column::FlagEmaCross,
            Column::FlagRsiAbove50,
        ],
    )?;
    let window = config.confirmation_window;

    let raw = frame.with_column(Column::FlagNotification, |series| {
        let band: Vec<Option<bool>> = series.rows.iter().map(|r| r.flag_ema200_band).collect();
        let rsi: Vec<Option<bool>> = series.rows.iter().map(|r| r.flag_rsi_above_50).collect();
        let band_recent = recent_occurrence(&band, window);
        let rsi_recent = recent_occurrence(&rsi, window);
        for (t, row) in series.rows.iter_mut().enumerate() {
            row.flag_notification = band_recent[t] && row.flag_ema_cross && rsi_recent[t];
        }
    });

    Ok(deduplicate_notifications(&raw))
}

/// Keep only the first bar of every consecutive run of raw notifications.
pub fn deduplicate_notifications(frame: &Frame) -> Frame {
    frame.with_column(Column::FlagNotificationDeduplicated, |series| {
        let raw: Vec<bool> = series.rows.iter().map(|r| r.flag_notification).collect();
        for (row, edge) in series.rows.iter_mut().zip(rising_edges(&raw)) {
            row.flag_notification_deduplicated = edge;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use chrono::NaiveDate;

    fn defined(values: &[bool]) -> Vec<Option<bool>> {
        values.iter().copied().map(Some).collect()
    }

    /// `n` defined flags, `None` before `from`, true from `from` on.
    fn warming(n: usize, from: usize) -> Vec<Option<bool>> {
        (0..n).map(|i| (i >= from).then_some(true)).collect()
    }

    /// Single-entity frame with the three input flags set per bar.
    fn flagged_frame(band: &[Option<bool>], cross: &[bool], rsi: &[Option<bool>]) -> Frame {
        let bars = (0..band.len())
            .map(|i| Bar {
                code: "X".into(),
                exchange: "NYSE".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                adjusted_close: 1.0,
                volume: 1,
            })
            .collect();
        let frame = Frame::from_bars(bars).unwrap();
        let band = band.to_vec();
        let cross = cross.to_vec();
        let rsi = rsi.to_vec();
        frame
            .with_column(Column::FlagEma200Band, |s| {
                for (r, f) in s.rows.iter_mut().zip(&band) {
                    r.flag_ema200_band = *f;
                }
            })
            .with_column(Column::FlagEmaCross, |s| {
                for (r, f) in s.rows.iter_mut().zip(&cross) {
                    r.flag_ema_cross = *f;
                }
            })
            .with_column(Column::FlagRsiAbove50, |s| {
                for (r, f) in s.rows.iter_mut().zip(&rsi) {
                    r.flag_rsi_above_50 = *f;
                }
            })
    }

    fn column(frame: &Frame, pick: fn(&crate::domain::frame::AugmentedBar) -> bool) -> Vec<bool> {
        frame.series()[0].rows.iter().map(pick).collect()
    }

    #[test]
    fn raw_requires_cross_on_trigger_bar() {
        let n = 12;
        let mut cross = vec![false; n];
        cross[11] = true;
        let frame = flagged_frame(&defined(&vec![true; n]), &cross, &defined(&vec![true; n]));
        let out = add_notification_flag(&frame, &SignalConfig::default()).unwrap();
        let raw = column(&out, |r| r.flag_notification);
        assert_eq!(raw.iter().filter(|f| **f).count(), 1);
        assert!(raw[11]);
    }

    #[test]
    fn band_and_rsi_tolerate_recent_lapse() {
        let n = 15;
        let mut band = vec![false; n];
        band[5] = true;
        let mut rsi = vec![false; n];
        rsi[10] = true;
        let mut cross = vec![false; n];
        cross[14] = true;
        let frame = flagged_frame(&defined(&band), &cross, &defined(&rsi));
        let out = add_notification_flag(&frame, &SignalConfig::default()).unwrap();
        // band seen at 5, which is within the 10-bar window ending at 14
        assert!(column(&out, |r| r.flag_notification)[14]);
    }

    #[test]
    fn band_outside_window_blocks() {
        let n = 16;
        let mut band = vec![false; n];
        band[5] = true;
        let mut cross = vec![false; n];
        cross[15] = true;
        let frame = flagged_frame(&defined(&band), &cross, &defined(&vec![true; n]));
        let out = add_notification_flag(&frame, &SignalConfig::default()).unwrap();
        assert!(!column(&out, |r| r.flag_notification)[15]);
    }

    #[test]
    fn dedup_keeps_rising_edges_only() {
        let (t, f) = (true, false);
        let raw = [f, t, t, t, f, t];
        let frame = flagged_frame(&defined(&raw), &raw, &defined(&raw));
        let config = SignalConfig {
            confirmation_window: 1,
            ..SignalConfig::default()
        };
        let out = add_notification_flag(&frame, &config).unwrap();
        assert_eq!(column(&out, |r| r.flag_notification), raw.to_vec());
        assert_eq!(
            column(&out, |r| r.flag_notification_deduplicated),
            vec![f, t, f, f, f, t]
        );
    }

    #[test]
    fn silent_while_flags_warm_up() {
        // band defined from bar 9, RSI from bar 14: windows are full from 23
        let n = 30;
        let band = warming(n, 9);
        let rsi = warming(n, 14);
        let mut cross = vec![false; n];
        cross[14] = true;
        cross[22] = true;
        cross[23] = true;
        let frame = flagged_frame(&band, &cross, &rsi);
        let out = add_notification_flag(&frame, &SignalConfig::default()).unwrap();
        let raw = column(&out, |r| r.flag_notification);
        let fired: Vec<usize> = (0..n).filter(|&t| raw[t]).collect();
        assert_eq!(fired, vec![23]);
    }

    #[test]
    fn requires_flag_columns() {
        let frame = Frame::from_bars(vec![]).unwrap();
        let err = add_notification_flag(&frame, &SignalConfig::default()).unwrap_err();
        assert!(matches!(err, NotifyError::Schema { .. }));
    }

    #[test]
    fn empty_frame_produces_empty_output() {
        let frame = flagged_frame(&[], &[], &[]);
        let out = add_notification_flag(&frame, &SignalConfig::default()).unwrap();
        assert!(out.is_empty());
        assert!(out.has_column(Column::FlagNotificationDeduplicated));
    }
}

//! Final eligibility filter over the deduplicated signal.

use crate::domain::error::NotifyError;
use crate::domain::frame::{AugmentedBar, Column, Frame};
use chrono::{Days, NaiveDate};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityFilter {
    pub exchanges: HashSet<String>,
    pub lookback_days: u32,
    pub volume_threshold: i64,
}

/// Rows that passed the filter, newest first, and the distinct entity ids
/// among them in row order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Notifications {
    pub trading_day: Option<NaiveDate>,
    pub rows: Vec<AugmentedBar>,
    pub tickers: Vec<String>,
}

impl Notifications {
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

impl EligibilityFilter {
    pub fn new<I, S>(exchanges: I, lookback_days: u32, volume_threshold: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exchanges: exchanges
                .into_iter()
                .map(|e| e.into().trim().to_uppercase())
                .collect(),
            lookback_days,
            volume_threshold,
        }
    }

    /// Whitelist membership, ignoring case and surrounding whitespace.
    pub fn accepts_exchange(&self, exchange: &str) -> bool {
        self.exchanges.contains(&exchange.trim().to_uppercase())
    }

    /// Earliest date that still counts: `trading_day - lookback_days`.
    pub fn earliest_date(&self, trading_day: NaiveDate) -> NaiveDate {
        trading_day
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn apply(&self, frame: &Frame, trading_day: NaiveDate) -> Result<Notifications, NotifyError> {
        frame.require("eligibility filter", &[Column::FlagNotificationDeduplicated])?;
        let earliest = self.earliest_date(trading_day);

        let mut rows: Vec<AugmentedBar> = frame
            .rows()
            .filter(|r| r.flag_notification_deduplicated)
            .filter(|r| self.accepts_exchange(&r.bar.exchange))
            .filter(|r| r.bar.volume > self.volume_threshold)
            .filter(|r| r.date() >= earliest)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date().cmp(&a.date()).then_with(|| a.bar.id().cmp(&b.bar.id())));

        let mut seen = HashSet::new();
        let tickers = rows
            .iter()
            .map(|r| r.bar.id())
            .filter(|id| seen.insert(id.clone()))
            .collect();

        tracing::debug!(
            %trading_day,
            %earliest,
            rows = rows.len(),
            "eligibility filter applied"
        );

        Ok(Notifications {
            trading_day: Some(trading_day),
            rows,
            tickers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn bar(exchange: &str, code: &str, day: u32, volume: i64) -> Bar {
        Bar {
            code: code.into(),
            exchange: exchange.into(),
            date: date(day),
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: 10.5,
            adjusted_close: 10.5,
            volume,
        }
    }

    /// Frame where every bar carries a deduplicated notification.
    fn signalled(bars: Vec<Bar>) -> Frame {
        Frame::from_bars(bars)
            .unwrap()
            .with_column(Column::FlagNotificationDeduplicated, |s| {
                for r in s.rows.iter_mut() {
                    r.flag_notification_deduplicated = true;
                }
            })
    }

    #[test]
    fn lookback_zero_keeps_latest_day_only() {
        let frame = signalled(vec![
            bar("NYSE", "IBM", 1, 500_000),
            bar("NYSE", "IBM", 2, 500_000),
            bar("NYSE", "IBM", 3, 500_000),
        ]);
        let filter = EligibilityFilter::new(["NYSE"], 0, 250_000);
        let out = filter.apply(&frame, date(3)).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].date(), date(3));
        assert_eq!(out.tickers, vec!["NYSE_IBM"]);
    }

    #[test]
    fn volume_equal_to_threshold_is_excluded() {
        let frame = signalled(vec![
            bar("NYSE", "AAA", 3, 250_000),
            bar("NYSE", "BBB", 3, 250_001),
        ]);
        let filter = EligibilityFilter::new(["NYSE"], 0, 250_000);
        let out = filter.apply(&frame, date(3)).unwrap();
        assert_eq!(out.tickers, vec!["NYSE_BBB"]);
    }

    #[test]
    fn exchange_whitelist() {
        let frame = signalled(vec![
            bar("NYSE", "IBM", 3, 500_000),
            bar("OTC", "JUNK", 3, 500_000),
        ]);
        let filter = EligibilityFilter::new(["NYSE", "NSE"], 0, 0);
        let out = filter.apply(&frame, date(3)).unwrap();
        assert_eq!(out.tickers, vec!["NYSE_IBM"]);
    }

    #[test]
    fn exchange_match_ignores_case() {
        let frame = signalled(vec![
            bar("nyse", "IBM", 3, 500_000),
            bar("Nse", "TCS", 3, 500_000),
        ]);
        let filter = EligibilityFilter::new(["NYSE", "nse"], 0, 0);
        let out = filter.apply(&frame, date(3)).unwrap();
        assert_eq!(out.tickers, vec!["Nse_TCS", "nyse_IBM"]);
    }

    #[test]
    fn unflagged_rows_are_dropped() {
        let frame = signalled(vec![bar("NYSE", "IBM", 3, 500_000)]).with_column(
            Column::FlagNotificationDeduplicated,
            |s| s.rows[0].flag_notification_deduplicated = false,
        );
        let filter = EligibilityFilter::new(["NYSE"], 5, 0);
        assert!(filter.apply(&frame, date(3)).unwrap().is_empty());
    }

    #[test]
    fn sorted_newest_first_with_distinct_tickers() {
        let frame = signalled(vec![
            bar("NYSE", "IBM", 1, 500_000),
            bar("NYSE", "IBM", 4, 500_000),
            bar("NSE", "TCS", 2, 500_000),
        ]);
        let filter = EligibilityFilter::new(["NYSE", "NSE"], 10, 0);
        let out = filter.apply(&frame, date(4)).unwrap();
        let dates: Vec<NaiveDate> = out.rows.iter().map(|r| r.date()).collect();
        assert_eq!(dates, vec![date(4), date(2), date(1)]);
        assert_eq!(out.tickers, vec!["NYSE_IBM", "NSE_TCS"]);
    }

    #[test]
    fn lookback_window_is_inclusive() {
        let frame = signalled(vec![
            bar("NYSE", "OLD", 1, 500_000),
            bar("NYSE", "EDGE", 2, 500_000),
        ]);
        let filter = EligibilityFilter::new(["NYSE"], 2, 0);
        let out = filter.apply(&frame, date(4)).unwrap();
        assert_eq!(out.tickers, vec!["NYSE_EDGE"]);
    }

    #[test]
    fn requires_deduplicated_column() {
        let frame = Frame::from_bars(vec![bar("NYSE", "IBM", 1, 1)]).unwrap();
        let filter = EligibilityFilter::new(["NYSE"], 0, 0);
        assert!(matches!(
            filter.apply(&frame, date(1)),
            Err(NotifyError::Schema { .. })
        ));
    }

    #[test]
    fn empty_frame_gives_empty_notifications() {
        let frame = signalled(vec![]);
        let filter = EligibilityFilter::new(["NYSE"], 0, 0);
        let out = filter.apply(&frame, date(1)).unwrap();
        assert!(out.rows.is_empty());
        assert!(out.tickers.is_empty());
    }
}

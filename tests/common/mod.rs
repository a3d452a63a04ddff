#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use std::cell::RefCell;
use std::path::Path;
use tradenotify::domain::eligibility::Notifications;
use tradenotify::domain::error::NotifyError;
use tradenotify::domain::frame::Frame;
pub use tradenotify::domain::ohlcv::Bar;
use tradenotify::ports::data_port::DataPort;
use tradenotify::ports::notify_port::NotifyPort;
use tradenotify::ports::report_port::ReportPort;

pub const SERIES_START: (i32, u32, u32) = (2024, 1, 1);

/// Index of the only bar in [`crossing_series`] that notifies.
pub const CROSS_INDEX: u64 = 247;

pub struct MockDataPort {
    pub bars: Vec<Bar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, bars: Vec<Bar>) -> Self {
        self.bars.extend(bars);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load_bars(&self, date_from: NaiveDate, date_to: NaiveDate) -> Result<Vec<Bar>, NotifyError> {
        if let Some(reason) = &self.error {
            return Err(NotifyError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .bars
            .iter()
            .filter(|b| b.date >= date_from && b.date <= date_to)
            .cloned()
            .collect())
    }

    fn available_dates(&self) -> Result<Vec<NaiveDate>, NotifyError> {
        if let Some(reason) = &self.error {
            return Err(NotifyError::Data {
                reason: reason.clone(),
            });
        }
        let mut dates: Vec<NaiveDate> = self.bars.iter().map(|b| b.date).collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }
}

/// Records what the pipeline hands to the report and notify ports.
#[derive(Default)]
pub struct RecordingPorts {
    pub frames: RefCell<Vec<usize>>,
    pub notified: RefCell<Vec<(NaiveDate, Vec<String>)>>,
}

impl ReportPort for RecordingPorts {
    fn write_frame(&self, frame: &Frame, _output_path: &Path) -> Result<(), NotifyError> {
        self.frames.borrow_mut().push(frame.row_count());
        Ok(())
    }

    fn write_notifications(
        &self,
        _notifications: &Notifications,
        _output_path: &Path,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}

impl NotifyPort for RecordingPorts {
    fn notify(&self, trading_day: NaiveDate, tickers: &[String]) -> Result<(), NotifyError> {
        self.notified
            .borrow_mut()
            .push((trading_day, tickers.to_vec()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn series_date(index: u64) -> NaiveDate {
    let (y, m, d) = SERIES_START;
    date(y, m, d) + Days::new(index)
}

pub fn make_bar(
    exchange: &str,
    code: &str,
    index: u64,
    open: f64,
    high: f64,
    low: f64,
    adjusted_close: f64,
) -> Bar {
    Bar {
        code: code.to_string(),
        exchange: exchange.to_string(),
        date: series_date(index),
        open,
        high,
        low,
        close: adjusted_close,
        adjusted_close,
        volume: 1_000_000,
    }
}

/// A flat series that never triggers anything.
pub fn flat_series(exchange: &str, code: &str, count: u64, price: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| make_bar(exchange, code, i, price, price, price, price))
        .collect()
}

/// A slow uptrend hugging its 200-bar EMA, a four-bar dip that pulls EMA-5
/// under EMA-20, then a green rally. EMA-5 crosses back above EMA-20 on
/// [`CROSS_INDEX`] and stays above for the remaining bars.
pub fn crossing_series(exchange: &str, code: &str) -> Vec<Bar> {
    let mut bars = Vec::new();
    let mut i = 0u64;

    for step in 0..240 {
        let p = 100.0 + 0.02 * step as f64;
        bars.push(make_bar(exchange, code, i, p, p + 0.1, p - 0.1, p));
        i += 1;
    }

    let mut p = 100.0 + 0.02 * 239.0;
    for _ in 0..4 {
        p -= 0.3;
        bars.push(make_bar(exchange, code, i, p + 0.2, p + 0.25, p - 0.05, p));
        i += 1;
    }
    bars.push(make_bar(exchange, code, i, p, p + 0.12, p - 0.02, p + 0.1));
    i += 1;

    for k in 0..16 {
        let c = 104.5 + 0.25 * k as f64;
        bars.push(make_bar(exchange, code, i, c - 0.1, c + 0.005, c - 0.11, c));
        i += 1;
    }
    bars
}

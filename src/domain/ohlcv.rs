//! Daily OHLCV bar as delivered by the data collaborator.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub code: String,
    pub exchange: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: i64,
}

impl Bar {
    /// Entity id: `{exchange}_{code}`, unique per security.
    pub fn id(&self) -> String {
        entity_id(&self.exchange, &self.code)
    }

    /// adjusted_close > open
    pub fn is_green(&self) -> bool {
        self.adjusted_close > self.open
    }
}

pub fn entity_id(exchange: &str, code: &str) -> String {
    format!("{}_{}", exchange, code)
}

//! Delivery port for the final ticker list.

use crate::domain::error::NotifyError;
use chrono::NaiveDate;

pub trait NotifyPort {
    fn notify(&self, trading_day: NaiveDate, tickers: &[String]) -> Result<(), NotifyError>;
}

//! Bar storage port trait.

use crate::domain::error::NotifyError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Every bar dated in `[date_from, date_to]`, across all entities.
    ///
    /// A date with no stored data contributes zero rows. A stored table that
    /// lacks a required column is a schema error.
    fn load_bars(&self, date_from: NaiveDate, date_to: NaiveDate) -> Result<Vec<Bar>, NotifyError>;

    /// Dates for which a table is stored, ascending.
    fn available_dates(&self) -> Result<Vec<NaiveDate>, NotifyError>;
}

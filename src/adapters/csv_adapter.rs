//! Date-partitioned CSV storage: one `YYYY-MM-DD.csv` file per trading date.

use crate::domain::error::NotifyError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};

pub const REQUIRED_COLUMNS: [&str; 9] = [
    "code",
    "exchange_short_name",
    "date",
    "open",
    "high",
    "low",
    "close",
    "adjusted_close",
    "volume",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct DailyCsvAdapter {
    base_path: PathBuf,
}

/// Column positions resolved from a file's header row.
struct ColumnIndex {
    positions: [usize; REQUIRED_COLUMNS.len()],
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self, NotifyError> {
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, name) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            match headers.iter().position(|h| h.trim() == name) {
                Some(i) => *slot = i,
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            return Err(NotifyError::schema(format!(
                "{} is missing required columns: {}",
                path.display(),
                missing.join(", ")
            )));
        }
        Ok(Self { positions })
    }

    fn field<'r>(&self, record: &'r StringRecord, column: usize) -> Result<&'r str, NotifyError> {
        record
            .get(self.positions[column])
            .map(str::trim)
            .ok_or_else(|| NotifyError::Data {
                reason: format!("row is missing {} value", REQUIRED_COLUMNS[column]),
            })
    }

    fn number<T: std::str::FromStr>(&self, record: &StringRecord, column: usize) -> Result<T, NotifyError>
    where
        T::Err: std::fmt::Display,
    {
        let raw = self.field(record, column)?;
        raw.parse().map_err(|e: T::Err| NotifyError::Data {
            reason: format!("invalid {} value '{}': {}", REQUIRED_COLUMNS[column], raw, e),
        })
    }

    fn bar(&self, record: &StringRecord) -> Result<Bar, NotifyError> {
        let date_str = self.field(record, 2)?;
        let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT).map_err(|e| NotifyError::Data {
            reason: format!("invalid date '{}': {}", date_str, e),
        })?;
        Ok(Bar {
            code: self.field(record, 0)?.to_string(),
            exchange: self.field(record, 1)?.to_string(),
            date,
            open: self.number(record, 3)?,
            high: self.number(record, 4)?,
            low: self.number(record, 5)?,
            close: self.number(record, 6)?,
            adjusted_close: self.number(record, 7)?,
            volume: self.volume(record)?,
        })
    }

    /// Volumes are integral but some feeds serialise them as `123.0`.
    fn volume(&self, record: &StringRecord) -> Result<i64, NotifyError> {
        if let Ok(v) = self.number::<i64>(record, 8) {
            return Ok(v);
        }
        let v = self.number::<f64>(record, 8)?;
        // i64::MAX is not representable as f64; 2^63 is the exclusive bound
        if !v.is_finite() || v.fract() != 0.0 || v < i64::MIN as f64 || v >= i64::MAX as f64 {
            return Err(NotifyError::Data {
                reason: format!(
                    "invalid volume value '{}': not a whole number",
                    self.field(record, 8)?
                ),
            });
        }
        Ok(v as i64)
    }
}

impl DailyCsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, date: NaiveDate) -> PathBuf {
        self.base_path
            .join(format!("{}.csv", date.format(DATE_FORMAT)))
    }

    /// Read one date's table. A missing or empty file yields no bars.
    pub fn load_date(&self, date: NaiveDate) -> Result<Vec<Bar>, NotifyError> {
        let path = self.csv_path(date);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| NotifyError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        if content.trim().is_empty() {
            tracing::debug!(%date, "empty table, treating as holiday");
            return Ok(Vec::new());
        }

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let index = ColumnIndex::from_headers(rdr.headers()?, &path)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result?;
            bars.push(index.bar(&record)?);
        }
        Ok(bars)
    }
}

impl DataPort for DailyCsvAdapter {
    fn load_bars(&self, date_from: NaiveDate, date_to: NaiveDate) -> Result<Vec<Bar>, NotifyError> {
        let mut bars = Vec::new();
        for date in dates_between(date_from, date_to) {
            if !self.csv_path(date).exists() {
                tracing::debug!(%date, "no stored table");
                continue;
            }
            bars.extend(self.load_date(date)?);
        }
        Ok(bars)
    }

    fn available_dates(&self) -> Result<Vec<NaiveDate>, NotifyError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| NotifyError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(stem) = name.strip_suffix(".csv") {
                if let Ok(date) = NaiveDate::parse_from_str(stem, DATE_FORMAT) {
                    dates.push(date);
                }
            }
        }

        dates.sort();
        Ok(dates)
    }
}

/// Every calendar date from `date_from` to `date_to`, inclusive.
pub fn dates_between(date_from: NaiveDate, date_to: NaiveDate) -> Vec<NaiveDate> {
    if date_to < date_from {
        return Vec::new();
    }
    date_from.iter_days().take_while(|d| *d <= date_to).collect()
}

/// Calendar dates in `[date_from, date_to]` with no stored table.
pub fn missing_dates(
    available: &[NaiveDate],
    date_from: NaiveDate,
    date_to: NaiveDate,
) -> Vec<NaiveDate> {
    dates_between(date_from, date_to)
        .into_iter()
        .filter(|d| available.binary_search(d).is_err())
        .collect()
}

//! Per-entity series and the augmented table that flows through the pipeline.
//!
//! A [`Frame`] is a set of [`Series`], one per entity id, each sorted ascending
//! by date. Stages never mutate a frame in place: [`Frame::with_column`] clones
//! every series, applies the stage to it and records the new column.

use crate::domain::error::NotifyError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Derived columns a stage can add to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Ema(usize),
    Rsi(usize),
    AllTimeHigh,
    FlagEmaCross,
    FlagEma200Band,
    FlagRsiAbove50,
    FlagNotification,
    FlagNotificationDeduplicated,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Ema(span) => write!(f, "ema_{}", span),
            Column::Rsi(length) => write!(f, "rsi_{}", length),
            Column::AllTimeHigh => write!(f, "all_time_high"),
            Column::FlagEmaCross => write!(f, "flag_ema_cross"),
            Column::FlagEma200Band => write!(f, "flag_ema200_band"),
            Column::FlagRsiAbove50 => write!(f, "flag_rsi_above_50"),
            Column::FlagNotification => write!(f, "flag_notification"),
            Column::FlagNotificationDeduplicated => write!(f, "flag_notification_deduplicated"),
        }
    }
}

/// A bar plus every derived value computed so far.
///
/// Flags default to `false`; whether a flag has been computed is tracked by
/// the owning frame's column set. The band and RSI flags are `None` on bars
/// where their inputs are still warming up.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedBar {
    pub bar: Bar,
    pub emas: BTreeMap<usize, f64>,
    pub rsis: BTreeMap<usize, Option<f64>>,
    pub all_time_high: Option<f64>,
    pub flag_ema_cross: bool,
    pub flag_ema200_band: Option<bool>,
    pub flag_rsi_above_50: Option<bool>,
    pub flag_notification: bool,
    pub flag_notification_deduplicated: bool,
}

impl AugmentedBar {
    pub fn new(bar: Bar) -> Self {
        Self {
            bar,
            emas: BTreeMap::new(),
            rsis: BTreeMap::new(),
            all_time_high: None,
            flag_ema_cross: false,
            flag_ema200_band: None,
            flag_rsi_above_50: None,
            flag_notification: false,
            flag_notification_deduplicated: false,
        }
    }

    pub fn ema(&self, span: usize) -> Option<f64> {
        self.emas.get(&span).copied()
    }

    /// RSI value, `None` when the column is absent or still in warmup.
    pub fn rsi(&self, length: usize) -> Option<f64> {
        self.rsis.get(&length).copied().flatten()
    }

    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }
}

/// All bars of one entity, sorted ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub id: String,
    pub rows: Vec<AugmentedBar>,
}

impl Series {
    pub fn new(id: String, mut rows: Vec<AugmentedBar>) -> Self {
        rows.sort_by_key(|r| r.bar.date);
        Self { id, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn adjusted_closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.bar.adjusted_close).collect()
    }

    pub fn get_row(&self, date: NaiveDate) -> Option<&AugmentedBar> {
        self.rows
            .binary_search_by_key(&date, |r| r.bar.date)
            .ok()
            .map(|i| &self.rows[i])
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    series: Vec<Series>,
    columns: BTreeSet<Column>,
}

impl Frame {
    /// Group bars by entity id and sort each series by date.
    ///
    /// Fails with a schema error if two bars share an (entity id, date).
    pub fn from_bars(bars: Vec<Bar>) -> Result<Self, NotifyError> {
        let mut grouped: BTreeMap<String, Vec<AugmentedBar>> = BTreeMap::new();
        for bar in bars {
            grouped
                .entry(bar.id())
                .or_default()
                .push(AugmentedBar::new(bar));
        }

        let mut series = Vec::with_capacity(grouped.len());
        for (id, rows) in grouped {
            let s = Series::new(id, rows);
            if let Some(pair) = s.rows.windows(2).find(|w| w[0].date() == w[1].date()) {
                return Err(NotifyError::schema(format!(
                    "duplicate bar for {} on {}",
                    s.id,
                    pair[0].date()
                )));
            }
            series.push(s);
        }

        Ok(Self {
            series,
            columns: BTreeSet::new(),
        })
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn get(&self, id: &str) -> Option<&Series> {
        self.series
            .binary_search_by(|s| s.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.series[i])
    }

    pub fn columns(&self) -> &BTreeSet<Column> {
        &self.columns
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn row_count(&self) -> usize {
        self.series.iter().map(Series::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn rows(&self) -> impl Iterator<Item = &AugmentedBar> {
        self.series.iter().flat_map(|s| s.rows.iter())
    }

    /// Sorted set of every date present in any series.
    pub fn unified_timeline(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self.rows().map(AugmentedBar::date).collect();
        dates.into_iter().collect()
    }

    /// Fail with a schema error naming the first missing prerequisite column.
    pub fn require(&self, stage: &str, columns: &[Column]) -> Result<(), NotifyError> {
        match columns.iter().find(|c| !self.has_column(**c)) {
            Some(missing) => Err(NotifyError::schema(format!(
                "{} requires column {}",
                stage, missing
            ))),
            None => Ok(()),
        }
    }

    /// Copy the frame, apply `stage` to every series independently and record
    /// `column` as computed.
    pub fn with_column<F>(&self, column: Column, stage: F) -> Frame
    where
        F: Fn(&mut Series) + Sync + Send,
    {
        let series = self
            .series
            .par_iter()
            .map(|s| {
                let mut s = s.clone();
                stage(&mut s);
                s
            })
            .collect();
        let mut columns = self.columns.clone();
        columns.insert(column);
        Frame { series, columns }
    }
}

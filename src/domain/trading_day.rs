//! Resolve which calendar date a run represents.
//!
//! Before the cutoff (09:00 local by default) the end-of-day bar for today
//! does not exist yet, so the run analyses the previous day.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

pub const DEFAULT_ZONE: Tz = chrono_tz::Europe::London;

pub fn default_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradingDayResolver {
    pub zone: Tz,
    pub cutoff: NaiveTime,
}

impl Default for TradingDayResolver {
    fn default() -> Self {
        Self {
            zone: DEFAULT_ZONE,
            cutoff: default_cutoff(),
        }
    }
}

impl TradingDayResolver {
    pub fn new(zone: Tz, cutoff: NaiveTime) -> Self {
        Self { zone, cutoff }
    }

    pub fn resolve(&self, now: DateTime<Utc>) -> NaiveDate {
        let local = now.with_timezone(&self.zone);
        let today = local.date_naive();
        if local.time() < self.cutoff {
            // calendar day, not 24 hours: DST days are 23 or 25 hours long
            today.checked_sub_days(Days::new(1)).unwrap_or(today)
        } else {
            today
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.resolve(Utc::now())
    }
}

/// Resolve with the default 09:00 cutoff in `zone`.
pub fn resolve_trading_day(now: DateTime<Utc>, zone: Tz) -> NaiveDate {
    TradingDayResolver::new(zone, default_cutoff()).resolve(now)
}

//! Signal and run parameters.

use crate::domain::error::NotifyError;
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How a trailing "all true" window treats the first bars of a series, where
/// fewer than `confirmation_window` bars exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortWindowPolicy {
    /// A short window is never satisfied.
    #[default]
    RequireFull,
    /// A short window is judged on the bars that exist.
    Partial,
}

impl FromStr for ShortWindowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "require_full" | "full" => Ok(ShortWindowPolicy::RequireFull),
            "partial" => Ok(ShortWindowPolicy::Partial),
            other => Err(format!("unknown short window policy '{}'", other)),
        }
    }
}

impl fmt::Display for ShortWindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortWindowPolicy::RequireFull => write!(f, "require_full"),
            ShortWindowPolicy::Partial => write!(f, "partial"),
        }
    }
}

/// Thresholds and windows used by the flag evaluator and signal combiner.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub ema_spans: Vec<usize>,
    pub cross_close_to_high_ratio: f64,
    pub cross_body_to_ema5_ratio: f64,
    pub ema200_band_tolerance: f64,
    pub confirmation_window: usize,
    pub rsi_length: usize,
    pub rsi_threshold: f64,
    pub short_window: ShortWindowPolicy,
}

pub const FAST_EMA: usize = 5;
pub const SLOW_EMA: usize = 20;
pub const LONG_EMA: usize = 200;

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            ema_spans: vec![LONG_EMA, SLOW_EMA, FAST_EMA],
            cross_close_to_high_ratio: 0.99,
            cross_body_to_ema5_ratio: 0.995,
            ema200_band_tolerance: 0.05,
            confirmation_window: 10,
            rsi_length: 14,
            rsi_threshold: 50.0,
            short_window: ShortWindowPolicy::RequireFull,
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<(), NotifyError> {
        if self.confirmation_window == 0 {
            return Err(NotifyError::invalid_parameter(
                "confirmation_window",
                "must be positive",
            ));
        }
        if self.rsi_length == 0 {
            return Err(NotifyError::invalid_parameter("rsi_length", "must be positive"));
        }
        if self.ema_spans.contains(&0) {
            return Err(NotifyError::invalid_parameter("span", "must be positive"));
        }
        for required in [FAST_EMA, SLOW_EMA, LONG_EMA] {
            if !self.ema_spans.contains(&required) {
                return Err(NotifyError::invalid_parameter(
                    "ema_spans",
                    format!("span {} is required by the flag evaluator", required),
                ));
            }
        }
        if self.ema200_band_tolerance < 0.0 {
            return Err(NotifyError::invalid_parameter(
                "ema200_band_tolerance",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Everything a notification run needs, resolved from the config file.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_path: PathBuf,
    pub date_from: NaiveDate,
    pub exchanges: Vec<String>,
    pub lookback_days: u32,
    pub volume_threshold: i64,
    pub timezone: Tz,
    pub cutoff: NaiveTime,
    pub recipients: Vec<String>,
    pub log_level: String,
    pub signal: SignalConfig,
}

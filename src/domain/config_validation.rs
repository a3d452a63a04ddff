//! Configuration validation.
//!
//! Validates every config field before a run touches any data.

use crate::domain::config::ShortWindowPolicy;
use crate::domain::error::NotifyError;
use crate::domain::universe::{parse_exchanges, parse_recipients};
use crate::ports::config_port::ConfigPort;
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), NotifyError> {
    validate_data_path(config)?;
    validate_date_from(config)?;
    validate_exchanges(config)?;
    validate_lookback(config)?;
    validate_volume_threshold(config)?;
    validate_schedule(config)?;
    validate_recipients(config)?;
    validate_signal(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> NotifyError {
    NotifyError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn missing(section: &str, key: &str) -> NotifyError {
    NotifyError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), NotifyError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(missing("data", "path")),
    }
}

fn validate_date_from(config: &dyn ConfigPort) -> Result<(), NotifyError> {
    parse_date(config.get_string("data", "date_from").as_deref(), "data", "date_from")?;
    Ok(())
}

pub fn parse_date(value: Option<&str>, section: &str, key: &str) -> Result<NaiveDate, NotifyError> {
    match value {
        None => Err(missing(section, key)),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| invalid(section, key, format!("invalid {} format, expected YYYY-MM-DD", key))),
    }
}

fn validate_exchanges(config: &dyn ConfigPort) -> Result<(), NotifyError> {
    let value = config
        .get_string("filter", "exchanges")
        .ok_or_else(|| missing("filter", "exchanges"))?;
    parse_exchanges(&value).map_err(|e| invalid("filter", "exchanges", e.to_string()))?;
    Ok(())
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), NotifyError> {
    let value = config.get_int("filter", "lookback", 0);
    if value < 0 || value > i64::from(u32::MAX) {
        return Err(invalid("filter", "lookback", "lookback must be a non-negative number of days"));
    }
    Ok(())
}

fn validate_volume_threshold(config: &dyn ConfigPort) -> Result<(), NotifyError> {
    let value = config.get_int("filter", "volume_threshold", 0);
    if value < 0 {
        return Err(invalid(
            "filter",
            "volume_threshold",
            "volume_threshold must be non-negative",
        ));
    }
    Ok(())
}

pub fn parse_timezone(value: Option<&str>) -> Result<Option<Tz>, NotifyError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Tz>()
                .map_err(|e| invalid("schedule", "timezone", e.to_string()))
        })
        .transpose()
}

pub fn parse_cutoff(value: Option<&str>) -> Result<Option<NaiveTime>, NotifyError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveTime::parse_from_str(s, "%H:%M")
                .map_err(|_| invalid("schedule", "cutoff", "invalid cutoff, expected HH:MM"))
        })
        .transpose()
}

fn validate_schedule(config: &dyn ConfigPort) -> Result<(), NotifyError> {
    parse_timezone(config.get_string("schedule", "timezone").as_deref())?;
    parse_cutoff(config.get_string("schedule", "cutoff").as_deref())?;
    Ok(())
}

fn validate_recipients(config: &dyn ConfigPort) -> Result<(), NotifyError> {
    if let Some(value) = config.get_string("notify", "recipients") {
        parse_recipients(&value).map_err(|e| invalid("notify", "recipients", e.to_string()))?;
    }
    Ok(())
}

fn validate_signal(config: &dyn ConfigPort) -> Result<(), NotifyError> {
    for key in ["confirmation_window", "rsi_length"] {
        if config.get_int("signal", key, 1) < 1 {
            return Err(invalid("signal", key, format!("{} must be at least 1", key)));
        }
    }
    for key in [
        "cross_close_to_high_ratio",
        "cross_body_to_ema5_ratio",
        "ema200_band_tolerance",
    ] {
        if config.get_double("signal", key, 0.0) < 0.0 {
            return Err(invalid("signal", key, format!("{} must be non-negative", key)));
        }
    }
    if let Some(policy) = config.get_string("signal", "short_window") {
        policy
            .parse::<ShortWindowPolicy>()
            .map_err(|e| invalid("signal", "short_window", e))?;
    }
    Ok(())
}

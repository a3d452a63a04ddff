//! CLI definition and dispatch.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{missing_dates, DailyCsvAdapter};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::log_notify_adapter::LogNotifyAdapter;
use crate::domain::config::{RunConfig, ShortWindowPolicy, SignalConfig};
use crate::domain::config_validation::{
    parse_cutoff, parse_date, parse_timezone, validate_run_config,
};
use crate::domain::eligibility::{EligibilityFilter, Notifications};
use crate::domain::error::NotifyError;
use crate::domain::pipeline::run_pipeline;
use crate::domain::trading_day::{default_cutoff, TradingDayResolver, DEFAULT_ZONE};
use crate::domain::universe::{parse_exchanges, parse_recipients};
use crate::logging::setup_logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::notify_port::NotifyPort;
use crate::ports::report_port::ReportPort;

pub const AUGMENTED_FILE: &str = "augmented.csv";
pub const NOTIFICATIONS_FILE: &str = "notifications.csv";

#[derive(Parser, Debug)]
#[command(name = "tradenotify", about = "Daily OHLCV signal pipeline and trade notifier")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the signal pipeline and notify eligible tickers
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory for the augmented table and the notification list
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the resolved trading day (YYYY-MM-DD)
        #[arg(long)]
        trading_day: Option<NaiveDate>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the trading day for the current (or given) instant
    TradingDay {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Instant to resolve, RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List stored dates and report gaps since date_from
    Dates {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            output,
            trading_day,
        } => run_notify(&config, output.as_deref(), trading_day),
        Command::Validate { config } => run_validate(&config),
        Command::TradingDay { config, at } => run_trading_day(config.as_deref(), at),
        Command::Dates { config } => run_dates(&config),
    }
}

fn fail(err: &NotifyError) -> ExitCode {
    tracing::error!(%err, "run failed");
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, NotifyError> {
    FileConfigAdapter::from_file(path)
}

/// Load, validate and resolve a config file.
pub fn load_run_config(path: &Path) -> Result<RunConfig, NotifyError> {
    let adapter = load_config(path)?;
    validate_run_config(&adapter)?;
    build_run_config(&adapter)
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> NotifyError {
    NotifyError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason: reason.into(),
    }
}

fn positive_usize(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, NotifyError> {
    let value = adapter.get_int(section, key, default as i64);
    match usize::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(invalid(section, key, format!("{} must be at least 1", key))),
    }
}

pub fn build_signal_config(adapter: &dyn ConfigPort) -> Result<SignalConfig, NotifyError> {
    let defaults = SignalConfig::default();
    let short_window = match adapter.get_string("signal", "short_window") {
        Some(s) if !s.trim().is_empty() => s
            .parse::<ShortWindowPolicy>()
            .map_err(|e| invalid("signal", "short_window", e))?,
        _ => defaults.short_window,
    };

    let config = SignalConfig {
        cross_close_to_high_ratio: adapter.get_double(
            "signal",
            "cross_close_to_high_ratio",
            defaults.cross_close_to_high_ratio,
        ),
        cross_body_to_ema5_ratio: adapter.get_double(
            "signal",
            "cross_body_to_ema5_ratio",
            defaults.cross_body_to_ema5_ratio,
        ),
        ema200_band_tolerance: adapter.get_double(
            "signal",
            "ema200_band_tolerance",
            defaults.ema200_band_tolerance,
        ),
        confirmation_window: positive_usize(
            adapter,
            "signal",
            "confirmation_window",
            defaults.confirmation_window,
        )?,
        rsi_length: positive_usize(adapter, "signal", "rsi_length", defaults.rsi_length)?,
        rsi_threshold: adapter.get_double("signal", "rsi_threshold", defaults.rsi_threshold),
        short_window,
        ema_spans: defaults.ema_spans,
    };
    config.validate()?;
    Ok(config)
}

pub fn build_run_config(adapter: &dyn ConfigPort) -> Result<RunConfig, NotifyError> {
    let data_path = adapter
        .get_string("data", "path")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| NotifyError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    let date_from = parse_date(
        adapter.get_string("data", "date_from").as_deref(),
        "data",
        "date_from",
    )?;

    let exchanges = adapter
        .get_string("filter", "exchanges")
        .ok_or_else(|| NotifyError::ConfigMissing {
            section: "filter".into(),
            key: "exchanges".into(),
        })?;
    let exchanges =
        parse_exchanges(&exchanges).map_err(|e| invalid("filter", "exchanges", e.to_string()))?;

    let lookback_days = u32::try_from(adapter.get_int("filter", "lookback", 0))
        .map_err(|_| invalid("filter", "lookback", "lookback must be a non-negative number of days"))?;
    let volume_threshold = adapter.get_int("filter", "volume_threshold", 0);
    if volume_threshold < 0 {
        return Err(invalid(
            "filter",
            "volume_threshold",
            "volume_threshold must be non-negative",
        ));
    }

    let timezone = parse_timezone(adapter.get_string("schedule", "timezone").as_deref())?
        .unwrap_or(DEFAULT_ZONE);
    let cutoff = parse_cutoff(adapter.get_string("schedule", "cutoff").as_deref())?
        .unwrap_or_else(default_cutoff);

    let recipients = match adapter.get_string("notify", "recipients") {
        Some(s) => {
            parse_recipients(&s).map_err(|e| invalid("notify", "recipients", e.to_string()))?
        }
        None => Vec::new(),
    };

    Ok(RunConfig {
        data_path: PathBuf::from(data_path.trim()),
        date_from,
        exchanges,
        lookback_days,
        volume_threshold,
        timezone,
        cutoff,
        recipients,
        log_level: adapter.get_string_or("log", "level", "info"),
        signal: build_signal_config(adapter)?,
    })
}

pub fn resolver_for(config: &RunConfig) -> TradingDayResolver {
    TradingDayResolver::new(config.timezone, config.cutoff)
}

/// Warn about stored-date gaps in `[from, to]` and return them. A listing
/// failure is logged and yields no gaps; the run itself surfaces read errors.
pub fn warn_missing_dates(data_port: &dyn DataPort, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let available = match data_port.available_dates() {
        Ok(dates) => dates,
        Err(err) => {
            tracing::warn!(%err, "could not list stored dates");
            return Vec::new();
        }
    };
    let missing = missing_dates(&available, from, to);
    if let Some(first) = missing.first() {
        tracing::warn!(
            count = missing.len(),
            first = %first,
            "dates with no stored table"
        );
    }
    missing
}

/// Load, augment, filter, report and notify for one trading day.
pub fn run_pipeline_with_ports(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    notify_port: &dyn NotifyPort,
    config: &RunConfig,
    trading_day: NaiveDate,
    output_dir: Option<&Path>,
) -> Result<Notifications, NotifyError> {
    let bars = data_port.load_bars(config.date_from, trading_day)?;
    tracing::info!(
        date_from = %config.date_from,
        %trading_day,
        bars = bars.len(),
        "bars loaded"
    );

    let frame = run_pipeline(bars, &config.signal)?;

    let filter = EligibilityFilter::new(
        config.exchanges.iter().cloned(),
        config.lookback_days,
        config.volume_threshold,
    );
    let notifications = filter.apply(&frame, trading_day)?;

    if let Some(dir) = output_dir {
        fs::create_dir_all(dir)?;
        report_port.write_frame(&frame, &dir.join(AUGMENTED_FILE))?;
        report_port.write_notifications(&notifications, &dir.join(NOTIFICATIONS_FILE))?;
    }

    tracing::info!(
        %trading_day,
        tickers = notifications.tickers.len(),
        "eligible tickers resolved"
    );
    notify_port.notify(trading_day, &notifications.tickers)?;
    Ok(notifications)
}

fn run_notify(
    config_path: &Path,
    output_dir: Option<&Path>,
    trading_day: Option<NaiveDate>,
) -> ExitCode {
    let config = match load_run_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    setup_logging(&config.log_level);

    let trading_day = trading_day.unwrap_or_else(|| resolver_for(&config).today());
    let data_port = DailyCsvAdapter::new(config.data_path.clone());

    warn_missing_dates(&data_port, config.date_from, trading_day);

    let report_port = CsvReportAdapter::new();
    let notify_port = LogNotifyAdapter::new(config.recipients.clone());

    match run_pipeline_with_ports(
        &data_port,
        &report_port,
        &notify_port,
        &config,
        trading_day,
        output_dir,
    ) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    match load_run_config(config_path) {
        Ok(config) => {
            println!(
                "Configuration is valid: {} exchange(s), data at {}",
                config.exchanges.len(),
                config.data_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_trading_day(config_path: Option<&Path>, at: Option<DateTime<Utc>>) -> ExitCode {
    let resolver = match config_path {
        Some(path) => match load_run_config(path) {
            Ok(config) => resolver_for(&config),
            Err(e) => return fail(&e),
        },
        None => TradingDayResolver::default(),
    };
    let now = at.unwrap_or_else(Utc::now);
    println!("{}", resolver.resolve(now));
    ExitCode::SUCCESS
}

fn run_dates(config_path: &Path) -> ExitCode {
    let config = match load_run_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    setup_logging(&config.log_level);

    let data_port = DailyCsvAdapter::new(config.data_path.clone());
    let available = match data_port.available_dates() {
        Ok(d) => d,
        Err(e) => return fail(&e),
    };
    let trading_day = resolver_for(&config).today();
    let missing = missing_dates(&available, config.date_from, trading_day);

    println!(
        "{} stored date(s), {} missing between {} and {}",
        available.len(),
        missing.len(),
        config.date_from,
        trading_day
    );
    for date in &missing {
        println!("missing {date}");
    }
    ExitCode::SUCCESS
}

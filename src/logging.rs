//! Structured logging via `tracing`.
//!
//! Log lines go to stderr so stdout carries only the ticker list.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Map a configured level name to a `tracing` level. Unknown names fall back
/// to `INFO`.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" | "WARNING" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global subscriber. `RUST_LOG`, when set, overrides `level`.
/// Later calls are no-ops.
pub fn setup_logging(level: &str) {
    let level = parse_level(level);
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(level).into())
            .from_env_lossy();

        let installed = tracing_subscriber::fmt()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init();

        if installed.is_ok() {
            tracing::debug!(%level, "logging initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" Warning "), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn setup_is_idempotent() {
        setup_logging("debug");
        setup_logging("info");
    }
}

// src/logging.rs

//! Logging setup for `conttest` using `tracing` + `tracing-subscriber`.
//!
//! Filter resolution:
//! 1. `--log-level` flag: one level for everything;
//! 2. `CONTTEST_LOG`: a bare level ("debug", "warning") or full `EnvFilter`
//!    directives such as `warn,conttest=debug`;
//! 3. `info`.
//!
//! Logs are sent to STDERR so the watched command owns stdout.

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "CONTTEST_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let (filter, rejected) = resolve_filter(cli_level, env_value.as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;

    if let Some(value) = rejected {
        warn!("ignoring unparsable {LOG_ENV_VAR}={value:?}; logging at info");
    }
    Ok(())
}

/// Build the filter; the second value is an env setting that did not parse.
fn resolve_filter(
    cli_level: Option<LogLevel>,
    env_value: Option<&str>,
) -> (EnvFilter, Option<String>) {
    if let Some(lvl) = cli_level {
        return (single_level(level_from_log_level(lvl)), None);
    }

    let Some(value) = env_value.map(str::trim).filter(|s| !s.is_empty()) else {
        return (single_level(tracing::Level::INFO), None);
    };

    if let Some(level) = parse_level_str(value) {
        return (single_level(level), None);
    }
    match EnvFilter::try_new(value) {
        Ok(filter) => (filter, None),
        Err(_) => (single_level(tracing::Level::INFO), Some(value.to_string())),
    }
}

fn single_level(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy("")
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}

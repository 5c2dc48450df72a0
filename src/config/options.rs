// src/config/options.rs

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::cli::CliArgs;
use crate::types::FingerprintMethod;

/// Polling cadence used when none is given.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(300);

/// Environment fallback for `--method`.
pub const METHOD_ENV_VAR: &str = "CONTTEST_METHOD";

/// Everything the watch loop needs besides the command itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    /// Directory to watch.
    pub root: PathBuf,
    pub method: FingerprintMethod,
    /// Sleep between poll cycles.
    pub interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            method: FingerprintMethod::default(),
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl WatchOptions {
    /// Resolve options from CLI flags.
    ///
    /// Method priority: `--method`, then `CONTTEST_METHOD`, then `hash`.
    pub fn from_args(args: &CliArgs) -> Self {
        let method = args.method.unwrap_or_else(|| {
            std::env::var(METHOD_ENV_VAR)
                .ok()
                .and_then(|s| match s.parse::<FingerprintMethod>() {
                    Ok(m) => Some(m),
                    Err(e) => {
                        warn!("ignoring {METHOD_ENV_VAR}: {e}");
                        None
                    }
                })
                .unwrap_or_default()
        });

        Self {
            root: args.dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            method,
            interval: Duration::from_millis(args.interval_ms),
        }
    }
}

// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::FingerprintMethod;

/// Command-line arguments for `conttest`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "conttest",
    version,
    about = "Continuous testing helper: re-run a command whenever files change.",
    long_about = None
)]
pub struct CliArgs {
    /// How file state is compared between polls.
    ///
    /// If omitted, `CONTTEST_METHOD` or `hash` is used.
    #[arg(long, value_enum, value_name = "METHOD")]
    pub method: Option<FingerprintMethod>,

    /// Directory to watch (default: current directory).
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Milliseconds to sleep between polls.
    #[arg(long, value_name = "MS", default_value_t = 300)]
    pub interval_ms: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CONTTEST_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to run on every change, e.g. `conttest make test`.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "CMD"
    )]
    pub command: Vec<String>,
}

impl CliArgs {
    /// The command words joined into one shell command line.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::{validate_options, WatchOptions};
use crate::engine::{ChangeDetector, WatchLoop};
use crate::errors::Result;
use crate::exec::ShellCommand;
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - option resolution and validation
/// - the change detector on the real filesystem
/// - the shell command action
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let opts = WatchOptions::from_args(&args);
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    validate_options(fs.as_ref(), &opts)?;

    let action = ShellCommand::new(args.command_line());
    info!(cmd = %action.command_line(), "conttest started");

    let detector = ChangeDetector::new(fs, opts.root.clone(), opts.method);
    WatchLoop::new(detector, action, opts.interval)
        .run(ctrl_c())
        .await?;

    info!("conttest stopped");
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

// src/exec/backend.rs

//! Pluggable action abstraction.
//!
//! The watch loop talks to an `Action` instead of spawning processes itself.
//! Production uses [`ShellCommand`](super::ShellCommand); tests provide
//! actions that record calls or edit files.

use std::future::Future;
use std::pin::Pin;

/// What to do when a change is detected.
///
/// The loop awaits the returned future before rescanning, so the action
/// runs to completion before anything else happens. Its outcome is not
/// inspected: failures are the action's own business to report.
pub trait Action: Send {
    fn run(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

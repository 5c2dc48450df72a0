// src/exec/mod.rs

//! Command execution layer.
//!
//! - [`backend`] provides the `Action` trait the watch loop calls on change.
//! - [`command`] provides `ShellCommand`, the production action that runs the
//!   user's command line through the platform shell via
//!   `tokio::process::Command`.

pub mod backend;
pub mod command;

pub use backend::Action;
pub use command::ShellCommand;

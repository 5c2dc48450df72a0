// src/engine/mod.rs

//! The watch loop.
//!
//! - [`core`]: `ChangeDetector`, the synchronous poll / compare / absorb
//!   state machine. Unit tested without Tokio or real files.
//! - [`runtime`]: `WatchLoop`, the async shell that runs the action, sleeps
//!   between polls and stops on shutdown.

pub mod core;
pub mod runtime;

pub use self::core::{ChangeDetector, PendingAbsorb, Poll};
pub use self::runtime::WatchLoop;

// src/config/mod.rs

//! Run configuration for conttest.
//!
//! Responsibilities:
//! - Resolve CLI flags and env fallbacks into `WatchOptions` (`options.rs`).
//! - Load the live-editable `.conttest-excludes` list (`loader.rs`).
//! - Validate options before the loop starts (`validate.rs`).

pub mod loader;
pub mod options;
pub mod validate;

pub use loader::{excludes_path, load_excludes, parse_exclude_tokens, EXCLUDES_FILE_NAME};
pub use options::{WatchOptions, DEFAULT_INTERVAL};
pub use validate::validate_options;

// src/watch/mod.rs

//! Polling change detection.
//!
//! This module is responsible for:
//! - Deciding which files are watched (`filter`, `patterns`).
//! - Fingerprinting a single file by content hash or mtime (`fingerprint`).
//! - Walking the tree into a path -> fingerprint `Snapshot` (`snapshot`).
//!
//! It does **not** loop or run commands; see `engine` for that.

pub mod filter;
pub mod fingerprint;
pub mod patterns;
pub mod snapshot;

pub use filter::{is_included, IGNORE_DIRS, IGNORE_EXTENSIONS, IGNORE_PREFIXES};
pub use fingerprint::{compute_file_hash, fingerprint, Fingerprint};
pub use patterns::ExcludeSet;
pub use snapshot::{take_snapshot, Snapshot, SnapshotDiff};

// src/config/validate.rs

use crate::config::options::WatchOptions;
use crate::errors::{ConttestError, Result};
use crate::fs::FileSystem;

/// Check options before the first cycle.
///
/// The watch root must be an existing directory; a root that disappears
/// later only yields empty snapshots.
pub fn validate_options(fs: &dyn FileSystem, opts: &WatchOptions) -> Result<()> {
    if !fs.is_dir(&opts.root) {
        return Err(ConttestError::MissingRoot(opts.root.clone()));
    }
    Ok(())
}

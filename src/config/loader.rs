// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Result;
use crate::fs::{is_not_found, FileSystem};
use crate::watch::ExcludeSet;

/// Name of the per-directory exclude list, looked up at the watch root.
pub const EXCLUDES_FILE_NAME: &str = ".conttest-excludes";

pub fn excludes_path(root: &Path) -> PathBuf {
    root.join(EXCLUDES_FILE_NAME)
}

/// Split the exclude file into pattern tokens.
///
/// Tokens are whitespace separated; blank lines and runs of spaces yield
/// nothing.
pub fn parse_exclude_tokens(contents: &str) -> Vec<String> {
    contents
        .split_whitespace()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load and compile `<root>/.conttest-excludes`.
///
/// Called once per poll cycle, so edits apply on the next cycle.
///
/// - Missing file: empty set, not an error. This includes the file
///   disappearing mid-read, as editors that save by delete-and-rename do.
/// - Unreadable file: IO error.
/// - Invalid regex token: [`ConttestError::InvalidExcludePattern`](crate::errors::ConttestError).
pub fn load_excludes(fs: &dyn FileSystem, root: &Path) -> Result<ExcludeSet> {
    let path = excludes_path(root);

    let contents = match fs.read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if is_not_found(&err) => return Ok(ExcludeSet::empty()),
        Err(err) => {
            return Err(err
                .context(format!("reading exclude list at {:?}", path))
                .into());
        }
    };
    let tokens = parse_exclude_tokens(&contents);
    debug!(?tokens, "loaded exclude patterns");

    ExcludeSet::new(tokens)
}

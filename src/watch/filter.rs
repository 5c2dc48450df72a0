// src/watch/filter.rs

//! Static ignore rules plus the user's exclude patterns.
//!
//! A file takes part in change detection unless:
//! 1. its base name starts with one of [`IGNORE_PREFIXES`] (dotfiles, editor
//!    lock / auto-save files such as `#main.c#`),
//! 2. its path text ends with one of [`IGNORE_EXTENSIONS`],
//! 3. any path component is one of [`IGNORE_DIRS`], or
//! 4. its relative path or base name matches an exclude pattern.

use std::path::{Component, Path};

use crate::watch::patterns::ExcludeSet;

pub const IGNORE_PREFIXES: &[&str] = &[".", "#"];

/// Matched as a raw suffix of the path text, without a leading dot.
pub const IGNORE_EXTENSIONS: &[&str] = &["pyc", "pyo"];

pub const IGNORE_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Decide whether `rel_path` (relative to the watched root) is watched.
///
/// Pure: depends only on the arguments.
pub fn is_included(rel_path: &Path, excludes: &ExcludeSet) -> bool {
    let base_name = match rel_path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };

    if has_ignored_prefix(&base_name) {
        return false;
    }

    let path_text = to_slash(rel_path);
    if IGNORE_EXTENSIONS.iter().any(|ext| path_text.ends_with(ext)) {
        return false;
    }

    if rel_path.components().any(|c| match c {
        Component::Normal(part) => is_ignored_dir(&part.to_string_lossy()),
        _ => false,
    }) {
        return false;
    }

    !(excludes.is_match(&base_name) || excludes.is_match(&path_text))
}

pub fn has_ignored_prefix(name: &str) -> bool {
    IGNORE_PREFIXES.iter().any(|p| name.starts_with(p))
}

pub fn is_ignored_dir(name: &str) -> bool {
    IGNORE_DIRS.contains(&name)
}

/// Path text with `/` separators on every platform.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

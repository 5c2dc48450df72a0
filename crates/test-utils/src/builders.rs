#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

/// A throwaway directory tree on the real filesystem.
///
/// The directory is deleted when the builder is dropped.
pub struct TreeBuilder {
    dir: TempDir,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("creating temp dir"),
        }
    }

    /// Add a file (parents are created) and return the builder.
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        self.write(rel, content);
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("creating parent dirs");
        }
        fs::write(&path, content).expect("writing file");
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.path(rel)).expect("removing file");
    }

    /// Set the file's mtime `secs` seconds into the future of its current one,
    /// leaving content untouched.
    pub fn bump_mtime(&self, rel: &str, secs: u64) {
        let path = self.path(rel);
        let current = fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or_else(|_| SystemTime::now());
        set_mtime(&path, current + Duration::from_secs(secs));
    }

    /// Rewrite content and restore the previous mtime afterwards.
    pub fn write_preserving_mtime(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        let before = fs::metadata(&path)
            .and_then(|m| m.modified())
            .expect("reading mtime");
        fs::write(&path, content).expect("writing file");
        set_mtime(&path, before);
    }
}

#[cfg(unix)]
impl TreeBuilder {
    /// Create a named pipe with no writer attached.
    pub fn make_fifo(&self, rel: &str) {
        let path = self.path(rel);
        let status = std::process::Command::new("mkfifo")
            .arg(&path)
            .status()
            .expect("running mkfifo");
        assert!(status.success(), "mkfifo {path:?} failed: {status}");
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn set_mtime(path: &Path, time: SystemTime) {
    let file = fs::OpenOptions::new()
        .write(true)
        .open(path)
        .expect("opening file for mtime update");
    file.set_modified(time).expect("setting mtime");
}

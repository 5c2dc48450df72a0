// src/watch/fingerprint.rs

use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use anyhow::Result;
use blake3::Hasher;
use tracing::debug;

use crate::fs::FileSystem;
use crate::types::FingerprintMethod;

/// Comparable summary of one file's state.
///
/// `Absent` stands for "could not be read / stat'ed". Two absent files
/// compare equal, but absent never equals a real fingerprint, so a file
/// going from readable to unreadable (or back) is a change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// Hex-encoded BLAKE3 digest of the file content.
    Digest(String),
    /// Last-modified time at the platform's native resolution.
    Modified(SystemTime),
    Absent,
}

impl Fingerprint {
    pub fn is_absent(&self) -> bool {
        matches!(self, Fingerprint::Absent)
    }
}

/// Compute the fingerprint of `path` using `method`.
///
/// Never fails: any IO error maps to [`Fingerprint::Absent`]. Anything that
/// is not a regular file (FIFO, socket, device, broken link) is `Absent`
/// without being opened; opening a FIFO blocks until a writer appears.
pub fn fingerprint(fs: &dyn FileSystem, path: &Path, method: FingerprintMethod) -> Fingerprint {
    if !fs.is_file(path) {
        debug!(?path, "not a regular file; using absent fingerprint");
        return Fingerprint::Absent;
    }

    let result = match method {
        FingerprintMethod::Hash => compute_file_hash(fs, path).map(Fingerprint::Digest),
        FingerprintMethod::Mtime => fs.modified(path).map(Fingerprint::Modified),
    };

    match result {
        Ok(fp) => fp,
        Err(err) => {
            debug!(?path, %method, error = %err, "unreadable file; using absent fingerprint");
            Fingerprint::Absent
        }
    }
}

/// Compute the hash of a single file.
///
/// The reader is dropped (and the handle closed) on every return path.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    let mut file = fs.open_read(path)?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

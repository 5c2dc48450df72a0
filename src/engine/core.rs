// src/engine/core.rs

//! Synchronous change-detection state machine.
//!
//! [`ChangeDetector`] owns the retained snapshot and decides, per cycle,
//! whether the tree changed. It does no sleeping and runs no commands; the
//! async shell (`engine::runtime::WatchLoop`) does that and calls back into
//! [`ChangeDetector::absorb`] after the action finished.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::config::loader::load_excludes;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::FingerprintMethod;
use crate::watch::{take_snapshot, ExcludeSet, Snapshot, SnapshotDiff};

/// Result of one poll.
#[derive(Debug)]
pub enum Poll {
    /// Tree matches the retained snapshot; the fresh snapshot was retained.
    Unchanged,
    /// Tree differs. Run the action, then pass this to
    /// [`ChangeDetector::absorb`].
    Changed(PendingAbsorb),
}

/// A detected change waiting for the post-action rescan.
///
/// Carries the excludes loaded for the cycle so the rescan uses the same
/// ones.
#[derive(Debug)]
pub struct PendingAbsorb {
    excludes: ExcludeSet,
    diff: SnapshotDiff,
}

impl PendingAbsorb {
    pub fn diff(&self) -> &SnapshotDiff {
        &self.diff
    }
}

/// Retains one snapshot between cycles and compares fresh scans against it.
///
/// Starts from an empty baseline. The first poll always reports a change,
/// even for a tree with no watched files, so the action runs once on start.
#[derive(Debug)]
pub struct ChangeDetector {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    method: FingerprintMethod,
    current: Snapshot,
    primed: bool,
}

impl ChangeDetector {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>, method: FingerprintMethod) -> Self {
        Self {
            fs,
            root: root.into(),
            method,
            current: Snapshot::empty(),
            primed: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn method(&self) -> FingerprintMethod {
        self.method
    }

    /// The snapshot the next poll will be compared against.
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Reload excludes and take a fresh snapshot with them.
    pub fn scan(&self) -> Result<(ExcludeSet, Snapshot)> {
        let excludes = load_excludes(self.fs.as_ref(), &self.root)?;
        let snapshot = take_snapshot(self.fs.as_ref(), &self.root, self.method, &excludes);
        Ok((excludes, snapshot))
    }

    /// One detection cycle: reload excludes, scan, compare.
    ///
    /// Fails only if the exclude list cannot be loaded or compiled.
    pub fn poll(&mut self) -> Result<Poll> {
        trace!(root = ?self.root, "polling");
        let (excludes, fresh) = self.scan()?;

        if self.primed && fresh == self.current {
            self.current = fresh;
            return Ok(Poll::Unchanged);
        }

        let diff = self.current.diff(&fresh);
        if self.primed {
            info!(
                added = diff.added.len(),
                removed = diff.removed.len(),
                modified = diff.modified.len(),
                "change detected"
            );
            debug!(?diff, "changed paths");
        } else {
            info!(files = fresh.len(), "initial scan");
        }
        self.primed = true;

        Ok(Poll::Changed(PendingAbsorb { excludes, diff }))
    }

    /// Rescan after the action ran and retain that snapshot.
    ///
    /// Whatever the action wrote becomes the new baseline and will not
    /// trigger the next cycle.
    pub fn absorb(&mut self, pending: PendingAbsorb) {
        let settled = take_snapshot(self.fs.as_ref(), &self.root, self.method, &pending.excludes);
        debug!(files = settled.len(), "absorbed post-action state");
        self.current = settled;
    }
}

// src/watch/snapshot.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::fs::FileSystem;
use crate::types::FingerprintMethod;
use crate::watch::filter::{is_ignored_dir, is_included};
use crate::watch::fingerprint::{fingerprint, Fingerprint};
use crate::watch::patterns::ExcludeSet;

/// Observable state of the watched tree at one point in time.
///
/// Maps each watched file (keyed by `root.join(relative_path)`) to its
/// fingerprint. Equality compares the full mapping; traversal order never
/// matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: HashMap<PathBuf, Fingerprint>,
}

/// Difference between two snapshots, paths sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub modified: Vec<PathBuf>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&Fingerprint> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Fingerprint)> {
        self.entries.iter()
    }

    /// What changed going from `self` to `newer`.
    pub fn diff(&self, newer: &Snapshot) -> SnapshotDiff {
        let mut diff = SnapshotDiff::default();

        for (path, fp) in &newer.entries {
            match self.entries.get(path) {
                None => diff.added.push(path.clone()),
                Some(old) if old != fp => diff.modified.push(path.clone()),
                Some(_) => {}
            }
        }
        for path in self.entries.keys() {
            if !newer.entries.contains_key(path) {
                diff.removed.push(path.clone());
            }
        }

        diff.added.sort();
        diff.removed.sort();
        diff.modified.sort();
        diff
    }
}

impl FromIterator<(PathBuf, Fingerprint)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (PathBuf, Fingerprint)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Walk `root` and fingerprint every watched file.
///
/// Always builds a fresh mapping. Unreadable directories are skipped;
/// unreadable files and non-regular entries map to [`Fingerprint::Absent`].
/// Nothing here fails.
/// Symlinked directories are not followed.
pub fn take_snapshot(
    fs: &dyn FileSystem,
    root: &Path,
    method: FingerprintMethod,
    excludes: &ExcludeSet,
) -> Snapshot {
    let mut entries = HashMap::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let children = match fs.read_dir(&dir) {
            Ok(children) => children,
            Err(err) if dir == root => {
                warn!(?root, error = %err, "cannot list watch root");
                continue;
            }
            Err(err) => {
                debug!(?dir, error = %err, "skipping unreadable directory");
                continue;
            }
        };

        for path in children {
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };

            if fs.is_dir(&path) {
                if !fs.is_symlink(&path) && !prune_dir(rel, excludes) {
                    stack.push(path);
                }
                continue;
            }

            // Cheap name check before the full inclusion rules.
            let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
                continue;
            };
            if excludes.is_match(&name) || !is_included(rel, excludes) {
                trace!(?rel, "not watched");
                continue;
            }

            let fp = fingerprint(fs, &path, method);
            entries.insert(path, fp);
        }
    }

    Snapshot { entries }
}

/// Directories never worth descending into: VCS metadata anywhere, and
/// top-level directories named verbatim in the exclude file.
fn prune_dir(rel: &Path, excludes: &ExcludeSet) -> bool {
    let Some(name) = rel.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    if is_ignored_dir(&name) {
        return true;
    }
    rel.components().count() == 1 && excludes.names_dir(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn snap(fs: &MockFileSystem, excludes: &ExcludeSet) -> Snapshot {
        take_snapshot(fs, Path::new("/proj"), FingerprintMethod::Hash, excludes)
    }

    #[test]
    fn collects_nested_files() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.txt", "a");
        fs.add_file("/proj/src/lib.rs", "lib");
        fs.add_file("/proj/src/deep/mod.rs", "mod");

        let s = snap(&fs, &ExcludeSet::empty());

        assert_eq!(s.len(), 3);
        assert!(s.contains(Path::new("/proj/src/deep/mod.rs")));
    }

    #[test]
    fn applies_static_ignore_rules() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/keep.py", "x");
        fs.add_file("/proj/keep.pyc", "x");
        fs.add_file("/proj/.hidden", "x");
        fs.add_file("/proj/#autosave#", "x");
        fs.add_file("/proj/.git/HEAD", "ref");

        let s = snap(&fs, &ExcludeSet::empty());

        let keys: Vec<_> = s.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(keys, vec![PathBuf::from("/proj/keep.py")]);
    }

    #[test]
    fn top_level_dir_named_in_excludes_is_pruned() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/build/out.bin", "x");
        fs.add_file("/proj/src/build/gen.rs", "x");
        fs.add_file("/proj/src/main.rs", "x");

        let excludes = ExcludeSet::new(["build"]).unwrap();
        let s = snap(&fs, &excludes);

        assert!(!s.contains(Path::new("/proj/build/out.bin")));
        // regex search on the relative path still excludes nested matches
        assert!(!s.contains(Path::new("/proj/src/build/gen.rs")));
        assert!(s.contains(Path::new("/proj/src/main.rs")));
    }

    #[test]
    fn symlinked_directories_are_not_followed() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/real/a.txt", "a");
        fs.add_symlink("/proj/alias", "/proj/real");

        let s = snap(&fs, &ExcludeSet::empty());

        assert_eq!(s.len(), 1);
        assert!(s.contains(Path::new("/proj/real/a.txt")));
    }

    #[test]
    fn unreadable_files_are_recorded_as_absent() {
        let fs = MockFileSystem::new();
        fs.add_unreadable("/proj/locked.txt");
        fs.add_symlink("/proj/dangling", "/proj/nowhere");

        let s = snap(&fs, &ExcludeSet::empty());

        assert_eq!(s.get(Path::new("/proj/locked.txt")), Some(&Fingerprint::Absent));
        assert_eq!(s.get(Path::new("/proj/dangling")), Some(&Fingerprint::Absent));
    }

    #[test]
    fn special_files_do_not_stall_the_walk() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.txt", "a");
        fs.add_special("/proj/run/daemon.sock");

        let s = snap(&fs, &ExcludeSet::empty());

        assert_eq!(s.len(), 2);
        assert_eq!(s.get(Path::new("/proj/run/daemon.sock")), Some(&Fingerprint::Absent));
    }

    #[test]
    fn missing_root_gives_empty_snapshot() {
        let fs = MockFileSystem::new();
        let s = take_snapshot(
            &fs,
            Path::new("/nope"),
            FingerprintMethod::Mtime,
            &ExcludeSet::empty(),
        );
        assert!(s.is_empty());
    }

    #[test]
    fn diff_reports_added_removed_modified() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.txt", "a");
        fs.add_file("/proj/b.txt", "b");
        let before = snap(&fs, &ExcludeSet::empty());

        fs.add_file("/proj/a.txt", "A");
        fs.remove("/proj/b.txt");
        fs.add_file("/proj/c.txt", "c");
        let after = snap(&fs, &ExcludeSet::empty());

        let diff = before.diff(&after);
        assert_eq!(diff.added, vec![PathBuf::from("/proj/c.txt")]);
        assert_eq!(diff.removed, vec![PathBuf::from("/proj/b.txt")]);
        assert_eq!(diff.modified, vec![PathBuf::from("/proj/a.txt")]);
        assert!(before.diff(&before).is_empty());
    }
}

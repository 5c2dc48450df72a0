// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { content: Vec<u8>, modified: SystemTime },
    /// A file that shows up in listings but cannot be read or stat'ed.
    Unreadable,
    /// A FIFO, socket or device node. Opening one panics, since on a real
    /// filesystem it may block forever.
    Special,
    Symlink { target: PathBuf },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    /// Seconds since the epoch handed out as the next mtime.
    clock: u64,
}

/// In-memory filesystem.
///
/// Directory listings come back in insertion order, and every write or
/// [`touch`](MockFileSystem::touch) advances a logical clock by one second,
/// so mtime behaviour is deterministic.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        // Ensure root exists
        entries.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(MockState {
                entries,
                clock: 1_000_000,
            })),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        let modified = tick(&mut state);
        insert_entry(
            &mut state.entries,
            path.as_ref(),
            MockEntry::File {
                content: content.into(),
                modified,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        if !state.entries.contains_key(path.as_ref()) {
            insert_entry(&mut state.entries, path.as_ref(), MockEntry::Dir(Vec::new()));
        }
    }

    pub fn add_unreadable(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        insert_entry(&mut state.entries, path.as_ref(), MockEntry::Unreadable);
    }

    pub fn add_special(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        insert_entry(&mut state.entries, path.as_ref(), MockEntry::Special);
    }

    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl Into<PathBuf>) {
        let mut state = self.state.lock().unwrap();
        insert_entry(
            &mut state.entries,
            path.as_ref(),
            MockEntry::Symlink {
                target: target.into(),
            },
        );
    }

    /// Bump the mtime of an existing file without touching its content.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        let now = tick(&mut state);
        if let Some(MockEntry::File { modified, .. }) = state.entries.get_mut(path.as_ref()) {
            *modified = now;
        }
    }

    /// Overwrite a file's content while keeping its current mtime.
    pub fn set_content_preserving_mtime(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        if let Some(MockEntry::File { content: old, .. }) = state.entries.get_mut(path.as_ref()) {
            *old = content.into();
        }
    }

    /// Remove a file or an (empty or not) directory entry.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        state.entries.remove(path);
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            let parent = normalize_parent(parent);
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(parent) {
                children.retain(|c| c.as_str() != name.to_string_lossy());
            }
        }
    }

    /// Resolve symlinks (one level is enough for tests).
    fn resolve<'a>(entries: &'a HashMap<PathBuf, MockEntry>, path: &Path) -> Option<&'a MockEntry> {
        match entries.get(path) {
            Some(MockEntry::Symlink { target }) => entries.get(target.as_path()),
            other => other,
        }
    }
}

fn tick(state: &mut MockState) -> SystemTime {
    state.clock += 1;
    UNIX_EPOCH + Duration::from_secs(state.clock)
}

fn io_error(kind: io::ErrorKind, path: &Path) -> anyhow::Error {
    io::Error::new(kind, format!("{:?}", path)).into()
}

fn normalize_parent(parent: &Path) -> &Path {
    if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    }
}

fn insert_entry(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path, entry: MockEntry) {
    entries.insert(path.to_path_buf(), entry);
    link_into_parent(entries, path);
}

fn link_into_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = path.parent() else {
        return;
    };
    let parent = normalize_parent(parent);
    if parent == path {
        return;
    }

    if !entries.contains_key(parent) {
        entries.insert(parent.to_path_buf(), MockEntry::Dir(Vec::new()));
        link_into_parent(entries, parent);
    }

    if let Some(MockEntry::Dir(children)) = entries.get_mut(parent) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let mut buf = String::new();
        self.open_read(path)?.read_to_string(&mut buf)?;
        Ok(buf)
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let state = self.state.lock().unwrap();
        match Self::resolve(&state.entries, path) {
            Some(MockEntry::File { content, .. }) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            Some(MockEntry::Unreadable) => Err(io_error(io::ErrorKind::PermissionDenied, path)),
            Some(MockEntry::Special) => panic!("opening non-regular file {:?} would block", path),
            Some(MockEntry::Symlink { .. }) | None => Err(io_error(io::ErrorKind::NotFound, path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        Self::resolve(&state.entries, path).is_some()
    }

    fn is_file(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        matches!(
            Self::resolve(&state.entries, path),
            Some(MockEntry::File { .. } | MockEntry::Unreadable)
        )
    }

    fn is_dir(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        matches!(Self::resolve(&state.entries, path), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        matches!(state.entries.get(path), Some(MockEntry::Symlink { .. }))
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let state = self.state.lock().unwrap();
        match Self::resolve(&state.entries, path) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Ok(UNIX_EPOCH),
            _ => Err(anyhow!("cannot stat {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        match Self::resolve(&state.entries, path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_follows_insertion_order() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/b.txt", "b");
        fs.add_file("/p/a.txt", "a");

        let listed = fs.read_dir(Path::new("/p")).unwrap();
        assert_eq!(listed, vec![PathBuf::from("/p/b.txt"), PathBuf::from("/p/a.txt")]);
    }

    #[test]
    fn touch_changes_mtime_only() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/a.txt", "a");
        let before = fs.modified(Path::new("/p/a.txt")).unwrap();

        fs.touch("/p/a.txt");

        assert!(fs.modified(Path::new("/p/a.txt")).unwrap() > before);
        assert_eq!(fs.read_to_string(Path::new("/p/a.txt")).unwrap(), "a");
    }

    #[test]
    fn broken_symlink_cannot_be_read() {
        let fs = MockFileSystem::new();
        fs.add_symlink("/p/link", "/p/missing");

        assert!(fs.is_symlink(Path::new("/p/link")));
        assert!(fs.open_read(Path::new("/p/link")).is_err());
        assert!(fs.modified(Path::new("/p/link")).is_err());
        let err = fs.open_read(Path::new("/p/link")).err().unwrap();
        assert!(crate::fs::is_not_found(&err));
    }

    #[test]
    fn special_entries_are_not_regular_files() {
        let fs = MockFileSystem::new();
        fs.add_special("/p/pipe");
        fs.add_file("/p/a.txt", "a");
        fs.add_symlink("/p/to-pipe", "/p/pipe");

        assert!(fs.is_file(Path::new("/p/a.txt")));
        assert!(!fs.is_file(Path::new("/p/pipe")));
        assert!(!fs.is_file(Path::new("/p/to-pipe")));
        assert!(!fs.is_dir(Path::new("/p/pipe")));
    }
}

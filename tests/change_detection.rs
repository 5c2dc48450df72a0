use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use conttest::config::load_excludes;
use conttest::engine::{ChangeDetector, Poll};
use conttest::fs::{FileSystem, MockFileSystem, RealFileSystem};
use conttest::types::FingerprintMethod;
use conttest::watch::{take_snapshot, ExcludeSet, Fingerprint, Snapshot};
use conttest_test_utils::builders::TreeBuilder;
use conttest_test_utils::TEST_TIMEOUT;

type TestResult<T = ()> = Result<T, Box<dyn Error>>;

fn snapshot(tree: &TreeBuilder, method: FingerprintMethod) -> TestResult<Snapshot> {
    let fs = RealFileSystem;
    let excludes = load_excludes(&fs, tree.root())?;
    Ok(take_snapshot(&fs, tree.root(), method, &excludes))
}

fn detector(tree: &TreeBuilder, method: FingerprintMethod) -> ChangeDetector {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    ChangeDetector::new(fs, tree.root(), method)
}

/// Poll and, on change, absorb immediately (an action that does nothing).
fn cycle(d: &mut ChangeDetector) -> TestResult<bool> {
    match d.poll()? {
        Poll::Changed(pending) => {
            d.absorb(pending);
            Ok(true)
        }
        Poll::Unchanged => Ok(false),
    }
}

#[test]
fn hello_world_scenario() -> TestResult {
    let tree = TreeBuilder::new().with_file("a.txt", "hello");
    let mut d = detector(&tree, FingerprintMethod::Hash);

    assert!(cycle(&mut d)?, "cycle 1 differs from the empty baseline");
    let expected = Fingerprint::Digest(blake3::hash(b"hello").to_hex().to_string());
    assert_eq!(d.current().get(&tree.path("a.txt")), Some(&expected));

    assert!(!cycle(&mut d)?, "cycle 2 sees no change");

    tree.write("a.txt", "world");
    assert!(cycle(&mut d)?, "cycle 3 sees the edit");
    let expected = Fingerprint::Digest(blake3::hash(b"world").to_hex().to_string());
    assert_eq!(d.current().get(&tree.path("a.txt")), Some(&expected));

    Ok(())
}

#[test]
fn consecutive_snapshots_of_a_quiet_tree_are_equal() -> TestResult {
    let tree = TreeBuilder::new()
        .with_file("a.txt", "a")
        .with_file("src/lib.rs", "lib")
        .with_file("src/nested/deep.rs", "deep");

    for method in [FingerprintMethod::Hash, FingerprintMethod::Mtime] {
        assert_eq!(snapshot(&tree, method)?, snapshot(&tree, method)?);
    }
    Ok(())
}

#[test]
fn hash_sees_content_change_even_with_same_mtime() -> TestResult {
    let tree = TreeBuilder::new().with_file("a.txt", "hello");
    let before = snapshot(&tree, FingerprintMethod::Hash)?;

    tree.write_preserving_mtime("a.txt", "HELLO");

    assert_ne!(before, snapshot(&tree, FingerprintMethod::Hash)?);
    Ok(())
}

#[test]
fn touch_only_changes_mtime_fingerprints_but_not_hashes() -> TestResult {
    let tree = TreeBuilder::new().with_file("a.txt", "hello");
    let hash_before = snapshot(&tree, FingerprintMethod::Hash)?;
    let mtime_before = snapshot(&tree, FingerprintMethod::Mtime)?;

    tree.bump_mtime("a.txt", 10);

    assert_eq!(hash_before, snapshot(&tree, FingerprintMethod::Hash)?);
    assert_ne!(mtime_before, snapshot(&tree, FingerprintMethod::Mtime)?);
    Ok(())
}

#[test]
fn removal_and_creation_are_changes() -> TestResult {
    let tree = TreeBuilder::new()
        .with_file("a.txt", "a")
        .with_file("b.txt", "b");
    let mut d = detector(&tree, FingerprintMethod::Hash);
    cycle(&mut d)?;

    tree.remove("b.txt");
    assert!(cycle(&mut d)?);

    tree.write("c.txt", "c");
    assert!(cycle(&mut d)?);
    assert!(!cycle(&mut d)?);
    Ok(())
}

#[test]
fn log_files_excluded_by_pattern_never_appear() -> TestResult {
    let tree = TreeBuilder::new()
        .with_file(".conttest-excludes", "\\.log$")
        .with_file("main.py", "print()");
    let mut d = detector(&tree, FingerprintMethod::Hash);
    cycle(&mut d)?;

    for i in 0..3 {
        tree.write("out.log", &format!("entry {i}"));
        assert!(!cycle(&mut d)?);
        assert!(!d.current().contains(&tree.path("out.log")));
    }
    Ok(())
}

#[test]
fn static_ignores_suppress_detection() -> TestResult {
    let tree = TreeBuilder::new().with_file("mod.py", "x = 1");
    let mut d = detector(&tree, FingerprintMethod::Hash);
    cycle(&mut d)?;

    tree.write("mod.pyc", "bytecode");
    tree.write(".mod.py.swp", "swap");
    tree.write("#mod.py#", "autosave");
    tree.write(".git/index", "idx");
    tree.write("sub/.hg/store", "data");

    assert!(!cycle(&mut d)?);
    assert_eq!(d.current().len(), 1);
    Ok(())
}

#[test]
fn exclude_edits_apply_on_the_next_cycle() -> TestResult {
    let tree = TreeBuilder::new()
        .with_file("main.rs", "fn main() {}")
        .with_file("notes.md", "todo");
    let mut d = detector(&tree, FingerprintMethod::Hash);
    cycle(&mut d)?;
    assert!(d.current().contains(&tree.path("notes.md")));

    // notes.md disappearing from the snapshot is itself a change
    tree.write(".conttest-excludes", "\\.md$");
    assert!(cycle(&mut d)?);
    assert!(!d.current().contains(&tree.path("notes.md")));

    tree.write("notes.md", "done");
    assert!(!cycle(&mut d)?);
    Ok(())
}

#[test]
fn top_level_directory_token_prunes_subtree() -> TestResult {
    let tree = TreeBuilder::new()
        .with_file(".conttest-excludes", "target")
        .with_file("target/debug/app", "bin")
        .with_file("src/main.rs", "fn main() {}");

    let snap = snapshot(&tree, FingerprintMethod::Hash)?;

    assert_eq!(snap.len(), 1);
    assert!(snap.contains(&tree.path("src/main.rs")));
    Ok(())
}

#[test]
fn traversal_order_does_not_affect_equality() {
    let forward = MockFileSystem::new();
    forward.add_file("/proj/a.txt", "a");
    forward.add_file("/proj/src/b.rs", "b");
    forward.add_file("/proj/src/c.rs", "c");

    let backward = MockFileSystem::new();
    backward.add_file("/proj/src/c.rs", "c");
    backward.add_file("/proj/src/b.rs", "b");
    backward.add_file("/proj/a.txt", "a");

    let root = Path::new("/proj");
    let excludes = ExcludeSet::empty();
    assert_eq!(
        take_snapshot(&forward, root, FingerprintMethod::Hash, &excludes),
        take_snapshot(&backward, root, FingerprintMethod::Hash, &excludes),
    );
}

#[test]
fn unreadable_files_do_not_flap() {
    let fs = MockFileSystem::new();
    fs.add_file("/proj/a.txt", "a");
    fs.add_unreadable("/proj/locked");
    let mut d = ChangeDetector::new(Arc::new(fs.clone()), "/proj", FingerprintMethod::Hash);

    assert!(cycle(&mut d).unwrap());
    assert!(!cycle(&mut d).unwrap(), "absent stays equal to absent");

    // becoming readable is a change
    fs.add_file("/proj/locked", "now readable");
    assert!(cycle(&mut d).unwrap());
}

#[cfg(unix)]
#[test]
fn fifo_in_tree_is_absent_and_never_blocks() -> TestResult {
    use std::sync::mpsc;
    use std::thread;

    let tree = TreeBuilder::new().with_file("a.txt", "a");
    tree.make_fifo("pipe");
    let root = tree.root().to_path_buf();

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for method in [FingerprintMethod::Hash, FingerprintMethod::Mtime] {
            let snap = take_snapshot(&RealFileSystem, &root, method, &ExcludeSet::empty());
            let _ = tx.send(snap);
        }
    });

    for _ in 0..2 {
        let snap = rx.recv_timeout(TEST_TIMEOUT)?;
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.get(&tree.path("pipe")), Some(&Fingerprint::Absent));
        assert!(!snap.get(&tree.path("a.txt")).is_some_and(Fingerprint::is_absent));
    }
    Ok(())
}

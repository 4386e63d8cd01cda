//! Recursive tree walk with a bounded hashing pool.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};
use walkdir::WalkDir;

use drift_types::{normalize_relative_path, FileRecord, Fingerprint};

use crate::error::{ScanError, ScanResult};
use crate::snapshot::Snapshot;

/// Configuration for the [`TreeScanner`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum number of files hashed concurrently.
    pub hash_workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            hash_workers: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

/// Walks a directory tree and fingerprints every regular file in it.
#[derive(Clone, Debug, Default)]
pub struct TreeScanner {
    config: ScanConfig,
}

impl TreeScanner {
    /// Create a scanner with the given configuration.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan `root` and build its [`Snapshot`].
    ///
    /// Enumeration runs on one blocking task. Hashing is spread over at most
    /// `hash_workers` blocking tasks; records are merged into the snapshot by
    /// this task only, after each worker finishes. Any entry that cannot be
    /// listed, stat'ed, or read fails the whole scan.
    pub async fn scan(&self, root: impl AsRef<Path>) -> ScanResult<Snapshot> {
        let root = resolve_root(root.as_ref())?;

        let walk_root = root.clone();
        let files = tokio::task::spawn_blocking(move || enumerate_files(&walk_root))
            .await
            .map_err(|e| ScanError::Worker(e.to_string()))??;
        debug!(root = %root.display(), files = files.len(), "enumerated tree");

        let permits = Arc::new(Semaphore::new(self.config.hash_workers.max(1)));
        let mut workers = JoinSet::new();
        for (relative_path, location) in files {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| ScanError::Worker(e.to_string()))?;
            workers.spawn_blocking(move || {
                let _permit = permit;
                fingerprint_file(relative_path, location)
            });
        }

        let mut records = Vec::new();
        while let Some(joined) = workers.join_next().await {
            let record = joined.map_err(|e| ScanError::Worker(e.to_string()))??;
            records.push(record);
        }

        let snapshot = Snapshot::from_records(root, records);
        info!(
            root = %snapshot.root().display(),
            files = snapshot.len(),
            bytes = snapshot.total_bytes(),
            "scanned tree"
        );
        Ok(snapshot)
    }
}

/// Check that `root` exists and is a directory, and make it absolute.
fn resolve_root(root: &Path) -> ScanResult<PathBuf> {
    let metadata = std::fs::metadata(root).map_err(|e| ScanError::unreadable(root, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::unreadable(root, "not a directory"));
    }
    std::fs::canonicalize(root).map_err(|e| ScanError::unreadable(root, e))
}

/// List every regular file beneath `root` as `(relative path, location)`.
fn enumerate_files(root: &Path) -> ScanResult<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            ScanError::unreadable(path, e)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = normalize_relative_path(root, entry.path())
            .map_err(|e| ScanError::unreadable(entry.path(), e))?;
        if let Some(relative) = relative {
            files.push((relative, entry.into_path()));
        }
    }
    Ok(files)
}

fn fingerprint_file(relative_path: String, location: PathBuf) -> ScanResult<FileRecord> {
    let file = File::open(&location).map_err(|e| ScanError::unreadable(&location, e))?;
    let size = file
        .metadata()
        .map_err(|e| ScanError::unreadable(&location, e))?
        .len();
    let fingerprint = Fingerprint::of_reader(file).map_err(|e| ScanError::unreadable(&location, e))?;
    debug!(path = %relative_path, fingerprint = %fingerprint.short_hex(), size, "hashed file");
    Ok(FileRecord::new(relative_path, fingerprint, location, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn scans_nested_files_with_normalized_paths() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", b"hello");
        write(dir.path(), "bin/app.dll", b"MZ\x90\x00");
        write(dir.path(), "bin/deep/x.pdb", b"pdb");

        let snap = TreeScanner::default().scan(dir.path()).await.unwrap();
        let paths: Vec<_> = snap.paths().collect();
        assert_eq!(paths, vec!["a.txt", "bin/app.dll", "bin/deep/x.pdb"]);

        let a = snap.get("a.txt").unwrap();
        assert_eq!(a.fingerprint, Fingerprint::of_bytes(b"hello"));
        assert_eq!(a.size, 5);
        assert!(a.location.is_absolute());
        assert_eq!(fs::read(&a.location).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn empty_directories_produce_no_records() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
        let snap = TreeScanner::default().scan(dir.path()).await.unwrap();
        assert!(snap.is_empty());
    }

    #[tokio::test]
    async fn single_worker_produces_same_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..25 {
            write(dir.path(), &format!("d{}/f{i}.txt", i % 3), format!("content {i}").as_bytes());
        }
        let serial = TreeScanner::new(ScanConfig { hash_workers: 1 })
            .scan(dir.path())
            .await
            .unwrap();
        let parallel = TreeScanner::new(ScanConfig { hash_workers: 8 })
            .scan(dir.path())
            .await
            .unwrap();
        assert_eq!(serial, parallel);
        assert_eq!(serial.len(), 25);
    }

    #[tokio::test]
    async fn zero_workers_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", b"a");
        let snap = TreeScanner::new(ScanConfig { hash_workers: 0 })
            .scan(dir.path())
            .await
            .unwrap();
        assert_eq!(snap.len(), 1);
    }

    #[tokio::test]
    async fn missing_root_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = TreeScanner::default()
            .scan(dir.path().join("does-not-exist"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::UnreadableTree { .. }));
    }

    #[tokio::test]
    async fn file_root_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "file.txt", b"x");
        let err = TreeScanner::default()
            .scan(dir.path().join("file.txt"))
            .await
            .unwrap_err();
        match err {
            ScanError::UnreadableTree { reason, .. } => assert!(reason.contains("not a directory")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn non_utf8_names_fail_the_scan() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"a\xff.txt")), b"one").unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"a\xfe.txt")), b"two").unwrap();

        let err = TreeScanner::default().scan(dir.path()).await.unwrap_err();
        match err {
            ScanError::UnreadableTree { path, reason } => {
                let name = path.file_name().unwrap().as_bytes();
                assert!(name == b"a\xfe.txt" || name == b"a\xff.txt");
                assert!(reason.contains("not valid UTF-8"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_subdirectory_fails_the_scan() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "ok.txt", b"fine");
        write(dir.path(), "locked/secret.txt", b"hidden");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list the directory anyway.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = TreeScanner::default().scan(dir.path()).await;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        match result.unwrap_err() {
            ScanError::UnreadableTree { path, .. } => assert!(path.ends_with("locked")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

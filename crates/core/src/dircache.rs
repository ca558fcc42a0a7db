//! Directory materialization cache
//!
//! The disk API has no `mkdir -p`: every directory on the way to an object
//! must be created one call at a time, and an existing directory answers with
//! a conflict. The cache remembers every directory confirmed to exist so each
//! one is requested at most once for the lifetime of the owning adapter.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;
use crate::path::ancestor_directories;
use crate::traits::{DiskApi, MkdirOutcome};

/// Recorded state of a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    /// Created by a call made through this cache
    Created,
    /// Reported as already present by the remote
    Exists,
}

impl From<MkdirOutcome> for DirState {
    fn from(outcome: MkdirOutcome) -> Self {
        match outcome {
            MkdirOutcome::Created => DirState::Created,
            MkdirOutcome::AlreadyExists => DirState::Exists,
        }
    }
}

/// Memo of directories known to exist remotely
///
/// Safe to share between concurrent operations. The map lock is never held
/// across a remote call, so disjoint subtrees proceed independently and two
/// callers may race on the same uncached directory; both answers mean the
/// directory exists and the first one recorded is kept.
#[derive(Debug, Default)]
pub struct DirCache {
    dirs: Mutex<HashMap<String, DirState>>,
}

impl DirCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// State recorded for a directory path (absolute, ending with `/`)
    pub fn get(&self, dir: &str) -> Option<DirState> {
        self.lock().get(dir).copied()
    }

    /// Number of directories recorded
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make sure every ancestor directory of `full_path` exists remotely
    ///
    /// Directories are handled root first. The first failure is returned
    /// immediately and no deeper directory is attempted.
    pub async fn ensure_path(&self, api: &dyn DiskApi, full_path: &str) -> Result<()> {
        for dir in ancestor_directories(full_path) {
            if self.get(&dir).is_some() {
                tracing::trace!(dir = %dir, "directory cached");
                continue;
            }

            let outcome = api.create_dir(&dir).await.inspect_err(|e| {
                tracing::warn!(dir = %dir, error = %e, "failed to create directory");
            })?;
            tracing::debug!(dir = %dir, ?outcome, "directory materialized");

            self.lock().entry(dir).or_insert(outcome.into());
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, DirState>> {
        // Entries are plain values; a poisoned map is still consistent.
        self.dirs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::traits::MockDiskApi;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recording_mock(outcome: MkdirOutcome, calls: Arc<Mutex<Vec<String>>>) -> MockDiskApi {
        let mut api = MockDiskApi::new();
        api.expect_create_dir().returning(move |path| {
            calls.lock().unwrap().push(path.to_string());
            Ok(outcome)
        });
        api
    }

    #[tokio::test]
    async fn test_ensure_path_creates_each_ancestor_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let api = recording_mock(MkdirOutcome::Created, calls.clone());
        let cache = DirCache::new();

        cache.ensure_path(&api, "a/b/c/file.txt").await.unwrap();
        cache.ensure_path(&api, "a/b/c/file.txt").await.unwrap();
        cache.ensure_path(&api, "a/b/other.txt").await.unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["/a/", "/a/b/", "/a/b/c/"]);
        assert_eq!(cache.get("/a/b/"), Some(DirState::Created));
        assert_eq!(cache.len(), 3);
    }

    #[tokio::test]
    async fn test_ensure_path_file_at_root_makes_no_calls() {
        let mut api = MockDiskApi::new();
        api.expect_create_dir().never();
        let cache = DirCache::new();

        cache.ensure_path(&api, "disk:/file.txt").await.unwrap();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_conflict_counts_as_existing() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let api = recording_mock(MkdirOutcome::AlreadyExists, calls.clone());
        let cache = DirCache::new();

        cache
            .ensure_path(&api, "disk:/x/y/z/file.bin")
            .await
            .unwrap();

        for dir in ["/x/", "/x/y/", "/x/y/z/"] {
            assert_eq!(cache.get(dir), Some(DirState::Exists));
        }

        cache
            .ensure_path(&api, "disk:/x/y/z/again.bin")
            .await
            .unwrap();
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failure_stops_deeper_directories() {
        let mut api = MockDiskApi::new();
        let mut seq = mockall::Sequence::new();
        api.expect_create_dir()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(MkdirOutcome::Created));
        api.expect_create_dir()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(Error::Remote {
                    status: 507,
                    body: "insufficient storage".into(),
                })
            });
        let cache = DirCache::new();

        let result = cache.ensure_path(&api, "a/b/c/d/file").await;

        assert!(matches!(result, Err(Error::Remote { status: 507, .. })));
        assert_eq!(cache.get("/a/"), Some(DirState::Created));
        assert!(cache.get("/a/b/").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_directory_is_retried_later() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let mut api = MockDiskApi::new();
        api.expect_create_dir().returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::Network("connection reset".into()))
            } else {
                Ok(MkdirOutcome::Created)
            }
        });
        let cache = DirCache::new();

        assert!(cache.ensure_path(&api, "a/file").await.is_err());
        cache.ensure_path(&api, "a/file").await.unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get("/a/"), Some(DirState::Created));
    }

    /// Answers like the real disk: created on first sight, conflict afterwards
    struct RacyDisk {
        existing: Mutex<HashSet<String>>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl DiskApi for RacyDisk {
        async fn create_dir(&self, path: &str) -> Result<MkdirOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.existing.lock().unwrap().insert(path.to_string()) {
                Ok(MkdirOutcome::Created)
            } else {
                Ok(MkdirOutcome::AlreadyExists)
            }
        }

        async fn list_files(&self, _: u32, _: u32) -> Result<crate::traits::FilePage> {
            unreachable!()
        }

        async fn resource_info(&self, _: &str) -> Result<crate::traits::ResourceInfo> {
            unreachable!()
        }

        async fn upload_link(&self, _: &str, _: bool) -> Result<crate::traits::UploadLink> {
            unreachable!()
        }

        async fn upload(
            &self,
            _: &crate::traits::UploadLink,
            _: crate::traits::ByteStream,
        ) -> Result<()> {
            unreachable!()
        }

        async fn download(&self, _: &str) -> Result<crate::traits::ByteStream> {
            unreachable!()
        }

        async fn delete(&self, _: &str, _: bool) -> Result<()> {
            unreachable!()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_overlapping_paths() {
        let api = Arc::new(RacyDisk {
            existing: Mutex::new(HashSet::new()),
            calls: AtomicUsize::new(0),
        });
        let cache = Arc::new(DirCache::new());

        let mut tasks = Vec::new();
        for i in 0..8 {
            let api = api.clone();
            let cache = cache.clone();
            tasks.push(tokio::spawn(async move {
                let path = format!("disk:/shared/branch{}/leaf/file{i}", i % 2);
                cache.ensure_path(api.as_ref(), &path).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let expected = [
            "/shared/",
            "/shared/branch0/",
            "/shared/branch0/leaf/",
            "/shared/branch1/",
            "/shared/branch1/leaf/",
        ];
        assert_eq!(cache.len(), expected.len());
        for dir in expected {
            assert!(cache.get(dir).is_some(), "{dir} not recorded");
        }
        assert_eq!(api.existing.lock().unwrap().len(), expected.len());
        assert!(api.calls.load(Ordering::SeqCst) >= expected.len());
    }
}

//! Filesystem adapter
//!
//! [`DiskFs`] presents one remote, scoped to a root directory, as a flat
//! set of objects: list, look up, write, read and delete. Writes create
//! the parent directories first through the adapter's [`DirCache`].

use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;

use crate::dircache::DirCache;
use crate::error::Result;
use crate::listing::{ListingStream, ListingWalker};
use crate::object::{Metadata, Object};
use crate::path::{disk_root, join_remote, normalize_root, validate_remote};
use crate::remote::{DEFAULT_CHECKERS, DEFAULT_PAGE_SIZE, RemoteConfig};
use crate::timeout::Bounded;
use crate::traits::{ByteStream, DiskApi};

/// Tuning knobs of an adapter
#[derive(Debug, Clone)]
pub struct FsOptions {
    /// Entries requested per listing page
    pub page_size: u32,
    /// Capacity of the listing channel
    pub checkers: usize,
    /// Deadline for each remote call
    pub timeout: Option<Duration>,
}

impl Default for FsOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            checkers: DEFAULT_CHECKERS,
            timeout: None,
        }
    }
}

impl From<&RemoteConfig> for FsOptions {
    fn from(remote: &RemoteConfig) -> Self {
        Self {
            page_size: remote.page_size,
            checkers: remote.checkers,
            timeout: remote.timeout(),
        }
    }
}

/// A remote disk scoped to a root directory
pub struct DiskFs {
    name: String,
    root: String,
    disk_root: String,
    api: Arc<dyn DiskApi>,
    dirs: DirCache,
    options: FsOptions,
}

impl DiskFs {
    pub fn new(
        name: impl Into<String>,
        root: &str,
        api: Arc<dyn DiskApi>,
        options: FsOptions,
    ) -> Self {
        let root = normalize_root(root);
        Self {
            name: name.into(),
            disk_root: disk_root(&root),
            root,
            api: Bounded::wrap(api, options.timeout),
            dirs: DirCache::new(),
            options,
        }
    }

    /// Build an adapter for a configured remote
    pub fn from_config(remote: &RemoteConfig, api: Arc<dyn DiskApi>) -> Self {
        Self::new(&remote.name, &remote.root, api, FsOptions::from(remote))
    }

    /// Name of the remote
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root directory, without leading or trailing separators
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Root as a disk path, e.g. `disk:/backup/`
    pub fn disk_root(&self) -> &str {
        &self.disk_root
    }

    /// Modification times are kept with one second precision
    pub fn precision(&self) -> Duration {
        Duration::from_secs(1)
    }

    /// Directories this adapter has confirmed to exist
    pub fn dir_cache(&self) -> &DirCache {
        &self.dirs
    }

    /// Disk path of a root-relative object name
    pub fn remote_path(&self, remote: &str) -> String {
        join_remote(&self.disk_root, remote)
    }

    /// List every object below the root
    ///
    /// Returns at once; objects arrive as the background walk fetches pages.
    /// Must be called within a tokio runtime.
    pub fn list(&self) -> ListingStream {
        tracing::debug!(remote = %self.name, root = %self.disk_root, "listing");
        let walker = ListingWalker::new(
            self.api.clone(),
            self.disk_root.clone(),
            self.options.page_size,
        );
        ListingStream::spawn(walker, self.options.checkers)
    }

    /// Reference an object without fetching its metadata
    pub fn new_object(&self, remote: &str) -> Object {
        Object::pending(remote, None)
    }

    /// Look up an object and its metadata
    pub async fn stat(&self, remote: &str) -> Result<Object> {
        validate_remote(remote)?;
        let info = self.api.resource_info(&self.remote_path(remote)).await?;
        Ok(Object::with_info(remote, &info))
    }

    /// Upload a new object
    ///
    /// The handle is returned whether or not the upload succeeded, together
    /// with the outcome. Its metadata stays pending.
    pub async fn put(
        &self,
        body: ByteStream,
        remote: &str,
        mod_time: Timestamp,
        size: u64,
    ) -> (Object, Result<()>) {
        let mut object = Object::pending(remote, Some(size));
        let result = self.update(&mut object, body, mod_time, size).await;
        (object, result)
    }

    /// Upload over an existing object, creating its parent directories first
    pub async fn update(
        &self,
        object: &mut Object,
        body: ByteStream,
        mod_time: Timestamp,
        size: u64,
    ) -> Result<()> {
        validate_remote(object.remote())?;
        let path = self.remote_path(object.remote());

        self.dirs.ensure_path(self.api.as_ref(), &path).await?;

        tracing::debug!(path = %path, size, %mod_time, "uploading");
        let link = self.api.upload_link(&path, true).await?;
        self.api.upload(&link, body).await?;
        object.set_metadata(Metadata::Pending {
            size_hint: Some(size),
        });
        Ok(())
    }

    /// Open an object for reading
    pub async fn open(&self, object: &Object) -> Result<ByteStream> {
        self.api.download(&self.remote_path(object.remote())).await
    }

    /// Delete an object permanently
    pub async fn remove(&self, object: &Object) -> Result<()> {
        let path = self.remote_path(object.remote());
        tracing::debug!(path = %path, "removing");
        self.api.delete(&path, true).await
    }

    /// Make sure the root directory and all its parents exist
    pub async fn mkdir_root(&self) -> Result<()> {
        self.dirs.ensure_path(self.api.as_ref(), &self.disk_root).await
    }

    /// Removing the root directory is not supported; accepted as a no-op
    pub async fn rmdir(&self) -> Result<()> {
        tracing::debug!(remote = %self.name, "rmdir is a no-op");
        Ok(())
    }

    /// Modification times cannot be set remotely; accepted as a no-op
    pub fn set_mod_time(&self, object: &Object, mod_time: Timestamp) {
        tracing::debug!(remote = %object.remote(), %mod_time, "set_mod_time is a no-op");
    }
}

impl std::fmt::Display for DiskFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Yandex {}", self.root)
    }
}

impl std::fmt::Debug for DiskFs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskFs")
            .field("name", &self.name)
            .field("disk_root", &self.disk_root)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

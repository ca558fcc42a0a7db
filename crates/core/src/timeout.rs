//! Per-call deadlines for remote operations

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::traits::{ByteStream, DiskApi, FilePage, MkdirOutcome, ResourceInfo, UploadLink};

/// Wraps a [`DiskApi`] so every call fails with [`Error::Timeout`] past a deadline
///
/// Payload transfers are not bounded, their duration depends on the size.
/// For uploads only the link request is bounded, for downloads only
/// opening the stream.
pub struct Bounded {
    inner: Arc<dyn DiskApi>,
    timeout: Duration,
}

impl Bounded {
    pub fn new(inner: Arc<dyn DiskApi>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Wrap `api` when a timeout is configured
    pub fn wrap(api: Arc<dyn DiskApi>, timeout: Option<Duration>) -> Arc<dyn DiskApi> {
        match timeout {
            Some(timeout) => Arc::new(Self::new(api, timeout)),
            None => api,
        }
    }

    async fn bound<T>(&self, call: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.timeout, fut).await.map_err(|_| {
            tracing::warn!(call, timeout = ?self.timeout, "remote call timed out");
            Error::Timeout(self.timeout, call.to_string())
        })?
    }
}

#[async_trait]
impl DiskApi for Bounded {
    async fn create_dir(&self, path: &str) -> Result<MkdirOutcome> {
        self.bound("create_dir", self.inner.create_dir(path)).await
    }

    async fn list_files(&self, limit: u32, offset: u32) -> Result<FilePage> {
        self.bound("list_files", self.inner.list_files(limit, offset))
            .await
    }

    async fn resource_info(&self, path: &str) -> Result<ResourceInfo> {
        self.bound("resource_info", self.inner.resource_info(path))
            .await
    }

    async fn upload_link(&self, path: &str, overwrite: bool) -> Result<UploadLink> {
        self.bound("upload_link", self.inner.upload_link(path, overwrite))
            .await
    }

    async fn upload(&self, link: &UploadLink, body: ByteStream) -> Result<()> {
        self.inner.upload(link, body).await
    }

    async fn download(&self, path: &str) -> Result<ByteStream> {
        self.bound("download", self.inner.download(path)).await
    }

    async fn delete(&self, path: &str, permanently: bool) -> Result<()> {
        self.bound("delete", self.inner.delete(path, permanently))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{DiskFs, FsOptions};
    use crate::traits::MockDiskApi;

    /// Answers most calls after a fixed delay
    struct SlowDisk(Duration);

    #[async_trait]
    impl DiskApi for SlowDisk {
        async fn create_dir(&self, _: &str) -> Result<MkdirOutcome> {
            tokio::time::sleep(self.0).await;
            Ok(MkdirOutcome::Created)
        }

        async fn list_files(&self, _: u32, _: u32) -> Result<FilePage> {
            tokio::time::sleep(self.0).await;
            Ok(FilePage::default())
        }

        async fn resource_info(&self, path: &str) -> Result<ResourceInfo> {
            Ok(ResourceInfo::file(path, 0))
        }

        async fn upload_link(&self, path: &str, _: bool) -> Result<UploadLink> {
            tokio::time::sleep(self.0).await;
            Ok(link(path))
        }

        async fn upload(&self, _: &UploadLink, _: ByteStream) -> Result<()> {
            tokio::time::sleep(self.0).await;
            Ok(())
        }

        async fn download(&self, _: &str) -> Result<ByteStream> {
            Err(Error::NotFound("nothing".into()))
        }

        async fn delete(&self, _: &str, _: bool) -> Result<()> {
            Ok(())
        }
    }

    fn link(path: &str) -> UploadLink {
        UploadLink {
            path: path.to_string(),
            href: "https://uploader.invalid/slot".into(),
            method: "PUT".into(),
        }
    }

    /// Creates directories at once but never hands out an upload link
    struct StalledLink;

    #[async_trait]
    impl DiskApi for StalledLink {
        async fn create_dir(&self, _: &str) -> Result<MkdirOutcome> {
            Ok(MkdirOutcome::Created)
        }

        async fn list_files(&self, _: u32, _: u32) -> Result<FilePage> {
            Ok(FilePage::default())
        }

        async fn resource_info(&self, path: &str) -> Result<ResourceInfo> {
            Ok(ResourceInfo::file(path, 0))
        }

        async fn upload_link(&self, _: &str, _: bool) -> Result<UploadLink> {
            std::future::pending().await
        }

        async fn upload(&self, _: &UploadLink, _: ByteStream) -> Result<()> {
            unreachable!("no link was handed out")
        }

        async fn download(&self, _: &str) -> Result<ByteStream> {
            Err(Error::NotFound("nothing".into()))
        }

        async fn delete(&self, _: &str, _: bool) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let api = Bounded::new(
            Arc::new(SlowDisk(Duration::from_secs(5))),
            Duration::from_millis(20),
        );

        let result = api.create_dir("/a/").await;
        assert!(matches!(result, Err(Error::Timeout(_, ref call)) if call == "create_dir"));

        let result = api.list_files(10, 0).await;
        assert!(matches!(result, Err(Error::Timeout(..))));
    }

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let api = Bounded::new(
            Arc::new(SlowDisk(Duration::from_millis(1))),
            Duration::from_secs(5),
        );

        assert_eq!(api.create_dir("/a/").await.unwrap(), MkdirOutcome::Created);
        assert!(matches!(
            api.download("disk:/x").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_link_is_bounded_but_transfer_is_not() {
        let api = Bounded::new(
            Arc::new(SlowDisk(Duration::from_millis(60))),
            Duration::from_millis(10),
        );

        let result = api.upload_link("disk:/big.bin", true).await;
        assert!(matches!(result, Err(Error::Timeout(_, ref call)) if call == "upload_link"));

        let body: ByteStream = Box::pin(futures::stream::empty());
        api.upload(&link("disk:/big.bin"), body).await.unwrap();
    }

    #[tokio::test]
    async fn test_put_fails_when_upload_link_never_answers() {
        let options = FsOptions {
            timeout: Some(Duration::from_millis(20)),
            ..FsOptions::default()
        };
        let fs = DiskFs::new("disk", "remote", Arc::new(StalledLink), options);

        let body: ByteStream = Box::pin(futures::stream::empty());
        let put = fs.put(body, "a/b.bin", jiff::Timestamp::now(), 0);
        let (object, result) = tokio::time::timeout(Duration::from_millis(500), put)
            .await
            .expect("put should give up on its own");

        assert_eq!(object.remote(), "a/b.bin");
        assert!(matches!(result, Err(Error::Timeout(_, ref call)) if call == "upload_link"));
    }

    #[test]
    fn test_wrap_without_timeout_keeps_api() {
        let api: Arc<dyn DiskApi> = Arc::new(MockDiskApi::new());
        let wrapped = Bounded::wrap(api.clone(), None);
        assert!(Arc::ptr_eq(&api, &wrapped));
    }
}

//! DiskApi trait definition
//!
//! This trait defines the remote operations the filesystem adapter consumes.
//! It allows the adapter to be decoupled from the HTTP transport, the
//! authentication layer and the JSON encoding of the disk REST API.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A stream of payload chunks, used for both uploads and downloads
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Outcome of a successful create-directory call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MkdirOutcome {
    /// The directory was created by this call
    Created,
    /// The directory was already present (the API answered with a conflict)
    AlreadyExists,
}

/// Metadata of one remote resource as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    /// Absolute path, including the `disk:/` marker
    pub path: String,

    /// Final path component
    #[serde(default)]
    pub name: String,

    /// "file" or "dir"
    #[serde(rename = "type", default)]
    pub resource_type: String,

    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// MD5 checksum as a lowercase hex string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,

    /// Last modification time, RFC 3339 with offset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl ResourceInfo {
    /// Create a file resource
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            path,
            name,
            resource_type: "file".to_string(),
            size: Some(size),
            md5: None,
            modified: None,
        }
    }

    /// Whether the resource is a directory
    pub fn is_dir(&self) -> bool {
        self.resource_type == "dir"
    }
}

/// One page of the flat file listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePage {
    /// Entries of this page, in listing order
    #[serde(default)]
    pub items: Vec<ResourceInfo>,

    /// Limit echoed back by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Offset echoed back by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// Where to send an upload payload, obtained before the transfer starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLink {
    /// Disk path the payload is stored at
    pub path: String,
    /// Target URL of the transfer
    pub href: String,
    /// HTTP method the transfer uses
    pub method: String,
}

/// Trait for the remote disk REST operations
///
/// Paths are absolute disk paths. Directory paths end with `/`.
/// This trait is implemented by the HTTP adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiskApi: Send + Sync {
    /// Create a single directory at an exact path
    ///
    /// A conflict answer is reported as `MkdirOutcome::AlreadyExists`; any
    /// other unexpected status is an error for this call only.
    async fn create_dir(&self, path: &str) -> Result<MkdirOutcome>;

    /// Fetch one page of the flat file listing
    async fn list_files(&self, limit: u32, offset: u32) -> Result<FilePage>;

    /// Fetch the metadata of a single resource
    async fn resource_info(&self, path: &str) -> Result<ResourceInfo>;

    /// Ask where a payload for `path` should be sent
    async fn upload_link(&self, path: &str, overwrite: bool) -> Result<UploadLink>;

    /// Stream a payload to a previously obtained link
    async fn upload(&self, link: &UploadLink, body: ByteStream) -> Result<()>;

    /// Open a resource for reading
    async fn download(&self, path: &str) -> Result<ByteStream>;

    /// Delete a resource
    async fn delete(&self, path: &str, permanently: bool) -> Result<()>;
}

//! Object handles
//!
//! An object handle names one remote file relative to the adapter root and
//! carries a metadata snapshot. Handles do not hold the adapter; operations
//! on them go through [`DiskFs`](crate::fs::DiskFs).

use jiff::Timestamp;
use serde::Serialize;

use crate::traits::ResourceInfo;

/// Metadata snapshot of a remote file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectMeta {
    /// Size in bytes
    pub size: u64,

    /// MD5 checksum as a lowercase hex string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,

    /// Last modification time, if the remote value could be parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<Timestamp>,
}

impl ObjectMeta {
    /// Build a snapshot from API metadata
    ///
    /// An unparsable modification time leaves `modified` unset instead of
    /// failing the whole read.
    pub fn from_resource(info: &ResourceInfo) -> Self {
        let modified = info.modified.as_deref().and_then(|raw| {
            raw.parse::<Timestamp>()
                .inspect_err(|e| {
                    tracing::warn!(path = %info.path, value = raw, error = %e, "unparsable modification time");
                })
                .ok()
        });

        Self {
            size: info.size.unwrap_or(0),
            md5: info.md5.clone(),
            modified,
        }
    }
}

/// What is known about an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Metadata {
    /// Metadata was returned by the remote
    Known(ObjectMeta),
    /// Not fetched yet; the size given by the writer, if any
    Pending { size_hint: Option<u64> },
}

/// A remote file, addressed relative to the adapter root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Object {
    remote: String,
    metadata: Metadata,
}

impl Object {
    /// Object with metadata from a listing or lookup
    pub fn with_info(remote: impl Into<String>, info: &ResourceInfo) -> Self {
        Self {
            remote: remote.into(),
            metadata: Metadata::Known(ObjectMeta::from_resource(info)),
        }
    }

    /// Object reference whose metadata has not been fetched
    pub fn pending(remote: impl Into<String>, size_hint: Option<u64>) -> Self {
        Self {
            remote: remote.into(),
            metadata: Metadata::Pending { size_hint },
        }
    }

    /// Path relative to the adapter root
    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub(crate) fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = metadata;
    }

    /// Size in bytes, known or announced by the writer
    pub fn size(&self) -> Option<u64> {
        match &self.metadata {
            Metadata::Known(meta) => Some(meta.size),
            Metadata::Pending { size_hint } => *size_hint,
        }
    }

    pub fn md5(&self) -> Option<&str> {
        match &self.metadata {
            Metadata::Known(meta) => meta.md5.as_deref(),
            Metadata::Pending { .. } => None,
        }
    }

    pub fn mod_time(&self) -> Option<Timestamp> {
        match &self.metadata {
            Metadata::Known(meta) => meta.modified,
            Metadata::Pending { .. } => None,
        }
    }

    /// Whether the object can be stored by the adapter
    pub fn is_storable(&self) -> bool {
        true
    }
}

impl std::fmt::Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.remote)
    }
}

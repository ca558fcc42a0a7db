//! Backend registry
//!
//! Maps backend names to adapter constructors. There is no global registry:
//! the host builds one and registers the backends it links against.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::fs::DiskFs;
use crate::remote::RemoteConfig;

/// Constructor building an adapter for a configured remote
pub type NewFsFn = fn(&RemoteConfig) -> Result<DiskFs>;

/// Description of a registered backend
#[derive(Debug, Clone, Copy)]
pub struct BackendInfo {
    /// Name referenced by `RemoteConfig::backend`
    pub name: &'static str,
    /// One-line description shown to users
    pub description: &'static str,
    pub new_fs: NewFsFn,
}

/// Registry of available backends
#[derive(Debug, Default)]
pub struct Registry {
    backends: BTreeMap<&'static str, BackendInfo>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend; names must be unique
    pub fn register(&mut self, info: BackendInfo) -> Result<()> {
        if self.backends.contains_key(info.name) {
            return Err(Error::Conflict(format!(
                "Backend '{}' is already registered",
                info.name
            )));
        }
        tracing::debug!(backend = info.name, "registered backend");
        self.backends.insert(info.name, info);
        Ok(())
    }

    /// Look up a backend by name
    pub fn get(&self, name: &str) -> Result<&BackendInfo> {
        self.backends
            .get(name)
            .ok_or_else(|| Error::UnsupportedFeature(format!("Unknown backend '{name}'")))
    }

    /// Registered backends, sorted by name
    pub fn backends(&self) -> impl Iterator<Item = &BackendInfo> {
        self.backends.values()
    }

    /// Build an adapter for a remote using its configured backend
    pub fn new_fs(&self, remote: &RemoteConfig) -> Result<DiskFs> {
        (self.get(&remote.backend)?.new_fs)(remote)
    }
}

//! yd-yandex: Yandex Disk adapter for the ydisk client
//!
//! This crate provides the implementation of the DiskApi trait
//! using reqwest. It is the only crate that speaks HTTP.

pub mod client;
pub mod models;

use std::sync::Arc;

use yd_core::{BackendInfo, DiskFs, RemoteConfig, Registry, Result};

pub use client::YandexClient;

/// Backend name used in remote configuration
pub const BACKEND_NAME: &str = "yandex";

fn new_fs(remote: &RemoteConfig) -> Result<DiskFs> {
    let client = YandexClient::from_remote(remote)?;
    Ok(DiskFs::from_config(remote, Arc::new(client)))
}

/// Add the Yandex Disk backend to a registry
pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register(BackendInfo {
        name: BACKEND_NAME,
        description: "Yandex Disk",
        new_fs,
    })
}

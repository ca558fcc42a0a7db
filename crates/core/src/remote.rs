//! Remote management
//!
//! A remote is a named account on a storage backend: the backend kind,
//! the stored OAuth token, and the root directory the adapter is scoped to.

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// Default number of entries requested per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Default capacity of the listing hand-off channel
pub const DEFAULT_CHECKERS: usize = 8;

/// Default backend for new remotes
pub const DEFAULT_BACKEND: &str = "yandex";

/// A stored OAuth token
///
/// This is the JSON shape kept in the `token` field of a remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Bearer credential sent with each request
    pub access_token: String,

    /// Token type, usually "bearer"
    #[serde(default)]
    pub token_type: String,

    /// Refresh token, if one was issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Expiry of the access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<jiff::Timestamp>,
}

/// A remote represents a named storage account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Unique name for this remote
    pub name: String,

    /// Backend kind, as registered in the backend registry
    #[serde(default = "default_backend")]
    pub backend: String,

    /// OAuth token encoded as JSON
    pub token: String,

    /// Directory on the disk the remote is scoped to (empty for the disk root)
    #[serde(default)]
    pub root: String,

    /// API endpoint override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Entries requested per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Capacity of the listing channel
    #[serde(default = "default_checkers")]
    pub checkers: usize,

    /// Deadline applied to each remote call, in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

fn default_backend() -> String {
    DEFAULT_BACKEND.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_checkers() -> usize {
    DEFAULT_CHECKERS
}

impl RemoteConfig {
    /// Create a new remote with required fields
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend: default_backend(),
            token: token.into(),
            root: String::new(),
            endpoint: None,
            page_size: default_page_size(),
            checkers: default_checkers(),
            timeout_ms: None,
        }
    }

    /// Decode the stored token
    ///
    /// A token that cannot be decoded is a configuration error; adapters are
    /// never constructed without a usable credential.
    pub fn oauth_token(&self) -> Result<OAuthToken> {
        let token: OAuthToken = serde_json::from_str(&self.token).map_err(|e| {
            Error::Config(format!("Invalid token for remote '{}': {e}", self.name))
        })?;
        if token.access_token.is_empty() {
            return Err(Error::Config(format!(
                "Token for remote '{}' has an empty access_token",
                self.name
            )));
        }
        Ok(token)
    }

    /// Get the effective per-call timeout
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_ms.map(std::time::Duration::from_millis)
    }
}

/// Manager for remote operations
pub struct RemoteManager {
    config_manager: ConfigManager,
}

impl RemoteManager {
    /// Create a new RemoteManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new RemoteManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured remotes
    pub fn list(&self) -> Result<Vec<RemoteConfig>> {
        let config = self.config_manager.load()?;
        Ok(config.remotes)
    }

    /// Get a remote by name
    pub fn get(&self, name: &str) -> Result<RemoteConfig> {
        let config = self.config_manager.load()?;
        config
            .remotes
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::RemoteNotFound(name.to_string()))
    }

    /// Add or update a remote
    pub fn set(&self, remote: RemoteConfig) -> Result<()> {
        remote.oauth_token()?;

        let mut config = self.config_manager.load()?;
        config.remotes.retain(|r| r.name != remote.name);
        config.remotes.push(remote);

        self.config_manager.save(&config)
    }

    /// Remove a remote
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.remotes.len();

        config.remotes.retain(|r| r.name != name);

        if config.remotes.len() == original_len {
            return Err(Error::RemoteNotFound(name.to_string()));
        }

        self.config_manager.save(&config)
    }

    /// Check if a remote exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        let config = self.config_manager.load()?;
        Ok(config.remotes.iter().any(|r| r.name == name))
    }
}

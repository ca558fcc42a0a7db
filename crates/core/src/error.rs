//! Error types for yd-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for yd-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for yd-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid path format
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Remote not found in configuration
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// A remote call did not complete within its deadline
    #[error("Timed out after {0:?}: {1}")]
    Timeout(std::time::Duration, String),

    /// Unexpected status returned by the remote service
    #[error("Remote error [{status}]: {body}")]
    Remote { status: u16, body: String },

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Feature not supported by backend
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidPath(_) => 2,                              // UsageError
            Error::Config(_) => 2,                                   // UsageError
            Error::Network(_) | Error::Timeout(..) => 3,             // NetworkError
            Error::Auth(_) => 4,                                     // AuthError
            Error::NotFound(_) | Error::RemoteNotFound(_) => 5,      // NotFound
            Error::Conflict(_) => 6,                                 // Conflict
            Error::UnsupportedFeature(_) => 7,                       // UnsupportedFeature
            _ => 1,                                                  // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidPath("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(
            Error::Timeout(Duration::from_secs(1), "test".into()).exit_code(),
            3
        );
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::RemoteNotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::Conflict("test".into()).exit_code(), 6);
        assert_eq!(Error::UnsupportedFeature("test".into()).exit_code(), 7);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
        assert_eq!(
            Error::Remote {
                status: 507,
                body: "full".into()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::RemoteNotFound("disk".into());
        assert_eq!(err.to_string(), "Remote not found: disk");

        let err = Error::Remote {
            status: 423,
            body: "locked".into(),
        };
        assert_eq!(err.to_string(), "Remote error [423]: locked");
    }
}

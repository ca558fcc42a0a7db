//! Wire models of the Yandex Disk REST API
//!
//! Resource metadata and listing pages decode straight into the yd-core
//! types; only the API-specific envelopes live here.

use serde::Deserialize;

/// Link returned by the upload and download endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    /// Target URL
    pub href: String,

    /// HTTP method to use with `href`
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Error body returned with non-success statuses
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// Human-readable message
    #[serde(default)]
    pub message: String,

    /// Technical description
    #[serde(default)]
    pub description: String,

    /// Error identifier, e.g. "DiskPathPointsToExistentDirectoryError"
    #[serde(default)]
    pub error: String,
}

impl ApiError {
    /// Decode an error body, falling back to the raw text
    pub fn describe(body: &str) -> String {
        match serde_json::from_str::<ApiError>(body) {
            Ok(err) if !err.error.is_empty() => {
                let text = if err.description.is_empty() {
                    &err.message
                } else {
                    &err.description
                };
                format!("{}: {}", err.error, text)
            }
            _ => body.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_decode() {
        let json = r#"{
            "href": "https://uploader1d.dst.yandex.net:443/upload-target/123",
            "method": "PUT",
            "templated": false
        }"#;
        let link: Link = serde_json::from_str(json).unwrap();
        assert_eq!(link.method, "PUT");
        assert_eq!(link.href, "https://uploader1d.dst.yandex.net:443/upload-target/123");
    }

    #[test]
    fn test_link_default_method() {
        let link: Link = serde_json::from_str(r#"{"href": "https://downloader.disk.yandex.ru/x"}"#)
            .unwrap();
        assert_eq!(link.method, "GET");
    }

    #[test]
    fn test_api_error_describe() {
        let body = r#"{
            "message": "Resource already exists",
            "description": "Specified path \"disk:/a\" points to existent directory.",
            "error": "DiskPathPointsToExistentDirectoryError"
        }"#;
        assert_eq!(
            ApiError::describe(body),
            "DiskPathPointsToExistentDirectoryError: Specified path \"disk:/a\" points to existent directory."
        );
    }

    #[test]
    fn test_api_error_describe_raw() {
        assert_eq!(ApiError::describe("Bad Gateway\n"), "Bad Gateway");
    }
}

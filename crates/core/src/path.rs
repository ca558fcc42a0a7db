//! Path parsing and resolution
//!
//! Remote paths on the disk are rooted at the `disk:/` marker. Directory
//! paths sent to the create-directory call are absolute, start from a
//! single `/` and always end with a trailing `/`.
//!
//! CLI targets use the format: remote[:path]

use crate::error::{Error, Result};

/// Prefix of every path returned by the disk API
pub const DISK_ROOT_MARKER: &str = "disk:/";

/// Path separator used by the disk API
pub const SEPARATOR: char = '/';

/// Normalize a configured root: no leading or trailing separators
pub fn normalize_root(root: &str) -> String {
    root.trim_matches(SEPARATOR).to_string()
}

/// Build the disk path of a root directory, always ending with `/`
///
/// ```
/// use yd_core::path::disk_root;
///
/// assert_eq!(disk_root(""), "disk:/");
/// assert_eq!(disk_root("/backup/photos/"), "disk:/backup/photos/");
/// ```
pub fn disk_root(root: &str) -> String {
    let root = normalize_root(root);
    if root.is_empty() {
        DISK_ROOT_MARKER.to_string()
    } else {
        format!("{DISK_ROOT_MARKER}{root}/")
    }
}

/// Join a root-relative object name onto a disk root
pub fn join_remote(disk_root: &str, remote: &str) -> String {
    format!("{disk_root}{}", remote.trim_start_matches(SEPARATOR))
}

/// Check that a root-relative name designates an object rather than a directory
pub fn validate_remote(remote: &str) -> Result<()> {
    if remote.trim_matches(SEPARATOR).is_empty() {
        return Err(Error::InvalidPath("Object path cannot be empty".into()));
    }
    if remote.ends_with(SEPARATOR) {
        return Err(Error::InvalidPath(format!(
            "'{remote}' names a directory, expected an object"
        )));
    }
    Ok(())
}

/// Ancestor directories of a full object path, root first
///
/// The final segment is treated as the object name and dropped, the
/// `disk:/` marker is removed, and empty segments are skipped. Each
/// returned directory is absolute and ends with `/`. A path ending with
/// `/` has an empty final segment, so the directory itself is included.
pub fn ancestor_directories(full_path: &str) -> Vec<String> {
    let without_name = match full_path.rfind(SEPARATOR) {
        Some(pos) => &full_path[..=pos],
        None => "",
    };
    let dirs = without_name
        .strip_prefix(DISK_ROOT_MARKER)
        .unwrap_or(without_name);

    let mut current = String::from(SEPARATOR);
    dirs.split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            current.push_str(segment);
            current.push(SEPARATOR);
            current.clone()
        })
        .collect()
}

/// A parsed CLI target: a configured remote and an optional path below its root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    /// Remote name
    pub remote: String,
    /// Path relative to the remote's root (empty for the root itself)
    pub path: String,
}

impl RemoteTarget {
    /// Create a new RemoteTarget
    pub fn new(remote: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            path: path.into(),
        }
    }

    /// Whether the target designates the remote root
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

impl std::fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}:", self.remote)
        } else {
            write!(f, "{}:{}", self.remote, self.path)
        }
    }
}

/// Parse a target string of the form `remote[:path]`
pub fn parse_target(target: &str) -> Result<RemoteTarget> {
    if target.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let (remote, path) = match target.split_once(':') {
        Some((remote, path)) => (remote, path.trim_start_matches(SEPARATOR)),
        None => (target, ""),
    };

    if !is_valid_remote_name(remote) {
        return Err(Error::InvalidPath(format!(
            "Invalid remote name in '{target}'. Use format: remote[:path]"
        )));
    }

    Ok(RemoteTarget::new(remote, path))
}

/// Check if a string is a valid remote name
fn is_valid_remote_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

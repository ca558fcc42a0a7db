//! yd-core: Core library for the ydisk client
//!
//! This crate provides the core functionality for ydisk, including:
//! - Configuration and remote management
//! - Disk path handling
//! - DiskApi trait for the remote REST operations
//! - Directory materialization and paginated listing
//! - The DiskFs filesystem adapter
//!
//! This crate is designed to be independent of any HTTP client,
//! allowing for easy testing and potential future support for other backends.

pub mod config;
pub mod dircache;
pub mod error;
pub mod fs;
pub mod listing;
pub mod object;
pub mod path;
pub mod registry;
pub mod remote;
pub mod timeout;
pub mod traits;

pub use config::{Config, ConfigManager};
pub use dircache::{DirCache, DirState};
pub use error::{Error, Result};
pub use fs::{DiskFs, FsOptions};
pub use listing::{ListEntry, ListingStream, ListingWalker};
pub use object::{Metadata, Object, ObjectMeta};
pub use path::{RemoteTarget, ancestor_directories, parse_target};
pub use registry::{BackendInfo, Registry};
pub use remote::{OAuthToken, RemoteConfig, RemoteManager};
pub use timeout::Bounded;
pub use traits::{ByteStream, DiskApi, FilePage, MkdirOutcome, ResourceInfo, UploadLink};

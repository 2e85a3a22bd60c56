//! Platform abstractions for stowage
//!
//! This crate provides the filesystem collaborators of the storage manager:
//! - Path expansion and lexical normalization
//! - System cache / temp directory discovery
//! - Project root detection and project identity hashing

mod error;
mod paths;
mod project;
mod system;

pub use error::PlatformError;
pub use paths::{absolutize, expand_path, normalize_path};
pub use project::{PROJECT_HASH_LEN, PROJECT_MARKERS, detect_project_root, project_hash, short_hash};
pub use system::{SystemDirectory, SystemDirectoryKind, system_cache_directory};

//! Project identity used to keep fallback storage of different projects apart.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Length of the project hash appended to fallback storage roots.
pub const PROJECT_HASH_LEN: usize = 16;

/// Files or directories whose presence marks a project root.
pub const PROJECT_MARKERS: &[&str] = &[".git", "Cargo.toml"];

/// Walk up from `start` and return the first directory containing a project marker.
///
/// Returns `start` itself when no ancestor carries a marker.
pub fn detect_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| PROJECT_MARKERS.iter().any(|marker| dir.join(marker).exists()))
        .unwrap_or(start)
        .to_path_buf()
}

/// Short, stable hash of a project identity.
///
/// The result is a lowercase hexadecimal string of [`PROJECT_HASH_LEN`] characters.
pub fn project_hash(identity: &str) -> String {
    short_hash(identity, PROJECT_HASH_LEN)
}

/// Leading `len` lowercase hex characters of the SHA-256 digest of `input`.
///
/// `len` is capped at the full digest length of 64.
pub fn short_hash(input: &str, len: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let mut full = format!("{:x}", hasher.finalize());
    full.truncate(len);
    full
}

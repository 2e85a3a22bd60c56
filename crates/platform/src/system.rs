//! System provided directories used as a storage fallback

use std::fmt;
use std::path::PathBuf;

use tracing::trace;

/// Where a fallback directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemDirectoryKind {
    /// The per-user cache directory (`$XDG_CACHE_HOME`, `~/Library/Caches`, `%LOCALAPPDATA%`)
    SystemCacheDirectory,
    /// The system temp directory, used when no cache directory is known
    SystemTempDirectory,
}

impl SystemDirectoryKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SystemDirectoryKind::SystemCacheDirectory => "systemCacheDirectory",
            SystemDirectoryKind::SystemTempDirectory => "systemTempDirectory",
        }
    }
}

impl fmt::Display for SystemDirectoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directory supplied by the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemDirectory {
    pub path: PathBuf,
    pub kind: SystemDirectoryKind,
}

/// Returns the user's cache directory, or the temp directory when the
/// platform does not define one.
pub fn system_cache_directory() -> SystemDirectory {
    let directory = match dirs::cache_dir() {
        Some(path) if path.is_absolute() => SystemDirectory {
            path,
            kind: SystemDirectoryKind::SystemCacheDirectory,
        },
        _ => SystemDirectory {
            path: std::env::temp_dir(),
            kind: SystemDirectoryKind::SystemTempDirectory,
        },
    };

    trace!(path = %directory.path.display(), kind = %directory.kind, "resolved system directory");
    directory
}

//! Path expansion and normalization utilities

use crate::error::PlatformError;
use std::path::{Component, Path, PathBuf};

/// Expand a path, resolving a leading `~` to the user's home directory
///
/// # Examples
///
/// ```
/// use stowage_platform::expand_path;
///
/// let path = expand_path("~/.cache/stowage").unwrap();
/// assert!(path.starts_with(dirs::home_dir().unwrap()));
/// ```
pub fn expand_path<P: AsRef<Path>>(path: P) -> Result<PathBuf, PlatformError> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(PlatformError::NoHomeDirectory)?;
        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir().ok_or(PlatformError::NoHomeDirectory)
    } else {
        Ok(path.to_path_buf())
    }
}

/// Turn any user supplied directory into a normalized absolute path.
///
/// The path does not need to exist. Relative paths are anchored at the
/// current working directory, `.` and `..` are folded lexically and
/// Windows verbatim prefixes are stripped where that is lossless.
pub fn absolutize<P: AsRef<Path>>(path: P) -> Result<PathBuf, PlatformError> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(PlatformError::EmptyPath);
    }

    let expanded = expand_path(path)?;
    let absolute = if expanded.is_absolute() {
        normalize_path(&expanded)
    } else {
        let cwd = std::env::current_dir().map_err(PlatformError::CurrentDir)?;
        normalize_path(&cwd.join(expanded))
    };

    Ok(dunce::simplified(&absolute).to_path_buf())
}

/// Normalize a path by resolving `.` and `..` components without requiring the path to exist
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                // Never pop past the root or a prefix
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            Component::CurDir => {}
            other => components.push(other),
        }
    }

    components.iter().collect()
}

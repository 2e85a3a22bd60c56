use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Construction-time settings of a [`StorageManager`](super::StorageManager).
///
/// Serializable so hosts can embed it in their own configuration files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
  /// Explicit storage root. Relative paths are anchored at the current directory.
  pub storage_directory: Option<PathBuf>,

  /// Opt in to using the system cache directory when no root is given.
  pub expect_system_cache_directory: bool,

  /// Identity hashed into the fallback root. Defaults to the detected project root.
  pub project_identity: Option<String>,
}

impl StorageConfig {
  pub fn with_directory(storage_directory: impl Into<PathBuf>) -> Self {
    Self {
      storage_directory: Some(storage_directory.into()),
      ..Self::default()
    }
  }
}

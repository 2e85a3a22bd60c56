//! Optional process-wide manager.
//!
//! Passing a `StorageManager` by reference is preferred. Hosts that need a
//! single root reachable from anywhere install one here, once per process.

use std::path::Path;
use std::sync::OnceLock;

use tracing::debug;

use super::{ManagerError, StorageManager};

static INSTANCE: OnceLock<StorageManager> = OnceLock::new();

/// Make `manager` the process-wide instance.
///
/// Fails with [`ManagerError::AlreadyInstalled`] if one is already installed;
/// the rejected manager is dropped.
pub fn install(manager: StorageManager) -> Result<&'static StorageManager, ManagerError> {
  if let Err(rejected) = INSTANCE.set(manager) {
    debug!(rejected = %rejected.storage_directory().display(), "storage manager already installed");
    let existing = instance()?.storage_directory().to_path_buf();
    return Err(ManagerError::AlreadyInstalled { existing });
  }

  let installed = instance()?;
  debug!(directory = %installed.storage_directory().display(), "installed process-wide storage manager");
  Ok(installed)
}

/// The installed manager.
pub fn instance() -> Result<&'static StorageManager, ManagerError> {
  INSTANCE.get().ok_or(ManagerError::NotInstalled)
}

/// Storage root of the installed manager.
pub fn storage_directory() -> Result<&'static Path, ManagerError> {
  Ok(instance()?.storage_directory())
}

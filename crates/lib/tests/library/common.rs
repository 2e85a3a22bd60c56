//! Shared helpers for library integration tests.

use std::path::PathBuf;

use stowage_lib::StorageManager;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Isolated storage root with a manager pointing at it.
pub struct TestEnv {
  pub temp: TempDir,
  pub manager: StorageManager,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let manager = StorageManager::builder().storage_directory(temp.path()).build().unwrap();
    Self { temp, manager }
  }

  /// Copy `<fixture>.entity.json` into the storage root.
  pub fn with_fixtures(fixtures: &[&str]) -> Self {
    let env = Self::new();
    for name in fixtures {
      let file = format!("{}.entity.json", name);
      std::fs::copy(fixture_path(&file), env.manager.resource_path(name))
        .unwrap_or_else(|e| panic!("Failed to copy fixture {}: {}", file, e));
    }
    env
  }
}

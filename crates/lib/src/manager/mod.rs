//! The storage manager: name -> file -> record -> entity, memoized per name.
//!
//! ```text
//! get_resource("widget")
//!   ├─ memo hit?  ──────────────► cached Arc<dyn Entity>
//!   └─ miss
//!      ├─ <root>/widget.entity.json missing ─► None
//!      ├─ record kind not registered ───────► None
//!      └─ registry.hydrate(record) ─► memoize ─► Arc<dyn Entity>
//! ```

pub mod config;
pub mod global;
pub mod warning;

use std::any::type_name;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use stowage_platform::{PlatformError, absolutize, detect_project_root, project_hash, system_cache_directory};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheStats, MemoCache};
use crate::consts::APP_NAME;
use crate::entity::{Entity, EntityRegistry, Hydrate, HydrateError, downcast};
use crate::store::{RecordError, ResourceRecord, resource_path};

pub use config::StorageConfig;
pub use warning::{EXPECT_FALLBACK_FLAG, FallbackWarning, TracingWarningSink, WarningSink};

/// Errors raised while constructing or installing a manager.
#[derive(Debug, Error)]
pub enum ManagerError {
  #[error(
    "The storage manager was not provided with a storage directory. \
     Either pass a valid path, or set `expect_system_cache_directory` to true."
  )]
  MissingStorageDirectory,

  #[error("failed to resolve storage directory: {0}")]
  Platform(#[from] PlatformError),

  #[error("a storage manager is already installed at '{existing}'")]
  AlreadyInstalled { existing: PathBuf },

  #[error("no storage manager has been installed")]
  NotInstalled,
}

/// Why a single resource could not be produced.
#[derive(Debug, Error)]
pub enum ResourceError {
  #[error(transparent)]
  Record(#[from] RecordError),

  #[error(transparent)]
  Hydrate(#[from] HydrateError),
}

/// Owns a storage root and the entities hydrated from it.
#[derive(Debug)]
pub struct StorageManager {
  storage_directory: PathBuf,
  registry: EntityRegistry,
  cache: MemoCache,
}

/// Builder for [`StorageManager`].
#[derive(Default)]
pub struct StorageManagerBuilder {
  config: StorageConfig,
  sink: Option<Arc<dyn WarningSink>>,
  registry: Option<EntityRegistry>,
}

impl StorageManagerBuilder {
  pub fn config(mut self, config: StorageConfig) -> Self {
    self.config = config;
    self
  }

  pub fn storage_directory(mut self, path: impl Into<PathBuf>) -> Self {
    self.config.storage_directory = Some(path.into());
    self
  }

  pub fn expect_system_cache_directory(mut self, expect: bool) -> Self {
    self.config.expect_system_cache_directory = expect;
    self
  }

  pub fn project_identity(mut self, identity: impl Into<String>) -> Self {
    self.config.project_identity = Some(identity.into());
    self
  }

  pub fn warning_sink(mut self, sink: Arc<dyn WarningSink>) -> Self {
    self.sink = Some(sink);
    self
  }

  /// Send fallback warnings to `tracing`.
  pub fn tracing_warnings(self) -> Self {
    self.warning_sink(Arc::new(TracingWarningSink))
  }

  /// Replace the entity registry. Defaults to the built-in kinds.
  pub fn registry(mut self, registry: EntityRegistry) -> Self {
    self.registry = Some(registry);
    self
  }

  /// Register an additional entity kind.
  pub fn register<E: Hydrate>(mut self) -> Self {
    self.registry.get_or_insert_with(EntityRegistry::default).register::<E>();
    self
  }

  pub fn build(self) -> Result<StorageManager, ManagerError> {
    let storage_directory = resolve_storage_directory(&self.config, self.sink.as_deref())?;
    debug!(directory = %storage_directory.display(), "storage manager ready");

    Ok(StorageManager {
      storage_directory,
      registry: self.registry.unwrap_or_default(),
      cache: MemoCache::new(),
    })
  }
}

/// Pick the storage root once, at construction.
///
/// An explicit directory always wins; an empty one counts as not given.
/// Without one, falling back to the system cache directory needs either the
/// opt-in flag or a sink to report it to.
fn resolve_storage_directory(config: &StorageConfig, sink: Option<&dyn WarningSink>) -> Result<PathBuf, ManagerError> {
  let explicit = config.storage_directory.as_ref().filter(|path| !path.as_os_str().is_empty());
  if let Some(path) = explicit {
    return Ok(absolutize(path)?);
  }

  if !config.expect_system_cache_directory && sink.is_none() {
    return Err(ManagerError::MissingStorageDirectory);
  }

  let identity = match &config.project_identity {
    Some(identity) => identity.clone(),
    None => {
      let cwd = std::env::current_dir().map_err(PlatformError::CurrentDir)?;
      detect_project_root(&cwd).to_string_lossy().into_owned()
    }
  };

  let system = system_cache_directory();
  let directory = absolutize(system.path.join(APP_NAME).join(project_hash(&identity)))?;

  let warning = FallbackWarning {
    manager: type_name::<StorageManager>(),
    fallback: system.kind,
    directory: directory.clone(),
    argument: (!config.expect_system_cache_directory).then_some(EXPECT_FALLBACK_FLAG),
  };
  match sink {
    Some(sink) => sink.warn(&warning),
    None => TracingWarningSink.warn(&warning),
  }

  Ok(directory)
}

impl StorageManager {
  pub fn builder() -> StorageManagerBuilder {
    StorageManagerBuilder::default()
  }

  /// Build a manager from a config and an optional warning sink.
  pub fn from_config(config: StorageConfig, sink: Option<Arc<dyn WarningSink>>) -> Result<Self, ManagerError> {
    StorageManagerBuilder {
      config,
      sink,
      registry: None,
    }
    .build()
  }

  /// The resolved storage root. Fixed for the manager's lifetime.
  pub fn storage_directory(&self) -> &Path {
    &self.storage_directory
  }

  pub fn resource_path(&self, name: &str) -> PathBuf {
    resource_path(&self.storage_directory, name)
  }

  pub fn registry(&self) -> &EntityRegistry {
    &self.registry
  }

  /// Return the entity for `name`, hydrating it on first access.
  ///
  /// Missing files, corrupt records and unregistered kinds all yield `None`;
  /// use [`try_get_resource`](Self::try_get_resource) to tell them apart.
  pub fn get_resource(&self, name: &str) -> Option<Arc<dyn Entity>> {
    match self.try_get_resource(name) {
      Ok(entity) => entity,
      Err(err) => {
        warn!(name, error = %err, "resource unavailable");
        None
      }
    }
  }

  /// Like [`get_resource`](Self::get_resource), surfacing why a present
  /// record could not be turned into an entity.
  ///
  /// `Ok(None)` means no record has been persisted for `name`.
  pub fn try_get_resource(&self, name: &str) -> Result<Option<Arc<dyn Entity>>, ResourceError> {
    self.cache.get_or_try_load(name, || {
      let Some(record) = self.load_record(name)? else {
        debug!(name, "no record persisted");
        return Ok(None);
      };

      let entity = self.registry.hydrate(record, self.resource_path(name))?;
      debug!(name, kind = entity.kind(), "hydrated resource");
      Ok(Some(entity))
    })
  }

  /// Typed [`get_resource`](Self::get_resource). `None` if the resource is
  /// of a different kind.
  pub fn get<E: Hydrate>(&self, name: &str) -> Option<Arc<E>> {
    let entity = self.get_resource(name)?;
    let kind = entity.kind();
    let typed = downcast::<E>(entity);
    if typed.is_none() {
      debug!(name, kind, expected = E::KIND, "resource is of another kind");
    }
    typed
  }

  /// Raw data of `name` without hydrating it.
  ///
  /// A hydrated entity answers with a detached copy of its data; otherwise
  /// the record is read from disk and nothing is memoized.
  pub fn read_resource_data(&self, name: &str) -> Option<Value> {
    if let Some(entity) = self.cache.get(name) {
      return Some(entity.data());
    }

    match self.load_record(name) {
      Ok(record) => record.map(|record| record.data),
      Err(err) => {
        warn!(name, error = %err, "resource data unavailable");
        None
      }
    }
  }

  pub fn is_loaded(&self, name: &str) -> bool {
    self.cache.contains(name)
  }

  /// Names hydrated so far, sorted.
  pub fn loaded_names(&self) -> Vec<String> {
    self.cache.names()
  }

  pub fn stats(&self) -> CacheStats {
    self.cache.stats()
  }

  fn load_record(&self, name: &str) -> Result<Option<ResourceRecord>, RecordError> {
    self.cache.record_read();
    ResourceRecord::load(&self.resource_path(name), name)
  }
}

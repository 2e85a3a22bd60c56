//! Entities: typed in-memory objects rebuilt from persisted records.
//!
//! - `Entity`: object-safe contract every cached resource satisfies
//! - `Hydrate`: the static constructor a kind registers with the `EntityRegistry`
//! - `AssociativeEntity` / `AssociativeEditor`: the built-in key-value kind

pub mod associative;
pub mod registry;

use std::any::Any;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::store::{RecordError, ResourceRecord};

pub use associative::{AssociativeEditor, AssociativeEntity};
pub use registry::{EntityRegistry, HydrateFn};

/// Errors raised while rebuilding an entity from its record.
#[derive(Debug, Error)]
pub enum HydrateError {
  #[error("no entity kind '{0}' is registered")]
  UnknownKind(String),

  #[error("record '{name}' cannot be hydrated as '{kind}': {reason}")]
  InvalidData {
    name: String,
    kind: &'static str,
    reason: String,
  },
}

/// Type-erasure helper so cached `Arc<dyn Entity>` values can be downcast.
pub trait AsAny: Any + Send + Sync {
  fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
  fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
    self
  }
}

/// Capability set of a persistable, cacheable object.
pub trait Entity: AsAny + fmt::Debug {
  /// Resource name the entity was hydrated for.
  fn name(&self) -> &str;

  /// Registry tag of the entity's kind.
  fn kind(&self) -> &'static str;

  /// Location of the backing record.
  fn file_path(&self) -> &Path;

  /// Detached copy of the entity's data. Mutating it never touches the entity.
  fn data(&self) -> Value;

  /// Whether the backing record is currently present.
  fn exists(&self) -> bool {
    self.file_path().is_file()
  }

  /// Overwrite the backing record with the entity's current state.
  fn save(&self) -> Result<(), RecordError> {
    ResourceRecord::new(self.name(), self.kind(), self.data()).write(self.file_path())
  }
}

/// Static half of the contract: how a kind rebuilds itself from a record.
///
/// Hydrating the same record twice must produce equal entities.
pub trait Hydrate: Entity + Sized {
  /// Tag stored in the `kind` field of records of this kind.
  const KIND: &'static str;

  fn hydrate(record: ResourceRecord, file_path: PathBuf) -> Result<Self, HydrateError>;
}

/// Downcast a cached entity to its concrete kind.
pub fn downcast<E: Entity>(entity: Arc<dyn Entity>) -> Option<Arc<E>> {
  entity.into_any().downcast::<E>().ok()
}

//! Kind tag -> hydration function lookup.
//!
//! Records never name a Rust type directly. They carry a kind tag and the
//! registry decides which constructor runs, so only registered kinds can ever
//! be produced from data on disk.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::trace;

use super::{AssociativeEntity, Entity, Hydrate, HydrateError};
use crate::store::ResourceRecord;

/// Type-erased constructor stored per kind.
pub type HydrateFn = fn(ResourceRecord, PathBuf) -> Result<Arc<dyn Entity>, HydrateError>;

fn hydrate_erased<E: Hydrate>(record: ResourceRecord, file_path: PathBuf) -> Result<Arc<dyn Entity>, HydrateError> {
  let entity: Arc<dyn Entity> = Arc::new(E::hydrate(record, file_path)?);
  Ok(entity)
}

#[derive(Clone)]
pub struct EntityRegistry {
  kinds: BTreeMap<&'static str, HydrateFn>,
}

impl Default for EntityRegistry {
  /// Registry with every built-in kind.
  fn default() -> Self {
    let mut registry = Self::new();
    registry.register::<AssociativeEntity>();
    registry
  }
}

impl fmt::Debug for EntityRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EntityRegistry").field("kinds", &self.kinds()).finish()
  }
}

impl EntityRegistry {
  /// An empty registry; nothing can be hydrated until kinds are registered.
  pub fn new() -> Self {
    Self { kinds: BTreeMap::new() }
  }

  /// Register `E` under its kind tag, replacing a previous registration.
  pub fn register<E: Hydrate>(&mut self) -> &mut Self {
    self.register_fn(E::KIND, hydrate_erased::<E>)
  }

  /// Register a raw hydration function under `kind`.
  pub fn register_fn(&mut self, kind: &'static str, hydrate: HydrateFn) -> &mut Self {
    if self.kinds.insert(kind, hydrate).is_some() {
      trace!(kind, "replaced entity kind registration");
    }
    self
  }

  pub fn contains(&self, kind: &str) -> bool {
    self.kinds.contains_key(kind)
  }

  /// Registered kind tags, sorted.
  pub fn kinds(&self) -> Vec<&'static str> {
    self.kinds.keys().copied().collect()
  }

  /// Rebuild the entity described by `record`.
  pub fn hydrate(&self, record: ResourceRecord, file_path: PathBuf) -> Result<Arc<dyn Entity>, HydrateError> {
    let hydrate = self
      .kinds
      .get(record.kind.as_str())
      .ok_or_else(|| HydrateError::UnknownKind(record.kind.clone()))?;
    hydrate(record, file_path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::downcast;
  use serde_json::json;

  #[test]
  fn default_registry_knows_associative() {
    let registry = EntityRegistry::default();
    assert!(registry.contains("associative"));
    assert_eq!(registry.kinds(), vec!["associative"]);
  }

  #[test]
  fn empty_registry_rejects_everything() {
    let registry = EntityRegistry::new();
    let record = ResourceRecord::new("widget", "associative", json!({}));
    let result = registry.hydrate(record, PathBuf::from("widget.entity.json"));
    assert!(matches!(result, Err(HydrateError::UnknownKind(kind)) if kind == "associative"));
  }

  #[test]
  fn unknown_kind_is_rejected() {
    let registry = EntityRegistry::default();
    let record = ResourceRecord::new("widget", "std::process::Command", json!({}));
    let result = registry.hydrate(record, PathBuf::from("widget.entity.json"));
    assert!(matches!(result, Err(HydrateError::UnknownKind(_))));
  }

  #[test]
  fn hydrate_dispatches_on_kind() {
    let registry = EntityRegistry::default();
    let record = ResourceRecord::new("widget", "associative", json!({"a": 1}));
    let entity = registry.hydrate(record, PathBuf::from("widget.entity.json")).unwrap();

    assert_eq!(entity.kind(), "associative");
    let entity = downcast::<AssociativeEntity>(entity).unwrap();
    assert_eq!(entity.get("a"), Some(&json!(1)));
  }
}

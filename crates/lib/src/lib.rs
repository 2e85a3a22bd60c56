//! stowage-lib: process-local, file-backed lazy entity cache
//!
//! This crate provides:
//! - `Entity` / `Hydrate`: the contract of objects rebuilt from persisted records
//! - `EntityRegistry`: kind tag -> constructor dispatch for records on disk
//! - `ResourceRecord`: the JSON record stored per resource name
//! - `StorageManager`: resolves names to files and hydrates each name at most once

pub mod cache;
pub mod consts;
pub mod entity;
pub mod manager;
pub mod store;

pub use cache::CacheStats;
pub use entity::{AssociativeEditor, AssociativeEntity, Entity, EntityRegistry, Hydrate, HydrateError};
pub use manager::{
  FallbackWarning, ManagerError, ResourceError, StorageConfig, StorageManager, StorageManagerBuilder,
  TracingWarningSink, WarningSink, global,
};
pub use store::{RecordError, ResourceRecord, entity_file_name, normalize_key};

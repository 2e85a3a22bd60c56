//! Built-in key-value entity.
//!
//! Hydration yields an immutable [`AssociativeEntity`]. Changes go through an
//! [`AssociativeEditor`] obtained with [`AssociativeEntity::edit`], which owns
//! its own copy of the data and can persist it or be frozen back into a snapshot.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{Entity, Hydrate, HydrateError};
use crate::store::{RecordError, ResourceRecord};

type Entries = BTreeMap<String, Value>;

/// Read-only key-value snapshot as hydrated from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociativeEntity {
  name: String,
  file_path: PathBuf,
  data: Entries,
}

impl AssociativeEntity {
  pub fn new(name: impl Into<String>, file_path: PathBuf, data: Entries) -> Self {
    Self {
      name: name.into(),
      file_path,
      data,
    }
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.data.get(key)
  }

  pub fn has(&self, key: &str) -> bool {
    self.data.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.data.keys().map(String::as_str)
  }

  pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
    self.data.iter()
  }

  /// Open a mutable copy. The snapshot itself is left untouched.
  pub fn edit(&self) -> AssociativeEditor {
    AssociativeEditor {
      name: self.name.clone(),
      file_path: self.file_path.clone(),
      data: self.data.clone(),
    }
  }
}

impl<'a> IntoIterator for &'a AssociativeEntity {
  type Item = (&'a String, &'a Value);
  type IntoIter = btree_map::Iter<'a, String, Value>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl Entity for AssociativeEntity {
  fn name(&self) -> &str {
    &self.name
  }

  fn kind(&self) -> &'static str {
    Self::KIND
  }

  fn file_path(&self) -> &Path {
    &self.file_path
  }

  fn data(&self) -> Value {
    to_object(&self.data)
  }
}

impl Hydrate for AssociativeEntity {
  const KIND: &'static str = "associative";

  fn hydrate(record: ResourceRecord, file_path: PathBuf) -> Result<Self, HydrateError> {
    let object = match record.data {
      Value::Object(object) => object,
      other => {
        return Err(HydrateError::InvalidData {
          name: record.name,
          kind: Self::KIND,
          reason: format!("expected an object, found {}", json_type(&other)),
        });
      }
    };

    Ok(Self::new(record.name, file_path, object.into_iter().collect()))
  }
}

/// Mutable working copy of an [`AssociativeEntity`].
#[derive(Debug, Clone, PartialEq)]
pub struct AssociativeEditor {
  name: String,
  file_path: PathBuf,
  data: Entries,
}

impl AssociativeEditor {
  pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
    self.data.insert(key.into(), value.into());
    self
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.data.get(key)
  }

  pub fn has(&self, key: &str) -> bool {
    self.data.contains_key(key)
  }

  /// Remove `key`, returning its previous value.
  pub fn remove(&mut self, key: &str) -> Option<Value> {
    self.data.remove(key)
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
    self.data.iter()
  }

  pub fn file_path(&self) -> &Path {
    &self.file_path
  }

  /// Persist the edited state to the backing record.
  pub fn save(&self) -> Result<(), RecordError> {
    ResourceRecord::new(&self.name, AssociativeEntity::KIND, to_object(&self.data)).write(&self.file_path)
  }

  /// Close the editor, producing a new read-only snapshot.
  pub fn freeze(self) -> AssociativeEntity {
    AssociativeEntity::new(self.name, self.file_path, self.data)
  }
}

fn to_object(data: &Entries) -> Value {
  Value::Object(data.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Map<String, Value>>())
}

fn json_type(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

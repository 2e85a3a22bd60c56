//! The serialized unit stored per resource.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::consts::RECORD_FORMAT_VERSION;

/// Errors raised while reading or writing a resource record.
#[derive(Debug, Error)]
pub enum RecordError {
  #[error("failed to read record '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse record '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("record '{path}' is missing the '{field}' field")]
  MissingField { path: PathBuf, field: &'static str },

  #[error("record '{path}' belongs to '{found}', expected '{expected}'")]
  NameMismatch {
    path: PathBuf,
    expected: String,
    found: String,
  },

  #[error("record '{path}' uses unsupported format version {version}")]
  UnsupportedVersion { path: PathBuf, version: u32 },

  #[error("failed to serialize record '{name}': {source}")]
  Serialize {
    name: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to create directory '{path}': {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write record '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A persisted resource: which entity kind rebuilds it, and the raw data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
  pub version: u32,
  pub name: String,
  pub kind: String,
  pub data: Value,
}

/// Lenient on-disk shape, so missing fields surface as `MissingField`
/// rather than an opaque parse error.
#[derive(Deserialize)]
struct RawRecord {
  version: Option<u32>,
  name: Option<String>,
  kind: Option<String>,
  data: Option<Value>,
}

impl ResourceRecord {
  pub fn new(name: impl Into<String>, kind: impl Into<String>, data: Value) -> Self {
    Self {
      version: RECORD_FORMAT_VERSION,
      name: name.into(),
      kind: kind.into(),
      data,
    }
  }

  /// Load the record for `name` stored at `path`.
  ///
  /// Returns `Ok(None)` if the file doesn't exist. A record without a `name`
  /// field is attributed to `name`; a record naming another resource is an error.
  pub fn load(path: &Path, name: &str) -> Result<Option<Self>, RecordError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => {
        return Err(RecordError::Read {
          path: path.to_path_buf(),
          source: e,
        });
      }
    };

    let raw: RawRecord = serde_json::from_str(&content).map_err(|e| RecordError::Parse {
      path: path.to_path_buf(),
      source: e,
    })?;

    let version = raw.version.unwrap_or(RECORD_FORMAT_VERSION);
    if version != RECORD_FORMAT_VERSION {
      return Err(RecordError::UnsupportedVersion {
        path: path.to_path_buf(),
        version,
      });
    }

    let kind = raw.kind.ok_or_else(|| RecordError::MissingField {
      path: path.to_path_buf(),
      field: "kind",
    })?;
    let data = raw.data.ok_or_else(|| RecordError::MissingField {
      path: path.to_path_buf(),
      field: "data",
    })?;

    let name = match raw.name {
      Some(found) if found != name => {
        return Err(RecordError::NameMismatch {
          path: path.to_path_buf(),
          expected: name.to_string(),
          found,
        });
      }
      Some(found) => found,
      None => name.to_string(),
    };

    debug!(name, %kind, path = %path.display(), "loaded resource record");
    Ok(Some(Self {
      version,
      name,
      kind,
      data,
    }))
  }

  /// Write the record to `path`, replacing any previous content.
  ///
  /// Uses atomic write (write to temp, then rename) to prevent corruption.
  pub fn write(&self, path: &Path) -> Result<(), RecordError> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(|e| RecordError::CreateDir {
        path: parent.to_path_buf(),
        source: e,
      })?;
    }

    let content = serde_json::to_string_pretty(self).map_err(|e| RecordError::Serialize {
      name: self.name.clone(),
      source: e,
    })?;

    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    fs::write(&temp_path, content).map_err(|e| RecordError::Write {
      path: temp_path.clone(),
      source: e,
    })?;
    fs::rename(&temp_path, path).map_err(|e| RecordError::Write {
      path: path.to_path_buf(),
      source: e,
    })?;

    debug!(name = %self.name, kind = %self.kind, path = %path.display(), "wrote resource record");
    Ok(())
  }
}

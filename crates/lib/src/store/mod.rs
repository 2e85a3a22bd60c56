//! On-disk layout of persisted resources.
//!
//! Every resource lives in exactly one file directly below the storage root:
//!
//! ```text
//! <storage root>/
//! ├── widget.entity.json               # verbatim key
//! └── app-settings@3f2a9c81d0b4e6a7.entity.json # slug + name hash
//! ```
//!
//! The file holds a [`ResourceRecord`](record::ResourceRecord) serialized as JSON.

pub mod paths;
pub mod record;

pub use paths::{entity_file_name, normalize_key, resource_path};
pub use record::{RecordError, ResourceRecord};

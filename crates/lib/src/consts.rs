/// Application name used for fallback storage directories.
pub const APP_NAME: &str = "stowage";

/// Extension appended to every normalized resource key.
pub const ENTITY_FILE_EXTENSION: &str = ".entity.json";

/// Current on-disk record format version.
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// Number of hex characters of the name hash appended to non-verbatim keys.
pub const KEY_HASH_LEN: usize = 16;

/// Longest resource name that is used as a file name verbatim.
pub const MAX_VERBATIM_KEY_LEN: usize = 64;

/// Longest readable prefix kept in front of a key hash.
pub const MAX_SLUG_LEN: usize = 48;

/// Separator between slug and hash. Never part of a verbatim key.
pub const KEY_HASH_SEPARATOR: char = '@';

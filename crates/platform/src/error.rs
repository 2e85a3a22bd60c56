//! Error types for stowage-platform

use thiserror::Error;

/// Errors that can occur in platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Failed to determine home directory")]
    NoHomeDirectory,

    #[error("Failed to determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("Path error: path is empty")]
    EmptyPath,
}

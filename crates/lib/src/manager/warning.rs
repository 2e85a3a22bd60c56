//! Notification emitted when the storage root falls back to a system directory.

use std::fmt;
use std::path::PathBuf;

use stowage_platform::SystemDirectoryKind;
use tracing::warn;

/// Config flag that marks the fallback as intentional.
pub const EXPECT_FALLBACK_FLAG: &str = "expect_system_cache_directory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackWarning {
  /// Type name of the manager that fell back.
  pub manager: &'static str,
  pub fallback: SystemDirectoryKind,
  /// The storage root that was adopted.
  pub directory: PathBuf,
  /// Flag that would have made the fallback explicit, if it was not set.
  pub argument: Option<&'static str>,
}

impl fmt::Display for FallbackWarning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "The {} is using the {} at {}. Please ensure this is intentional.",
      self.manager,
      self.fallback,
      self.directory.display()
    )?;
    if let Some(argument) = self.argument {
      write!(f, " You can set `{}` to true to allow this.", argument)?;
    }
    Ok(())
  }
}

/// Receiver for fallback warnings.
pub trait WarningSink: Send + Sync {
  fn warn(&self, warning: &FallbackWarning);
}

impl<F> WarningSink for F
where
  F: Fn(&FallbackWarning) + Send + Sync,
{
  fn warn(&self, warning: &FallbackWarning) {
    self(warning);
  }
}

/// Forwards warnings to `tracing` at `WARN` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarningSink;

impl WarningSink for TracingWarningSink {
  fn warn(&self, warning: &FallbackWarning) {
    warn!(
      manager = warning.manager,
      fallback = %warning.fallback,
      directory = %warning.directory.display(),
      argument = ?warning.argument,
      "{}",
      warning
    );
  }
}

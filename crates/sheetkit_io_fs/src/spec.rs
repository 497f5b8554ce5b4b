//! Retention policy models and top-level error types.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default maximum age of a generated file before it becomes eligible for deletion.
pub const N_SECS_RETENTION_AGE_MAX_DEFAULT: u64 = 60 * 60;

////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `sweep_expired_files`.
#[derive(Debug, Clone)]
pub struct SpecRetentionPolicy {
    /// Entries strictly older than this are deleted.
    pub age_max: Duration,
    /// Maximum worker threads for the deletion stage.
    pub num_workers_max: Option<usize>,
}

impl Default for SpecRetentionPolicy {
    fn default() -> Self {
        Self {
            age_max: Duration::from_secs(N_SECS_RETENTION_AGE_MAX_DEFAULT),
            num_workers_max: None,
        }
    }
}

/// One sweep failure item with path + error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSweepError {
    /// Entry that could not be inspected or removed.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

/// "Top-level call failed" errors (the directory itself is unusable).
#[derive(Debug)]
pub enum SweepError {
    /// Swept directory does not exist.
    DirectoryMissing(PathBuf),
    /// Swept path exists but is not a directory.
    NotDirectory(PathBuf),
    /// Directory listing failed.
    ReadDirFailed {
        /// Directory that failed to list.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryMissing(path) => {
                write!(f, "Sweep directory does not exist: {}", path.display())
            }
            Self::NotDirectory(path) => {
                write!(f, "Sweep path is not a directory: {}", path.display())
            }
            Self::ReadDirFailed { path, message } => {
                write!(f, "Failed to read directory {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for SweepError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////

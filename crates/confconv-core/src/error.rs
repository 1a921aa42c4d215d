//! Error types for the conversion pipeline
//!
//! Provides error handling for:
//! - Directory operations (staging the target, listing the source)
//! - Per-file operations (read, transcode, write)
//! - Run coordination (collisions, timeouts, worker failures)

use crate::orchestrator::RunReport;
use std::path::PathBuf;
use std::time::Duration;

/// Errors raised by any stage of a conversion run
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Target path could not be inspected for a reason other than absence
    #[error("error checking target directory {path}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Pre-existing target could not be deleted
    #[error("error deleting target directory {path}: {source}")]
    DirectoryRemoval {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fresh target directory could not be created
    #[error("error creating target directory {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source directory could not be listed
    #[error("error reading source directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file could not be read
    #[error("error reading file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source document is not valid in the source grammar
    #[error("error converting file {path}: {message}")]
    Transcode { path: PathBuf, message: String },

    /// Converted document could not be written
    #[error("error writing file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two source files derive the same destination name
    #[error("{first} and {second} would both be written to {target}")]
    DestinationCollision {
        target: PathBuf,
        first: String,
        second: String,
    },

    /// A single job exceeded its time budget
    #[error("conversion of {path} timed out after {}s", .timeout.as_secs_f64())]
    JobTimeout { path: PathBuf, timeout: Duration },

    /// A worker task panicked or was aborted
    #[error("conversion worker failed: {0}")]
    WorkerPanicked(String),

    /// Run was cancelled before every job finished
    #[error("conversion cancelled")]
    Cancelled,
}

impl ConvertError {
    /// Create directory access error for path
    pub fn directory_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryAccess {
            path: path.into(),
            source,
        }
    }

    /// Create directory removal error for path
    pub fn directory_removal(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryRemoval {
            path: path.into(),
            source,
        }
    }

    /// Create directory creation error for path
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }

    /// Create directory read error for path
    pub fn directory_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    /// Create file read error for path
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create transcode error for path
    pub fn transcode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Transcode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create file write error for path
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is raised before any job is scheduled
    #[inline]
    #[must_use]
    pub fn is_fatal_before_jobs(&self) -> bool {
        matches!(
            self,
            Self::DirectoryAccess { .. }
                | Self::DirectoryRemoval { .. }
                | Self::DirectoryCreation { .. }
                | Self::DirectoryRead { .. }
                | Self::DestinationCollision { .. }
        )
    }

    /// The file or directory this error is about, if any
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::DirectoryAccess { path, .. }
            | Self::DirectoryRemoval { path, .. }
            | Self::DirectoryCreation { path, .. }
            | Self::DirectoryRead { path, .. }
            | Self::FileRead { path, .. }
            | Self::Transcode { path, .. }
            | Self::FileWrite { path, .. }
            | Self::JobTimeout { path, .. } => Some(path),
            Self::DestinationCollision { target, .. } => Some(target),
            Self::WorkerPanicked(_) | Self::Cancelled => None,
        }
    }
}

/// A run that stopped on its first error
///
/// Carries what was converted before the run was cancelled so callers can
/// print a partial summary.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct RunFailure {
    /// First error recorded by the run
    pub error: ConvertError,
    /// Files converted before the run drained
    pub report: RunReport,
}

impl RunFailure {
    /// Failure that happened before any job ran
    #[must_use]
    pub fn before_jobs(error: ConvertError) -> Self {
        Self {
            error,
            report: RunReport::default(),
        }
    }
}

impl From<ConvertError> for RunFailure {
    fn from(error: ConvertError) -> Self {
        Self::before_jobs(error)
    }
}

/// Result type alias for pipeline operations
pub type ConvertResult<T> = Result<T, ConvertError>;

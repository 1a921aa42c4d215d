//! Run configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How destination filenames are derived from source filenames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingMode {
    /// Replace every `yml`/`yaml` token anywhere in the name
    #[default]
    Literal,
    /// Replace only the trailing `.yml`/`.yaml` extension
    Suffix,
}

/// Configuration for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Directory holding the source documents
    pub source_dir: PathBuf,
    /// Directory that is wiped and refilled with converted documents
    pub target_dir: PathBuf,
    /// Maximum number of jobs running at once
    pub max_concurrent_jobs: usize,
    /// Time budget for a single job (read, transcode, write)
    pub job_timeout: Option<Duration>,
    /// Destination naming rule
    pub naming: NamingMode,
    /// Permission bits for written files (Unix only)
    pub file_mode: u32,
}

impl ConvertConfig {
    /// Default permission bits for converted files
    pub const DEFAULT_FILE_MODE: u32 = 0o644;

    /// Create configuration for a source and target directory
    #[must_use]
    pub fn new(source_dir: impl AsRef<Path>, target_dir: impl AsRef<Path>) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
            target_dir: target_dir.as_ref().to_path_buf(),
            max_concurrent_jobs: default_parallelism(),
            job_timeout: None,
            naming: NamingMode::default(),
            file_mode: Self::DEFAULT_FILE_MODE,
        }
    }

    /// With max concurrent jobs (clamped to at least one)
    #[inline]
    #[must_use]
    pub fn with_max_jobs(mut self, max: usize) -> Self {
        self.max_concurrent_jobs = max.max(1);
        self
    }

    /// With per-job timeout
    #[inline]
    #[must_use]
    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.job_timeout = Some(timeout);
        self
    }

    /// With naming mode
    #[inline]
    #[must_use]
    pub fn with_naming(mut self, naming: NamingMode) -> Self {
        self.naming = naming;
        self
    }

    /// With output file permission bits
    #[inline]
    #[must_use]
    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get)
}

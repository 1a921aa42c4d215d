//! Single-file conversion jobs

use crate::error::{ConvertError, ConvertResult};
use crate::formats::Transcoder;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinError;
use tokio::time::Instant;
use tracing::{debug, info};

/// One file's conversion: read, transcode, write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Base name of the source file
    pub file_name: String,
    /// Full path of the source file
    pub source_path: PathBuf,
    /// Full path of the destination file
    pub target_path: PathBuf,
}

impl ConversionJob {
    /// Create job for `file_name` in `source_dir` writing `target_name` in `target_dir`
    #[must_use]
    pub fn new(source_dir: &Path, target_dir: &Path, file_name: &str, target_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            source_path: source_dir.join(file_name),
            target_path: target_dir.join(target_name),
        }
    }

    /// Hidden sibling the output is written to before being renamed into place
    #[must_use]
    pub fn partial_path(&self) -> PathBuf {
        let name = self
            .target_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.target_path.with_file_name(format!(".{name}.partial"))
    }
}

/// A file written by a finished job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    /// Source document
    pub source: PathBuf,
    /// Written document
    pub target: PathBuf,
    /// Size of the written document
    pub bytes: usize,
}

/// How a job ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Output written and renamed into place
    Converted(ConvertedFile),
    /// Run was cancelled before the output was committed
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    limit: Duration,
}

impl Deadline {
    fn starting_now(limit: Duration) -> Self {
        Self {
            at: Instant::now() + limit,
            limit,
        }
    }

    fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    fn exceeded(self, job: &ConversionJob) -> ConvertError {
        ConvertError::JobTimeout {
            path: job.source_path.clone(),
            timeout: self.limit,
        }
    }
}

/// Execute one job
///
/// The cancel flag is checked before the source is read and again before
/// the output is committed; a cancelled job leaves nothing behind.
///
/// With a `timeout`, reading and transcoding are abandoned once it elapses,
/// and a job whose budget ran out while writing is discarded instead of
/// renamed into place. The rename itself is never interrupted.
///
/// # Errors
/// - `ConvertError::FileRead` if the source cannot be read
/// - `ConvertError::Transcode` if the source is not a valid document
/// - `ConvertError::FileWrite` if the output cannot be written
/// - `ConvertError::JobTimeout` if the job did not commit within `timeout`
/// - `ConvertError::WorkerPanicked` if the transcoder panicked
pub async fn run_job<T: Transcoder + ?Sized>(
    job: &ConversionJob,
    transcoder: &Arc<T>,
    file_mode: u32,
    timeout: Option<Duration>,
    cancel: &AtomicBool,
) -> ConvertResult<JobOutcome> {
    if cancel.load(Ordering::SeqCst) {
        return Ok(JobOutcome::Cancelled);
    }

    let deadline = timeout.map(Deadline::starting_now);
    let produce = read_and_transcode(job, transcoder);
    let output = match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline.at, produce)
            .await
            .map_err(|_| deadline.exceeded(job))??,
        None => produce.await?,
    };

    let partial = job.partial_path();
    if let Err(e) = write_partial(&partial, &output, file_mode).await {
        discard(&partial).await;
        return Err(ConvertError::file_write(&job.target_path, e));
    }

    if !commit(job, deadline, cancel).await? {
        return Ok(JobOutcome::Cancelled);
    }

    info!(
        source = %job.source_path.display(),
        target = %job.target_path.display(),
        "Converted file"
    );

    Ok(JobOutcome::Converted(ConvertedFile {
        source: job.source_path.clone(),
        target: job.target_path.clone(),
        bytes: output.len(),
    }))
}

async fn read_and_transcode<T: Transcoder + ?Sized>(
    job: &ConversionJob,
    transcoder: &Arc<T>,
) -> ConvertResult<Vec<u8>> {
    let input = fs::read(&job.source_path)
        .await
        .map_err(|e| ConvertError::file_read(&job.source_path, e))?;

    // Parsing is CPU-bound; keep it off the runtime threads.
    let transcoder = Arc::clone(transcoder);
    let path = job.source_path.clone();
    tokio::task::spawn_blocking(move || transcoder.transcode(&path, &input))
        .await
        .map_err(|e| transcoder_panicked(&job.source_path, e))?
}

fn transcoder_panicked(path: &Path, err: JoinError) -> ConvertError {
    let detail = match err.try_into_panic() {
        Ok(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic".to_string()),
        Err(err) => err.to_string(),
    };
    ConvertError::WorkerPanicked(format!("{}: {detail}", path.display()))
}

/// Rename the partial output into place unless the run was cancelled or the
/// job ran out of time; returns whether the output was committed
async fn commit(
    job: &ConversionJob,
    deadline: Option<Deadline>,
    cancel: &AtomicBool,
) -> ConvertResult<bool> {
    let partial = job.partial_path();

    if cancel.load(Ordering::SeqCst) {
        debug!(path = %job.target_path.display(), "Discarding output of cancelled run");
        discard(&partial).await;
        return Ok(false);
    }

    if let Some(deadline) = deadline.filter(Deadline::expired) {
        discard(&partial).await;
        return Err(deadline.exceeded(job));
    }

    if let Err(e) = fs::rename(&partial, &job.target_path).await {
        discard(&partial).await;
        return Err(ConvertError::file_write(&job.target_path, e));
    }

    Ok(true)
}

async fn write_partial(path: &Path, contents: &[u8], file_mode: u32) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(file_mode);
    #[cfg(not(unix))]
    let _ = file_mode;

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.flush().await
}

/// Best-effort removal of a partial output
async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            debug!(path = %path.display(), error = %e, "Could not remove partial output");
        }
    }
}

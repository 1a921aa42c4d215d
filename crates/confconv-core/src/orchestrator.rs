//! Conversion orchestrator
//!
//! Drives a run end to end:
//!
//! ```text
//! stage target → enumerate sources → plan jobs → queue → worker pool → barrier → report
//! ```
//!
//! Workers pull jobs from a bounded queue. The first failing job records its
//! error and raises the cancel flag; remaining workers drain the queue
//! without starting new conversions, and the run returns once every worker
//! has finished.

use crate::config::ConvertConfig;
use crate::enumerate::{enumerate_sources, FileSet};
use crate::error::{ConvertError, ConvertResult, RunFailure};
use crate::formats::{Transcoder, YamlToJson};
use crate::job::{run_job, ConversionJob, ConvertedFile, JobOutcome};
use crate::naming::derive_target_name;
use crate::staging::stage_target_dir;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Summary of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Number of eligible source files
    pub eligible: usize,
    /// Files written, ordered by source path
    pub converted: Vec<ConvertedFile>,
    /// Jobs that ended in an error
    pub failed: usize,
    /// Jobs not run, or not committed, because the run was cancelled
    pub skipped: usize,
}

impl RunReport {
    /// One-line partial-success summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Converted {} of {} files",
            self.converted.len(),
            self.eligible
        )
    }

    /// Whether every eligible file was converted
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.converted.len() == self.eligible
    }

    /// Count jobs that never reported back as skipped
    fn settle(&mut self) {
        let accounted = self.converted.len() + self.failed + self.skipped;
        self.skipped += self.eligible.saturating_sub(accounted);
    }
}

/// Handle for cancelling a run from outside
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Request cancellation; jobs not yet committed are discarded
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// State shared by the workers of one run
struct Shared<T> {
    transcoder: Arc<T>,
    file_mode: u32,
    job_timeout: Option<Duration>,
    cancelled: Arc<AtomicBool>,
    first_error: Mutex<Option<ConvertError>>,
    tally: Mutex<Tally>,
}

#[derive(Debug, Default)]
struct Tally {
    converted: Vec<ConvertedFile>,
    failed: usize,
    skipped: usize,
}

impl<T: Transcoder> Shared<T> {
    async fn run_one(&self, job: &ConversionJob) {
        let result = run_job(
            job,
            &self.transcoder,
            self.file_mode,
            self.job_timeout,
            &self.cancelled,
        )
        .await;

        match result {
            Ok(JobOutcome::Converted(file)) => self.tally.lock().await.converted.push(file),
            Ok(JobOutcome::Cancelled) => self.tally.lock().await.skipped += 1,
            Err(err) => {
                self.tally.lock().await.failed += 1;
                self.record_failure(err).await;
            }
        }
    }

    async fn record_failure(&self, err: ConvertError) {
        self.cancelled.store(true, Ordering::SeqCst);
        let mut slot = self.first_error.lock().await;
        if slot.is_none() {
            error!("{err}");
            *slot = Some(err);
        } else {
            warn!("Additional failure after cancellation: {err}");
        }
    }
}

async fn worker<T: Transcoder>(
    queue: Arc<Mutex<mpsc::Receiver<ConversionJob>>>,
    shared: Arc<Shared<T>>,
) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some(job) = next else {
            break;
        };

        if shared.cancelled.load(Ordering::SeqCst) {
            shared.tally.lock().await.skipped += 1;
            continue;
        }

        shared.run_one(&job).await;
    }
}

/// Converts every eligible file of a source directory into a fresh target directory
///
/// A converter drives a single run; [`Converter::run`] consumes it.
#[derive(Debug)]
pub struct Converter<T: Transcoder = YamlToJson> {
    config: ConvertConfig,
    transcoder: Arc<T>,
    cancelled: Arc<AtomicBool>,
}

impl Converter<YamlToJson> {
    /// Create YAML → JSON converter
    #[must_use]
    pub fn new(config: ConvertConfig) -> Self {
        Self::with_transcoder(config, YamlToJson)
    }
}

impl<T: Transcoder> Converter<T> {
    /// Create converter using a custom transcoder
    #[must_use]
    pub fn with_transcoder(config: ConvertConfig, transcoder: T) -> Self {
        Self {
            config,
            transcoder: Arc::new(transcoder),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Get a cancellation handle for this run
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// Derive one job per file, rejecting destination collisions
    ///
    /// # Errors
    /// - `ConvertError::DestinationCollision` if two files derive the same name
    pub fn plan(&self, files: &FileSet) -> ConvertResult<Vec<ConversionJob>> {
        let mut claimed: HashMap<String, &str> = HashMap::with_capacity(files.len());
        let mut jobs = Vec::with_capacity(files.len());

        for name in files.iter() {
            let target = derive_target_name(
                name,
                self.transcoder.source_extensions(),
                self.transcoder.target_extension(),
                self.config.naming,
            );

            if let Some(first) = claimed.get(&target) {
                return Err(ConvertError::DestinationCollision {
                    target: self.config.target_dir.join(&target),
                    first: (*first).to_string(),
                    second: name.to_string(),
                });
            }

            jobs.push(ConversionJob::new(
                &self.config.source_dir,
                &self.config.target_dir,
                name,
                &target,
            ));
            claimed.insert(target, name);
        }

        Ok(jobs)
    }

    /// Run the conversion
    ///
    /// # Errors
    /// Returns the first error of the run together with what was converted
    /// before the remaining jobs drained. Directory-level errors and
    /// collisions are returned before any job starts.
    pub async fn run(self) -> Result<RunReport, RunFailure> {
        if self.cancelled.load(Ordering::SeqCst) {
            return Err(ConvertError::Cancelled.into());
        }

        stage_target_dir(&self.config.target_dir).await?;

        info!(path = %self.config.source_dir.display(), "Reading source directory ...");
        let files = enumerate_sources(&self.config.source_dir, &*self.transcoder).await?;
        let jobs = self.plan(&files)?;

        info!("Converting {} files ...", jobs.len());
        let (report, first_error) = self.execute(jobs).await;

        if let Some(error) = first_error {
            return Err(RunFailure { error, report });
        }
        if !report.is_complete() && self.cancelled.load(Ordering::SeqCst) {
            return Err(RunFailure {
                error: ConvertError::Cancelled,
                report,
            });
        }

        info!(converted = report.converted.len(), "Done.");
        Ok(report)
    }

    async fn execute(&self, jobs: Vec<ConversionJob>) -> (RunReport, Option<ConvertError>) {
        let mut report = RunReport {
            eligible: jobs.len(),
            ..RunReport::default()
        };
        if jobs.is_empty() {
            return (report, None);
        }

        let shared = Arc::new(Shared {
            transcoder: Arc::clone(&self.transcoder),
            file_mode: self.config.file_mode,
            job_timeout: self.config.job_timeout,
            cancelled: Arc::clone(&self.cancelled),
            first_error: Mutex::new(None),
            tally: Mutex::new(Tally::default()),
        });

        let worker_count = self.config.max_concurrent_jobs.clamp(1, jobs.len());
        let (tx, rx) = mpsc::channel(worker_count);
        let queue = Arc::new(Mutex::new(rx));

        let mut workers = JoinSet::new();
        for _ in 0..worker_count {
            workers.spawn(worker(Arc::clone(&queue), Arc::clone(&shared)));
        }
        drop(queue);

        let mut pending = jobs.into_iter();
        for job in pending.by_ref() {
            if tx.send(job).await.is_err() {
                report.skipped += 1;
                break;
            }
        }
        report.skipped += pending.count();
        drop(tx);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                shared
                    .record_failure(ConvertError::WorkerPanicked(e.to_string()))
                    .await;
            }
        }

        // Jobs held by a panicked worker, or still queued when every worker
        // was gone, never reported back.
        let tally = std::mem::take(&mut *shared.tally.lock().await);
        report.converted = tally.converted;
        report.failed = tally.failed;
        report.skipped += tally.skipped;
        report.settle();

        report.converted.sort_by(|a, b| a.source.cmp(&b.source));
        let first_error = shared.first_error.lock().await.take();
        (report, first_error)
    }
}

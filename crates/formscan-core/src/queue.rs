//! Background job queue for pipeline runs.
//!
//! Callers submit document bytes and get a [`JobHandle`] back immediately.
//! A fixed pool of worker tasks pulls jobs off a bounded channel and runs
//! them through a shared [`FormPipeline`]. Results travel back over a
//! oneshot channel per job.
//!
//! ```text
//! submit() --> [mpsc, capacity] --> worker 0..N --> FormPipeline
//!    |                                   |
//!    +------ JobHandle <--- oneshot -----+
//! ```
//!
//! Dropping a [`JobHandle`] cancels its run: a queued job is skipped and a
//! running one is abandoned at its next await point.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::QueueConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::FormPipeline;
use crate::record::AnnotatedRecord;

type JobOutcome = PipelineResult<AnnotatedRecord>;

// ============================================================================
// JOB TYPES
// ============================================================================

/// A queued document waiting for a worker.
struct Job {
    id: Uuid,
    document: Vec<u8>,
    response_tx: oneshot::Sender<JobOutcome>,
}

impl Job {
    fn new(document: Vec<u8>) -> (Self, oneshot::Receiver<JobOutcome>) {
        let (tx, rx) = oneshot::channel();
        let job = Self {
            id: Uuid::new_v4(),
            document,
            response_tx: tx,
        };
        (job, rx)
    }
}

/// State of a submitted job.
#[derive(Debug)]
pub enum JobStatus {
    /// Queued or running.
    Pending,
    /// The run ended, successfully or not.
    Finished(JobOutcome),
}

impl JobStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Pending)
    }
}

/// Caller's side of a submitted job.
#[derive(Debug)]
pub struct JobHandle {
    id: Uuid,
    submitted_at: DateTime<Utc>,
    response_rx: oneshot::Receiver<JobOutcome>,
}

impl JobHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Check for a result without waiting.
    ///
    /// A finished result is handed out once; polling again afterwards
    /// reports [`PipelineError::QueueClosed`].
    pub fn poll(&mut self) -> JobStatus {
        match self.response_rx.try_recv() {
            Ok(outcome) => JobStatus::Finished(outcome),
            Err(oneshot::error::TryRecvError::Empty) => JobStatus::Pending,
            Err(oneshot::error::TryRecvError::Closed) => {
                JobStatus::Finished(Err(PipelineError::QueueClosed))
            }
        }
    }

    /// Wait for the run to finish.
    pub async fn wait(self) -> JobOutcome {
        self.response_rx
            .await
            .unwrap_or(Err(PipelineError::QueueClosed))
    }
}

// ============================================================================
// JOB QUEUE
// ============================================================================

/// Bounded queue feeding a fixed pool of pipeline workers.
pub struct JobQueue {
    request_tx: mpsc::Sender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl JobQueue {
    /// Spawn the worker pool. Must be called inside a tokio runtime.
    pub fn start(pipeline: Arc<FormPipeline>, config: &QueueConfig) -> Self {
        let (request_tx, request_rx) = mpsc::channel(config.capacity.max(1));
        let request_rx = Arc::new(Mutex::new(request_rx));

        let workers = (0..config.workers.max(1))
            .map(|worker_id| {
                let pipeline = pipeline.clone();
                let request_rx = request_rx.clone();
                tokio::spawn(async move {
                    worker_loop(worker_id, pipeline, request_rx).await;
                })
            })
            .collect::<Vec<_>>();

        info!(
            workers = workers.len(),
            capacity = config.capacity,
            "Job queue started"
        );

        Self {
            request_tx,
            workers,
        }
    }

    /// Enqueue a document. Waits while the queue is full.
    pub async fn submit(&self, document: Vec<u8>) -> PipelineResult<JobHandle> {
        let (job, response_rx) = Job::new(document);
        let handle = JobHandle {
            id: job.id,
            submitted_at: Utc::now(),
            response_rx,
        };

        self.request_tx
            .send(job)
            .await
            .map_err(|_| PipelineError::QueueClosed)?;

        debug!(job_id = %handle.id, "Job submitted");
        Ok(handle)
    }

    /// Stop accepting jobs, drain what is queued, and join the workers.
    pub async fn shutdown(self) {
        let Self {
            request_tx,
            workers,
        } = self;
        drop(request_tx);

        for worker in workers {
            if let Err(e) = worker.await {
                warn!(error = %e, "Queue worker ended abnormally");
            }
        }

        info!("Job queue shut down");
    }
}

async fn worker_loop(
    worker_id: usize,
    pipeline: Arc<FormPipeline>,
    request_rx: Arc<Mutex<mpsc::Receiver<Job>>>,
) {
    loop {
        let job = {
            let mut rx = request_rx.lock().await;
            rx.recv().await
        };
        let Some(Job {
            id,
            document,
            mut response_tx,
        }) = job
        else {
            break;
        };

        if response_tx.is_closed() {
            debug!(worker_id, job_id = %id, "Skipping cancelled job");
            continue;
        }

        debug!(worker_id, job_id = %id, "Job started");
        let outcome = tokio::select! {
            outcome = pipeline.extract_and_validate(&document) => Some(outcome),
            _ = response_tx.closed() => None,
        };

        match outcome {
            Some(outcome) => {
                if let Err(e) = &outcome {
                    warn!(worker_id, job_id = %id, error = %e, "Job failed");
                }
                // Receiver may have gone away after the run finished
                let _ = response_tx.send(outcome);
            }
            None => debug!(worker_id, job_id = %id, "Job cancelled while running"),
        }
    }

    debug!(worker_id, "Queue worker exiting");
}

//! Lifecycle of "the current submission".
//!
//! Each [`JobController::start`] allocates a strictly greater [`JobId`] and
//! spawns one send task. Settlements come back over a channel and pass through
//! [`JobController::observe`], which discards anything not issued by the
//! currently active job. All state changes happen through `&mut self`, so the
//! active-job check cannot interleave with `start` or `cancel`.

use std::sync::Arc;

use fakecheck_analysis_contract::RawAnalysisResult;
use fakecheck_client::{AnalysisClient, AnalysisError};
use fakecheck_core::{CoreError, Job, JobId, JobStatus, SubmissionPayload};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// Outcome of one finished send, tagged with the job that issued it.
#[derive(Debug)]
pub struct Settlement {
    /// Job whose send finished.
    pub job_id: JobId,
    /// Raw result or categorized failure.
    pub outcome: Result<RawAnalysisResult, AnalysisError>,
}

/// Settlement that passed the staleness guard.
#[derive(Debug)]
pub enum JobEvent {
    /// The active job returned a result.
    Completed {
        /// Settled job.
        job: Job,
        /// Raw service result.
        result: RawAnalysisResult,
    },
    /// The active job failed.
    Failed {
        /// Settled job.
        job: Job,
        /// Categorized failure.
        error: AnalysisError,
    },
}

impl JobEvent {
    /// Job the event belongs to.
    pub fn job(&self) -> &Job {
        match self {
            JobEvent::Completed { job, .. } | JobEvent::Failed { job, .. } => job,
        }
    }
}

/// Owner of job identities and the active-job marker.
pub struct JobController {
    client: AnalysisClient,
    last_id: u64,
    current: Option<Job>,
    // Read by send tasks right before they issue the request.
    active: watch::Sender<Option<JobId>>,
    settle_tx: mpsc::UnboundedSender<Settlement>,
    settle_rx: mpsc::UnboundedReceiver<Settlement>,
}

impl JobController {
    /// Creates a controller with no jobs.
    pub fn new(client: AnalysisClient) -> Self {
        let (active, _) = watch::channel(None);
        let (settle_tx, settle_rx) = mpsc::unbounded_channel();
        Self {
            client,
            last_id: 0,
            current: None,
            active,
            settle_tx,
            settle_rx,
        }
    }

    /// Validates `payload`, makes it the active job, and spawns its send.
    ///
    /// Any pending job is superseded. Must be called within a tokio runtime.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyPayload`] without allocating an id when the
    /// payload has no url, text, or file.
    pub fn start(&mut self, payload: SubmissionPayload) -> Result<JobId, CoreError> {
        payload.validate()?;

        self.last_id += 1;
        let job_id = JobId::new(self.last_id);

        if let Some(previous) = self.current.as_mut()
            && previous.status == JobStatus::Pending
        {
            previous.status = JobStatus::Cancelled;
            debug!(job = %previous.id, superseded_by = %job_id, "analysis job superseded");
        }

        let payload = Arc::new(payload);
        self.current = Some(Job::pending(job_id, Arc::clone(&payload)));
        self.active.send_replace(Some(job_id));

        let client = self.client.clone();
        let settle_tx = self.settle_tx.clone();
        let active = self.active.subscribe();
        tokio::spawn(async move {
            let still_active = *active.borrow() == Some(job_id);
            if !still_active {
                debug!(job = %job_id, "job inactive before send, request skipped");
                return;
            }

            let outcome = client.send(&payload).await;
            // The receiver lives as long as the controller; a closed channel
            // means the session is gone and nobody observes this job.
            let _ = settle_tx.send(Settlement { job_id, outcome });
        });

        info!(job = %job_id, "analysis job started");
        Ok(job_id)
    }

    /// Marks the active job as superseded without aborting its request.
    ///
    /// Returns the cancelled job, if one was pending.
    pub fn cancel(&mut self) -> Option<JobId> {
        let cancelled = self
            .current
            .as_mut()
            .filter(|job| job.status == JobStatus::Pending)
            .map(|job| {
                job.status = JobStatus::Cancelled;
                job.id
            });
        self.active.send_replace(None);

        if let Some(job_id) = cancelled {
            info!(job = %job_id, "analysis job cancelled");
        }
        cancelled
    }

    /// Currently active job, if any.
    pub fn active_job(&self) -> Option<JobId> {
        *self.active.borrow()
    }

    /// Most recently started job, whatever its status.
    pub fn current_job(&self) -> Option<&Job> {
        self.current.as_ref()
    }

    /// Waits for the next settlement, stale or not.
    ///
    /// Returns `None` only if the settlement channel closed.
    pub async fn next_settlement(&mut self) -> Option<Settlement> {
        self.settle_rx.recv().await
    }

    /// Applies the staleness guard to one settlement.
    ///
    /// Returns `None`, with no state change, for settlements from superseded
    /// or cancelled jobs. Otherwise the job becomes settled and inactive.
    pub fn observe(&mut self, settlement: Settlement) -> Option<JobEvent> {
        let active = self.active_job();
        if active != Some(settlement.job_id) {
            debug!(
                job = %settlement.job_id,
                active = ?active.map(JobId::get),
                "stale settlement discarded"
            );
            return None;
        }

        let job = self
            .current
            .as_mut()
            .filter(|job| job.id == settlement.job_id)?;
        job.status = JobStatus::Settled;
        let job = job.clone();
        self.active.send_replace(None);

        Some(match settlement.outcome {
            Ok(result) => JobEvent::Completed { job, result },
            Err(error) => JobEvent::Failed { job, error },
        })
    }

    /// Waits for the active job's settlement, skipping stale ones.
    ///
    /// Returns `None` immediately when no job is active, including when the
    /// active job is cancelled while waiting between settlements.
    pub async fn next_event(&mut self) -> Option<JobEvent> {
        loop {
            self.active_job()?;
            let settlement = self.next_settlement().await?;
            if let Some(event) = self.observe(settlement) {
                return Some(event);
            }
        }
    }
}

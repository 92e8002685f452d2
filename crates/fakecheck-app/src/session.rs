//! One user's analysis session: controller, classification, stats, and view.

use fakecheck_analysis_contract::{VerdictPolicy, normalize};
use fakecheck_client::AnalysisClient;
use fakecheck_core::{JobId, SessionStats, SessionStatsAggregator, SubmissionPayload};
use fakecheck_ui::{
    DashboardKpis, ErrorView, ResultView, ViewState, ViewStateMachine, ViewTransitionError,
};
use tracing::{info, warn};

use crate::controller::{JobController, JobEvent};
use crate::{AppConfig, AppError};

/// Session façade driven by the UI event loop.
///
/// Every observed settle produces exactly one view transition and, for
/// results, exactly one stats increment. Discarded settles produce neither.
pub struct AnalysisSession {
    controller: JobController,
    policy: VerdictPolicy,
    stats: SessionStatsAggregator,
    view: ViewStateMachine,
}

impl AnalysisSession {
    /// Creates a session around an existing client.
    pub fn new(client: AnalysisClient, policy: VerdictPolicy) -> Self {
        Self {
            controller: JobController::new(client),
            policy,
            stats: SessionStatsAggregator::new(),
            view: ViewStateMachine::new(),
        }
    }

    /// Creates a session talking to the configured service over HTTP.
    ///
    /// # Errors
    /// Returns [`AppError::Client`] when the base address is unusable.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let client = AnalysisClient::with_reqwest(config.api_base_url.as_str())?;
        Ok(Self::new(client, config.policy))
    }

    /// Starts analysis of `payload` and enters `Loading`.
    ///
    /// # Errors
    /// - [`AppError::View`] unless the view is `Init` or `Error`.
    /// - [`AppError::Validation`] for empty payloads; the view is unchanged.
    pub fn submit(&mut self, payload: SubmissionPayload) -> Result<JobId, AppError> {
        if !self.view.can_begin_loading() {
            return Err(AppError::View(ViewTransitionError::Illegal {
                from: self.view.kind(),
                action: "submit",
            }));
        }

        let job_id = self.controller.start(payload)?;
        self.view.begin_loading(job_id)?;
        Ok(job_id)
    }

    /// Resubmits the last job's payload from the `Error` view.
    ///
    /// # Errors
    /// Returns [`AppError::NothingToRetry`] outside `Error` or when the error
    /// screen does not offer retry, otherwise see [`AnalysisSession::submit`].
    pub fn retry(&mut self) -> Result<JobId, AppError> {
        let retry_offered = match self.view.state() {
            ViewState::Error(view) => view.offers_retry(),
            _ => false,
        };
        if !retry_offered {
            return Err(AppError::NothingToRetry);
        }
        let payload = self
            .controller
            .current_job()
            .map(|job| job.payload.as_ref().clone())
            .ok_or(AppError::NothingToRetry)?;
        self.submit(payload)
    }

    /// Suppresses the in-flight job, if any, and returns to `Init`.
    pub fn cancel(&mut self) {
        self.controller.cancel();
        self.view.reset();
    }

    /// Explicit user reset: same as [`AnalysisSession::cancel`].
    pub fn reset(&mut self) {
        self.cancel();
    }

    /// Clears the session counters.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Waits for the active job to settle and applies its outcome.
    ///
    /// Returns `Ok(None)` when no job is active.
    ///
    /// # Errors
    /// Returns [`AppError::View`] if the view left `Loading` while the job was
    /// still active.
    pub async fn next_outcome(&mut self) -> Result<Option<&ViewState>, AppError> {
        let Some(event) = self.controller.next_event().await else {
            return Ok(None);
        };
        self.apply(event)?;
        Ok(Some(self.view.state()))
    }

    // The view transition runs before the stats update so that a rejected
    // transition leaves both untouched.
    fn apply(&mut self, event: JobEvent) -> Result<(), AppError> {
        debug_assert_eq!(
            self.view.loading_job(),
            Some(event.job().id),
            "settled outcome applied outside its Loading view"
        );
        match event {
            JobEvent::Completed { job, result } => {
                let score = normalize(&result);
                let verdict = self.policy.classify(&score, result.risk_level());
                let level = verdict.level;
                info!(
                    job = %job.id,
                    level = %level,
                    ai_probability = score.ai_probability,
                    real_probability = score.real_probability,
                    "analysis result observed"
                );

                let file_name = job.payload.file().map(|artifact| artifact.file_name.as_str());
                let view = ResultView::project(job.id, &result, score, verdict, file_name);
                self.view.show_result(view)?;
                self.stats.record(level);
            }
            JobEvent::Failed { job, error } => {
                warn!(job = %job.id, %error, retryable = error.is_retryable(), "analysis failed");
                self.view.show_error(ErrorView::project(job.id, error))?;
            }
        }
        Ok(())
    }

    /// Current view.
    pub fn view(&self) -> &ViewState {
        self.view.state()
    }

    /// Active job, if any.
    pub fn active_job(&self) -> Option<JobId> {
        self.controller.active_job()
    }

    /// Session counters.
    pub fn stats(&self) -> SessionStats {
        self.stats.snapshot()
    }

    /// Session dashboard derived from the counters.
    pub fn dashboard(&self) -> DashboardKpis {
        DashboardKpis::from_stats(&self.stats.snapshot())
    }

    /// Classification policy in use.
    pub fn policy(&self) -> &VerdictPolicy {
        &self.policy
    }
}

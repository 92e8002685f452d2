#![warn(missing_docs)]
//! # fakecheck-ui
//!
//! ## Purpose
//! Defines the UI-facing view model for `fakecheck`.
//!
//! ## Responsibilities
//! - Own the [`ViewStateMachine`] (`Init -> Loading -> Result | Error`).
//! - Project verdicts into display-ready [`ResultView`] values.
//! - Map categorized failures into [`ErrorView`] titles and actions.
//! - Derive the session dashboard ([`DashboardKpis`]) from session stats.
//!
//! ## Data flow
//! Session orchestration events drive [`ViewStateMachine`] transitions; the
//! rendering shell reads [`ViewStateMachine::state`].
//!
//! ## Ownership and lifetimes
//! View values own all strings so renderers never borrow from in-flight job
//! state.
//!
//! ## Error model
//! Illegal transitions are rejected with [`ViewTransitionError`] and leave the
//! current state untouched.
//!
//! ## Security and privacy notes
//! View state never contains artifact bytes.

use fakecheck_analysis_contract::{
    NormalizedScore, RawAnalysisResult, Verdict, default_description,
};
use fakecheck_client::AnalysisError;
use fakecheck_core::{JobId, SessionStats, VerdictLevel};
use thiserror::Error;

/// Title used when neither an analysis id nor a file name is known.
pub const DEFAULT_RESULT_TITLE: &str = "Analysis result";

/// Discriminant of [`ViewState`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// Submission form.
    Init,
    /// Waiting for the analysis service.
    Loading,
    /// Verdict display.
    Result,
    /// Failure display.
    Error,
}

/// Screen the session is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Submission form with session dashboard.
    Init,
    /// Job in flight.
    Loading {
        /// Job the screen is waiting on.
        job_id: JobId,
    },
    /// Observed verdict.
    Result(ResultView),
    /// Observed failure.
    Error(ErrorView),
}

impl ViewState {
    /// Returns the state discriminant.
    pub fn kind(&self) -> ViewKind {
        match self {
            ViewState::Init => ViewKind::Init,
            ViewState::Loading { .. } => ViewKind::Loading,
            ViewState::Result(_) => ViewKind::Result,
            ViewState::Error(_) => ViewKind::Error,
        }
    }
}

/// View state machine with explicit legal transitions.
///
/// `Init` is the only initial state and there is no terminal state.
#[derive(Debug, Clone)]
pub struct ViewStateMachine {
    state: ViewState,
}

impl ViewStateMachine {
    /// Creates a machine in `Init`.
    pub fn new() -> Self {
        Self {
            state: ViewState::Init,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Returns the current state discriminant.
    pub fn kind(&self) -> ViewKind {
        self.state.kind()
    }

    /// Returns `true` when a new submission may enter `Loading`.
    pub fn can_begin_loading(&self) -> bool {
        matches!(self.state, ViewState::Init | ViewState::Error(_))
    }

    /// Returns the job the `Loading` screen is waiting on.
    pub fn loading_job(&self) -> Option<JobId> {
        match self.state {
            ViewState::Loading { job_id } => Some(job_id),
            _ => None,
        }
    }

    /// `Init | Error -> Loading`.
    ///
    /// # Errors
    /// Returns [`ViewTransitionError`] from `Loading` or `Result`.
    pub fn begin_loading(&mut self, job_id: JobId) -> Result<(), ViewTransitionError> {
        if !self.can_begin_loading() {
            return Err(self.illegal("begin loading"));
        }
        self.state = ViewState::Loading { job_id };
        Ok(())
    }

    /// `Loading -> Result`.
    ///
    /// # Errors
    /// Returns [`ViewTransitionError`] unless currently `Loading`.
    pub fn show_result(&mut self, view: ResultView) -> Result<(), ViewTransitionError> {
        if self.kind() != ViewKind::Loading {
            return Err(self.illegal("show result"));
        }
        self.state = ViewState::Result(view);
        Ok(())
    }

    /// `Loading -> Error`.
    ///
    /// # Errors
    /// Returns [`ViewTransitionError`] unless currently `Loading`.
    pub fn show_error(&mut self, view: ErrorView) -> Result<(), ViewTransitionError> {
        if self.kind() != ViewKind::Loading {
            return Err(self.illegal("show error"));
        }
        self.state = ViewState::Error(view);
        Ok(())
    }

    /// Any state -> `Init`.
    pub fn reset(&mut self) {
        self.state = ViewState::Init;
    }

    fn illegal(&self, action: &'static str) -> ViewTransitionError {
        ViewTransitionError::Illegal {
            from: self.kind(),
            action,
        }
    }
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Display-ready projection of one observed verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// Job that produced the result.
    pub job_id: JobId,
    /// `#<analysisId>`, else the artifact file name, else [`DEFAULT_RESULT_TITLE`].
    pub title: String,
    /// Classified verdict.
    pub verdict: Verdict,
    /// Normalized probabilities the verdict was derived from.
    pub score: NormalizedScore,
    /// Backend conclusion, else the level's default description.
    pub description: String,
    /// Ordered backend evidence.
    pub evidences: Vec<String>,
    /// Server-hosted preview image.
    pub image_url: Option<String>,
}

impl ResultView {
    /// Builds the projection from a raw result and its classification.
    pub fn project(
        job_id: JobId,
        raw: &RawAnalysisResult,
        score: NormalizedScore,
        verdict: Verdict,
        file_name: Option<&str>,
    ) -> Self {
        let title = match (raw.analysis_id(), file_name) {
            (Some(id), _) => format!("#{id}"),
            (None, Some(name)) if !name.trim().is_empty() => name.to_string(),
            _ => DEFAULT_RESULT_TITLE.to_string(),
        };
        let description = raw
            .conclusion()
            .map(str::to_string)
            .unwrap_or_else(|| default_description(verdict.level).to_string());

        Self {
            job_id,
            title,
            verdict,
            score,
            description,
            evidences: raw.evidences(),
            image_url: raw.image_url().map(str::to_string),
        }
    }

    /// Real probability as a one-decimal percentage.
    pub fn real_percent(&self) -> String {
        format_percent(self.score.real_probability)
    }

    /// AI probability as a one-decimal percentage.
    pub fn ai_percent(&self) -> String {
        format_percent(self.score.ai_probability)
    }
}

/// User-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection problems and timeouts.
    Network,
    /// The service could not load the submitted content.
    ContentLoad,
    /// The artifact format is not supported.
    UnsupportedFormat,
    /// Any other analysis failure.
    AnalysisFailed,
}

/// Action offered on the error screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Resubmit the same payload.
    Retry,
    /// Return to the submission form.
    Back,
}

impl ErrorCategory {
    /// Selects the category for a categorized failure.
    pub fn from_error(error: &AnalysisError) -> Self {
        match error {
            AnalysisError::Network(_) | AnalysisError::Timeout { .. } => ErrorCategory::Network,
            AnalysisError::Service { code, .. } => code
                .as_deref()
                .and_then(Self::from_code)
                .unwrap_or(ErrorCategory::AnalysisFailed),
        }
    }

    /// Maps a backend error code onto a category.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "NETWORK" => Some(ErrorCategory::Network),
            "CONTENT_LOAD" => Some(ErrorCategory::ContentLoad),
            "UNSUPPORTED_FORMAT" => Some(ErrorCategory::UnsupportedFormat),
            "ANALYSIS_ERROR" => Some(ErrorCategory::AnalysisFailed),
            _ => None,
        }
    }

    /// Screen title.
    pub fn title(self) -> &'static str {
        match self {
            ErrorCategory::Network => "The network connection is unstable",
            ErrorCategory::ContentLoad => "The content could not be loaded",
            ErrorCategory::UnsupportedFormat => "This format is not supported",
            ErrorCategory::AnalysisFailed => "Something went wrong during analysis",
        }
    }

    /// Screen description.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCategory::Network => {
                "Check your connection and try again. If the problem persists, try again later."
            }
            ErrorCategory::ContentLoad => {
                "The article body could not be fetched. Check access permissions or robot blocking."
            }
            ErrorCategory::UnsupportedFormat => "Use a JPG/PNG image or a regular article URL.",
            ErrorCategory::AnalysisFailed => {
                "Please try again shortly. If the problem continues, send us feedback."
            }
        }
    }

    /// Actions offered for this category.
    pub fn actions(self) -> &'static [ErrorAction] {
        match self {
            ErrorCategory::Network | ErrorCategory::AnalysisFailed => {
                &[ErrorAction::Retry, ErrorAction::Back]
            }
            ErrorCategory::ContentLoad => &[ErrorAction::Retry],
            ErrorCategory::UnsupportedFormat => &[ErrorAction::Back],
        }
    }
}

/// Display-ready projection of one observed failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    /// Job that failed.
    pub job_id: JobId,
    /// Display category.
    pub category: ErrorCategory,
    /// Underlying failure.
    pub error: AnalysisError,
}

impl ErrorView {
    /// Builds the projection for a failed job.
    pub fn project(job_id: JobId, error: AnalysisError) -> Self {
        Self {
            job_id,
            category: ErrorCategory::from_error(&error),
            error,
        }
    }

    /// Returns `true` when the screen offers [`ErrorAction::Retry`].
    pub fn offers_retry(&self) -> bool {
        self.category.actions().contains(&ErrorAction::Retry)
    }
}

/// Session dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardKpis {
    /// Observed results this session.
    pub total_scans: u64,
    /// Results classified Danger.
    pub fake_detected: u64,
    /// Danger share, `"x.y%"` or `"0%"`.
    pub fake_rate: String,
    /// Suspect share, `"x.y%"` or `"0%"`.
    pub suspected_rate: String,
}

impl DashboardKpis {
    /// Derives the dashboard from a stats snapshot.
    pub fn from_stats(stats: &SessionStats) -> Self {
        Self {
            total_scans: stats.total,
            fake_detected: stats.fake,
            fake_rate: format_rate(stats, VerdictLevel::Danger),
            suspected_rate: format_rate(stats, VerdictLevel::Suspect),
        }
    }
}

/// Formats a `[0, 1]` probability as a one-decimal percentage.
pub fn format_percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

fn format_rate(stats: &SessionStats, level: VerdictLevel) -> String {
    if stats.total == 0 {
        return "0%".to_string();
    }
    format_percent(stats.rate(level))
}

/// Rejected view transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewTransitionError {
    /// The action is not legal from the current view.
    #[error("cannot {action} from {from:?} view")]
    Illegal {
        /// View the machine was in.
        from: ViewKind,
        /// Attempted action.
        action: &'static str,
    },
}

#[cfg(test)]
mod tests {
    //! Unit tests for view transitions and projections.

    use fakecheck_analysis_contract::{classify, normalize};

    use super::*;

    fn result_view(body: &str, file_name: Option<&str>) -> ResultView {
        let raw = RawAnalysisResult::parse(body.as_bytes()).expect("fixture should be valid json");
        let score = normalize(&raw);
        let verdict = classify(&score, raw.risk_level());
        ResultView::project(JobId::new(1), &raw, score, verdict, file_name)
    }

    #[test]
    fn loading_only_from_init_or_error() {
        let mut machine = ViewStateMachine::new();
        machine.begin_loading(JobId::new(1)).expect("init -> loading");
        assert!(machine.begin_loading(JobId::new(2)).is_err());
        assert_eq!(machine.loading_job(), Some(JobId::new(1)));

        machine
            .show_error(ErrorView::project(JobId::new(1), AnalysisError::Network("down".into())))
            .expect("loading -> error");
        machine.begin_loading(JobId::new(2)).expect("error -> loading");

        machine
            .show_result(result_view("{}", None))
            .expect("loading -> result");
        assert_eq!(
            machine.begin_loading(JobId::new(3)),
            Err(ViewTransitionError::Illegal {
                from: ViewKind::Result,
                action: "begin loading",
            })
        );

        machine.reset();
        assert_eq!(machine.kind(), ViewKind::Init);
    }

    #[test]
    fn settle_transitions_require_loading() {
        let mut machine = ViewStateMachine::new();
        assert!(machine.show_result(result_view("{}", None)).is_err());
        let timeout = ErrorView::project(JobId::new(1), AnalysisError::Timeout { ceiling_ms: 1 });
        assert!(machine.show_error(timeout).is_err());
        assert_eq!(machine.state(), &ViewState::Init);
    }

    #[test]
    fn result_title_prefers_analysis_id_then_file_name() {
        assert_eq!(result_view(r#"{"analysisId": 12}"#, Some("a.png")).title, "#12");
        assert_eq!(result_view("{}", Some("a.png")).title, "a.png");
        assert_eq!(result_view("{}", None).title, DEFAULT_RESULT_TITLE);
    }

    #[test]
    fn result_description_falls_back_to_level_default() {
        let view = result_view(r#"{"aiProbability": 90}"#, None);
        assert_eq!(view.description, default_description(VerdictLevel::Danger));

        let view = result_view(r#"{"aiProbability": 90, "conclusion": "Generated."}"#, None);
        assert_eq!(view.description, "Generated.");
        assert_eq!(view.ai_percent(), "90.0%");
        assert_eq!(view.real_percent(), "10.0%");
    }

    #[test]
    fn error_codes_select_categories() {
        let service = |code: &str| AnalysisError::Service {
            status: 400,
            code: Some(code.to_string()),
            message: "bad".to_string(),
        };

        assert_eq!(
            ErrorCategory::from_error(&service("UNSUPPORTED_FORMAT")),
            ErrorCategory::UnsupportedFormat
        );
        assert_eq!(
            ErrorCategory::from_error(&service("CONTENT_LOAD")),
            ErrorCategory::ContentLoad
        );
        assert_eq!(
            ErrorCategory::from_error(&service("SERVER_ERROR")),
            ErrorCategory::AnalysisFailed
        );
        assert_eq!(
            ErrorCategory::from_error(&AnalysisError::Timeout { ceiling_ms: 30_000 }),
            ErrorCategory::Network
        );
        assert!(!ErrorView::project(JobId::new(1), service("UNSUPPORTED_FORMAT")).offers_retry());
    }

    #[test]
    fn dashboard_avoids_division_by_zero() {
        let kpis = DashboardKpis::from_stats(&SessionStats::default());
        assert_eq!(kpis.fake_rate, "0%");
        assert_eq!(kpis.suspected_rate, "0%");

        let kpis = DashboardKpis::from_stats(&SessionStats {
            total: 3,
            ok: 1,
            suspect: 1,
            fake: 1,
        });
        assert_eq!(kpis.fake_rate, "33.3%");
        assert_eq!(kpis.fake_detected, 1);
    }
}

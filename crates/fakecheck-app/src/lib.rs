#![warn(missing_docs)]
//! # fakecheck-app
//!
//! ## Purpose
//! Orchestrates submission, analysis, classification, stats, and view state
//! for `fakecheck`.
//!
//! ## Responsibilities
//! - Own the job lifecycle and its staleness guard ([`JobController`]).
//! - Turn observed results into verdicts, stats, and view transitions
//!   ([`AnalysisSession`]).
//! - Validate runtime configuration ([`AppConfig`]).
//!
//! ## Data flow
//! UI submit -> [`AnalysisSession::submit`] -> [`JobController::start`] ->
//! client send task -> settlement -> staleness guard -> normalize -> classify ->
//! stats -> `Result`/`Error` view.
//!
//! ## Ownership and lifetimes
//! The session owns the controller, aggregator, and view machine outright and
//! is mutated only from the event loop, so no locks guard them. Send tasks own
//! a client clone and an `Arc` of their payload.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]. Remote failures are not
//! errors at this level: they become the `Error` view.
//!
//! ## Security and privacy notes
//! Logs identify artifacts by digest only and strip URL query strings.

mod controller;
mod session;

pub use controller::{JobController, JobEvent, Settlement};
pub use session::AnalysisSession;

use fakecheck_analysis_contract::{PolicyError, VerdictPolicy};
use fakecheck_client::{ClientError, analysis_endpoint};
use fakecheck_core::CoreError;
use fakecheck_ui::ViewTransitionError;
use thiserror::Error;
use url::Url;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("FAKECHECK_VERSION");

/// Service base address used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Validated runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Analysis service base address.
    pub api_base_url: Url,
    /// Verdict thresholds.
    pub policy: VerdictPolicy,
}

impl AppConfig {
    /// Validates a base address and threshold pair.
    ///
    /// # Errors
    /// Returns [`AppError::Client`] for non-HTTP base addresses and
    /// [`AppError::Policy`] for invalid thresholds.
    pub fn new(
        api_base_url: &str,
        suspect_threshold: f64,
        danger_threshold: f64,
    ) -> Result<Self, AppError> {
        analysis_endpoint(api_base_url)?;
        let api_base_url = Url::parse(api_base_url.trim())
            .map_err(|error| ClientError::InvalidEndpoint(error.to_string()))?;
        let policy = VerdictPolicy::new(suspect_threshold, danger_threshold)?;

        Ok(Self {
            api_base_url,
            policy,
        })
    }
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Submission failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] CoreError),
    /// Client could not be configured.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    /// Verdict thresholds are invalid.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),
    /// View transition was not legal.
    #[error("view error: {0}")]
    View(#[from] ViewTransitionError),
    /// Retry requested with no failed job to resubmit.
    #[error("no failed submission to retry")]
    NothingToRetry,
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration validation.

    use super::*;

    #[test]
    fn default_values_form_valid_config() {
        let config = AppConfig::new(
            DEFAULT_API_BASE_URL,
            fakecheck_analysis_contract::DEFAULT_SUSPECT_THRESHOLD,
            fakecheck_analysis_contract::DEFAULT_DANGER_THRESHOLD,
        )
        .expect("defaults should validate");
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.policy, VerdictPolicy::default());
    }

    #[test]
    fn config_rejects_bad_endpoint_and_thresholds() {
        assert!(matches!(
            AppConfig::new("ftp://x.test", 0.7, 0.85),
            Err(AppError::Client(_))
        ));
        assert!(matches!(
            AppConfig::new("https://api.example.test", 0.9, 0.5),
            Err(AppError::Policy(_))
        ));
        assert!(AppConfig::new("https://api.example.test", 0.6, 0.8).is_ok());
    }
}

#![warn(missing_docs)]
//! # fakecheck-client
//!
//! ## Purpose
//! Sends one submission to the analysis service and returns the raw result or
//! a categorized failure.
//!
//! ## Responsibilities
//! - Resolve the `POST /analysis` endpoint from a configured base address.
//! - Encode submissions as multipart bodies through an injectable
//!   [`AnalysisTransport`].
//! - Enforce the [`REQUEST_TIMEOUT`] ceiling, single attempt, no retry.
//! - Classify outcomes into [`AnalysisError`] network, timeout, and service
//!   categories.
//!
//! ## Data flow
//! [`SubmissionPayload`] -> [`AnalysisClient::send`] -> transport `POST` ->
//! [`interpret_response`] -> [`RawAnalysisResult`].
//!
//! ## Ownership and lifetimes
//! The client is cheap to clone (`Arc` transport) so each in-flight job can own
//! a handle without borrowing from the controller.
//!
//! ## Error model
//! Invalid base addresses fail at construction with [`ClientError`]. Per-request
//! failures are [`AnalysisError`] values; none are fatal to the session.
//!
//! ## Security and privacy notes
//! Artifact bytes are never logged; requests are identified by artifact digest
//! and a URL stripped of query string and credentials ([`log_safe_url`]).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fakecheck_analysis_contract::RawAnalysisResult;
use fakecheck_core::SubmissionPayload;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Path of the analysis route, relative to the service base address.
pub const ANALYSIS_PATH: &str = "analysis";
/// Upper bound on one request, from send to fully read body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Multipart field carrying the artifact bytes.
pub const FILE_FIELD: &str = "image";
/// Multipart field carrying the submitted URL.
pub const URL_FIELD: &str = "url";
/// Multipart field carrying the submitted text.
pub const TEXT_FIELD: &str = "text";
/// Error code reported when a success response body is not JSON.
pub const INVALID_RESPONSE_CODE: &str = "INVALID_RESPONSE";

/// Status and body returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Fully read response body.
    pub body: Vec<u8>,
}

/// Connection-level failure reported by a transport.
#[derive(Debug, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

/// Abstract transport used by [`AnalysisClient`].
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Sends exactly one multipart `POST` for `payload` to `endpoint`.
    async fn post(
        &self,
        endpoint: &Url,
        payload: &SubmissionPayload,
    ) -> Result<TransportResponse, TransportError>;
}

/// Analysis service client.
#[derive(Clone)]
pub struct AnalysisClient {
    endpoint: Url,
    transport: Arc<dyn AnalysisTransport>,
}

impl AnalysisClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidEndpoint`] when `base_url` is not an
    /// `http`/`https` URL.
    pub fn new(base_url: &str, transport: Arc<dyn AnalysisTransport>) -> Result<Self, ClientError> {
        Ok(Self {
            endpoint: analysis_endpoint(base_url)?,
            transport,
        })
    }

    /// Creates a client backed by [`ReqwestTransport`].
    ///
    /// # Errors
    /// See [`AnalysisClient::new`].
    pub fn with_reqwest(base_url: &str) -> Result<Self, ClientError> {
        Self::new(base_url, Arc::new(ReqwestTransport::default()))
    }

    /// Returns the resolved analysis endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one submission. Single attempt, bounded by [`REQUEST_TIMEOUT`].
    ///
    /// # Errors
    /// - [`AnalysisError::Timeout`] when the ceiling elapses first.
    /// - [`AnalysisError::Network`] for transport failures.
    /// - [`AnalysisError::Service`] for non-success statuses and undecodable
    ///   success bodies.
    pub async fn send(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<RawAnalysisResult, AnalysisError> {
        let artifact = payload.file().map(|artifact| artifact.digest_hex());
        let url = payload.url().map(log_safe_url);
        info!(
            endpoint = %self.endpoint,
            artifact = artifact.as_deref(),
            url = url.as_deref(),
            has_text = payload.text().is_some(),
            "sending analysis request"
        );

        let request = self.transport.post(&self.endpoint, payload);
        let response = match tokio::time::timeout(REQUEST_TIMEOUT, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => {
                warn!(%error, "analysis request failed in transport");
                return Err(AnalysisError::Network(error.0));
            }
            Err(_) => {
                let ceiling_ms = REQUEST_TIMEOUT.as_millis() as u64;
                warn!(ceiling_ms, "analysis request timed out");
                return Err(AnalysisError::Timeout { ceiling_ms });
            }
        };

        debug!(status = response.status, bytes = response.body.len(), "analysis response received");
        interpret_response(response)
    }
}

/// Resolves `<base_url>/analysis`, keeping any base path prefix.
///
/// # Errors
/// Returns [`ClientError::InvalidEndpoint`] for unparseable or non-HTTP URLs.
pub fn analysis_endpoint(base_url: &str) -> Result<Url, ClientError> {
    let mut base = Url::parse(base_url.trim())
        .map_err(|error| ClientError::InvalidEndpoint(format!("invalid base url: {error}")))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(ClientError::InvalidEndpoint(format!(
            "unsupported scheme '{}', expected http or https",
            base.scheme()
        )));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(ANALYSIS_PATH)
        .map_err(|error| ClientError::InvalidEndpoint(format!("invalid analysis path: {error}")))
}

/// Maps a transport response onto a raw result or a service error.
///
/// # Errors
/// Returns [`AnalysisError::Service`] for non-2xx statuses (with the body's
/// `message`/`errorCode` when present) and for success bodies that are not
/// JSON.
pub fn interpret_response(
    response: TransportResponse,
) -> Result<RawAnalysisResult, AnalysisError> {
    let TransportResponse { status, body } = response;

    if !(200..300).contains(&status) {
        let parsed = serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null);
        let message = parsed
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let code = parsed.get("errorCode").and_then(error_code_text);
        let error = AnalysisError::Service {
            status,
            message: message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| format!("server error ({status})")),
            code,
        };
        warn!(status, code = error.code(), "analysis service rejected request");
        return Err(error);
    }

    RawAnalysisResult::parse(&body).map_err(|error| AnalysisError::Service {
        status,
        code: Some(INVALID_RESPONSE_CODE.to_string()),
        message: error.to_string(),
    })
}

// `errorCode` may be a string or a number.
fn error_code_text(value: &Value) -> Option<String> {
    match value {
        Value::String(code) if !code.trim().is_empty() => Some(code.trim().to_string()),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

/// Renders a URL without query string, fragment, or credentials.
pub fn log_safe_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        Err(_) => "<unparseable url>".to_string(),
    }
}

/// Categorized failure of one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Transport failure before a response was read.
    #[error("network failure: {0}")]
    Network(String),
    /// The request ceiling elapsed.
    #[error("request timed out after {ceiling_ms} ms")]
    Timeout {
        /// Ceiling that elapsed, in milliseconds.
        ceiling_ms: u64,
    },
    /// Non-success response or undecodable success body.
    #[error("{message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Backend-issued error code, when present.
        code: Option<String>,
        /// User-facing message.
        message: String,
    },
}

impl AnalysisError {
    /// Backend error code, when the failure carried one.
    pub fn code(&self) -> Option<&str> {
        match self {
            AnalysisError::Service { code, .. } => code.as_deref(),
            AnalysisError::Network(_) | AnalysisError::Timeout { .. } => None,
        }
    }

    /// Returns `true` when resubmitting the same payload may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::Network(_) | AnalysisError::Timeout { .. } => true,
            AnalysisError::Service { status, .. } => *status >= 500,
        }
    }
}

/// Client construction errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base address is not a usable HTTP endpoint.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

// ---------------------------------------------------------------------------
// Reqwest transport
// ---------------------------------------------------------------------------

/// [`AnalysisTransport`] backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps a preconfigured `reqwest` client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalysisTransport for ReqwestTransport {
    async fn post(
        &self,
        endpoint: &Url,
        payload: &SubmissionPayload,
    ) -> Result<TransportResponse, TransportError> {
        let form = multipart_form(payload)?;
        let response = self
            .client
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|error| TransportError(error.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|error| TransportError(error.to_string()))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn multipart_form(payload: &SubmissionPayload) -> Result<Form, TransportError> {
    let mut form = Form::new();

    if let Some(artifact) = payload.file() {
        let part = Part::bytes(artifact.bytes.clone())
            .file_name(artifact.file_name.clone())
            .mime_str(&artifact.content_type)
            .map_err(|error| TransportError(format!("invalid artifact content type: {error}")))?;
        form = form.part(FILE_FIELD, part);
    }
    if let Some(url) = payload.url() {
        form = form.text(URL_FIELD, url.to_string());
    }
    if let Some(text) = payload.text() {
        form = form.text(TEXT_FIELD, text.to_string());
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    //! Unit tests for endpoint resolution and response interpretation.

    use super::*;

    fn response(status: u16, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn resolves_analysis_endpoint_under_base_path() {
        assert_eq!(
            analysis_endpoint("http://localhost:8080").unwrap().as_str(),
            "http://localhost:8080/analysis"
        );
        assert_eq!(
            analysis_endpoint("https://api.example.test/v1").unwrap().as_str(),
            "https://api.example.test/v1/analysis"
        );
    }

    #[test]
    fn rejects_non_http_base_urls() {
        assert!(analysis_endpoint("ftp://files.example.test").is_err());
        assert!(analysis_endpoint("not a url").is_err());
    }

    #[test]
    fn service_error_carries_backend_message_and_code() {
        let error = interpret_response(response(
            415,
            r#"{"message":"unsupported","errorCode":"UNSUPPORTED_FORMAT"}"#,
        ))
        .unwrap_err();

        assert_eq!(
            error,
            AnalysisError::Service {
                status: 415,
                code: Some("UNSUPPORTED_FORMAT".to_string()),
                message: "unsupported".to_string(),
            }
        );
        assert!(!error.is_retryable());
    }

    #[test]
    fn service_error_without_body_is_generic() {
        let error = interpret_response(response(502, "<html>bad gateway</html>")).unwrap_err();
        assert_eq!(error.to_string(), "server error (502)");
        assert_eq!(error.code(), None);
        assert!(error.is_retryable());
    }

    #[test]
    fn numeric_error_code_keeps_backend_message() {
        let error = interpret_response(response(
            429,
            r#"{"message":"quota exceeded","errorCode":4291}"#,
        ))
        .unwrap_err();

        assert_eq!(error.to_string(), "quota exceeded");
        assert_eq!(error.code(), Some("4291"));
    }

    #[test]
    fn non_string_message_falls_back_but_keeps_code() {
        let error = interpret_response(response(
            503,
            r#"{"message":{"detail":"busy"},"errorCode":"ANALYSIS_ERROR"}"#,
        ))
        .unwrap_err();

        assert_eq!(error.to_string(), "server error (503)");
        assert_eq!(error.code(), Some("ANALYSIS_ERROR"));
    }

    #[test]
    fn success_unwraps_results_envelope() {
        let raw = interpret_response(response(200, r#"{"results":{"riskLevel":"주의"}}"#))
            .expect("success should parse");
        assert_eq!(raw.risk_level(), Some("주의"));
    }

    #[test]
    fn undecodable_success_body_is_service_error() {
        let error = interpret_response(response(200, "ok")).unwrap_err();
        assert_eq!(error.code(), Some(INVALID_RESPONSE_CODE));
    }

    #[test]
    fn log_safe_url_strips_query_and_credentials() {
        assert_eq!(
            log_safe_url("https://user:pw@news.example.test/a?token=abc#top"),
            "https://news.example.test/a"
        );
        assert_eq!(log_safe_url("::"), "<unparseable url>");
    }
}

#![warn(missing_docs)]
//! # fakecheck-core
//!
//! ## Purpose
//! Defines the pure data model used across the `fakecheck` workspace.
//!
//! ## Responsibilities
//! - Represent one user submission (file artifact, URL, or free text).
//! - Identify jobs with monotonically increasing [`JobId`] values.
//! - Accumulate per-verdict session counters in [`SessionStatsAggregator`].
//!
//! ## Data flow
//! The UI collects a [`SubmissionPayload`], the job controller validates it and
//! wraps it in a [`Job`]. Every observed verdict is fed to
//! [`SessionStatsAggregator::record`], whose [`SessionStats`] snapshot drives
//! the session dashboard.
//!
//! ## Ownership and lifetimes
//! Payloads own their backing buffers (`Vec<u8>`, `String`) so they can move
//! into async send tasks without borrowing from UI state.
//!
//! ## Error model
//! Validation failures return [`CoreError`] variants with caller-actionable
//! categorization.
//!
//! ## Security and privacy notes
//! Artifact bytes are never formatted into logs or errors. Use
//! [`Artifact::digest_hex`] when an artifact needs a log-safe identity.
//!
//! ## Example
//! ```rust
//! use fakecheck_core::{SessionStatsAggregator, SubmissionPayload, VerdictLevel};
//!
//! assert!(SubmissionPayload::default().validate().is_err());
//! assert!(SubmissionPayload::from_url("https://news.example.test/a").validate().is_ok());
//!
//! let mut stats = SessionStatsAggregator::new();
//! stats.record(VerdictLevel::Danger);
//! assert_eq!(stats.snapshot().fake, 1);
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Content type used when the artifact extension is not recognized.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// One binary artifact attached to a submission.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Original file name, forwarded to the analysis service.
    pub file_name: String,
    /// MIME type of the artifact bytes.
    pub content_type: String,
    /// Raw artifact bytes.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Creates an artifact from in-memory bytes.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads an artifact from disk and infers its content type from the
    /// file extension.
    ///
    /// # Errors
    /// Returns [`CoreError::ArtifactRead`] when the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| CoreError::ArtifactRead {
            path: path.display().to_string(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".to_string());
        let content_type = content_type_for(path).to_string();

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Returns `true` when the artifact carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the SHA-256 hex digest of the artifact bytes.
    ///
    /// This is the only artifact identity that may appear in logs.
    pub fn digest_hex(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Infers a MIME type from a path extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => OCTET_STREAM,
    }
}

/// User submission forwarded to the analysis service.
///
/// Blank `url`/`text` values and zero-length files count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    /// Article or image URL.
    pub url: Option<String>,
    /// Free text to analyze.
    pub text: Option<String>,
    /// Attached binary artifact.
    pub file: Option<Artifact>,
}

impl SubmissionPayload {
    /// Creates a file-only submission.
    pub fn from_file(artifact: Artifact) -> Self {
        Self {
            file: Some(artifact),
            ..Self::default()
        }
    }

    /// Creates a URL-only submission.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Creates a text-only submission.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Returns the URL when present and non-blank.
    pub fn url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    /// Returns the text when present and non-blank.
    pub fn text(&self) -> Option<&str> {
        non_blank(self.text.as_deref())
    }

    /// Returns the artifact when present and non-empty.
    pub fn file(&self) -> Option<&Artifact> {
        self.file.as_ref().filter(|artifact| !artifact.is_empty())
    }

    /// Checks that at least one of `url`, `text`, `file` is present.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyPayload`] when every field is absent.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.url().is_none() && self.text().is_none() && self.file().is_none() {
            return Err(CoreError::EmptyPayload);
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Monotonic job identity, unique within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

impl JobId {
    /// Wraps a raw id value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Send is in flight and the job is still active.
    Pending,
    /// The job's outcome was observed.
    Settled,
    /// The job was cancelled or superseded by a newer job.
    Cancelled,
}

/// One user-initiated submission and its analysis lifecycle.
#[derive(Debug, Clone)]
pub struct Job {
    /// Job identity.
    pub id: JobId,
    /// Submitted payload, shared with the in-flight send task.
    pub payload: Arc<SubmissionPayload>,
    /// Current lifecycle status.
    pub status: JobStatus,
}

impl Job {
    /// Creates a pending job.
    pub fn pending(id: JobId, payload: Arc<SubmissionPayload>) -> Self {
        Self {
            id,
            payload,
            status: JobStatus::Pending,
        }
    }
}

/// Three-level risk classification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VerdictLevel {
    /// Likely authentic.
    Safe,
    /// Uncertain; further checking is recommended.
    Suspect,
    /// Likely generated or manipulated.
    Danger,
}

impl VerdictLevel {
    /// Returns the short display label.
    pub fn label(self) -> &'static str {
        match self {
            VerdictLevel::Safe => "Safe",
            VerdictLevel::Suspect => "Suspect",
            VerdictLevel::Danger => "Danger",
        }
    }
}

impl fmt::Display for VerdictLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-verdict counters accumulated across one session.
///
/// Invariant: `ok + suspect + fake == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Number of observed results.
    pub total: u64,
    /// Results classified [`VerdictLevel::Safe`].
    pub ok: u64,
    /// Results classified [`VerdictLevel::Suspect`].
    pub suspect: u64,
    /// Results classified [`VerdictLevel::Danger`].
    pub fake: u64,
}

impl SessionStats {
    /// Returns the counter for one verdict level.
    pub fn count(&self, level: VerdictLevel) -> u64 {
        match level {
            VerdictLevel::Safe => self.ok,
            VerdictLevel::Suspect => self.suspect,
            VerdictLevel::Danger => self.fake,
        }
    }

    /// Returns `count(level) / total`, or `0.0` when nothing was recorded.
    pub fn rate(&self, level: VerdictLevel) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(level) as f64 / self.total as f64
    }
}

/// Sole mutator of [`SessionStats`].
#[derive(Debug, Clone, Default)]
pub struct SessionStatsAggregator {
    stats: SessionStats,
}

impl SessionStatsAggregator {
    /// Creates an aggregator with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observed verdict.
    ///
    /// # Side effects
    /// Increments `total` and exactly one per-level counter.
    pub fn record(&mut self, level: VerdictLevel) {
        self.stats.total += 1;
        match level {
            VerdictLevel::Safe => self.stats.ok += 1,
            VerdictLevel::Suspect => self.stats.suspect += 1,
            VerdictLevel::Danger => self.stats.fake += 1,
        }
    }

    /// Returns the share of results classified as `level`.
    pub fn rate(&self, level: VerdictLevel) -> f64 {
        self.stats.rate(level)
    }

    /// Returns a copy of the current counters.
    pub fn snapshot(&self) -> SessionStats {
        self.stats
    }

    /// Clears all counters. Only called on explicit user reset.
    pub fn reset(&mut self) {
        self.stats = SessionStats::default();
    }
}

/// Error type for core domain validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Submission carried none of `url`, `text`, `file`.
    #[error("submission must include a url, text, or file")]
    EmptyPayload,
    /// Artifact file could not be read.
    #[error("failed to read artifact '{path}': {source}")]
    ArtifactRead {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

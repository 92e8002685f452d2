#![warn(missing_docs)]
//! # fakecheck-analysis-contract
//!
//! ## Purpose
//! Defines the analysis service response contract and the client-side mapping
//! from raw model output to a user-facing verdict.
//!
//! ## Responsibilities
//! - Parse success bodies, unwrapping the optional `results` envelope.
//! - Normalize inconsistently scaled probability fields into [`NormalizedScore`].
//! - Classify normalized scores into three-level [`Verdict`] values, letting a
//!   recognizable backend risk label override numeric thresholds.
//!
//! ## Data flow
//! Raw JSON body -> [`RawAnalysisResult::parse`] -> [`normalize`] ->
//! [`VerdictPolicy::classify`] -> session stats and UI projection.
//!
//! ## Ownership and lifetimes
//! [`RawAnalysisResult`] owns its JSON tree so it can outlive the transient
//! network buffer it was decoded from.
//!
//! ## Error model
//! Only decoding can fail ([`AnalysisContractError`]). Normalization and
//! classification are total: absent or malformed fields degrade to documented
//! fallbacks.
//!
//! ## Security and privacy notes
//! This crate processes only model outputs and risk metadata.

mod score;
mod verdict;

pub use score::{FALLBACK_PROBABILITY, NormalizedScore, normalize};
pub use verdict::{
    DEFAULT_DANGER_THRESHOLD, DEFAULT_SUSPECT_THRESHOLD, PolicyError, Verdict, VerdictPolicy,
    VerdictSource, classify, default_description, level_from_label,
};

use serde_json::Value;
use thiserror::Error;

/// Key of the optional envelope wrapping the result payload.
pub const RESULTS_KEY: &str = "results";

/// Untyped analysis result as returned by the service.
///
/// Every recognized field is optional; accessors return `None` for absent or
/// wrongly typed values instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAnalysisResult {
    value: Value,
}

impl RawAnalysisResult {
    /// Wraps a decoded body, unwrapping a non-null `results` envelope.
    pub fn from_value(value: Value) -> Self {
        let value = match value {
            Value::Object(mut map) => match map.remove(RESULTS_KEY) {
                Some(inner) if !inner.is_null() => inner,
                Some(_) | None => Value::Object(map),
            },
            other => other,
        };
        Self { value }
    }

    /// Decodes a success response body.
    ///
    /// # Errors
    /// Returns [`AnalysisContractError::Decode`] for bodies that are not JSON.
    pub fn parse(raw: &[u8]) -> Result<Self, AnalysisContractError> {
        let value: Value = serde_json::from_slice(raw)?;
        Ok(Self::from_value(value))
    }

    /// Returns a top-level field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.value.get(key).filter(|value| !value.is_null())
    }

    /// Returns a field nested one object level deep.
    pub fn nested_field(&self, outer: &str, inner: &str) -> Option<&Value> {
        self.field(outer)?.get(inner).filter(|value| !value.is_null())
    }

    /// Backend risk label (for example `"위험"` or `"danger"`).
    pub fn risk_level(&self) -> Option<&str> {
        self.string_field("riskLevel")
    }

    /// Backend conclusion text.
    pub fn conclusion(&self) -> Option<&str> {
        self.string_field("conclusion")
    }

    /// Ordered evidence strings; non-string entries are skipped.
    pub fn evidences(&self) -> Vec<String> {
        self.field("evidences")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Analysis identifier, accepted as string or number.
    pub fn analysis_id(&self) -> Option<String> {
        match self.field("analysisId")? {
            Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Server-hosted preview image URL.
    pub fn image_url(&self) -> Option<&str> {
        self.string_field("imageUrl")
    }

    fn string_field(&self, key: &str) -> Option<&str> {
        self.field(key)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// JSON decode failure.
    #[error("analysis decode failure: {0}")]
    Decode(#[from] serde_json::Error),
}

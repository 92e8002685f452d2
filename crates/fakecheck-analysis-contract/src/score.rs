//! Score normalization.
//!
//! Resolution order, first present wins:
//! - AI: `aiProbability` (0-100), `authenticity.ai_score` (0-1),
//!   [`FALLBACK_PROBABILITY`].
//! - Real: `realProbability` (0-100), `authenticity.real_score` (0-1),
//!   `1 - ai`.
//!
//! The weighted `consistency.score` formula some service drafts emit is not
//! consulted.

use serde::Serialize;
use serde_json::Value;

use crate::RawAnalysisResult;

/// Probability used when the service reports no AI signal at all.
pub const FALLBACK_PROBABILITY: f64 = 0.5;

const AI_PERCENT_KEY: &str = "aiProbability";
const REAL_PERCENT_KEY: &str = "realProbability";
const AUTHENTICITY_KEY: &str = "authenticity";
const AI_UNIT_KEY: &str = "ai_score";
const REAL_UNIT_KEY: &str = "real_score";

/// Canonical probability pair, both values in `[0, 1]`.
///
/// `real + ai` is not required to equal 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedScore {
    /// Probability that the artifact is authentic.
    pub real_probability: f64,
    /// Probability that the artifact is AI-generated.
    pub ai_probability: f64,
}

/// Maps a raw result onto a [`NormalizedScore`]. Total and deterministic.
pub fn normalize(raw: &RawAnalysisResult) -> NormalizedScore {
    let ai_probability = percent(raw.field(AI_PERCENT_KEY))
        .or_else(|| unit(raw.nested_field(AUTHENTICITY_KEY, AI_UNIT_KEY)))
        .unwrap_or(FALLBACK_PROBABILITY)
        .clamp(0.0, 1.0);

    let real_probability = percent(raw.field(REAL_PERCENT_KEY))
        .or_else(|| unit(raw.nested_field(AUTHENTICITY_KEY, REAL_UNIT_KEY)))
        .unwrap_or(1.0 - ai_probability)
        .clamp(0.0, 1.0);

    NormalizedScore {
        real_probability,
        ai_probability,
    }
}

fn percent(value: Option<&Value>) -> Option<f64> {
    finite_number(value?).map(|value| value / 100.0)
}

fn unit(value: Option<&Value>) -> Option<f64> {
    finite_number(value?)
}

// Numeric strings are accepted; anything non-finite counts as absent.
fn finite_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

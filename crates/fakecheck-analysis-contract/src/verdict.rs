//! Verdict classification.

use fakecheck_core::VerdictLevel;
use serde::Serialize;
use thiserror::Error;

use crate::NormalizedScore;

/// Default lower bound (inclusive) of the [`VerdictLevel::Suspect`] bucket.
pub const DEFAULT_SUSPECT_THRESHOLD: f64 = 0.70;
/// Default lower bound (inclusive) of the [`VerdictLevel::Danger`] bucket.
pub const DEFAULT_DANGER_THRESHOLD: f64 = 0.85;

// Checked in this order, so a label mentioning both "위험" and "안전" is Danger.
const LABEL_KEYWORDS: [(VerdictLevel, &[&str]); 3] = [
    (VerdictLevel::Danger, &["위험", "danger", "unsafe", "fake"]),
    (VerdictLevel::Suspect, &["주의", "suspect", "caution", "warning"]),
    (VerdictLevel::Safe, &["안전", "safe"]),
];

/// Where a verdict's level came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum VerdictSource {
    /// A recognizable backend label overrode the numeric score.
    BackendLabel(String),
    /// Numeric thresholds on the AI probability.
    Threshold,
}

/// Three-level risk classification with a human-readable rationale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Risk level.
    pub level: VerdictLevel,
    /// Display label for the level.
    pub label: String,
    /// Why this level was chosen.
    pub rationale: String,
    /// Which signal decided the level.
    pub source: VerdictSource,
}

/// Tunable numeric thresholds applied to the AI probability.
///
/// Buckets are closed below and open above: `ai < suspect` is Safe,
/// `suspect <= ai < danger` is Suspect, `ai >= danger` is Danger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VerdictPolicy {
    suspect_threshold: f64,
    danger_threshold: f64,
}

impl Default for VerdictPolicy {
    fn default() -> Self {
        Self {
            suspect_threshold: DEFAULT_SUSPECT_THRESHOLD,
            danger_threshold: DEFAULT_DANGER_THRESHOLD,
        }
    }
}

impl VerdictPolicy {
    /// Creates a validated policy.
    ///
    /// # Errors
    /// Returns [`PolicyError::OutOfRange`] for thresholds outside `[0, 1]` or
    /// non-finite, and [`PolicyError::Inverted`] when `suspect > danger`.
    pub fn new(suspect_threshold: f64, danger_threshold: f64) -> Result<Self, PolicyError> {
        for (name, value) in [
            ("suspect", suspect_threshold),
            ("danger", danger_threshold),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PolicyError::OutOfRange { name, value });
            }
        }

        if suspect_threshold > danger_threshold {
            return Err(PolicyError::Inverted {
                suspect: suspect_threshold,
                danger: danger_threshold,
            });
        }

        Ok(Self {
            suspect_threshold,
            danger_threshold,
        })
    }

    /// Inclusive lower bound of the Suspect bucket.
    pub fn suspect_threshold(&self) -> f64 {
        self.suspect_threshold
    }

    /// Inclusive lower bound of the Danger bucket.
    pub fn danger_threshold(&self) -> f64 {
        self.danger_threshold
    }

    /// Maps an AI probability to a level using thresholds only.
    pub fn level_for(&self, ai_probability: f64) -> VerdictLevel {
        if ai_probability >= self.danger_threshold {
            VerdictLevel::Danger
        } else if ai_probability >= self.suspect_threshold {
            VerdictLevel::Suspect
        } else {
            VerdictLevel::Safe
        }
    }

    /// Classifies a normalized score. A recognizable backend label takes
    /// precedence over the numeric thresholds. Never fails.
    pub fn classify(&self, score: &NormalizedScore, backend_label: Option<&str>) -> Verdict {
        let ai = percent(score.ai_probability);

        if let Some(label) = backend_label
            && let Some(level) = level_from_label(label)
        {
            let label = label.trim().to_string();
            return Verdict {
                level,
                label: level.label().to_string(),
                rationale: format!(
                    "backend risk level \"{label}\" maps to {level} (AI signal {ai})"
                ),
                source: VerdictSource::BackendLabel(label),
            };
        }

        let level = self.level_for(score.ai_probability);
        let suspect = percent(self.suspect_threshold);
        let danger = percent(self.danger_threshold);
        let rationale = match level {
            VerdictLevel::Danger => {
                format!("AI signal {ai} is at or above the danger threshold {danger}")
            }
            VerdictLevel::Suspect => format!(
                "AI signal {ai} is at or above the suspect threshold {suspect} and below {danger}"
            ),
            VerdictLevel::Safe => {
                format!("AI signal {ai} is below the suspect threshold {suspect}")
            }
        };

        Verdict {
            level,
            label: level.label().to_string(),
            rationale,
            source: VerdictSource::Threshold,
        }
    }
}

/// Classifies with the default thresholds.
pub fn classify(score: &NormalizedScore, backend_label: Option<&str>) -> Verdict {
    VerdictPolicy::default().classify(score, backend_label)
}

/// Recognizes a risk keyword in a backend label (case-insensitive substring).
pub fn level_from_label(label: &str) -> Option<VerdictLevel> {
    let label = label.trim().to_lowercase();
    if label.is_empty() {
        return None;
    }

    LABEL_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| label.contains(keyword)))
        .map(|(level, _)| *level)
}

/// Description shown when the backend supplies no conclusion.
pub fn default_description(level: VerdictLevel) -> &'static str {
    match level {
        VerdictLevel::Safe => "Likely authentic. Additional verification is still recommended.",
        VerdictLevel::Suspect => {
            "The result is uncertain. Additional verification is recommended."
        }
        VerdictLevel::Danger => {
            "The result is highly uncertain. Fact-checking is strongly recommended."
        }
    }
}

fn percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Invalid threshold configuration.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    /// Threshold is outside `[0, 1]` or not finite.
    #[error("{name} threshold must be within [0, 1], got {value}")]
    OutOfRange {
        /// Threshold name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Suspect threshold exceeds danger threshold.
    #[error("suspect threshold {suspect} exceeds danger threshold {danger}")]
    Inverted {
        /// Suspect threshold.
        suspect: f64,
        /// Danger threshold.
        danger: f64,
    },
}

//! Deterministic inputs for benchmark smoke tests.

use fakecheck_analysis_contract::RawAnalysisResult;
use serde_json::json;

/// Builds `count` response bodies covering both probability contracts and
/// backend labels.
pub fn sample_results(count: usize) -> Vec<RawAnalysisResult> {
    (0..count)
        .map(|index| {
            let percent = (index % 101) as f64;
            let value = match index % 4 {
                0 => json!({ "aiProbability": percent }),
                1 => json!({ "aiProbability": percent.to_string(), "riskLevel": "caution" }),
                2 => json!({ "results": { "authenticity": { "ai_score": percent / 100.0 } } }),
                _ => json!({ "realProbability": percent, "riskLevel": "안전" }),
            };
            RawAnalysisResult::from_value(value)
        })
        .collect()
}

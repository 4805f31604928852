//! Wire types for the external resume-analysis service.
//!
//! The result schema belongs to the service. It is checked for the fields the
//! dashboard needs and otherwise passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub keyword: f64,
    pub semantic: f64,
    pub impact: f64,
    pub alignment: f64,
}

impl SubScores {
    pub fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("keyword", self.keyword),
            ("semantic", self.semantic),
            ("impact", self.impact),
            ("alignment", self.alignment),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCoverage {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub partial: Vec<String>,
}

/// A suggested bullet rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rewrite {
    pub original: String,
    pub improved: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scores: SubScores,
    pub keywords: KeywordCoverage,
    pub rewrites: Vec<Rewrite>,
    /// Anything else the service returns (overall score, summaries, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisResult {
    /// Every sub-score must be a finite number within [0, 100].
    pub fn validate(&self) -> Result<(), String> {
        for (name, score) in self.scores.named() {
            if !score.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&score) {
                return Err(format!(
                    "{name} score {score} is outside [{SCORE_MIN}, {SCORE_MAX}]"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn sample_result() -> AnalysisResult {
    serde_json::from_value(serde_json::json!({
        "scores": { "keyword": 72, "semantic": 64.5, "impact": 40, "alignment": 81 },
        "keywords": {
            "matched": ["rust", "tokio"],
            "missing": ["kubernetes"],
            "partial": ["distributed systems"]
        },
        "rewrites": [{
            "original": "Worked on backend services",
            "improved": "Built 3 Rust services handling 10k rps",
            "explanation": "Quantifies scope and names the stack"
        }],
        "overallScore": 66
    }))
    .unwrap()
}

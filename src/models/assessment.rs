//! Assessment output types: what the result panel renders.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Risk tier derived from the clinical score by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the AI second-opinion call concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiReviewStatus {
    /// No credential configured; the network was never touched.
    NotConfigured,
    /// The remote model returned a usable score.
    Validated,
    /// The call or its response failed; the clinical score stands in.
    Failed,
}

/// Outcome of one AI validation attempt. The score is always present:
/// on anything but `Validated` it simply repeats the clinical score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiReview {
    pub score: u8,
    pub status: AiReviewStatus,
    /// Display text for the result panel: a credential hint when not
    /// configured, a failure summary when the call went wrong.
    pub note: Option<String>,
}

/// One complete assessment. Immutable once produced; the next check
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub clinical_score: u8,
    pub ai_score: u8,
    /// Derived from the clinical score only, never from the AI score.
    pub risk_tier: RiskTier,
    pub recommendations: Vec<String>,
    pub ai_status: AiReviewStatus,
    pub ai_note: Option<String>,
}

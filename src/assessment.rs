//! Assessment orchestration.
//!
//! One strictly sequential pipeline: clinical score, tier, recommendations,
//! then the optional AI second opinion. The clinical results are final
//! before the AI call starts; the AI score is reported alongside and never
//! re-derives the tier or the recommendations.

use crate::credential::ApiCredential;
use crate::models::{AssessmentResult, FactorSet};
use crate::scoring::{clinical_score, recommendations, risk_tier};
use crate::validator::{validate, CompletionClient};

/// Run one complete assessment. Infallible: the validator degrades
/// internally, so every call produces a renderable result.
pub async fn run_assessment<C: CompletionClient>(
    client: &C,
    factors: &FactorSet,
    credential: Option<&ApiCredential>,
) -> AssessmentResult {
    let clinical = clinical_score(factors);
    let tier = risk_tier(clinical);
    let advisories = recommendations(factors, tier);

    tracing::debug!(clinical_score = clinical, risk_tier = %tier, "clinical scoring complete");

    let review = validate(client, factors, clinical, credential).await;

    AssessmentResult {
        clinical_score: clinical,
        ai_score: review.score,
        risk_tier: tier,
        recommendations: advisories,
        ai_status: review.status,
        ai_note: review.note,
    }
}

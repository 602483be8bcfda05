//! AI second opinion on the clinical score.
//!
//! Strictly advisory and strictly best-effort: no credential means the
//! network is never touched, and every transport or parse failure folds
//! back to the clinical score with a displayable note. Nothing in here
//! can fail an assessment.

pub mod client;
pub mod parse;
pub mod prompt;

pub use client::{
    CompletionClient, CompletionConfig, MockCompletionClient, OpenAiCompatibleClient,
};
pub use parse::extract_score;
pub use prompt::{build_validation_prompt, VALIDATION_SYSTEM_PROMPT};

use thiserror::Error;

use crate::credential::ApiCredential;
use crate::models::{AiReview, AiReviewStatus, FactorSet};

/// Note attached when no credential is configured.
pub const CREDENTIAL_REQUIRED_NOTE: &str =
    "Add an API key to enable AI validation; showing the clinical score.";

/// Failures inside the completion call. None of these escape [`validate`];
/// they become the note on a `Failed` review.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("completion endpoint unreachable at {0}")]
    Connection(String),

    #[error("completion request timed out after {0}s")]
    Timeout(u64),

    #[error("completion API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("malformed completion response: {0}")]
    ResponseParsing(String),

    #[error("completion response contained no digits")]
    NoScore,
}

/// Ask the remote model to corroborate the clinical score.
///
/// Always returns a usable review. Without a credential the review is
/// `NotConfigured` and repeats the clinical score; with one, any failure
/// along the call path yields `Failed` with the same fallback.
pub async fn validate<C: CompletionClient>(
    client: &C,
    factors: &FactorSet,
    clinical_score: u8,
    credential: Option<&ApiCredential>,
) -> AiReview {
    let Some(credential) = credential else {
        tracing::debug!("no API credential set, skipping AI validation");
        return AiReview {
            score: clinical_score,
            status: AiReviewStatus::NotConfigured,
            note: Some(CREDENTIAL_REQUIRED_NOTE.to_string()),
        };
    };

    let user_prompt = prompt::build_validation_prompt(factors, clinical_score);

    let outcome = match client.complete(&user_prompt, credential).await {
        Ok(text) => {
            let score = parse::extract_score(&text);
            if score.is_none() {
                tracing::debug!(response = %text, "completion reply had no digit run");
            }
            score.ok_or(ValidationError::NoScore)
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(score) => {
            tracing::info!(ai_score = score, clinical_score, "AI validation completed");
            AiReview {
                score,
                status: AiReviewStatus::Validated,
                note: None,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "AI validation failed, falling back to clinical score");
            AiReview {
                score: clinical_score,
                status: AiReviewStatus::Failed,
                note: Some(format!("AI validation unavailable: {e}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdherenceHistory, Barrier, FactorSet, MedicationCount};

    fn sample_factors() -> FactorSet {
        FactorSet::new(
            MedicationCount::ThreeToFive,
            AdherenceHistory::Fair,
            [Barrier::Cost],
        )
    }

    #[tokio::test]
    async fn missing_credential_skips_the_network() {
        let mock = MockCompletionClient::replying("85");

        let review = validate(&mock, &sample_factors(), 60, None).await;

        assert_eq!(mock.calls(), 0);
        assert_eq!(review.score, 60);
        assert_eq!(review.status, AiReviewStatus::NotConfigured);
        assert_eq!(review.note.as_deref(), Some(CREDENTIAL_REQUIRED_NOTE));
    }

    #[tokio::test]
    async fn verbose_reply_is_parsed() {
        let mock = MockCompletionClient::replying("The score is 72 out of 100.");
        let credential = ApiCredential::new("sk-test").unwrap();

        let review = validate(&mock, &sample_factors(), 60, Some(&credential)).await;

        assert_eq!(mock.calls(), 1);
        assert_eq!(review.score, 72);
        assert_eq!(review.status, AiReviewStatus::Validated);
        assert!(review.note.is_none());
    }

    #[tokio::test]
    async fn out_of_range_reply_is_clamped() {
        let mock = MockCompletionClient::replying("150");
        let credential = ApiCredential::new("sk-test").unwrap();

        let review = validate(&mock, &sample_factors(), 60, Some(&credential)).await;

        assert_eq!(review.score, 100);
        assert_eq!(review.status, AiReviewStatus::Validated);
    }

    #[tokio::test]
    async fn call_failure_falls_back_to_clinical_score() {
        let mock = MockCompletionClient::failing("connection refused");
        let credential = ApiCredential::new("sk-test").unwrap();

        let review = validate(&mock, &sample_factors(), 60, Some(&credential)).await;

        assert_eq!(review.score, 60);
        assert_eq!(review.status, AiReviewStatus::Failed);
        let note = review.note.unwrap();
        assert!(note.contains("AI validation unavailable"));
        assert!(note.contains("connection refused"));
    }

    #[tokio::test]
    async fn digitless_reply_falls_back_to_clinical_score() {
        let mock = MockCompletionClient::replying("I cannot assess this patient.");
        let credential = ApiCredential::new("sk-test").unwrap();

        let review = validate(&mock, &sample_factors(), 45, Some(&credential)).await;

        assert_eq!(review.score, 45);
        assert_eq!(review.status, AiReviewStatus::Failed);
        assert!(review.note.unwrap().contains("no digits"));
    }

    #[tokio::test]
    async fn non_ascii_numeral_reply_falls_back_to_clinical_score() {
        // A reply in another numeral system must not pass as a validated
        // score; it takes the same path as a digitless reply.
        let mock = MockCompletionClient::replying("النتيجة ٧٢");
        let credential = ApiCredential::new("sk-test").unwrap();

        let review = validate(&mock, &sample_factors(), 60, Some(&credential)).await;

        assert_eq!(review.score, 60);
        assert_eq!(review.status, AiReviewStatus::Failed);
        assert!(review.note.unwrap().contains("no digits"));
    }
}

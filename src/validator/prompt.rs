//! Prompt construction for the second-opinion call.

use crate::models::FactorSet;

/// System prompt pinning the reply to one bare integer. The parser stays
/// lenient regardless; this just keeps replies short.
pub const VALIDATION_SYSTEM_PROMPT: &str = "You are a clinical decision-support \
assistant reviewing a medication adherence risk assessment. Reply with a single \
integer between 0 and 100, where 100 means perfect expected adherence. Output \
the number only: no words, no units, no punctuation.";

/// User prompt embedding the patient's factor set and the rule-based score
/// the model is asked to corroborate.
pub fn build_validation_prompt(factors: &FactorSet, clinical_score: u8) -> String {
    format!(
        "A patient has the following medication adherence profile:\n\
         - medications taken: {}\n\
         - adherence history: {}\n\
         - reported barriers: {}\n\n\
         Our rule-based assessment scored this patient {clinical_score} out of 100. \
         Reply with your own 0-100 adherence score for this profile.",
        factors.medication_count,
        factors.adherence_history,
        factors.barrier_summary(),
    )
}

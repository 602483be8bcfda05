//! Deterministic clinical scoring.
//!
//! Fixed deductions from a perfect score, clamped to [0, 100]. No I/O and
//! no failure mode: every factor combination scores. The AI second opinion
//! never feeds back into anything computed here.

use crate::models::{AdherenceHistory, FactorSet, MedicationCount, RiskTier};

// ═══════════════════════════════════════════════════════════════════════
// Scoring constants
// ═══════════════════════════════════════════════════════════════════════

/// Every assessment starts from a perfect score.
const FULL_SCORE: i32 = 100;

/// Deduction for a regimen of six or more medications.
const HEAVY_REGIMEN_DEDUCTION: i32 = 30;
/// Deduction for a regimen of three to five medications.
const MODERATE_REGIMEN_DEDUCTION: i32 = 15;
/// Deduction for a poor adherence history.
const POOR_HISTORY_DEDUCTION: i32 = 30;
/// Deduction for a fair adherence history.
const FAIR_HISTORY_DEDUCTION: i32 = 15;
/// Deduction per selected barrier.
const PER_BARRIER_DEDUCTION: i32 = 10;

/// Scores at or above this floor are Low risk.
const LOW_TIER_FLOOR: u8 = 80;
/// Scores at or above this floor (and below the Low floor) are Medium risk.
const MEDIUM_TIER_FLOOR: u8 = 60;

/// Advisory appended to every High-tier recommendation list.
pub const FOLLOW_UP_ADVISORY: &str = "Schedule an adherence follow-up within 2 weeks.";

// ═══════════════════════════════════════════════════════════════════════
// Scoring
// ═══════════════════════════════════════════════════════════════════════

/// Clinical adherence score for a factor set.
///
/// Higher is better: 100 means no identified risk. Deductions are additive
/// and the sum is clamped, so the worst combination bottoms out at 0
/// rather than going negative.
pub fn clinical_score(factors: &FactorSet) -> u8 {
    let regimen = match factors.medication_count {
        MedicationCount::OneToTwo => 0,
        MedicationCount::ThreeToFive => MODERATE_REGIMEN_DEDUCTION,
        MedicationCount::SixOrMore => HEAVY_REGIMEN_DEDUCTION,
    };
    let history = match factors.adherence_history {
        AdherenceHistory::Good => 0,
        AdherenceHistory::Fair => FAIR_HISTORY_DEDUCTION,
        AdherenceHistory::Poor => POOR_HISTORY_DEDUCTION,
    };
    let barriers = PER_BARRIER_DEDUCTION * factors.barriers.len() as i32;

    (FULL_SCORE - regimen - history - barriers).clamp(0, FULL_SCORE) as u8
}

/// Map a clinical score to its risk tier.
///
/// Boundaries belong to the higher tier: 60 is Medium, 80 is Low.
pub fn risk_tier(score: u8) -> RiskTier {
    if score >= LOW_TIER_FLOOR {
        RiskTier::Low
    } else if score >= MEDIUM_TIER_FLOOR {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}

/// Recommendation list for a scored assessment: one advisory per selected
/// barrier in declaration order, then the follow-up advisory when the
/// result is High tier. No barriers and a non-High tier yields an empty
/// list.
pub fn recommendations(factors: &FactorSet, tier: RiskTier) -> Vec<String> {
    let mut advisories: Vec<String> = factors
        .barriers
        .iter()
        .map(|barrier| barrier.advisory().to_string())
        .collect();

    if tier == RiskTier::High {
        advisories.push(FOLLOW_UP_ADVISORY.to_string());
    }

    advisories
}

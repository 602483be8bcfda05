//! Data types crossing the boundary between the core and the host shell.

pub mod assessment;
pub mod factors;

pub use assessment::{AiReview, AiReviewStatus, AssessmentResult, RiskTier};
pub use factors::{AdherenceHistory, Barrier, FactorSet, MedicationCount};

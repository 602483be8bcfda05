//! Patient risk factors: the input state of the check-in form.
//!
//! A [`FactorSet`] is a plain value. The shell replaces the whole set on
//! every edit instead of mutating fields in place, so equality is enough
//! to tell whether anything changed.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of distinct medications the patient currently takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MedicationCount {
    #[default]
    #[serde(rename = "1-2")]
    OneToTwo,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "6+")]
    SixOrMore,
}

impl MedicationCount {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToTwo => "1-2",
            Self::ThreeToFive => "3-5",
            Self::SixOrMore => "6+",
        }
    }
}

impl fmt::Display for MedicationCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported history of taking medications as prescribed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdherenceHistory {
    #[default]
    Good,
    Fair,
    Poor,
}

impl AdherenceHistory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for AdherenceHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable obstacle to adherence.
///
/// Declaration order is load-bearing: recommendations list advisories in
/// this order, and the derived `Ord` makes a `BTreeSet<Barrier>` iterate
/// the same way.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Barrier {
    Cost,
    Memory,
    Transportation,
    ComplexSchedule,
}

impl Barrier {
    /// Every barrier, in the order the form presents them.
    pub const ALL: [Barrier; 4] = [
        Barrier::Cost,
        Barrier::Memory,
        Barrier::Transportation,
        Barrier::ComplexSchedule,
    ];

    /// Short label used in prompts and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Memory => "memory",
            Self::Transportation => "transportation",
            Self::ComplexSchedule => "complex schedule",
        }
    }

    /// Canned advisory shown when this barrier is selected.
    pub fn advisory(&self) -> &'static str {
        match self {
            Self::Cost => {
                "Ask about generic alternatives or a medication assistance program to lower costs."
            }
            Self::Memory => {
                "Set up daily reminders: a pill organizer, phone alarms, or a caregiver check-in."
            }
            Self::Transportation => {
                "Switch refills to a pharmacy that offers mail-order or home delivery."
            }
            Self::ComplexSchedule => {
                "Ask the prescriber whether the regimen can be simplified or doses combined."
            }
        }
    }
}

impl fmt::Display for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complete input state of the risk form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorSet {
    pub medication_count: MedicationCount,
    pub adherence_history: AdherenceHistory,
    pub barriers: BTreeSet<Barrier>,
}

impl FactorSet {
    pub fn new(
        medication_count: MedicationCount,
        adherence_history: AdherenceHistory,
        barriers: impl IntoIterator<Item = Barrier>,
    ) -> Self {
        Self {
            medication_count,
            adherence_history,
            barriers: barriers.into_iter().collect(),
        }
    }

    /// Barrier labels joined for prompt text, or `"none"` when empty.
    pub fn barrier_summary(&self) -> String {
        if self.barriers.is_empty() {
            "none".to_string()
        } else {
            self.barriers
                .iter()
                .map(|b| b.label())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_factor_set_is_lowest_burden() {
        let factors = FactorSet::default();
        assert_eq!(factors.medication_count, MedicationCount::OneToTwo);
        assert_eq!(factors.adherence_history, AdherenceHistory::Good);
        assert!(factors.barriers.is_empty());
    }

    #[test]
    fn medication_count_uses_range_labels_on_the_wire() {
        let json = serde_json::to_string(&MedicationCount::SixOrMore).unwrap();
        assert_eq!(json, "\"6+\"");

        let parsed: MedicationCount = serde_json::from_str("\"3-5\"").unwrap();
        assert_eq!(parsed, MedicationCount::ThreeToFive);
    }

    #[test]
    fn history_serializes_lowercase() {
        let json = serde_json::to_string(&AdherenceHistory::Poor).unwrap();
        assert_eq!(json, "\"poor\"");
    }

    #[test]
    fn barrier_serializes_snake_case() {
        let json = serde_json::to_string(&Barrier::ComplexSchedule).unwrap();
        assert_eq!(json, "\"complex_schedule\"");
    }

    #[test]
    fn barrier_set_iterates_in_declared_order() {
        // Insert out of order; iteration order must still match ALL.
        let factors = FactorSet::new(
            MedicationCount::OneToTwo,
            AdherenceHistory::Good,
            [Barrier::ComplexSchedule, Barrier::Cost, Barrier::Memory],
        );
        let order: Vec<Barrier> = factors.barriers.iter().copied().collect();
        assert_eq!(order, vec![Barrier::Cost, Barrier::Memory, Barrier::ComplexSchedule]);
    }

    #[test]
    fn duplicate_barrier_selection_collapses() {
        let factors = FactorSet::new(
            MedicationCount::OneToTwo,
            AdherenceHistory::Good,
            [Barrier::Cost, Barrier::Cost],
        );
        assert_eq!(factors.barriers.len(), 1);
    }

    #[test]
    fn advisories_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for barrier in Barrier::ALL {
            assert!(seen.insert(barrier.advisory()));
        }
    }

    #[test]
    fn barrier_summary_joins_labels() {
        let factors = FactorSet::new(
            MedicationCount::OneToTwo,
            AdherenceHistory::Good,
            [Barrier::Transportation, Barrier::Cost],
        );
        assert_eq!(factors.barrier_summary(), "cost, transportation");
        assert_eq!(FactorSet::default().barrier_summary(), "none");
    }

    #[test]
    fn snapshot_equality_detects_edits() {
        let before = FactorSet::default();
        let mut after = before.clone();
        assert_eq!(before, after);

        after.barriers.insert(Barrier::Memory);
        assert_ne!(before, after);
    }
}

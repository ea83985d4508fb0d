//! Medication reference data and interaction record shapes.
//!
//! These types cross the boundary to the excluded request layer as plain
//! structured records — no internal graph state ever leaves the core.

use serde::{Deserialize, Serialize};

/// Ordinal severity label on a drug-drug interaction edge.
///
/// The derived `Ord` follows declaration order: `Minor < Moderate < Major`.
/// The recommendation policy is driven by the most severe finding present.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Minor => write!(f, "minor"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::Major => write!(f, "major"),
        }
    }
}

/// Immutable reference data for one medication.
///
/// Loaded once at startup from the formulary seed; never mutated by
/// request handlers. The `interactions` list carries interacting
/// medication *names* only — per-edge severity lives on the graph edges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub generic_name: String,
    pub category: String,
    #[serde(default)]
    pub dosage_forms: Vec<String>,
    #[serde(default)]
    pub side_effects: Vec<String>,
    #[serde(default)]
    pub interactions: Vec<String>,
    #[serde(default)]
    pub is_otc: bool,
}

/// One known interaction between two medications in a checked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionFinding {
    pub drug1: String,
    pub drug2: String,
    pub severity: Severity,
}

impl InteractionFinding {
    /// Return true if either side of this finding is `name`
    /// (case-insensitive, matching the stores' lookup discipline).
    pub fn involves(&self, name: &str) -> bool {
        self.drug1.eq_ignore_ascii_case(name) || self.drug2.eq_ignore_ascii_case(name)
    }
}

/// Result of checking one candidate medication against a patient's
/// current prescriptions.
///
/// `interactions` is filtered to findings the candidate participates in,
/// isolating "is the new drug safe to add" from conflicts that already
/// exist among the current medications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub new_medication: String,
    pub is_compatible: bool,
    pub interactions_found: usize,
    pub interactions: Vec<InteractionFinding>,
    pub current_medications: Vec<String>,
    pub recommendation: String,
}

/// Disposition of one OTC candidate after compatibility checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtcStatus {
    Safe,
    Warning,
}

/// One OTC medication evaluated against the patient's prescriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtcCandidate {
    pub medication: String,
    pub status: OtcStatus,
    pub interactions: Vec<InteractionFinding>,
}

/// Symptom-driven OTC recommendation, partitioned into safe candidates
/// and candidates with interaction warnings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtcAdvice {
    pub symptoms: Vec<String>,
    pub safe: Vec<OtcCandidate>,
    pub warned: Vec<OtcCandidate>,
    pub total_checked: usize,
    pub safe_count: usize,
}

//! # caduceus-contracts
//!
//! Shared types, record shapes, and error types for the caduceus
//! assessment core.
//!
//! All crates in the workspace import from here. No business logic lives
//! in this crate — only data definitions, session state, and error types.

pub mod diagnosis;
pub mod error;
pub mod medication;
pub mod oracle;
pub mod session;

pub use diagnosis::ConditionScore;
pub use error::{CaduceusError, CaduceusResult};
pub use medication::{
    CompatibilityReport, InteractionFinding, MedicationRecord, OtcAdvice, OtcCandidate,
    OtcStatus, Severity,
};
pub use oracle::{FillLevel, ImageClassification, SymptomExtraction};
pub use session::{normalize_symptom, AssessmentId, AssessmentTurn, ObservedSymptoms};

#[cfg(test)]
mod tests {
    use super::*;

    // ── Severity ─────────────────────────────────────────────────────────────

    #[test]
    fn severity_ordering_follows_clinical_escalation() {
        assert!(Severity::Minor < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Major);
        assert_eq!(
            [Severity::Major, Severity::Minor, Severity::Moderate]
                .iter()
                .max(),
            Some(&Severity::Major)
        );
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Major).unwrap(), "\"major\"");
        let decoded: Severity = serde_json::from_str("\"moderate\"").unwrap();
        assert_eq!(decoded, Severity::Moderate);
    }

    #[test]
    fn severity_display_matches_serde_form() {
        assert_eq!(Severity::Minor.to_string(), "minor");
        assert_eq!(Severity::Major.to_string(), "major");
    }

    // ── InteractionFinding ───────────────────────────────────────────────────

    #[test]
    fn finding_involves_is_case_insensitive() {
        let finding = InteractionFinding {
            drug1: "Aspirin".to_string(),
            drug2: "Warfarin".to_string(),
            severity: Severity::Major,
        };

        assert!(finding.involves("aspirin"));
        assert!(finding.involves("WARFARIN"));
        assert!(!finding.involves("Ibuprofen"));
    }

    #[test]
    fn finding_round_trips_through_json() {
        let original = InteractionFinding {
            drug1: "Sertraline".to_string(),
            drug2: "Warfarin".to_string(),
            severity: Severity::Moderate,
        };
        let json = serde_json::to_string(&original).unwrap();
        let decoded: InteractionFinding = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }

    // ── normalize_symptom ────────────────────────────────────────────────────

    #[test]
    fn normalize_lowercases_and_snake_cases() {
        assert_eq!(normalize_symptom("Runny Nose"), "runny_nose");
        assert_eq!(normalize_symptom("  Sore   Throat  "), "sore_throat");
    }

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize_symptom("head-ache!"), "headache");
        assert_eq!(normalize_symptom("fever (mild)"), "fever_mild");
    }

    #[test]
    fn normalize_empty_and_symbolic_input_yields_empty() {
        assert_eq!(normalize_symptom(""), "");
        assert_eq!(normalize_symptom("!!! ???"), "");
    }

    // ── ObservedSymptoms ─────────────────────────────────────────────────────

    #[test]
    fn observed_set_grows_monotonically() {
        let mut observed = ObservedSymptoms::new();

        assert!(observed.confirm("Headache"));
        assert!(observed.confirm("runny nose"));
        // Re-confirming an existing symptom is a no-op.
        assert!(!observed.confirm("headache"));

        assert_eq!(observed.len(), 2);
        assert!(observed.contains("Runny Nose"));
    }

    #[test]
    fn observed_set_iterates_deterministically() {
        let mut observed = ObservedSymptoms::new();
        observed.confirm("zeta");
        observed.confirm("alpha");
        observed.confirm("mid");

        let ids: Vec<&str> = observed.iter().collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn confirm_all_reports_only_new_ids() {
        let mut observed = ObservedSymptoms::new();
        observed.confirm("cough");

        let added = observed.confirm_all(["Cough", "fever", "  "]);
        assert_eq!(added, vec!["fever".to_string()]);
        assert_eq!(observed.len(), 2);
    }

    // ── AssessmentId ─────────────────────────────────────────────────────────

    #[test]
    fn assessment_ids_are_unique() {
        let ids: std::collections::HashSet<String> = (0..100)
            .map(|_| AssessmentId::new().0.to_string())
            .collect();
        assert_eq!(ids.len(), 100);
    }

    // ── CaduceusError display messages ───────────────────────────────────────

    #[test]
    fn error_seed_invalid_display() {
        let err = CaduceusError::SeedInvalid {
            reason: "weight 1.4 out of range".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("seed data invalid"));
        assert!(msg.contains("1.4"));
    }

    #[test]
    fn error_insufficient_data_display() {
        let err = CaduceusError::InsufficientData {
            reason: "no observed symptoms".to_string(),
        };
        assert!(err.to_string().contains("insufficient data"));
    }

    #[test]
    fn error_oracle_failure_display() {
        let err = CaduceusError::OracleFailure {
            reason: "model endpoint timed out".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("oracle call failed"));
        assert!(msg.contains("timed out"));
    }
}

//! The assessment service facade.
//!
//! Owns the two immutable graph stores and the oracle seams, and exposes
//! the operations the excluded request layer calls. The service holds no
//! per-session state: the observed symptom set and prescription lists
//! are caller-owned and passed into every call, so concurrent requests
//! share the service freely.
//!
//! Oracle failures are contained here. A failed extraction downgrades the
//! turn to the already-confirmed symptoms; a failed classification is
//! surfaced as an error. Neither path ever touches graph state.

use chrono::Utc;
use tracing::{debug, warn};

use caduceus_contracts::{
    AssessmentId, AssessmentTurn, CaduceusError, CaduceusResult, CompatibilityReport,
    ImageClassification, InteractionFinding, ObservedSymptoms, OtcAdvice, Severity,
};
use caduceus_diagnosis::DiagnosticReasoner;
use caduceus_graph::{ConditionGraph, InteractionGraph};
use caduceus_meds::InteractionChecker;

use crate::traits::{ImageClassifier, SymptomExtractor};

/// Reply used when the extractor oracle fails mid-conversation.
const EXTRACTOR_FALLBACK_MESSAGE: &str =
    "I could not process that message. Could you describe your symptoms again?";

/// The composition root of the assessment core.
pub struct AssessmentService {
    formulary: InteractionGraph,
    conditions: ConditionGraph,
    extractor: Box<dyn SymptomExtractor>,
    classifier: Box<dyn ImageClassifier>,
}

impl AssessmentService {
    /// Assemble the service from loaded graphs and oracle implementations.
    pub fn new(
        formulary: InteractionGraph,
        conditions: ConditionGraph,
        extractor: Box<dyn SymptomExtractor>,
        classifier: Box<dyn ImageClassifier>,
    ) -> Self {
        Self { formulary, conditions, extractor, classifier }
    }

    /// The loaded formulary graph (read-only).
    pub fn formulary(&self) -> &InteractionGraph {
        &self.formulary
    }

    /// The loaded condition graph (read-only).
    pub fn conditions(&self) -> &ConditionGraph {
        &self.conditions
    }

    // ── Conversational assessment ─────────────────────────────────────────────

    /// Ingest one patient message: extract symptom mentions, merge them
    /// into the caller-owned observed set, rank candidate conditions, and
    /// suggest what to ask next.
    ///
    /// An extractor failure downgrades the turn instead of failing it:
    /// the reply becomes a fixed fallback and the ranking proceeds on the
    /// symptoms already confirmed.
    pub fn assess_message(
        &self,
        assessment_id: &AssessmentId,
        observed: &mut ObservedSymptoms,
        text: &str,
    ) -> AssessmentTurn {
        let known: Vec<&str> = self.conditions.known_symptoms().into_iter().collect();

        let (message, mentions) = match self.extractor.extract(text, &known) {
            Ok(extraction) => (extraction.message, extraction.symptoms),
            Err(e) => {
                warn!(
                    assessment_id = %assessment_id.0,
                    error = %e,
                    "symptom extractor failed; continuing with confirmed symptoms"
                );
                (EXTRACTOR_FALLBACK_MESSAGE.to_string(), Vec::new())
            }
        };

        let new_symptoms = observed.confirm_all(&mentions);

        let reasoner = DiagnosticReasoner::new(&self.conditions);
        let (ranked_conditions, insufficient_data) = match reasoner.score_conditions(observed) {
            Ok(scores) => (scores, false),
            Err(CaduceusError::InsufficientData { reason }) => {
                debug!(assessment_id = %assessment_id.0, %reason, "ranking not possible yet");
                (Vec::new(), true)
            }
            Err(e) => {
                warn!(assessment_id = %assessment_id.0, error = %e, "condition scoring failed");
                (Vec::new(), true)
            }
        };
        let suggested_symptoms = reasoner.suggest_next_symptoms(observed);

        AssessmentTurn {
            assessment_id: assessment_id.clone(),
            message,
            new_symptoms,
            ranked_conditions,
            suggested_symptoms,
            insufficient_data,
            timestamp: Utc::now(),
        }
    }

    // ── Image classification ──────────────────────────────────────────────────

    /// Classify a medication-container image via the CNN oracle.
    ///
    /// The oracle's confidence is validated against [0, 1] before the
    /// result crosses the boundary; an out-of-contract value is an
    /// `OracleFailure`, never silently passed through.
    pub fn classify_fill_level(&self, image_ref: &str) -> CaduceusResult<ImageClassification> {
        let classification = self.classifier.classify(image_ref)?;
        if !classification.confidence.is_finite()
            || !(0.0..=1.0).contains(&classification.confidence)
        {
            return Err(CaduceusError::OracleFailure {
                reason: format!(
                    "classifier confidence {} outside [0, 1]",
                    classification.confidence
                ),
            });
        }
        debug!(
            image_ref,
            fill_level = %classification.fill_level,
            confidence = classification.confidence,
            "image classified"
        );
        Ok(classification)
    }

    // ── Medication safety ─────────────────────────────────────────────────────

    /// Report every known interaction among the given medications.
    pub fn check_interactions<S: AsRef<str>>(&self, meds: &[S]) -> Vec<InteractionFinding> {
        InteractionChecker::new(&self.formulary).check_interactions(meds)
    }

    /// Check whether `candidate` is safe to add to the current list.
    pub fn check_compatibility<S: AsRef<str>>(
        &self,
        current: &[S],
        candidate: &str,
    ) -> CompatibilityReport {
        InteractionChecker::new(&self.formulary).check_compatibility(current, candidate)
    }

    /// Recommend OTC medications for the given symptoms.
    pub fn recommend_otc<S, T>(&self, symptoms: &[S], current: &[T]) -> OtcAdvice
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        InteractionChecker::new(&self.formulary).recommend_otc(symptoms, current)
    }

    /// Interaction-free alternatives within a medication category.
    pub fn safe_alternatives<S: AsRef<str>>(&self, category: &str, current: &[S]) -> Vec<String> {
        InteractionChecker::new(&self.formulary).safe_alternatives(category, current)
    }

    /// Gate for automatic prescribing: refused iff the candidate
    /// participates in at least one major interaction. The report is
    /// returned either way so the caller can record or escalate it.
    pub fn can_prescribe<S: AsRef<str>>(
        &self,
        current: &[S],
        candidate: &str,
    ) -> (bool, CompatibilityReport) {
        let report = self.check_compatibility(current, candidate);
        let blocked = report
            .interactions
            .iter()
            .any(|f| f.severity == Severity::Major);
        if blocked {
            warn!(
                candidate = %report.new_medication,
                "automatic prescribing refused due to major interaction"
            );
        }
        (!blocked, report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use caduceus_contracts::{
        AssessmentId, CaduceusError, CaduceusResult, FillLevel, ImageClassification,
        ObservedSymptoms, SymptomExtraction,
    };
    use caduceus_graph::{ConditionGraph, InteractionGraph};

    use crate::traits::{ImageClassifier, SymptomExtractor};

    use super::AssessmentService;

    // ── Fake oracles ──────────────────────────────────────────────────────────

    /// An extractor that returns a fixed set of mentions.
    struct ScriptedExtractor {
        mentions: Vec<&'static str>,
    }

    impl SymptomExtractor for ScriptedExtractor {
        fn extract(
            &self,
            _text: &str,
            _known_symptoms: &[&str],
        ) -> CaduceusResult<SymptomExtraction> {
            Ok(SymptomExtraction {
                symptoms: self.mentions.iter().map(|s| s.to_string()).collect(),
                message: "Noted. How long has this been going on?".to_string(),
                needs_more_info: true,
            })
        }
    }

    /// An extractor that always fails, simulating a model outage.
    struct FailingExtractor;

    impl SymptomExtractor for FailingExtractor {
        fn extract(
            &self,
            _text: &str,
            _known_symptoms: &[&str],
        ) -> CaduceusResult<SymptomExtraction> {
            Err(CaduceusError::OracleFailure {
                reason: "model endpoint timed out".to_string(),
            })
        }
    }

    /// A classifier returning a fixed, configurable result.
    struct FixedClassifier {
        confidence: f64,
    }

    impl ImageClassifier for FixedClassifier {
        fn classify(&self, _image_ref: &str) -> CaduceusResult<ImageClassification> {
            Ok(ImageClassification {
                fill_level: FillLevel::Half,
                confidence: self.confidence,
                probabilities: Default::default(),
            })
        }
    }

    // ── Builders ──────────────────────────────────────────────────────────────

    fn condition_graph() -> ConditionGraph {
        ConditionGraph::from_toml_str(
            r#"
            [triage]
            opening = ["fever", "cough", "headache"]

            [conditions."Common Cold"]
            runny_nose = 0.9
            cough = 0.7
            fatigue = 0.6
        "#,
        )
        .unwrap()
    }

    fn formulary() -> InteractionGraph {
        InteractionGraph::from_toml_str(
            r#"
            [medications."Aspirin"]
            generic_name = "Acetylsalicylic Acid"
            category = "NSAID"
            is_otc = true

            [medications."Ibuprofen"]
            generic_name = "Ibuprofen"
            category = "NSAID"
            is_otc = true

            [medications."Warfarin"]
            generic_name = "Warfarin Sodium"
            category = "Anticoagulant"

            [[interactions]]
            between = ["Aspirin", "Warfarin"]
            severity = "major"

            [[interactions]]
            between = ["Aspirin", "Ibuprofen"]
            severity = "moderate"
        "#,
        )
        .unwrap()
    }

    fn service(extractor: Box<dyn SymptomExtractor>) -> AssessmentService {
        AssessmentService::new(
            formulary(),
            condition_graph(),
            extractor,
            Box::new(FixedClassifier { confidence: 0.9 }),
        )
    }

    // ── Conversational turns ──────────────────────────────────────────────────

    #[test]
    fn a_turn_merges_symptoms_and_ranks_conditions() {
        let service = service(Box::new(ScriptedExtractor {
            mentions: vec!["Runny Nose", "cough"],
        }));
        let id = AssessmentId::new();
        let mut observed = ObservedSymptoms::new();

        let turn = service.assess_message(&id, &mut observed, "my nose runs and I cough");

        assert_eq!(
            turn.new_symptoms,
            vec!["runny_nose".to_string(), "cough".to_string()]
        );
        assert!(!turn.insufficient_data);
        assert_eq!(turn.ranked_conditions[0].condition, "Common Cold");
        assert!((turn.ranked_conditions[0].confidence - 1.6 / 2.2).abs() < 1e-9);
        // The remaining cold symptom is the natural next question.
        assert_eq!(turn.suggested_symptoms, vec!["fatigue".to_string()]);
    }

    #[test]
    fn suggestions_never_include_already_observed_symptoms() {
        let service = service(Box::new(ScriptedExtractor {
            mentions: vec!["runny_nose", "cough", "fatigue"],
        }));
        let id = AssessmentId::new();
        let mut observed = ObservedSymptoms::new();

        let turn = service.assess_message(&id, &mut observed, "everything at once");

        for suggestion in &turn.suggested_symptoms {
            assert!(!observed.contains(suggestion));
        }
    }

    #[test]
    fn first_turn_with_nothing_extracted_flags_insufficient_data() {
        let service = service(Box::new(ScriptedExtractor { mentions: vec![] }));
        let id = AssessmentId::new();
        let mut observed = ObservedSymptoms::new();

        let turn = service.assess_message(&id, &mut observed, "hello");

        assert!(turn.insufficient_data);
        assert!(turn.ranked_conditions.is_empty());
        // Fallback opening questions still flow.
        assert_eq!(
            turn.suggested_symptoms,
            vec!["fever".to_string(), "cough".to_string(), "headache".to_string()]
        );
    }

    #[test]
    fn extractor_failure_downgrades_the_turn_without_losing_state() {
        let service = service(Box::new(FailingExtractor));
        let id = AssessmentId::new();
        let mut observed = ObservedSymptoms::new();
        observed.confirm("runny_nose");

        let turn = service.assess_message(&id, &mut observed, "???");

        // No new symptoms, but the existing observation still ranks.
        assert!(turn.new_symptoms.is_empty());
        assert!(!turn.insufficient_data);
        assert_eq!(turn.ranked_conditions[0].condition, "Common Cold");
        assert!(turn.message.contains("describe your symptoms again"));
        assert_eq!(observed.len(), 1);
    }

    // ── Image classification ──────────────────────────────────────────────────

    #[test]
    fn classification_passes_through_when_in_contract() {
        let service = service(Box::new(ScriptedExtractor { mentions: vec![] }));

        let result = service.classify_fill_level("images/bottle-17.jpg").unwrap();
        assert_eq!(result.fill_level, FillLevel::Half);
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        let service = AssessmentService::new(
            formulary(),
            condition_graph(),
            Box::new(ScriptedExtractor { mentions: vec![] }),
            Box::new(FixedClassifier { confidence: 1.7 }),
        );

        match service.classify_fill_level("images/bottle-17.jpg") {
            Err(CaduceusError::OracleFailure { reason }) => {
                assert!(reason.contains("1.7"));
            }
            other => panic!("expected OracleFailure, got {:?}", other),
        }
    }

    // ── Prescribing gate ──────────────────────────────────────────────────────

    #[test]
    fn major_interaction_blocks_automatic_prescribing() {
        let service = service(Box::new(ScriptedExtractor { mentions: vec![] }));

        let (allowed, report) = service.can_prescribe(&["Warfarin"], "Aspirin");

        assert!(!allowed);
        assert!(!report.is_compatible);
        assert!(report.recommendation.contains("Do not prescribe"));
    }

    #[test]
    fn moderate_interaction_does_not_block_but_is_reported() {
        let service = service(Box::new(ScriptedExtractor { mentions: vec![] }));

        let (allowed, report) = service.can_prescribe(&["Ibuprofen"], "Aspirin");

        assert!(allowed);
        assert!(!report.is_compatible);
        assert_eq!(report.interactions_found, 1);
    }

    #[test]
    fn delegated_medication_checks_are_wired() {
        let service = service(Box::new(ScriptedExtractor { mentions: vec![] }));

        assert_eq!(service.check_interactions(&["Aspirin", "Warfarin"]).len(), 1);
        assert_eq!(
            service.safe_alternatives("NSAID", &["Warfarin"]),
            vec!["Ibuprofen".to_string()]
        );
        let advice = service.recommend_otc(&["headache"], &[] as &[&str]);
        assert_eq!(advice.total_checked, 0); // no [otc] table in this fixture
    }
}

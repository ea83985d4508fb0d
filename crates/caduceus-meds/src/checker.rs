//! Pairwise interaction checking and compatibility verdicts.
//!
//! `check_interactions` enumerates every unordered pair of the input list
//! (deduplicated, first-seen order) and reports the pairs with a known
//! edge. That is O(n²) pairs for n medications — acceptable because
//! realistic medication lists stay small (well under 50); a scaling
//! bound, not a defect.
//!
//! Unknown medication names are answered permissively: an unseen name
//! simply has no known interactions. Unseen medications are common and
//! must not fail the whole check.

use tracing::{debug, warn};

use caduceus_contracts::{CompatibilityReport, InteractionFinding, Severity};
use caduceus_graph::InteractionGraph;

/// A stateless checker borrowing the shared interaction graph.
#[derive(Debug, Clone, Copy)]
pub struct InteractionChecker<'g> {
    graph: &'g InteractionGraph,
}

impl<'g> InteractionChecker<'g> {
    pub fn new(graph: &'g InteractionGraph) -> Self {
        Self { graph }
    }

    pub(crate) fn graph(&self) -> &'g InteractionGraph {
        self.graph
    }

    /// Deduplicate `meds` case-insensitively, preserving first-seen order
    /// and resolving each name to its seeded display form when known.
    fn dedupe<S: AsRef<str>>(&self, meds: &[S]) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for med in meds {
            let raw = med.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            let key = raw.to_lowercase();
            if seen.insert(key) {
                out.push(
                    self.graph
                        .display_name(raw)
                        .unwrap_or(raw)
                        .to_string(),
                );
            }
        }
        out
    }

    /// Report every known interaction among the given medications.
    ///
    /// The result is invariant under reordering and duplication of the
    /// input, and never pairs a medication with itself.
    pub fn check_interactions<S: AsRef<str>>(&self, meds: &[S]) -> Vec<InteractionFinding> {
        let unique = self.dedupe(meds);

        let mut findings = Vec::new();
        for i in 0..unique.len() {
            for j in (i + 1)..unique.len() {
                if let Some(severity) = self.graph.has_interaction(&unique[i], &unique[j]) {
                    findings.push(InteractionFinding {
                        drug1: unique[i].clone(),
                        drug2: unique[j].clone(),
                        severity,
                    });
                }
            }
        }

        debug!(
            medications = unique.len(),
            findings = findings.len(),
            "interaction check complete"
        );
        findings
    }

    /// Check whether `candidate` is safe to add to the current medication
    /// list.
    ///
    /// Runs the pairwise check over `current ∪ {candidate}` and filters to
    /// findings the candidate participates in — conflicts that already
    /// exist among the current medications do not count against the new
    /// one. Incompatible iff at least one such finding remains.
    pub fn check_compatibility<S: AsRef<str>>(
        &self,
        current: &[S],
        candidate: &str,
    ) -> CompatibilityReport {
        let candidate_name = self
            .graph
            .display_name(candidate)
            .unwrap_or(candidate.trim())
            .to_string();

        let mut all: Vec<String> = current
            .iter()
            .map(|m| m.as_ref().to_string())
            .collect();
        all.push(candidate_name.clone());

        let current_medications = self.dedupe(current);
        let relevant: Vec<InteractionFinding> = self
            .check_interactions(&all)
            .into_iter()
            .filter(|f| f.involves(&candidate_name))
            .collect();

        let is_compatible = relevant.is_empty();
        if !is_compatible {
            warn!(
                candidate = %candidate_name,
                findings = relevant.len(),
                "candidate medication conflicts with current prescriptions"
            );
        }

        CompatibilityReport {
            recommendation: recommendation_for(&relevant),
            new_medication: candidate_name,
            is_compatible,
            interactions_found: relevant.len(),
            interactions: relevant,
            current_medications,
        }
    }

    /// Formulary medications in `category` that are not already
    /// prescribed and add no interaction of their own to the current
    /// list. Conflicts that already exist among the current medications
    /// do not disqualify an otherwise clean alternative.
    ///
    /// Order is deterministic: category members iterate in their stable
    /// seeded order.
    pub fn safe_alternatives<S: AsRef<str>>(&self, category: &str, current: &[S]) -> Vec<String> {
        let prescribed: std::collections::HashSet<String> = current
            .iter()
            .map(|m| m.as_ref().trim().to_lowercase())
            .collect();

        self.graph
            .in_category(category)
            .into_iter()
            .filter(|name| !prescribed.contains(&name.to_lowercase()))
            .filter(|name| self.check_compatibility(current, name).is_compatible)
            .map(str::to_string)
            .collect()
    }
}

/// Recommendation policy, first match wins: any major finding refuses
/// automatic prescribing; any moderate finding asks for monitoring; any
/// remaining finding is minor and asks for dosage or timing adjustment.
fn recommendation_for(findings: &[InteractionFinding]) -> String {
    if findings.is_empty() {
        return "No known interactions detected. Medication appears compatible.".to_string();
    }
    let worst = findings
        .iter()
        .map(|f| f.severity)
        .max()
        .unwrap_or(Severity::Minor);
    match worst {
        Severity::Major => {
            "MAJOR interactions detected. Do not prescribe without specialist consultation."
                .to_string()
        }
        Severity::Moderate => {
            "Moderate interactions found. Monitor the patient closely and consider alternatives."
                .to_string()
        }
        Severity::Minor => {
            "Minor interactions present. Adjust dosage or timing as needed.".to_string()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

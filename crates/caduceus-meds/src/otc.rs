//! Symptom-driven OTC recommendation.
//!
//! Candidates come from the formulary seed's static symptom → medication
//! table. Each unique candidate is compatibility-checked against the
//! patient's current prescriptions, then partitioned into a safe set and
//! a warned set.

use std::collections::BTreeMap;

use tracing::debug;

use caduceus_contracts::{normalize_symptom, OtcAdvice, OtcCandidate, OtcStatus};

use crate::checker::InteractionChecker;

impl<'g> InteractionChecker<'g> {
    /// Recommend OTC medications for the given symptoms, partitioned by
    /// compatibility with the current prescriptions.
    ///
    /// Candidates are deduplicated case-insensitively across symptoms and
    /// evaluated in stable lexicographic order, so the advice is
    /// deterministic regardless of symptom order.
    pub fn recommend_otc<S, T>(&self, symptoms: &[S], current: &[T]) -> OtcAdvice
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let symptom_ids: Vec<String> = symptoms
            .iter()
            .map(|s| normalize_symptom(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();

        // Canonical key → display name, deduplicated across symptoms.
        let mut candidates: BTreeMap<String, String> = BTreeMap::new();
        for symptom in &symptom_ids {
            for name in self.graph().otc_candidates(symptom) {
                candidates
                    .entry(name.trim().to_lowercase())
                    .or_insert_with(|| name.trim().to_string());
            }
        }

        let mut safe = Vec::new();
        let mut warned = Vec::new();
        for name in candidates.values() {
            let report = self.check_compatibility(current, name);
            if report.is_compatible {
                safe.push(OtcCandidate {
                    medication: report.new_medication,
                    status: OtcStatus::Safe,
                    interactions: Vec::new(),
                });
            } else {
                warned.push(OtcCandidate {
                    medication: report.new_medication,
                    status: OtcStatus::Warning,
                    interactions: report.interactions,
                });
            }
        }

        debug!(
            symptoms = symptom_ids.len(),
            checked = candidates.len(),
            safe = safe.len(),
            "OTC recommendation complete"
        );

        OtcAdvice {
            symptoms: symptom_ids,
            total_checked: candidates.len(),
            safe_count: safe.len(),
            safe,
            warned,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

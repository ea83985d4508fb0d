//! The diagnostic reasoner.
//!
//! Scoring algorithm: for each condition, confidence is the sum of edge
//! weights whose symptom has been observed, normalized by the condition's
//! total edge-weight mass — the fraction of the condition's expected
//! symptom-weight mass seen so far. Observed symptoms the graph does not
//! know contribute nothing. Conditions with zero overlap are excluded
//! from the ranking rather than reported at zero.
//!
//! The reasoner is stateless: the observed set is caller-owned and passed
//! in on every call, so concurrent calls over the shared graph need no
//! coordination.

use std::collections::BTreeMap;

use tracing::debug;

use caduceus_contracts::{
    CaduceusError, CaduceusResult, ConditionScore, ObservedSymptoms,
};
use caduceus_graph::ConditionGraph;

/// How many top-ranked conditions feed the next-symptom candidate pool.
const TOP_CONDITION_POOL: usize = 3;

/// Presentation cap on next-symptom suggestions.
const MAX_SUGGESTIONS: usize = 3;

/// A stateless reasoner borrowing the shared condition graph.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticReasoner<'g> {
    graph: &'g ConditionGraph,
}

impl<'g> DiagnosticReasoner<'g> {
    pub fn new(graph: &'g ConditionGraph) -> Self {
        Self { graph }
    }

    /// Rank candidate conditions for the observed symptom set, most
    /// confident first.
    ///
    /// Ties are broken by condition name (lexicographic) so the ranking
    /// is fully deterministic. Confidence always lies in [0, 1].
    ///
    /// Returns `CaduceusError::InsufficientData` when no observed symptom
    /// is known to the graph — an explicit signal, never a fabricated
    /// ranking.
    pub fn score_conditions(
        &self,
        observed: &ObservedSymptoms,
    ) -> CaduceusResult<Vec<ConditionScore>> {
        let known = self.graph.known_symptoms();
        let usable: Vec<&str> = observed.iter().filter(|s| known.contains(s)).collect();

        if usable.is_empty() {
            return Err(CaduceusError::InsufficientData {
                reason: if observed.is_empty() {
                    "no symptoms observed yet".to_string()
                } else {
                    format!("none of the {} observed symptoms are known", observed.len())
                },
            });
        }

        let mut scores: Vec<ConditionScore> = Vec::new();
        for condition in self.graph.conditions() {
            let edges = match self.graph.symptoms_of(condition) {
                Some(edges) => edges,
                None => continue,
            };
            let overlap: f64 = usable
                .iter()
                .filter_map(|s| edges.get(*s))
                .sum();
            if overlap <= 0.0 {
                continue;
            }
            // weight_mass is the sum over ALL edges, so overlap/mass ≤ 1.
            let mass = match self.graph.weight_mass(condition) {
                Some(mass) if mass > 0.0 => mass,
                _ => continue,
            };
            scores.push(ConditionScore {
                condition: condition.to_string(),
                confidence: overlap / mass,
            });
        }

        scores.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.condition.cmp(&b.condition))
        });

        debug!(
            observed = observed.len(),
            usable = usable.len(),
            candidates = scores.len(),
            "conditions scored"
        );

        Ok(scores)
    }

    /// Suggest unobserved symptoms worth asking about next.
    ///
    /// Candidates are the unobserved edges of the top-ranked conditions,
    /// ordered by the maximum edge weight across that pool (then by id),
    /// capped for presentation. When no ranking is possible yet, the
    /// graph's fixed opening symptoms are used instead. Symptoms already
    /// observed are never suggested.
    pub fn suggest_next_symptoms(&self, observed: &ObservedSymptoms) -> Vec<String> {
        let scores = match self.score_conditions(observed) {
            Ok(scores) => scores,
            Err(_) => {
                return self
                    .graph
                    .opening_symptoms()
                    .iter()
                    .filter(|s| !observed.contains(s))
                    .take(MAX_SUGGESTIONS)
                    .cloned()
                    .collect();
            }
        };

        // Max weight per unobserved symptom across the top conditions.
        let mut candidates: BTreeMap<&str, f64> = BTreeMap::new();
        for score in scores.iter().take(TOP_CONDITION_POOL) {
            let edges = match self.graph.symptoms_of(&score.condition) {
                Some(edges) => edges,
                None => continue,
            };
            for (symptom, weight) in edges {
                if observed.contains(symptom) {
                    continue;
                }
                let slot = candidates.entry(symptom.as_str()).or_insert(*weight);
                if *weight > *slot {
                    *slot = *weight;
                }
            }
        }

        let mut ranked: Vec<(&str, f64)> = candidates.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });

        ranked
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(symptom, _)| symptom.to_string())
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! The condition-symptom graph store.
//!
//! Conditions and symptoms are two node classes; edges run condition →
//! symptom and carry a likelihood weight, P(symptom | condition), in
//! [0, 1]. Like the interaction graph, this store is built once at
//! startup and read-only afterwards.
//!
//! Load validation is strict: an empty condition table, a condition with
//! zero symptom edges, or a weight outside [0, 1] is fatal. A graph that
//! fails validation must never be served.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use caduceus_contracts::{CaduceusError, CaduceusResult, normalize_symptom};

use crate::seed::ConditionSeed;
use crate::GraphMetrics;

/// Built-in condition seed, used when no override file is supplied.
const BUILTIN_CONDITIONS: &str = include_str!("../seeds/conditions.toml");

/// The immutable condition-symptom graph.
#[derive(Debug)]
pub struct ConditionGraph {
    /// Condition name → (canonical symptom id → weight).
    conditions: BTreeMap<String, BTreeMap<String, f64>>,
    /// Total edge-weight mass per condition, precomputed at load.
    weight_mass: BTreeMap<String, f64>,
    /// Fixed high-prior symptoms to open with when nothing is observed.
    opening: Vec<String>,
}

impl ConditionGraph {
    /// Build the graph from the built-in condition seed.
    pub fn builtin() -> CaduceusResult<Self> {
        Self::from_toml_str(BUILTIN_CONDITIONS)
    }

    /// Build the graph from a seed file, falling back to the built-in
    /// seed when `path` is `None` or names a file that does not exist.
    pub fn load(path: Option<&Path>) -> CaduceusResult<Self> {
        match path {
            Some(p) if p.exists() => Self::from_file(p),
            Some(p) => {
                debug!(path = %p.display(), "condition override absent, using built-in seed");
                Self::builtin()
            }
            None => Self::builtin(),
        }
    }

    /// Read the file at `path` and parse it as a condition seed.
    pub fn from_file(path: &Path) -> CaduceusResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CaduceusError::SeedUnreadable {
                reason: format!("failed to read condition seed '{}': {}", path.display(), e),
            }
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse `s` as a TOML condition seed, validate it, and build the graph.
    pub fn from_toml_str(s: &str) -> CaduceusResult<Self> {
        let seed: ConditionSeed =
            toml::from_str(s).map_err(|e| CaduceusError::SeedUnreadable {
                reason: format!("failed to parse condition seed: {}", e),
            })?;

        if seed.conditions.is_empty() {
            return Err(CaduceusError::SeedInvalid {
                reason: "condition seed defines no conditions".to_string(),
            });
        }

        let mut conditions = BTreeMap::new();
        let mut weight_mass = BTreeMap::new();

        for (name, symptoms) in seed.conditions {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(CaduceusError::SeedInvalid {
                    reason: "condition with empty name in seed".to_string(),
                });
            }
            if symptoms.is_empty() {
                return Err(CaduceusError::SeedInvalid {
                    reason: format!("condition '{}' has no symptom edges", name),
                });
            }

            let mut edges = BTreeMap::new();
            let mut mass = 0.0;
            for (symptom, weight) in symptoms {
                let id = normalize_symptom(&symptom);
                if id.is_empty() {
                    return Err(CaduceusError::SeedInvalid {
                        reason: format!(
                            "condition '{}' has a symptom that normalizes to nothing: {:?}",
                            name, symptom
                        ),
                    });
                }
                if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                    return Err(CaduceusError::SeedInvalid {
                        reason: format!(
                            "condition '{}' symptom '{}' has weight {} outside [0, 1]",
                            name, id, weight
                        ),
                    });
                }
                mass += weight;
                edges.insert(id, weight);
            }

            weight_mass.insert(name.clone(), mass);
            conditions.insert(name, edges);
        }

        let opening: Vec<String> = seed
            .triage
            .opening
            .iter()
            .map(|s| normalize_symptom(s))
            .filter(|s| !s.is_empty())
            .collect();

        debug!(
            conditions = conditions.len(),
            opening = opening.len(),
            "condition graph loaded"
        );

        Ok(Self { conditions, weight_mass, opening })
    }

    /// Iterate condition names in stable lexicographic order.
    pub fn conditions(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    /// The weighted symptom edges of `condition`, if it exists.
    pub fn symptoms_of(&self, condition: &str) -> Option<&BTreeMap<String, f64>> {
        self.conditions.get(condition.trim())
    }

    /// Total edge-weight mass of `condition` — the scoring denominator.
    pub fn weight_mass(&self, condition: &str) -> Option<f64> {
        self.weight_mass.get(condition.trim()).copied()
    }

    /// The union of all symptom ids across every condition.
    pub fn known_symptoms(&self) -> BTreeSet<&str> {
        self.conditions
            .values()
            .flat_map(|edges| edges.keys().map(String::as_str))
            .collect()
    }

    /// Fixed opening symptoms for sessions with nothing observed yet.
    pub fn opening_symptoms(&self) -> &[String] {
        &self.opening
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    /// Summary metrics; nodes counts conditions plus distinct symptoms.
    pub fn metrics(&self) -> GraphMetrics {
        let edge_count = self.conditions.values().map(BTreeMap::len).sum();
        GraphMetrics::compute(self.condition_count() + self.known_symptoms().len(), edge_count)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! The drug-interaction graph store.
//!
//! Medications are nodes; known pairwise interactions are symmetric,
//! severity-labeled edges. The graph is built once from seed data at
//! startup and is read-only afterwards — any number of concurrent checks
//! may share a reference without locking.
//!
//! Construction rules:
//!
//! 1. Medication names are normalized (trim + case-fold) for keys, so
//!    every lookup is case-insensitive. The display form from the seed
//!    is preserved for output records.
//! 2. An edge referencing a medication with no `[medications]` entry
//!    auto-creates a bare node rather than failing. This is a deliberate
//!    permissive-seeding choice: interaction lists routinely name agents
//!    (grapefruit, alcohol, drug classes) that are not formulary entries.
//! 3. A pair named in a medication's `interactions` list without an
//!    explicit `[[interactions]]` entry gets a `minor` edge; when a pair
//!    is covered more than once, the most severe label wins.
//! 4. Self-loops in the seed are rejected — a medication never interacts
//!    with itself.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use caduceus_contracts::{
    CaduceusError, CaduceusResult, MedicationRecord, Severity, normalize_symptom,
};

use crate::seed::FormularySeed;
use crate::GraphMetrics;

/// Built-in formulary seed, used when no override file is supplied.
const BUILTIN_FORMULARY: &str = include_str!("../seeds/formulary.toml");

/// One medication node: the display name as seeded, plus reference data
/// when the formulary carries an entry for it.
#[derive(Debug, Clone)]
struct MedicationNode {
    display: String,
    /// `None` for nodes auto-created from an edge endpoint.
    record: Option<MedicationRecord>,
}

/// The immutable drug-interaction graph.
#[derive(Debug)]
pub struct InteractionGraph {
    /// Canonical name → node.
    nodes: BTreeMap<String, MedicationNode>,
    /// Canonical name → (canonical neighbor → severity). Both directions
    /// of every edge are stored, so lookups never need to try the swap.
    edges: BTreeMap<String, BTreeMap<String, Severity>>,
    /// Canonical symptom id → OTC candidate display names.
    otc: BTreeMap<String, Vec<String>>,
}

/// Canonical lookup form of a medication name.
pub(crate) fn canonical(name: &str) -> String {
    name.trim().to_lowercase()
}

impl InteractionGraph {
    /// Build the graph from the built-in formulary seed.
    pub fn builtin() -> CaduceusResult<Self> {
        Self::from_toml_str(BUILTIN_FORMULARY)
    }

    /// Build the graph from a seed file, falling back to the built-in
    /// seed when `path` is `None` or names a file that does not exist.
    ///
    /// An existing but malformed file is a fatal error — the process must
    /// not serve with an invalid graph.
    pub fn load(path: Option<&Path>) -> CaduceusResult<Self> {
        match path {
            Some(p) if p.exists() => Self::from_file(p),
            Some(p) => {
                debug!(path = %p.display(), "formulary override absent, using built-in seed");
                Self::builtin()
            }
            None => Self::builtin(),
        }
    }

    /// Read the file at `path` and parse it as a formulary seed.
    pub fn from_file(path: &Path) -> CaduceusResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CaduceusError::SeedUnreadable {
                reason: format!("failed to read formulary seed '{}': {}", path.display(), e),
            }
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse `s` as a TOML formulary seed and build the graph.
    pub fn from_toml_str(s: &str) -> CaduceusResult<Self> {
        let seed: FormularySeed =
            toml::from_str(s).map_err(|e| CaduceusError::SeedUnreadable {
                reason: format!("failed to parse formulary seed: {}", e),
            })?;

        let mut graph = Self {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            otc: BTreeMap::new(),
        };

        // Formulary entries become full nodes.
        for (name, record) in seed.medications {
            let key = canonical(&name);
            if key.is_empty() {
                return Err(CaduceusError::SeedInvalid {
                    reason: "medication with empty name in formulary seed".to_string(),
                });
            }
            graph.nodes.insert(
                key,
                MedicationNode {
                    display: name.trim().to_string(),
                    record: Some(record),
                },
            );
        }

        // Per-medication name lists create edges at the default severity.
        // Collected first so the node map is complete before edges land.
        let list_pairs: Vec<(String, String)> = graph
            .nodes
            .values()
            .filter_map(|node| node.record.as_ref().map(|r| (node.display.clone(), r)))
            .flat_map(|(display, record)| {
                record
                    .interactions
                    .iter()
                    .map(move |other| (display.clone(), other.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        for (a, b) in list_pairs {
            graph.insert_edge(&a, &b, Severity::Minor)?;
        }

        // Explicit entries supply real severities; most severe wins.
        for edge in seed.interactions {
            let [a, b] = edge.between;
            graph.insert_edge(&a, &b, edge.severity)?;
        }

        for (symptom, candidates) in seed.otc {
            graph.otc.insert(normalize_symptom(&symptom), candidates);
        }

        if graph.nodes.is_empty() {
            warn!("formulary seed defines no medications; every check will be a no-op");
        }
        debug!(
            medications = graph.nodes.len(),
            edges = graph.edge_count(),
            otc_symptoms = graph.otc.len(),
            "interaction graph loaded"
        );

        Ok(graph)
    }

    /// Insert a symmetric edge, auto-creating missing endpoint nodes and
    /// merging duplicate labels by "most severe wins".
    fn insert_edge(&mut self, a: &str, b: &str, severity: Severity) -> CaduceusResult<()> {
        let ka = canonical(a);
        let kb = canonical(b);
        if ka.is_empty() || kb.is_empty() {
            return Err(CaduceusError::SeedInvalid {
                reason: format!("interaction edge with empty endpoint: ({:?}, {:?})", a, b),
            });
        }
        if ka == kb {
            return Err(CaduceusError::SeedInvalid {
                reason: format!("self-interaction edge on '{}'", a.trim()),
            });
        }

        for (key, raw) in [(&ka, a), (&kb, b)] {
            self.nodes.entry(key.clone()).or_insert_with(|| MedicationNode {
                display: raw.trim().to_string(),
                record: None,
            });
        }

        for (from, to) in [(&ka, &kb), (&kb, &ka)] {
            let slot = self
                .edges
                .entry(from.clone())
                .or_default()
                .entry(to.clone())
                .or_insert(severity);
            if severity > *slot {
                *slot = severity;
            }
        }
        Ok(())
    }

    /// Look up the severity of the interaction between `a` and `b`, in
    /// either order. Unknown names and identical names yield `None`.
    pub fn has_interaction(&self, a: &str, b: &str) -> Option<Severity> {
        let ka = canonical(a);
        let kb = canonical(b);
        if ka == kb {
            return None;
        }
        self.edges.get(&ka).and_then(|m| m.get(&kb)).copied()
    }

    /// Display names of every medication known to interact with `name`,
    /// in stable lexicographic order of their canonical form.
    pub fn neighbors(&self, name: &str) -> Vec<&str> {
        self.edges
            .get(&canonical(name))
            .map(|m| {
                m.keys()
                    .filter_map(|k| self.nodes.get(k))
                    .map(|n| n.display.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reference data for `name`, if the formulary carries an entry.
    /// Auto-created bare nodes have none.
    pub fn record(&self, name: &str) -> Option<&MedicationRecord> {
        self.nodes.get(&canonical(name)).and_then(|n| n.record.as_ref())
    }

    /// The display form of `name` as seeded, if the node exists.
    pub fn display_name(&self, name: &str) -> Option<&str> {
        self.nodes.get(&canonical(name)).map(|n| n.display.as_str())
    }

    /// Display names of formulary medications in `category`
    /// (case-insensitive), in stable lexicographic order.
    pub fn in_category(&self, category: &str) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|n| {
                n.record
                    .as_ref()
                    .is_some_and(|r| r.category.eq_ignore_ascii_case(category.trim()))
            })
            .map(|n| n.display.as_str())
            .collect()
    }

    /// OTC candidates mapped from a symptom mention, which is normalized
    /// before lookup. Unknown symptoms yield an empty slice.
    pub fn otc_candidates(&self, symptom: &str) -> &[String] {
        self.otc
            .get(&normalize_symptom(symptom))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of medication nodes (formulary entries plus auto-created).
    pub fn medication_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of unordered interaction edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    /// Summary metrics over the node/edge structure.
    pub fn metrics(&self) -> GraphMetrics {
        GraphMetrics::compute(self.medication_count(), self.edge_count())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use caduceus_contracts::Severity;

    use super::InteractionGraph;

    // ── Seed fixtures ─────────────────────────────────────────────────────────

    /// A three-node seed with one explicit major edge and one list-only
    /// (implicitly minor) edge.
    fn small_seed() -> InteractionGraph {
        let toml = r#"
            [medications."Aspirin"]
            generic_name = "Acetylsalicylic Acid"
            category = "NSAID"
            interactions = ["ibuprofen"]
            is_otc = true

            [medications."Warfarin"]
            generic_name = "Warfarin Sodium"
            category = "Anticoagulant"

            [medications."Ibuprofen"]
            generic_name = "Ibuprofen"
            category = "NSAID"
            is_otc = true

            [[interactions]]
            between = ["Aspirin", "Warfarin"]
            severity = "major"
        "#;
        InteractionGraph::from_toml_str(toml).unwrap()
    }

    // ── Lookup semantics ──────────────────────────────────────────────────────

    #[test]
    fn lookup_is_symmetric() {
        let graph = small_seed();

        assert_eq!(graph.has_interaction("Aspirin", "Warfarin"), Some(Severity::Major));
        assert_eq!(graph.has_interaction("Warfarin", "Aspirin"), Some(Severity::Major));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let graph = small_seed();

        assert_eq!(graph.has_interaction("aspirin", "WARFARIN"), Some(Severity::Major));
        assert_eq!(graph.has_interaction("  Aspirin  ", "warfarin"), Some(Severity::Major));
    }

    #[test]
    fn a_medication_never_interacts_with_itself() {
        let graph = small_seed();
        assert_eq!(graph.has_interaction("Aspirin", "aspirin"), None);
    }

    #[test]
    fn unknown_medication_has_no_interactions() {
        let graph = small_seed();
        assert_eq!(graph.has_interaction("Aspirin", "Unobtainium"), None);
        assert!(graph.neighbors("Unobtainium").is_empty());
    }

    #[test]
    fn neighbors_are_display_names_in_stable_order() {
        let graph = small_seed();
        assert_eq!(graph.neighbors("aspirin"), vec!["Ibuprofen", "Warfarin"]);
    }

    #[test]
    fn list_only_pairs_default_to_minor() {
        let graph = small_seed();
        assert_eq!(graph.has_interaction("Aspirin", "Ibuprofen"), Some(Severity::Minor));
    }

    // ── Construction rules ────────────────────────────────────────────────────

    #[test]
    fn edge_endpoints_are_auto_created() {
        let toml = r#"
            [medications."Metformin"]
            generic_name = "Metformin HCl"
            category = "Antidiabetic"

            [[interactions]]
            between = ["Metformin", "Contrast Dye"]
            severity = "major"
        "#;
        let graph = InteractionGraph::from_toml_str(toml).unwrap();

        // "Contrast Dye" has no formulary entry but still resolves.
        assert_eq!(graph.has_interaction("metformin", "contrast dye"), Some(Severity::Major));
        assert!(graph.record("contrast dye").is_none());
        assert_eq!(graph.display_name("contrast dye"), Some("Contrast Dye"));
        assert_eq!(graph.medication_count(), 2);
    }

    #[test]
    fn duplicate_edges_merge_most_severe_wins() {
        let toml = r#"
            [medications."A"]
            generic_name = "A"
            category = "X"
            interactions = ["B"]

            [[interactions]]
            between = ["A", "B"]
            severity = "moderate"

            [[interactions]]
            between = ["B", "A"]
            severity = "major"

            [[interactions]]
            between = ["A", "B"]
            severity = "minor"
        "#;
        let graph = InteractionGraph::from_toml_str(toml).unwrap();

        assert_eq!(graph.has_interaction("A", "B"), Some(Severity::Major));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn self_loop_in_seed_is_rejected() {
        let toml = r#"
            [medications."A"]
            generic_name = "A"
            category = "X"

            [[interactions]]
            between = ["A", "a"]
            severity = "minor"
        "#;
        let err = InteractionGraph::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("self-interaction"));
    }

    #[test]
    fn malformed_toml_is_unreadable() {
        let err = InteractionGraph::from_toml_str("not toml ][[[").unwrap_err();
        assert!(err.to_string().contains("seed data unreadable"));
    }

    #[test]
    fn unknown_severity_label_is_rejected() {
        let toml = r#"
            [medications."A"]
            generic_name = "A"
            category = "X"

            [[interactions]]
            between = ["A", "B"]
            severity = "catastrophic"
        "#;
        assert!(InteractionGraph::from_toml_str(toml).is_err());
    }

    // ── Category and OTC lookups ──────────────────────────────────────────────

    #[test]
    fn category_members_are_sorted_and_exclude_bare_nodes() {
        let graph = small_seed();

        assert_eq!(graph.in_category("NSAID"), vec!["Aspirin", "Ibuprofen"]);
        assert_eq!(graph.in_category("nsaid"), vec!["Aspirin", "Ibuprofen"]);
        assert!(graph.in_category("Statin").is_empty());
    }

    #[test]
    fn otc_candidates_normalize_the_symptom() {
        let toml = r#"
            [otc]
            headache = ["Acetaminophen", "Ibuprofen"]
        "#;
        let graph = InteractionGraph::from_toml_str(toml).unwrap();

        let got: Vec<&str> = graph
            .otc_candidates(" HEADACHE ")
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(got, vec!["Acetaminophen", "Ibuprofen"]);
        assert!(graph.otc_candidates("insomnia").is_empty());
    }

    // ── Built-in seed ─────────────────────────────────────────────────────────

    #[test]
    fn builtin_seed_loads_and_carries_the_scenario_edge() {
        let graph = InteractionGraph::builtin().unwrap();

        assert!(graph.medication_count() >= 19);
        assert_eq!(graph.has_interaction("Aspirin", "Warfarin"), Some(Severity::Major));
        assert_eq!(graph.record("aspirin").unwrap().category, "NSAID");
        assert!(!graph.otc_candidates("headache").is_empty());
    }

    #[test]
    fn builtin_metrics_are_consistent() {
        let graph = InteractionGraph::builtin().unwrap();
        let metrics = graph.metrics();

        assert_eq!(metrics.nodes, graph.medication_count());
        assert!(metrics.density > 0.0 && metrics.density <= 1.0);
    }
}

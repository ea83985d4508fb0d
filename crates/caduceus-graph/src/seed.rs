//! TOML seed document schemas.
//!
//! Both graph stores are built from TOML documents: a built-in seed
//! embedded at compile time, optionally overridden by a file path at
//! startup. These types mirror the documents exactly; validation beyond
//! shape (weight ranges, self-loops, empty conditions) happens in the
//! store constructors.

use std::collections::BTreeMap;

use serde::Deserialize;

use caduceus_contracts::{MedicationRecord, Severity};

/// The formulary seed document: medication reference data, explicit
/// interaction edges, and the symptom → OTC-candidate table.
#[derive(Debug, Deserialize)]
pub(crate) struct FormularySeed {
    #[serde(default)]
    pub medications: BTreeMap<String, MedicationRecord>,

    /// Explicit severity-labeled edges. The per-medication `interactions`
    /// name lists carry no severity; entries here supply it.
    #[serde(default)]
    pub interactions: Vec<InteractionEdgeSeed>,

    /// Canonical symptom id → OTC medication names.
    #[serde(default)]
    pub otc: BTreeMap<String, Vec<String>>,
}

/// One severity-labeled interaction edge in the seed.
#[derive(Debug, Deserialize)]
pub(crate) struct InteractionEdgeSeed {
    pub between: [String; 2],
    pub severity: Severity,
}

/// The condition seed document: weighted condition → symptom edges plus
/// the fixed opening-question symptom list.
#[derive(Debug, Deserialize)]
pub(crate) struct ConditionSeed {
    #[serde(default)]
    pub triage: TriageSeed,

    #[serde(default)]
    pub conditions: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Broad, high-prior symptoms to probe when nothing has been observed yet.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TriageSeed {
    #[serde(default)]
    pub opening: Vec<String>,
}

//! Output records produced by the external oracles.
//!
//! The LLM symptom extractor and the CNN fill-level classifier are opaque
//! collaborators: the core never sees their internals, only these plain
//! records. Both oracles may fail; the records themselves carry no error
//! states — failures travel as `CaduceusError::OracleFailure`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured result of running the symptom-extraction oracle over one
/// free-text patient message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomExtraction {
    /// Symptom mentions found in the text. May be free-form; the consumer
    /// normalizes them to canonical ids before use.
    pub symptoms: Vec<String>,
    /// Conversational reply to relay to the patient.
    pub message: String,
    /// True when the oracle judges the picture still too incomplete.
    pub needs_more_info: bool,
}

/// Discrete fill level of a medication container, as labeled by the
/// image-classification oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillLevel {
    Full,
    Half,
    Quarter,
    Empty,
}

impl std::fmt::Display for FillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FillLevel::Full => write!(f, "full"),
            FillLevel::Half => write!(f, "half"),
            FillLevel::Quarter => write!(f, "quarter"),
            FillLevel::Empty => write!(f, "empty"),
        }
    }
}

/// One classification result from the image oracle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageClassification {
    pub fill_level: FillLevel,
    /// Top-class probability, within `[0.0, 1.0]`.
    pub confidence: f64,
    /// Per-label probability distribution.
    #[serde(default)]
    pub probabilities: BTreeMap<String, f64>,
}

//! Diagnostic scoring record shapes.

use serde::{Deserialize, Serialize};

/// One candidate condition with its normalized confidence.
///
/// Confidence is the fraction of the condition's expected symptom-weight
/// mass observed so far, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionScore {
    pub condition: String,
    pub confidence: f64,
}

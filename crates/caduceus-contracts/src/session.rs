//! Caller-owned assessment session state.
//!
//! The core's reasoning functions are stateless: the observed symptom set
//! lives with the caller (the excluded persistence layer) and is passed
//! in on every call. It only ever grows — symptoms are confirmed, never
//! retracted — so repeated calls with the same set are deterministic.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diagnosis::ConditionScore;

/// Unique identifier for one diagnostic assessment session.
///
/// Appears in every turn record so the excluded persistence layer can
/// thread a conversation together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub uuid::Uuid);

impl AssessmentId {
    /// Create a new, unique assessment ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a raw symptom mention to its canonical snake_case id.
///
/// Trims, lowercases, collapses whitespace runs to a single underscore,
/// and strips every character outside `[a-z0-9_]`. Returns an empty
/// string when nothing survives.
pub fn normalize_symptom(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.trim().to_lowercase().chars() {
        if ch.is_whitespace() {
            pending_separator = !out.is_empty();
            continue;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' {
            if pending_separator {
                out.push('_');
                pending_separator = false;
            }
            out.push(ch);
        }
    }
    out
}

/// Monotonically growing set of confirmed canonical symptom ids.
///
/// Backed by a `BTreeSet` so iteration order is deterministic across
/// calls — reasoner output never depends on confirmation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedSymptoms {
    inner: BTreeSet<String>,
}

impl ObservedSymptoms {
    /// Create an empty observed set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `raw` and add it to the set.
    ///
    /// Returns true when a new symptom was recorded; false when the
    /// mention normalized to nothing or was already present.
    pub fn confirm(&mut self, raw: &str) -> bool {
        let id = normalize_symptom(raw);
        if id.is_empty() {
            return false;
        }
        self.inner.insert(id)
    }

    /// Confirm every mention in `raws`, returning the ids that were new.
    pub fn confirm_all<I, S>(&mut self, raws: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = Vec::new();
        for raw in raws {
            let id = normalize_symptom(raw.as_ref());
            if !id.is_empty() && self.inner.insert(id.clone()) {
                added.push(id);
            }
        }
        added
    }

    /// Return true if the normalized form of `raw` has been confirmed.
    pub fn contains(&self, raw: &str) -> bool {
        self.inner.contains(&normalize_symptom(raw))
    }

    /// Iterate the canonical ids in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// The structured result of one assessment turn.
///
/// This is the record the service hands back across the boundary after
/// ingesting a patient message: what was learned, how the candidate
/// conditions now rank, and what to ask about next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentTurn {
    pub assessment_id: AssessmentId,
    /// Conversational reply for the patient (from the extractor oracle,
    /// or a fixed fallback when the oracle failed).
    pub message: String,
    /// Canonical ids newly confirmed by this turn.
    pub new_symptoms: Vec<String>,
    /// Candidate conditions, most confident first. Empty when the
    /// observed set cannot support a ranking yet.
    pub ranked_conditions: Vec<ConditionScore>,
    /// Unobserved symptom ids worth asking about next.
    pub suggested_symptoms: Vec<String>,
    /// True when no ranking was possible (zero usable observed symptoms).
    pub insufficient_data: bool,
    pub timestamp: DateTime<Utc>,
}

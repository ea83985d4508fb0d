//! Oracle trait seams for the assessment service.
//!
//! The LLM symptom extractor and the CNN fill-level classifier are
//! external models. Implementations of these traits are **untrusted**:
//! they may fail, time out, or return out-of-contract values, and the
//! service must stay deterministic for whatever partial data exists.
//! The graph stores and reasoners never call an oracle — only the
//! service facade does, which keeps the core testable with substitutable
//! fakes.

use caduceus_contracts::{CaduceusResult, ImageClassification, SymptomExtraction};

/// The symptom-extraction oracle: free text in, structured mentions out.
///
/// `known_symptoms` gives the oracle the canonical vocabulary so it can
/// anchor its mentions; implementations may ignore it.
pub trait SymptomExtractor: Send + Sync {
    fn extract(&self, text: &str, known_symptoms: &[&str]) -> CaduceusResult<SymptomExtraction>;
}

/// The image-classification oracle: an image reference in, a fill-level
/// label with confidence out.
///
/// The reference is opaque to the core — a path, URL, or storage key
/// owned by the excluded persistence layer.
pub trait ImageClassifier: Send + Sync {
    fn classify(&self, image_ref: &str) -> CaduceusResult<ImageClassification>;
}

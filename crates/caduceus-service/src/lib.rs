//! # caduceus-service
//!
//! The assessment facade the request layer talks to. This crate wires the
//! immutable graph stores, the diagnostic reasoner, and the interaction
//! checker behind one composition root, and owns the trait seams for the
//! two external oracles:
//!
//! - `SymptomExtractor` — the LLM turning free text into symptom mentions
//! - `ImageClassifier`  — the CNN labeling medication fill levels
//!
//! Oracle implementations are untrusted and substitutable; the graph
//! stores never see them, and an oracle failure can never corrupt graph
//! state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use caduceus_service::{AssessmentService, SymptomExtractor, ImageClassifier};
//!
//! let service = AssessmentService::new(formulary, conditions, extractor, classifier);
//! let turn = service.assess_message(&assessment_id, &mut observed, "my throat hurts");
//! ```

pub mod service;
pub mod traits;

pub use service::AssessmentService;
pub use traits::{ImageClassifier, SymptomExtractor};

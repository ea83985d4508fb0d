//! # caduceus-diagnosis
//!
//! The stateless diagnostic reasoner. Given the caller-owned observed
//! symptom set, it ranks candidate conditions by the fraction of their
//! expected symptom-weight mass observed so far, and suggests which
//! unobserved symptoms are worth asking about next.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use caduceus_diagnosis::DiagnosticReasoner;
//!
//! let reasoner = DiagnosticReasoner::new(&condition_graph);
//! let ranking = reasoner.score_conditions(&observed)?;
//! let next = reasoner.suggest_next_symptoms(&observed);
//! ```

pub mod reasoner;

pub use reasoner::DiagnosticReasoner;

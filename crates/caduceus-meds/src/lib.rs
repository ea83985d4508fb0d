//! # caduceus-meds
//!
//! Medication safety logic over the interaction graph:
//!
//! - pairwise interaction checking for a medication list
//! - compatibility verdicts for adding one candidate medication
//! - severity-tiered recommendation wording
//! - safe-alternative search within a category
//! - symptom-driven OTC recommendation
//!
//! Everything here is pure and stateless: the graph is borrowed, the
//! medication lists are caller-owned, and concurrent calls need no
//! coordination.

pub mod checker;
mod otc;

pub use checker::InteractionChecker;

//! Error types for the caduceus assessment core.
//!
//! All fallible operations in the core return `CaduceusResult<T>`.
//! Seed errors are fatal at startup — the process must never serve
//! requests with a graph that failed validation. Unknown medication or
//! symptom identifiers in queries are deliberately NOT errors; they are
//! answered permissively by the stores.

use thiserror::Error;

/// The unified error type for the caduceus crates.
#[derive(Debug, Error)]
pub enum CaduceusError {
    /// Seed data failed validation (missing field, weight out of range,
    /// condition without symptoms, self-interaction).
    ///
    /// Fatal: a graph built from invalid seed data must not be served.
    #[error("seed data invalid: {reason}")]
    SeedInvalid { reason: String },

    /// A seed file or document could not be read or parsed at all.
    #[error("seed data unreadable: {reason}")]
    SeedUnreadable { reason: String },

    /// The reasoner was asked to rank conditions with zero usable
    /// observed symptoms. The caller gets this explicit signal instead of
    /// a fabricated ranking.
    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    /// An external oracle (symptom extractor, image classifier) failed or
    /// returned an out-of-contract value. Oracle failures never corrupt
    /// graph state.
    #[error("oracle call failed: {reason}")]
    OracleFailure { reason: String },
}

/// Convenience alias used throughout the caduceus crates.
pub type CaduceusResult<T> = Result<T, CaduceusError>;

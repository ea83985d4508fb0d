//! # caduceus-graph
//!
//! The two immutable graph stores behind the assessment core:
//!
//! - [`InteractionGraph`] — medications as nodes, symmetric
//!   severity-labeled interaction edges, plus the symptom → OTC table.
//! - [`ConditionGraph`] — conditions and symptoms as two node classes
//!   with weighted condition → symptom likelihood edges.
//!
//! Both are built once from TOML seed data (embedded defaults with an
//! optional file override) and are never mutated afterwards, so they can
//! be shared across any number of concurrent reasoning calls without
//! locking.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use caduceus_graph::{ConditionGraph, InteractionGraph};
//!
//! let formulary = InteractionGraph::load(None)?;
//! let conditions = ConditionGraph::load(Some(Path::new("seeds/custom.toml")))?;
//! ```

pub mod conditions;
pub mod interactions;
mod seed;

pub use conditions::ConditionGraph;
pub use interactions::InteractionGraph;

use serde::Serialize;

/// Structural summary of a loaded graph, for startup logs and health
/// reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphMetrics {
    pub nodes: usize,
    pub edges: usize,
    /// Fraction of possible undirected edges present, 0 for graphs with
    /// fewer than two nodes.
    pub density: f64,
    pub average_degree: f64,
}

impl GraphMetrics {
    pub(crate) fn compute(nodes: usize, edges: usize) -> Self {
        let density = if nodes > 1 {
            (2 * edges) as f64 / (nodes * (nodes - 1)) as f64
        } else {
            0.0
        };
        let average_degree = if nodes > 0 {
            (2 * edges) as f64 / nodes as f64
        } else {
            0.0
        };
        Self { nodes, edges, density, average_degree }
    }
}

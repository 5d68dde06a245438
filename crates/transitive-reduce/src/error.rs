//! Error taxonomy for the transitive-reduction engine.
//!
//! Three kinds, matching the contract every public entry point honors:
//! shape violations the caller must fix ([`ReduceError::InvalidInput`]),
//! a precondition the caller opted out of ([`ReduceError::NotAcyclic`]),
//! and a contract break inside the engine itself
//! ([`ReduceError::InternalInvariant`]) that should never fire on
//! well-formed input.

use thiserror::Error;

/// Failure modes surfaced by [`crate::dag::dag_reduce`],
/// [`crate::hamiltonian::hamiltonian_cycle`] and
/// [`crate::cyclic::CyclicReducer::reduce`].
#[derive(Debug, Error)]
pub enum ReduceError {
    /// The input graph has an unsupported shape: undirected, weighted,
    /// self-loops, multi-edges, too few vertices, or a null graph where a
    /// non-null one is required.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `dag_reduce` was called with cycle-checking enabled and a cycle
    /// was found.
    #[error("graph is not acyclic")]
    NotAcyclic,

    /// A contract-level impossibility was observed inside the engine, e.g.
    /// the Hamiltonian searcher found no tour on a graph already proven
    /// strongly connected. Indicates a bug in this crate, not bad input.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

#![forbid(unsafe_code)]
//! Transitive reduction for directed graphs, including graphs with cycles.
//!
//! # Overview
//!
//! ```text
//! DiGraph<N, E>
//!        │  is the graph acyclic?
//!        ├─ yes ──────────────────────────────► dag::dag_reduce
//!        └─ no
//!               ↓  tarjan_scc + condensation
//!        condensation (DAG of SCCs)
//!               ↓  dag::dag_reduce
//!        reduced condensation
//!               ↓  per-SCC pruning (hamiltonian::hamiltonian_cycle, or
//!               │   an arbitrary cycle in synthetic mode)
//!        reduced intra-SCC edges
//!               ↓  witness selection, see cyclic::CyclicReducer::project
//! DiGraph<N, E>, transitively reduced
//! ```
//!
//! [`dag::dag_reduce`] implements Harry Hsu's bitmatrix method directly on
//! any acyclic graph. [`hamiltonian::hamiltonian_cycle`] is the exhaustive
//! backtracking search [`cyclic::CyclicReducer`] uses to find a cycle
//! through a strongly connected component in exact-subset mode.
//! [`diagnostics`] is optional, additive instrumentation — nothing in it
//! feeds back into a reduction.
//!
//! # Conventions
//!
//! - **Errors**: public entry points return `Result<_, error::ReduceError>`
//!   rather than `anyhow::Result` — callers are expected to match on the
//!   error kind (shape violation vs. contract break), not just display it.
//! - **Logging**: `tracing` macros (`debug!`, `warn!`), `#[instrument]` on
//!   every public entry point.

pub mod bitmatrix;
pub mod cyclic;
pub mod dag;
pub mod diagnostics;
pub mod error;
pub mod hamiltonian;

pub use cyclic::{CyclicReducer, ReduceConfig};
pub use dag::dag_reduce;
pub use error::ReduceError;
pub use hamiltonian::hamiltonian_cycle;

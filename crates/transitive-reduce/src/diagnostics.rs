//! Optional post-hoc statistics about a reduction.
//!
//! Nothing here changes what [`crate::cyclic::CyclicReducer::reduce`] or
//! [`crate::dag::dag_reduce`] compute; callers who want visibility into how
//! much a reduction actually did can snapshot edge counts themselves and
//! pass them to [`stats_for`].

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, IndexType, NodeIndex};

/// SCCs larger than this log a warning when exact-subset pruning runs,
/// since the Hamiltonian search is exponential in component size.
pub const LARGE_SCC_WARNING_THRESHOLD: usize = 16;

/// Summary of one reduction, for logging or reporting — not required by,
/// or fed back into, the reduction itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionStats {
    pub vertices: usize,
    pub edges_before: usize,
    pub edges_after: usize,
    pub scc_count: usize,
    pub cycle_scc_count: usize,
    pub largest_scc_size: usize,
}

/// Build a [`ReductionStats`] comparing a graph snapshot taken before a
/// reduction against the same graph taken after.
///
/// `graph_before` need not be the exact object passed to
/// [`crate::cyclic::CyclicReducer::reduce`] — a `.clone()` taken right
/// before the call is enough, since only shape (vertex and edge counts, SCC
/// structure) is inspected.
#[must_use]
pub fn stats_for<N, Ix: IndexType>(
    graph_before: &DiGraph<N, (), Ix>,
    graph_after: &DiGraph<N, (), Ix>,
) -> ReductionStats {
    let sccs = tarjan_scc(graph_before);
    let cycle_scc_count = sccs.iter().filter(|members| members.len() > 1).count();
    ReductionStats {
        vertices: graph_after.node_count(),
        edges_before: graph_before.edge_count(),
        edges_after: graph_after.edge_count(),
        scc_count: sccs.len(),
        cycle_scc_count,
        largest_scc_size: largest_scc_size(&sccs),
    }
}

/// Size of the largest strongly connected component in `sccs`, or `0` for
/// an empty graph.
#[must_use]
pub fn largest_scc_size<Ix: IndexType>(sccs: &[Vec<NodeIndex<Ix>>]) -> usize {
    sccs.iter().map(Vec::len).max().unwrap_or(0)
}

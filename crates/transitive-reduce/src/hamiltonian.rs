//! Exhaustive backtracking search for a Hamiltonian cycle in a small,
//! dense directed graph.
//!
//! Used by [`crate::cyclic::CyclicReducer`] in exact-subset mode to find a
//! cycle through every vertex of a strongly connected component, so that
//! only the `m` edges of that cycle need to survive intra-SCC pruning.
//!
//! # Complexity
//!
//! Worst case exponential in `|V|`. Acceptable here because callers only
//! ever run this within a single SCC, whose size is bounded by the input
//! graph's size — not by the whole graph.

use std::collections::HashSet;

use petgraph::graph::{DiGraph, IndexType, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::instrument;

use crate::bitmatrix::{BitMatrix, VertexIndex};
use crate::error::ReduceError;

/// Find a Hamiltonian cycle in `graph`, or determine that none exists.
///
/// `graph` must be directed, unweighted, have at least 3 vertices, no
/// self-loops and no parallel edges — edge weight is fixed to `()` so
/// "unweighted" is enforced by the type itself rather than at runtime.
///
/// Returns `Ok(None)` when `graph` is not strongly connected (a
/// Hamiltonian cycle implies strong connectivity, so the search is skipped
/// entirely). Otherwise the graph is searched exhaustively; finding no
/// cycle despite strong connectivity is a contract break in callers of
/// this function (every SCC handed to it by [`crate::cyclic`] is expected
/// to admit a cycle) and is reported as
/// [`ReduceError::InternalInvariant`] rather than `Ok(None)`.
///
/// The returned tour has exactly `n` entries; the cycle closes implicitly
/// from the last entry back to the first.
///
/// # Errors
///
/// - [`ReduceError::InvalidInput`] on a shape violation (fewer than 3
///   vertices, a self-loop, or a parallel edge).
/// - [`ReduceError::InternalInvariant`] if the graph is strongly connected
///   but no Hamiltonian cycle was found.
#[instrument(skip(graph))]
pub fn hamiltonian_cycle<N, Ix: IndexType>(
    graph: &DiGraph<N, (), Ix>,
) -> Result<Option<Vec<NodeIndex<Ix>>>, ReduceError> {
    validate_shape(graph)?;

    let index = VertexIndex::new(graph.node_indices());
    let n = index.len();

    if !is_strongly_connected(graph, n) {
        return Ok(None);
    }

    let adjacency = build_adjacency(graph, &index);

    let mut tour: Vec<usize> = vec![usize::MAX; n];
    tour[0] = 0;
    let mut used = vec![false; n];
    used[0] = true;

    if search(&adjacency, &mut tour, &mut used, 1, n) {
        let cycle = tour.into_iter().map(|pos| index.vertex(pos)).collect();
        Ok(Some(cycle))
    } else {
        Err(ReduceError::InternalInvariant(
            "no Hamiltonian cycle found on a strongly connected graph".to_string(),
        ))
    }
}

fn validate_shape<N, Ix: IndexType>(graph: &DiGraph<N, (), Ix>) -> Result<(), ReduceError> {
    if graph.node_count() < 3 {
        return Err(ReduceError::InvalidInput(
            "Hamiltonian search requires at least 3 vertices".to_string(),
        ));
    }

    let mut seen: HashSet<(NodeIndex<Ix>, NodeIndex<Ix>)> = HashSet::new();
    for e in graph.edge_references() {
        let (u, v) = (e.source(), e.target());
        if u == v {
            return Err(ReduceError::InvalidInput(
                "Hamiltonian search does not allow self-loops".to_string(),
            ));
        }
        if !seen.insert((u, v)) {
            return Err(ReduceError::InvalidInput(
                "Hamiltonian search does not allow parallel edges".to_string(),
            ));
        }
    }

    Ok(())
}

fn build_adjacency<N, Ix: IndexType>(
    graph: &DiGraph<N, (), Ix>,
    index: &VertexIndex<Ix>,
) -> BitMatrix {
    let n = index.len();
    let mut adjacency = BitMatrix::zeros(n);
    for e in graph.edge_references() {
        let (Some(i), Some(j)) = (index.pos(e.source()), index.pos(e.target())) else {
            continue;
        };
        adjacency.set(i, j);
    }
    adjacency
}

/// A Hamiltonian cycle implies strong connectivity, so this is checked
/// before the exponential search runs at all.
fn is_strongly_connected<N, Ix: IndexType>(graph: &DiGraph<N, (), Ix>, n: usize) -> bool {
    if n == 0 {
        return false;
    }
    let sccs = petgraph::algo::tarjan_scc(graph);
    sccs.len() == 1 && sccs[0].len() == n
}

/// Recursively fill `tour[k..n]`. `tour[0..k]` and `used[0..n]` already
/// reflect the committed prefix. Candidate positions are tried in
/// ascending order at every depth, so the result is deterministic for a
/// given vertex ordering — and is simply the first cycle the ordering
/// happens to produce, not a distinguished one.
fn search(adjacency: &BitMatrix, tour: &mut [usize], used: &mut [bool], k: usize, n: usize) -> bool {
    let prev = tour[k - 1];

    for c in 0..n {
        if !adjacency.get(prev, c) || used[c] {
            continue;
        }

        if k < n - 1 {
            tour[k] = c;
            used[c] = true;
            if search(adjacency, tour, used, k + 1, n) {
                return true;
            }
            used[c] = false;
            tour[k] = usize::MAX;
            continue;
        }

        // k == n - 1: c is the last vertex of the tour. It closes the
        // cycle only if an edge back to the fixed start (position 0)
        // exists.
        if adjacency.get(c, 0) {
            tour[k] = c;
            return true;
        }
    }

    false
}

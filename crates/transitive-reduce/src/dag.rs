//! Transitive reduction of a directed acyclic graph — Harry Hsu's method.
//!
//! Builds an n×n reachability bitmatrix, closes it (Warshall-style), prunes
//! every edge that is a transitive shortcut, then rewrites the graph to
//! match. Runs in O(V³) bit operations; no edge is ever added.
//!
//! # Algorithm
//!
//! 1. **Closure.** For each `i`, for each `j != i` with `M[j][i]` set, OR
//!    row `i` into row `j`. After this pass `M[i][j]` holds iff `j` is
//!    reachable from `i`.
//! 2. **Reduction.** For each `j`, for each `i` with `M[i][j]` set, clear
//!    every `M[i][k]` where `M[j][k]` is also set — `i -> k` is redundant
//!    whenever `i -> j -> k` also holds.
//! 3. **Rewrite.** Remove every original edge `(i, j)` for which `M[i][j]`
//!    no longer holds. Nothing is added.

use std::collections::HashMap;

use petgraph::graph::{Graph, IndexType, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{algo::is_cyclic_directed, EdgeType};
use tracing::{debug, instrument};

use crate::bitmatrix::{BitMatrix, VertexIndex};
use crate::error::ReduceError;

/// Reduce `graph` to its transitive reduction in place.
///
/// `graph` is asserted acyclic by the caller. When `check_acyclic` is
/// `true`, a cycle check runs first and [`ReduceError::NotAcyclic`] is
/// returned if one is found; callers that have just proven acyclicity
/// another way (e.g. [`crate::cyclic::CyclicReducer`]'s fast path) may pass
/// `false` to skip the redundant check.
///
/// # Errors
///
/// - [`ReduceError::InvalidInput`] if `graph` is not directed.
/// - [`ReduceError::NotAcyclic`] if `check_acyclic` is `true` and a cycle
///   exists.
#[instrument(skip(graph))]
pub fn dag_reduce<N, E, Ty, Ix>(
    graph: &mut Graph<N, E, Ty, Ix>,
    check_acyclic: bool,
) -> Result<(), ReduceError>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    if !Ty::is_directed() {
        return Err(ReduceError::InvalidInput(
            "transitive reduction requires a directed graph".to_string(),
        ));
    }

    if check_acyclic && is_cyclic_directed(&*graph) {
        return Err(ReduceError::NotAcyclic);
    }

    let n = graph.node_count();
    if n < 2 {
        return Ok(());
    }

    let index = VertexIndex::new(graph.node_indices());
    let mut closure = BitMatrix::zeros(n);

    // Original (i, j) -> endpoint pair, so phase 3 knows exactly which
    // edges to drop. We keep node handles rather than `EdgeIndex`: removing
    // an edge swap-removes the last edge in petgraph's internal storage,
    // which would silently invalidate any `EdgeIndex` collected up front.
    // `find_edge` re-resolves each pair against current graph state instead.
    let mut original: HashMap<(usize, usize), (NodeIndex<Ix>, NodeIndex<Ix>)> = HashMap::new();
    for e in graph.edge_references() {
        let (Some(i), Some(j)) = (index.pos(e.source()), index.pos(e.target())) else {
            continue;
        };
        closure.set(i, j);
        original.insert((i, j), (e.source(), e.target()));
    }

    debug!(nodes = n, edges = original.len(), "closing reachability matrix");
    close_reachability(&mut closure, n);
    debug!("pruning transitive shortcuts");
    prune_shortcuts(&mut closure, n);

    let to_remove: Vec<(NodeIndex<Ix>, NodeIndex<Ix>)> = original
        .into_iter()
        .filter(|&((i, j), _)| !closure.get(i, j))
        .map(|(_, pair)| pair)
        .collect();

    debug!(removed = to_remove.len(), "rewriting graph");
    for (u, v) in to_remove {
        if let Some(e) = graph.find_edge(u, v) {
            graph.remove_edge(e);
        }
    }

    Ok(())
}

/// Phase 1 — Warshall-style closure. Shares storage with the input
/// adjacency matrix: `M` starts as raw adjacency and ends as reachability.
fn close_reachability(m: &mut BitMatrix, n: usize) {
    for i in 0..n {
        for j in 0..n {
            if j != i && m.get(j, i) {
                m.union_row_into(i, j);
            }
        }
    }
}

/// Phase 2 — discard `i -> k` whenever `i -> j -> k` also holds.
fn prune_shortcuts(m: &mut BitMatrix, n: usize) {
    for j in 0..n {
        let via_j: Vec<usize> = m.row(j).ones().collect();
        for i in 0..n {
            if m.get(i, j) {
                for &k in &via_j {
                    m.clear(i, k);
                }
            }
        }
    }
}

//! Transitive reduction for directed graphs that may contain cycles.
//!
//! [`CyclicReducer`] condenses the graph into its strongly connected
//! components, reduces the acyclic condensation with [`crate::dag`], then
//! prunes every component's intra-SCC edges down to a single cycle before
//! projecting the result back onto the original vertices.
//!
//! # Algorithm
//!
//! 1. **Fast path.** If the graph is already acyclic, delegate straight to
//!    [`crate::dag::dag_reduce`] and stop.
//! 2. **Condense.** Compute strongly connected components with
//!    [`petgraph::algo::tarjan_scc`] and build the condensation: one node
//!    per component, one edge per pair of components joined by at least one
//!    original edge.
//! 3. **Inter-SCC reduction.** The condensation is acyclic by construction;
//!    reduce it in place with [`crate::dag::dag_reduce`].
//! 4. **Intra-SCC reduction.** For every component with at least 3 edges,
//!    collapse its edges down to a single cycle covering every member
//!    vertex — either the first Hamiltonian cycle found (exact-subset mode)
//!    or an arbitrary cycle over a fixed vertex order (synthetic mode).
//!    Components with fewer than 3 edges need no pruning: one vertex has
//!    none, and a 2-cycle is already minimal.
//! 5. **Project.** For every surviving condensation edge, keep exactly one
//!    witness edge between its two components and drop every other
//!    crossing edge; every intra-SCC edge kept in step 4 is left alone.

use std::collections::{HashMap, HashSet};

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, IndexType, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument, warn};

use crate::dag;
use crate::diagnostics::LARGE_SCC_WARNING_THRESHOLD;
use crate::error::ReduceError;
use crate::hamiltonian;

/// Mode policy for intra-SCC pruning.
///
/// The default (`allow_synthetic: false`) is exact-subset mode: every
/// surviving edge is one that existed in the input. Setting
/// `allow_synthetic` to `true` trades that guarantee for speed — intra-SCC
/// pruning becomes a single arbitrary cycle instead of a Hamiltonian search,
/// which is polynomial instead of exponential in component size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceConfig {
    pub allow_synthetic: bool,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            allow_synthetic: false,
        }
    }
}

/// Transitive reduction for a directed graph that may contain cycles.
///
/// Construct with [`CyclicReducer::new`], optionally switch to synthetic
/// mode with [`CyclicReducer::with_synthetic`], then call
/// [`CyclicReducer::reduce`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CyclicReducer {
    config: ReduceConfig,
}

impl CyclicReducer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch intra-SCC pruning to synthetic mode (`true`) or exact-subset
    /// mode (`false`, the default).
    #[must_use]
    pub fn with_synthetic(mut self, allow_synthetic: bool) -> Self {
        self.config.allow_synthetic = allow_synthetic;
        self
    }

    #[must_use]
    pub fn config(&self) -> ReduceConfig {
        self.config
    }

    /// Reduce `graph` to a transitive reduction in place, handling cycles
    /// via SCC condensation.
    ///
    /// `graph` must be directed (guaranteed by `DiGraph`'s type), unweighted
    /// (edge weight is fixed to `()`), and free of self-loops and parallel
    /// edges.
    ///
    /// # Errors
    ///
    /// - [`ReduceError::InvalidInput`] on a self-loop or parallel edge.
    /// - [`ReduceError::InternalInvariant`] if exact-subset mode's
    ///   Hamiltonian search fails on a component known to be strongly
    ///   connected.
    #[instrument(skip(self, graph))]
    pub fn reduce<N, Ix>(&self, graph: &mut DiGraph<N, (), Ix>) -> Result<(), ReduceError>
    where
        Ix: IndexType,
    {
        validate_shape(graph)?;

        if !is_cyclic_directed(&*graph) {
            debug!("graph is already acyclic; delegating to the DAG fast path");
            return dag::dag_reduce(graph, false);
        }

        let sccs = tarjan_scc(&*graph);
        let scc_of: HashMap<NodeIndex<Ix>, usize> = sccs
            .iter()
            .enumerate()
            .flat_map(|(id, members)| members.iter().map(move |&v| (v, id)))
            .collect();

        let mut condensation: DiGraph<(), (), Ix> = DiGraph::with_capacity(sccs.len(), 0);
        for _ in 0..sccs.len() {
            condensation.add_node(());
        }

        // Crossing edges grouped by SCC pair, in a stable order (by the
        // original graph's own edge iteration order), so step 5 can always
        // pick "the first edge that exists" deterministically.
        let mut crossing: HashMap<(usize, usize), Vec<(NodeIndex<Ix>, NodeIndex<Ix>)>> =
            HashMap::new();
        for e in graph.edge_references() {
            let (u, v) = (e.source(), e.target());
            let (su, sv) = (scc_of[&u], scc_of[&v]);
            if su != sv {
                crossing.entry((su, sv)).or_default().push((u, v));
                if condensation
                    .find_edge(NodeIndex::new(su), NodeIndex::new(sv))
                    .is_none()
                {
                    condensation.add_edge(NodeIndex::new(su), NodeIndex::new(sv), ());
                }
            }
        }

        debug!(
            scc_count = sccs.len(),
            edges = condensation.edge_count(),
            "reducing inter-SCC condensation"
        );
        dag::dag_reduce(&mut condensation, false)?;

        let surviving_pairs: HashSet<(usize, usize)> = condensation
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect();

        debug!("pruning intra-SCC edges");
        for members in &sccs {
            self.reduce_scc(graph, members)?;
        }

        debug!("projecting surviving edges back onto the original graph");
        self.project(graph, &scc_of, &crossing, &surviving_pairs);

        Ok(())
    }

    /// Collapse `members`'s intra-SCC edges down to a single cycle covering
    /// every member, if there are enough edges to need pruning at all.
    fn reduce_scc<N, Ix: IndexType>(
        &self,
        graph: &mut DiGraph<N, (), Ix>,
        members: &[NodeIndex<Ix>],
    ) -> Result<(), ReduceError> {
        let member_set: HashSet<NodeIndex<Ix>> = members.iter().copied().collect();
        let intra_edge_count = graph
            .edge_references()
            .filter(|e| member_set.contains(&e.source()) && member_set.contains(&e.target()))
            .count();

        if intra_edge_count < 3 {
            return Ok(());
        }

        if self.config.allow_synthetic {
            self.rewrite_scc_synthetic(graph, members);
            Ok(())
        } else {
            if members.len() > LARGE_SCC_WARNING_THRESHOLD {
                warn!(
                    size = members.len(),
                    threshold = LARGE_SCC_WARNING_THRESHOLD,
                    "large strongly connected component; about to run the Hamiltonian search on it"
                );
            }
            self.rewrite_scc_exact(graph, members)
        }
    }

    /// Synthetic mode: drop every intra-SCC edge and replace it with a
    /// single cycle over `members` in a fixed, stable order. Does not
    /// preserve edge identity — the mode policy does not promise it.
    fn rewrite_scc_synthetic<N, Ix: IndexType>(
        &self,
        graph: &mut DiGraph<N, (), Ix>,
        members: &[NodeIndex<Ix>],
    ) {
        let mut ordered: Vec<NodeIndex<Ix>> = members.to_vec();
        ordered.sort_by_key(|n| NodeIndex::index(*n));

        remove_intra_edges(graph, members);

        let m = ordered.len();
        for i in 0..m {
            graph.add_edge(ordered[i], ordered[(i + 1) % m], ());
        }
    }

    /// Exact-subset mode: find a Hamiltonian cycle over `members` and drop
    /// every intra-SCC edge that is not one of its `m` forward steps.
    fn rewrite_scc_exact<N, Ix: IndexType>(
        &self,
        graph: &mut DiGraph<N, (), Ix>,
        members: &[NodeIndex<Ix>],
    ) -> Result<(), ReduceError> {
        let (sub, to_original) = induced_subgraph(graph, members);
        let Some(sub_tour) = hamiltonian::hamiltonian_cycle(&sub)? else {
            // `members` is an SCC, so it is strongly connected by
            // definition; `hamiltonian_cycle` only returns `None` when its
            // input is not. Reaching this would mean the SCC computation
            // and the Hamiltonian searcher disagree about connectivity.
            return Err(ReduceError::InternalInvariant(
                "SCC member set was not strongly connected to the Hamiltonian searcher"
                    .to_string(),
            ));
        };

        let tour: Vec<NodeIndex<Ix>> = sub_tour.into_iter().map(|i| to_original[&i]).collect();
        let m = tour.len();
        let position: HashMap<NodeIndex<Ix>, usize> = tour
            .iter()
            .enumerate()
            .map(|(pos, &v)| (v, pos))
            .collect();

        let member_set: HashSet<NodeIndex<Ix>> = members.iter().copied().collect();
        let to_remove: Vec<(NodeIndex<Ix>, NodeIndex<Ix>)> = graph
            .edge_references()
            .filter(|e| member_set.contains(&e.source()) && member_set.contains(&e.target()))
            .map(|e| (e.source(), e.target()))
            .filter(|&(u, v)| {
                let (Some(&i), Some(&j)) = (position.get(&u), position.get(&v)) else {
                    return true;
                };
                j != (i + 1) % m
            })
            .collect();

        for (u, v) in to_remove {
            if let Some(e) = graph.find_edge(u, v) {
                graph.remove_edge(e);
            }
        }

        Ok(())
    }

    /// Keep exactly one witness edge per surviving condensation edge, and
    /// drop every other inter-SCC edge. Intra-SCC edges were already pruned
    /// to their final set in [`Self::reduce_scc`] and are left untouched.
    fn project<N, Ix: IndexType>(
        &self,
        graph: &mut DiGraph<N, (), Ix>,
        scc_of: &HashMap<NodeIndex<Ix>, usize>,
        crossing: &HashMap<(usize, usize), Vec<(NodeIndex<Ix>, NodeIndex<Ix>)>>,
        surviving_pairs: &HashSet<(usize, usize)>,
    ) {
        let mut witness: HashMap<(usize, usize), (NodeIndex<Ix>, NodeIndex<Ix>)> = HashMap::new();
        for &pair in surviving_pairs {
            if let Some(candidates) = crossing.get(&pair) {
                if let Some(&first) = candidates.first() {
                    witness.insert(pair, first);
                }
            }
        }

        let to_remove: Vec<(NodeIndex<Ix>, NodeIndex<Ix>)> = graph
            .edge_references()
            .filter(|e| {
                let (u, v) = (e.source(), e.target());
                let (su, sv) = (scc_of[&u], scc_of[&v]);
                su != sv && witness.get(&(su, sv)) != Some(&(u, v))
            })
            .map(|e| (e.source(), e.target()))
            .collect();

        for (u, v) in to_remove {
            if let Some(e) = graph.find_edge(u, v) {
                graph.remove_edge(e);
            }
        }
    }
}

fn validate_shape<N, Ix: IndexType>(graph: &DiGraph<N, (), Ix>) -> Result<(), ReduceError> {
    let mut seen: HashSet<(NodeIndex<Ix>, NodeIndex<Ix>)> = HashSet::new();
    for e in graph.edge_references() {
        let (u, v) = (e.source(), e.target());
        if u == v {
            return Err(ReduceError::InvalidInput(
                "cyclic reduction does not allow self-loops".to_string(),
            ));
        }
        if !seen.insert((u, v)) {
            return Err(ReduceError::InvalidInput(
                "cyclic reduction does not allow parallel edges".to_string(),
            ));
        }
    }
    Ok(())
}

fn remove_intra_edges<N, Ix: IndexType>(graph: &mut DiGraph<N, (), Ix>, members: &[NodeIndex<Ix>]) {
    let member_set: HashSet<NodeIndex<Ix>> = members.iter().copied().collect();
    let to_remove: Vec<(NodeIndex<Ix>, NodeIndex<Ix>)> = graph
        .edge_references()
        .filter(|e| member_set.contains(&e.source()) && member_set.contains(&e.target()))
        .map(|e| (e.source(), e.target()))
        .collect();
    for (u, v) in to_remove {
        if let Some(e) = graph.find_edge(u, v) {
            graph.remove_edge(e);
        }
    }
}

/// Build a standalone digraph over just `members` and the edges between
/// them, with each node weighted by its original `NodeIndex` so the result
/// of a search over the subgraph can be mapped back.
fn induced_subgraph<N, Ix: IndexType>(
    graph: &DiGraph<N, (), Ix>,
    members: &[NodeIndex<Ix>],
) -> (DiGraph<NodeIndex<Ix>, ()>, HashMap<NodeIndex, NodeIndex<Ix>>) {
    let mut sub: DiGraph<NodeIndex<Ix>, ()> = DiGraph::with_capacity(members.len(), 0);
    let mut to_sub: HashMap<NodeIndex<Ix>, NodeIndex> = HashMap::new();
    let mut to_original: HashMap<NodeIndex, NodeIndex<Ix>> = HashMap::new();
    for &v in members {
        let sv = sub.add_node(v);
        to_sub.insert(v, sv);
        to_original.insert(sv, v);
    }

    let member_set: HashSet<NodeIndex<Ix>> = members.iter().copied().collect();
    for e in graph.edge_references() {
        let (u, v) = (e.source(), e.target());
        if member_set.contains(&u) && member_set.contains(&v) {
            sub.add_edge(to_sub[&u], to_sub[&v], ());
        }
    }

    (sub, to_original)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(n: u32, pairs: &[(u32, u32)]) -> DiGraph<(), ()> {
        let mut g = DiGraph::new();
        let nodes: Vec<_> = (0..n).map(|_| g.add_node(())).collect();
        for &(a, b) in pairs {
            g.add_edge(nodes[a as usize], nodes[b as usize], ());
        }
        g
    }

    #[test]
    fn acyclic_input_takes_the_dag_fast_path() {
        let mut g = edges(4, &[(0, 1), (0, 2), (1, 3), (2, 3), (0, 3)]);
        CyclicReducer::new().reduce(&mut g).expect("reduce");
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn single_cycle_is_left_alone() {
        let mut g = edges(3, &[(0, 1), (1, 2), (2, 0)]);
        CyclicReducer::new().reduce(&mut g).expect("reduce");
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn cycle_with_two_chords_collapses_to_one_cycle_per_vertex() {
        // A 4-cycle 0-1-2-3-0 plus chords 0->2 and 3->1: the whole graph is
        // one SCC with 6 edges; exact-subset mode must collapse it to a
        // single Hamiltonian cycle, 4 edges, one per vertex.
        let mut g = edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (3, 1)]);
        CyclicReducer::new().reduce(&mut g).expect("reduce");
        assert_eq!(g.edge_count(), 4);
        for n in g.node_indices() {
            assert_eq!(g.edges_directed(n, petgraph::Direction::Outgoing).count(), 1);
            assert_eq!(g.edges_directed(n, petgraph::Direction::Incoming).count(), 1);
        }
    }

    #[test]
    fn synthetic_mode_also_collapses_to_one_cycle_per_vertex() {
        let mut g = edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (3, 1)]);
        CyclicReducer::new()
            .with_synthetic(true)
            .reduce(&mut g)
            .expect("reduce");
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn two_sccs_joined_by_a_bridge_keep_exactly_one_witness() {
        // SCC {0,1,2} (triangle) -> SCC {3,4,5} (triangle), joined by two
        // parallel-looking crossing edges (2->3 and 1->4). Only one witness
        // should survive between the two components.
        let mut g = edges(
            6,
            &[
                (0, 1),
                (1, 2),
                (2, 0),
                (3, 4),
                (4, 5),
                (5, 3),
                (2, 3),
                (1, 4),
            ],
        );
        CyclicReducer::new().reduce(&mut g).expect("reduce");
        // 3 + 3 intra-SCC edges, plus exactly one surviving bridge.
        assert_eq!(g.edge_count(), 7);
    }

    #[test]
    fn rejects_self_loop() {
        let mut g = edges(3, &[(0, 0), (0, 1), (1, 2), (2, 0)]);
        let err = CyclicReducer::new().reduce(&mut g).expect_err("must reject");
        assert!(matches!(err, ReduceError::InvalidInput(_)));
    }

    #[test]
    fn rejects_parallel_edges() {
        let mut g: DiGraph<(), ()> = DiGraph::new();
        let nodes: Vec<_> = (0..3).map(|_| g.add_node(())).collect();
        g.add_edge(nodes[0], nodes[1], ());
        g.add_edge(nodes[0], nodes[1], ());
        g.add_edge(nodes[1], nodes[2], ());
        g.add_edge(nodes[2], nodes[0], ());
        let err = CyclicReducer::new().reduce(&mut g).expect_err("must reject");
        assert!(matches!(err, ReduceError::InvalidInput(_)));
    }
}

//! Property-based tests for the universal reduction invariants.
//!
//! Each property is checked against randomly generated digraphs (self-loop
//! and parallel-edge free, so every generated graph satisfies
//! `CyclicReducer`'s shape contract and `reduce` is expected to succeed).

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use proptest::prelude::*;

use transitive_reduce::CyclicReducer;

fn build_graph(n: u32, pairs: &[(u32, u32)]) -> DiGraph<(), ()> {
    let mut g = DiGraph::new();
    let nodes: Vec<_> = (0..n).map(|_| g.add_node(())).collect();
    for &(a, b) in pairs {
        g.add_edge(nodes[a as usize], nodes[b as usize], ());
    }
    g
}

fn arb_edges(max_n: u32, max_e: usize) -> impl Strategy<Value = (u32, Vec<(u32, u32)>)> {
    (2..=max_n).prop_flat_map(move |n| {
        let pair = (0..n, 0..n).prop_filter("no self loops", |&(a, b)| a != b);
        proptest::collection::hash_set(pair, 0..=max_e)
            .prop_map(move |set| (n, set.into_iter().collect()))
    })
}

fn reachable_from(g: &DiGraph<(), ()>, start: NodeIndex) -> HashSet<NodeIndex> {
    let mut seen = HashSet::new();
    let mut stack = vec![start];
    seen.insert(start);
    while let Some(u) = stack.pop() {
        for v in g.neighbors(u) {
            if seen.insert(v) {
                stack.push(v);
            }
        }
    }
    seen
}

fn reachability_closure(g: &DiGraph<(), ()>) -> HashMap<NodeIndex, HashSet<NodeIndex>> {
    g.node_indices().map(|u| (u, reachable_from(g, u))).collect()
}

fn edge_set(g: &DiGraph<(), ()>) -> HashSet<(NodeIndex, NodeIndex)> {
    g.edge_references().map(|e| (e.source(), e.target())).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn vertex_set_is_preserved((n, pairs) in arb_edges(8, 20)) {
        let mut g = build_graph(n, &pairs);
        let before: HashSet<NodeIndex> = g.node_indices().collect();
        CyclicReducer::new().reduce(&mut g).expect("reduce");
        let after: HashSet<NodeIndex> = g.node_indices().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn edge_count_never_increases((n, pairs) in arb_edges(8, 20)) {
        let mut g = build_graph(n, &pairs);
        let before = g.edge_count();
        CyclicReducer::new().reduce(&mut g).expect("reduce");
        prop_assert!(g.edge_count() <= before);
    }

    #[test]
    fn reachability_closure_is_preserved((n, pairs) in arb_edges(7, 16)) {
        let mut g = build_graph(n, &pairs);
        let before = reachability_closure(&g);
        CyclicReducer::new().reduce(&mut g).expect("reduce");
        let after = reachability_closure(&g);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn reducing_twice_is_idempotent((n, pairs) in arb_edges(7, 16)) {
        let mut g = build_graph(n, &pairs);
        CyclicReducer::new().reduce(&mut g).expect("first reduce");
        let once = edge_set(&g);
        CyclicReducer::new().reduce(&mut g).expect("second reduce");
        let twice = edge_set(&g);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn exact_subset_mode_never_forges_an_edge((n, pairs) in arb_edges(7, 16)) {
        let mut g = build_graph(n, &pairs);
        let original = edge_set(&g);
        CyclicReducer::new().reduce(&mut g).expect("reduce");
        for &(u, v) in &edge_set(&g) {
            prop_assert!(original.contains(&(u, v)));
        }
    }

    #[test]
    fn surviving_sccs_form_a_single_simple_cycle((n, pairs) in arb_edges(7, 16)) {
        let mut g = build_graph(n, &pairs);
        CyclicReducer::new().reduce(&mut g).expect("reduce");
        for members in petgraph::algo::tarjan_scc(&g) {
            if members.len() < 2 {
                continue;
            }
            let member_set: HashSet<NodeIndex> = members.iter().copied().collect();
            for &v in &members {
                let out_in_scc = g
                    .edges_directed(v, petgraph::Direction::Outgoing)
                    .filter(|e| member_set.contains(&e.target()))
                    .count();
                let in_in_scc = g
                    .edges_directed(v, petgraph::Direction::Incoming)
                    .filter(|e| member_set.contains(&e.source()))
                    .count();
                prop_assert_eq!(out_in_scc, 1);
                prop_assert_eq!(in_in_scc, 1);
            }
        }
    }

    #[test]
    fn reduction_is_equivariant_under_vertex_relabeling((n, pairs) in arb_edges(7, 16)) {
        let perm: Vec<u32> = (0..n).rev().collect();
        let relabeled: Vec<(u32, u32)> = pairs
            .iter()
            .map(|&(a, b)| (perm[a as usize], perm[b as usize]))
            .collect();

        let mut g = build_graph(n, &pairs);
        let mut g2 = build_graph(n, &relabeled);
        CyclicReducer::new().reduce(&mut g).expect("reduce g");
        CyclicReducer::new().reduce(&mut g2).expect("reduce g2");

        // Map g's reachability closure through perm and compare against g2's.
        let closure = reachability_closure(&g);
        let closure2 = reachability_closure(&g2);
        for (u, reach) in &closure {
            let u2 = NodeIndex::new(perm[u.index()] as usize);
            let expected: HashSet<NodeIndex> = reach
                .iter()
                .map(|v| NodeIndex::new(perm[v.index()] as usize))
                .collect();
            prop_assert_eq!(closure2.get(&u2).cloned().unwrap_or_default(), expected);
        }
    }
}

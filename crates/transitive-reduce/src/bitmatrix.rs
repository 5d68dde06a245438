//! Dense n×n bit matrix and the vertex-to-position indexing it is addressed
//! through.
//!
//! Both the DAG reducer ([`crate::dag`]) and the Hamiltonian searcher
//! ([`crate::hamiltonian`]) need to address vertices by a dense `0..n`
//! position rather than by `NodeIndex`. [`VertexIndex`] builds that mapping
//! once per call; callers must not rebuild it per lookup (an `indexOf` scan
//! over a vertex list is the exact O(V) mistake this type exists to avoid).

use std::collections::HashMap;

use fixedbitset::FixedBitSet;
use petgraph::graph::{IndexType, NodeIndex};

/// A stable `NodeIndex -> 0..n` position mapping, built once per call.
pub struct VertexIndex<Ix: IndexType> {
    order: Vec<NodeIndex<Ix>>,
    position: HashMap<NodeIndex<Ix>, usize>,
}

impl<Ix: IndexType> VertexIndex<Ix> {
    /// Build a dense index over `vertices`, in the given iteration order.
    pub fn new(vertices: impl Iterator<Item = NodeIndex<Ix>>) -> Self {
        let order: Vec<NodeIndex<Ix>> = vertices.collect();
        let position = order
            .iter()
            .enumerate()
            .map(|(pos, &v)| (v, pos))
            .collect();
        Self { order, position }
    }

    /// Number of vertices indexed.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Dense position of `v`, or `None` if `v` was not part of the index.
    pub fn pos(&self, v: NodeIndex<Ix>) -> Option<usize> {
        self.position.get(&v).copied()
    }

    /// The `NodeIndex` originally assigned to dense position `i`.
    pub fn vertex(&self, i: usize) -> NodeIndex<Ix> {
        self.order[i]
    }
}

/// A dense n×n bit matrix, one [`FixedBitSet`] row per vertex.
///
/// Row `i` holds the set of column positions `j` for which `M[i][j]` is set.
/// Storing rows as independent word-aligned bitsets makes the row-wise OR
/// in Hsu's closure phase (see [`crate::dag`]) a tight word-level loop via
/// [`FixedBitSet::union_with`] rather than a per-bit scan.
pub struct BitMatrix {
    rows: Vec<FixedBitSet>,
    n: usize,
}

impl BitMatrix {
    /// Allocate an n×n matrix with all bits clear.
    pub fn zeros(n: usize) -> Self {
        Self {
            rows: (0..n).map(|_| FixedBitSet::with_capacity(n)).collect(),
            n,
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.rows[i].contains(j)
    }

    pub fn set(&mut self, i: usize, j: usize) {
        self.rows[i].insert(j);
    }

    pub fn clear(&mut self, i: usize, j: usize) {
        self.rows[i].set(j, false);
    }

    pub fn row(&self, i: usize) -> &FixedBitSet {
        &self.rows[i]
    }

    /// `rows[dst] |= rows[src]`, word-at-a-time. `src` and `dst` must differ.
    pub fn union_row_into(&mut self, src: usize, dst: usize) {
        debug_assert_ne!(src, dst);
        let hi = src.max(dst);
        let (left, right) = self.rows.split_at_mut(hi);
        if src < dst {
            right[0].union_with(&left[src]);
        } else {
            left[dst].union_with(&right[0]);
        }
    }
}

//! Incrementally maintained two-path count tables.
//!
//! The change-statistic kernels ask, many times per proposal, how many
//! two-paths of a given orientation connect an ordered pair of nodes. The
//! graph store keeps these counts in tables that are updated as ties are
//! inserted and removed, so the lookups stay O(1). Three representations are
//! available and selected once at graph construction: a dense `N x N` matrix,
//! a hash map keyed by the packed pair, or no table at all (counts are then
//! recomputed by scanning adjacency lists).

use std::collections::HashMap;

use crate::graph::NodeId;

/// Storage strategy for the two-path count tables.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TwoPathCacheKind {
    /// One `N x N` matrix per table; constant-time lookup, quadratic memory.
    Dense,
    /// Hash map keyed by the packed `(i, j)` pair; memory proportional to the
    /// number of pairs actually connected by a two-path.
    #[default]
    Sparse,
    /// No table; every lookup rescans the adjacency lists.
    None,
}

/// A single `(i, j) -> count` table.
///
/// Symmetric orientations (shared-neighbour counts, undirected and bipartite
/// two-paths) store both `(i, j)` and `(j, i)` entries; the update rules in
/// [`crate::graph::Graph`] write both sides.
#[derive(Clone, Debug)]
pub(crate) enum TwoPathTable {
    Dense { counts: Vec<u32>, n: usize },
    Sparse(HashMap<u64, u32>),
}

fn pack(i: NodeId, j: NodeId) -> u64 {
    ((i as u64) << 32) | j as u64
}

impl TwoPathTable {
    /// Allocates a table for a caching strategy. The no-cache strategy owns
    /// no tables; asking it for one is a programming error.
    pub(crate) fn allocate(kind: TwoPathCacheKind, n: usize) -> Self {
        match kind {
            TwoPathCacheKind::Dense => Self::Dense {
                counts: vec![0; n * n],
                n,
            },
            TwoPathCacheKind::Sparse => Self::Sparse(HashMap::new()),
            TwoPathCacheKind::None => panic!("the no-cache strategy allocates no tables"),
        }
    }

    pub(crate) fn get(&self, i: NodeId, j: NodeId) -> u32 {
        match self {
            Self::Dense { counts, n } => counts[i * n + j],
            Self::Sparse(map) => map.get(&pack(i, j)).copied().unwrap_or(0),
        }
    }

    /// Adds `delta` to the `(i, j)` entry. Entries never go negative; a
    /// decrement of a zero entry means the caller's update walk and the
    /// adjacency lists disagree, which is a programming error.
    pub(crate) fn shift(&mut self, i: NodeId, j: NodeId, delta: i32) {
        match self {
            Self::Dense { counts, n } => {
                let cell = &mut counts[i * *n + j];
                let updated = i64::from(*cell) + i64::from(delta);
                assert!(updated >= 0, "two-path count for ({i}, {j}) went negative");
                *cell = u32::try_from(updated).unwrap_or(u32::MAX);
            }
            Self::Sparse(map) => {
                let entry = map.entry(pack(i, j)).or_insert(0);
                let updated = i64::from(*entry) + i64::from(delta);
                assert!(updated >= 0, "two-path count for ({i}, {j}) went negative");
                if updated == 0 {
                    map.remove(&pack(i, j));
                } else {
                    *entry = u32::try_from(updated).unwrap_or(u32::MAX);
                }
            }
        }
    }
}

/// The per-mode set of two-path tables owned by a graph.
#[derive(Clone, Debug)]
pub(crate) enum TwoPathTables {
    /// Mixed (`i -> v -> j`), out (`v -> i` and `v -> j`) and in (`i -> v` and
    /// `j -> v`) orientations for directed graphs.
    Directed {
        mixed: TwoPathTable,
        out: TwoPathTable,
        input: TwoPathTable,
    },
    /// The single symmetric table for one-mode undirected graphs.
    Undirected { both: TwoPathTable },
    /// Per-mode tables for bipartite graphs: `a` counts common mode-B
    /// neighbours of two mode-A nodes, `b` the converse.
    Bipartite { a: TwoPathTable, b: TwoPathTable },
    /// The no-cache strategy; lookups fall back to adjacency scans.
    Disabled,
}

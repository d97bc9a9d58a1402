//! The mutable graph store driven by the samplers.
//!
//! A [`Graph`] holds a fixed node set and a mutable tie set in one of three
//! modes (directed, one-mode undirected, bipartite undirected). Ties live in
//! per-node adjacency lists plus a flat list used for uniform-random tie
//! selection. Inserting or removing a tie keeps the configured two-path
//! tables, the snowball bookkeeping, and the citation-term arc list
//! consistent in the same call.
//!
//! Removal from the flat lists swaps the deleted entry with the last one, so
//! neither the flat lists nor the adjacency lists preserve insertion order.
//! Nothing in this crate may depend on that order.

mod snowball;
mod terms;
mod twopath;

pub use snowball::Snowball;
pub use terms::Terms;
pub use twopath::TwoPathCacheKind;

use thiserror::Error;

use twopath::{TwoPathTable, TwoPathTables};

/// Index of a node; nodes are numbered `0..n`.
pub type NodeId = usize;

/// A stored tie. For undirected modes the orientation carries no meaning.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tie {
    /// Sender for directed graphs; arbitrary endpoint otherwise.
    pub tail: NodeId,
    /// Receiver for directed graphs; the other endpoint otherwise.
    pub head: NodeId,
}

impl Tie {
    /// Builds a tie from its endpoints.
    #[must_use]
    pub const fn new(tail: NodeId, head: NodeId) -> Self {
        Self { tail, head }
    }

    fn matches(&self, i: NodeId, j: NodeId, directed: bool) -> bool {
        (self.tail == i && self.head == j)
            || (!directed && self.tail == j && self.head == i)
    }
}

/// Graph mode fixed at construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GraphMode {
    /// Directed one-mode graph; `allow_loops` permits self-ties.
    Directed {
        /// Whether self-loops may be stored.
        allow_loops: bool,
    },
    /// Undirected one-mode graph.
    Undirected,
    /// Undirected two-mode graph; nodes `0..mode_a` are mode A, the rest
    /// mode B, and every tie joins the two modes.
    Bipartite {
        /// Number of mode-A nodes.
        mode_a: usize,
    },
}

/// Errors raised while building a graph or attaching conditional-estimation
/// structure to it.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Bipartite construction needs both modes to be non-empty and to fit
    /// inside the node count.
    #[error("bipartite mode A size {mode_a} is invalid for {n} nodes")]
    BadBipartiteSplit {
        /// Requested mode-A size.
        mode_a: usize,
        /// Total node count.
        n: usize,
    },
    /// A zone or term vector did not cover every node exactly once.
    #[error("{what} file covers {got} nodes but the graph has {expected}")]
    LengthMismatch {
        /// Which per-node vector was malformed.
        what: &'static str,
        /// Number of entries supplied.
        got: usize,
        /// Number of entries required.
        expected: usize,
    },
    /// Snowball zones must be contiguous from zero.
    #[error("no node in snowball zone {zone} although zone {max_zone} exists")]
    ZoneGap {
        /// The empty zone.
        zone: u32,
        /// The deepest zone in the file.
        max_zone: u32,
    },
    /// An observed tie spans more than one snowball wave.
    #[error("tie {tail} - {head} spans zones {tail_zone} and {head_zone}")]
    ZoneSpan {
        /// Tie sender/endpoint.
        tail: NodeId,
        /// Tie receiver/endpoint.
        head: NodeId,
        /// Zone of `tail`.
        tail_zone: u32,
        /// Zone of `head`.
        head_zone: u32,
    },
}

/// Fixed-node-set graph with incrementally maintained derived structure.
///
/// # Examples
/// ```
/// use ergm_core::{Graph, TwoPathCacheKind};
///
/// let mut g = Graph::directed(4, TwoPathCacheKind::Dense, false);
/// g.insert_updating_list(0, 1);
/// g.insert_updating_list(1, 2);
/// assert!(g.is_tie(0, 1));
/// assert_eq!(g.tie_count(), 2);
/// // one mixed two-path 0 -> 1 -> 2
/// assert_eq!(g.mixed_two_paths(0, 2), 1);
/// g.remove_updating_list(0, 1);
/// assert_eq!(g.mixed_two_paths(0, 2), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Graph {
    mode: GraphMode,
    n: usize,
    out_adj: Vec<Vec<NodeId>>,
    in_adj: Vec<Vec<NodeId>>,
    ties: Vec<Tie>,
    cache: TwoPathTables,
    snowball: Option<Snowball>,
    terms: Option<Terms>,
}

impl Graph {
    /// Creates an empty directed graph on `n` nodes.
    #[must_use]
    pub fn directed(n: usize, cache: TwoPathCacheKind, allow_loops: bool) -> Self {
        Self::with_mode(n, GraphMode::Directed { allow_loops }, cache)
    }

    /// Creates an empty one-mode undirected graph on `n` nodes.
    #[must_use]
    pub fn undirected(n: usize, cache: TwoPathCacheKind) -> Self {
        Self::with_mode(n, GraphMode::Undirected, cache)
    }

    /// Creates an empty bipartite graph with `mode_a` mode-A nodes followed
    /// by `mode_b` mode-B nodes.
    ///
    /// # Errors
    /// Returns [`GraphError::BadBipartiteSplit`] when either mode is empty.
    pub fn bipartite(
        mode_a: usize,
        mode_b: usize,
        cache: TwoPathCacheKind,
    ) -> Result<Self, GraphError> {
        let n = mode_a + mode_b;
        if mode_a == 0 || mode_b == 0 {
            return Err(GraphError::BadBipartiteSplit { mode_a, n });
        }
        Ok(Self::with_mode(n, GraphMode::Bipartite { mode_a }, cache))
    }

    fn with_mode(n: usize, mode: GraphMode, cache: TwoPathCacheKind) -> Self {
        let directed = matches!(mode, GraphMode::Directed { .. });
        let tables = match cache {
            TwoPathCacheKind::None => TwoPathTables::Disabled,
            kind => match mode {
                GraphMode::Directed { .. } => TwoPathTables::Directed {
                    mixed: TwoPathTable::allocate(kind, n),
                    out: TwoPathTable::allocate(kind, n),
                    input: TwoPathTable::allocate(kind, n),
                },
                GraphMode::Undirected => TwoPathTables::Undirected {
                    both: TwoPathTable::allocate(kind, n),
                },
                GraphMode::Bipartite { .. } => TwoPathTables::Bipartite {
                    a: TwoPathTable::allocate(kind, n),
                    b: TwoPathTable::allocate(kind, n),
                },
            },
        };
        Self {
            mode,
            n,
            out_adj: vec![Vec::new(); n],
            in_adj: if directed { vec![Vec::new(); n] } else { Vec::new() },
            ties: Vec::new(),
            cache: tables,
            snowball: None,
            terms: None,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.n
    }

    /// The graph mode fixed at construction.
    #[must_use]
    pub const fn mode(&self) -> GraphMode {
        self.mode
    }

    /// Whether the graph is directed.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        matches!(self.mode, GraphMode::Directed { .. })
    }

    /// Whether self-loops may be stored.
    #[must_use]
    pub const fn allows_loops(&self) -> bool {
        matches!(self.mode, GraphMode::Directed { allow_loops: true })
    }

    /// Number of mode-A nodes of a bipartite graph, zero otherwise.
    #[must_use]
    pub const fn mode_a_count(&self) -> usize {
        match self.mode {
            GraphMode::Bipartite { mode_a } => mode_a,
            _ => 0,
        }
    }

    /// Number of mode-B nodes of a bipartite graph, zero otherwise.
    #[must_use]
    pub const fn mode_b_count(&self) -> usize {
        match self.mode {
            GraphMode::Bipartite { mode_a } => self.n - mode_a,
            _ => 0,
        }
    }

    /// Whether `v` belongs to mode A of a bipartite graph.
    #[must_use]
    pub fn in_mode_a(&self, v: NodeId) -> bool {
        v < self.mode_a_count()
    }

    /// Current number of stored ties.
    #[must_use]
    pub fn tie_count(&self) -> usize {
        self.ties.len()
    }

    /// The tie at flat-list position `idx`. The flat list is permuted by
    /// removals; positions are only stable between mutations.
    #[must_use]
    pub fn tie_at(&self, idx: usize) -> Tie {
        self.ties[idx]
    }

    /// Out-neighbours of `v` (all neighbours for undirected modes).
    #[must_use]
    pub fn out_neighbours(&self, v: NodeId) -> &[NodeId] {
        &self.out_adj[v]
    }

    /// In-neighbours of `v` in a directed graph.
    #[must_use]
    pub fn in_neighbours(&self, v: NodeId) -> &[NodeId] {
        debug_assert!(self.is_directed());
        &self.in_adj[v]
    }

    /// Out-degree of `v` (degree for undirected modes).
    #[must_use]
    pub fn out_degree(&self, v: NodeId) -> usize {
        self.out_adj[v].len()
    }

    /// In-degree of `v` in a directed graph.
    #[must_use]
    pub fn in_degree(&self, v: NodeId) -> usize {
        debug_assert!(self.is_directed());
        self.in_adj[v].len()
    }

    /// Degree of `v` in an undirected or bipartite graph.
    #[must_use]
    pub fn degree(&self, v: NodeId) -> usize {
        debug_assert!(!self.is_directed());
        self.out_adj[v].len()
    }

    /// Whether the tie `(i, j)` is present, reading the shorter of the two
    /// relevant adjacency lists.
    #[must_use]
    pub fn is_tie(&self, i: NodeId, j: NodeId) -> bool {
        if self.is_directed() {
            if self.out_adj[i].len() <= self.in_adj[j].len() {
                self.out_adj[i].contains(&j)
            } else {
                self.in_adj[j].contains(&i)
            }
        } else if self.out_adj[i].len() <= self.out_adj[j].len() {
            self.out_adj[i].contains(&j)
        } else {
            self.out_adj[j].contains(&i)
        }
    }

    /// Snowball structure, when conditional estimation is active.
    #[must_use]
    pub const fn snowball(&self) -> Option<&Snowball> {
        self.snowball.as_ref()
    }

    /// Citation-term structure, when citation-ERGM estimation is active.
    #[must_use]
    pub const fn terms(&self) -> Option<&Terms> {
        self.terms.as_ref()
    }

    fn check_endpoints(&self, i: NodeId, j: NodeId) {
        assert!(i < self.n && j < self.n, "tie ({i}, {j}) out of node range");
        if i == j {
            assert!(self.allows_loops(), "self-tie ({i}, {i}) is not permitted");
        }
        if let GraphMode::Bipartite { mode_a } = self.mode {
            assert!(
                (i < mode_a) != (j < mode_a),
                "bipartite tie ({i}, {j}) stays within one mode"
            );
        }
    }

    /// Inserts tie `(i, j)` into the adjacency lists, updating the two-path
    /// tables and the snowball wave degrees. The flat lists are untouched;
    /// use [`Graph::insert_updating_list`] for committed moves.
    ///
    /// # Panics
    /// The tie must be absent and its endpoints admissible; violations are
    /// programming errors.
    pub fn insert(&mut self, i: NodeId, j: NodeId) {
        self.check_endpoints(i, j);
        debug_assert!(!self.is_tie(i, j), "tie ({i}, {j}) inserted twice");
        self.out_adj[i].push(j);
        if self.is_directed() {
            self.in_adj[j].push(i);
        } else {
            self.out_adj[j].push(i);
        }
        self.update_two_paths(i, j, 1);
        if let Some(sb) = self.snowball.as_mut() {
            sb.tie_inserted(i, j);
        }
    }

    /// Removes tie `(i, j)` from the adjacency lists, reversing everything
    /// [`Graph::insert`] did. The flat lists are untouched.
    ///
    /// # Panics
    /// The tie must be present; a missing tie is a programming error.
    pub fn remove(&mut self, i: NodeId, j: NodeId) {
        swap_remove_value(&mut self.out_adj[i], j);
        if self.is_directed() {
            swap_remove_value(&mut self.in_adj[j], i);
        } else {
            swap_remove_value(&mut self.out_adj[j], i);
        }
        self.update_two_paths(i, j, -1);
        if let Some(sb) = self.snowball.as_mut() {
            sb.tie_removed(i, j);
        }
    }

    /// Inserts tie `(i, j)` and appends it to the flat tie list and to any
    /// active restricted lists.
    pub fn insert_updating_list(&mut self, i: NodeId, j: NodeId) {
        self.insert(i, j);
        self.append_to_lists(i, j);
    }

    /// Removes tie `(i, j)` and strips it from the flat tie list and any
    /// active restricted lists.
    pub fn remove_updating_list(&mut self, i: NodeId, j: NodeId) {
        self.remove(i, j);
        self.strip_from_lists(i, j);
    }

    /// Appends an already-inserted tie to the flat lists.
    pub(crate) fn append_to_lists(&mut self, i: NodeId, j: NodeId) {
        let tie = Tie::new(i, j);
        self.ties.push(tie);
        if let Some(sb) = self.snowball.as_mut() {
            sb.list_tie(tie);
        }
        if let Some(terms) = self.terms.as_mut() {
            terms.list_tie(tie);
        }
    }

    /// Strips an already-removed tie from the flat lists by value.
    pub(crate) fn strip_from_lists(&mut self, i: NodeId, j: NodeId) {
        let directed = self.is_directed();
        let pos = self
            .ties
            .iter()
            .position(|t| t.matches(i, j, directed))
            .unwrap_or_else(|| panic!("tie ({i}, {j}) missing from the flat list"));
        self.ties.swap_remove(pos);
        if let Some(sb) = self.snowball.as_mut() {
            sb.unlist_tie(i, j, directed);
        }
        if let Some(terms) = self.terms.as_mut() {
            terms.unlist_tie(i, j, directed);
        }
    }

    fn update_two_paths(&mut self, i: NodeId, j: NodeId, delta: i32) {
        if i == j {
            return;
        }
        let mode_a = self.mode_a_count();
        // The adjacency lists already reflect the mutation; the endpoint
        // guards keep the walk off the toggled tie itself.
        match &mut self.cache {
            TwoPathTables::Disabled => {}
            TwoPathTables::Directed { mixed, out, input } => {
                for idx in 0..self.in_adj[i].len() {
                    let w = self.in_adj[i][idx];
                    if w != i && w != j {
                        mixed.shift(w, j, delta);
                    }
                }
                for idx in 0..self.out_adj[j].len() {
                    let v = self.out_adj[j][idx];
                    if v != i && v != j {
                        mixed.shift(i, v, delta);
                    }
                }
                for idx in 0..self.out_adj[i].len() {
                    let v = self.out_adj[i][idx];
                    if v != i && v != j {
                        out.shift(j, v, delta);
                        out.shift(v, j, delta);
                    }
                }
                for idx in 0..self.in_adj[j].len() {
                    let v = self.in_adj[j][idx];
                    if v != i && v != j {
                        input.shift(v, i, delta);
                        input.shift(i, v, delta);
                    }
                }
            }
            TwoPathTables::Undirected { both } => {
                for idx in 0..self.out_adj[i].len() {
                    let v = self.out_adj[i][idx];
                    if v != i && v != j {
                        both.shift(v, j, delta);
                        both.shift(j, v, delta);
                    }
                }
                for idx in 0..self.out_adj[j].len() {
                    let v = self.out_adj[j][idx];
                    if v != i && v != j {
                        both.shift(v, i, delta);
                        both.shift(i, v, delta);
                    }
                }
            }
            TwoPathTables::Bipartite { a, b } => {
                let (av, bv) = if i < mode_a { (i, j) } else { (j, i) };
                for idx in 0..self.out_adj[bv].len() {
                    let v = self.out_adj[bv][idx];
                    if v != av {
                        a.shift(v, av, delta);
                        a.shift(av, v, delta);
                    }
                }
                for idx in 0..self.out_adj[av].len() {
                    let v = self.out_adj[av][idx];
                    if v != bv {
                        b.shift(v, bv, delta);
                        b.shift(bv, v, delta);
                    }
                }
            }
        }
    }

    /// Count of mixed two-paths `i -> v -> j`.
    #[must_use]
    pub fn mixed_two_paths(&self, i: NodeId, j: NodeId) -> u32 {
        debug_assert!(self.is_directed());
        match &self.cache {
            TwoPathTables::Directed { mixed, .. } => mixed.get(i, j),
            _ => self.count_neighbours(&self.out_adj[i], i, j, |v| self.is_tie(v, j)),
        }
    }

    /// Count of shared in-neighbours: nodes `v` with `v -> i` and `v -> j`.
    #[must_use]
    pub fn out_two_paths(&self, i: NodeId, j: NodeId) -> u32 {
        debug_assert!(self.is_directed());
        match &self.cache {
            TwoPathTables::Directed { out, .. } => out.get(i, j),
            _ => self.count_neighbours(&self.in_adj[i], i, j, |v| self.is_tie(v, j)),
        }
    }

    /// Count of shared out-neighbours: nodes `v` with `i -> v` and `j -> v`.
    #[must_use]
    pub fn in_two_paths(&self, i: NodeId, j: NodeId) -> u32 {
        debug_assert!(self.is_directed());
        match &self.cache {
            TwoPathTables::Directed { input, .. } => input.get(i, j),
            _ => self.count_neighbours(&self.out_adj[i], i, j, |v| self.is_tie(j, v)),
        }
    }

    /// Count of undirected two-paths `i - v - j`.
    #[must_use]
    pub fn two_paths(&self, i: NodeId, j: NodeId) -> u32 {
        debug_assert!(matches!(self.mode, GraphMode::Undirected));
        match &self.cache {
            TwoPathTables::Undirected { both } => both.get(i, j),
            _ => self.count_neighbours(&self.out_adj[i], i, j, |v| self.is_tie(v, j)),
        }
    }

    /// Count of shared mode-B neighbours of two mode-A nodes.
    #[must_use]
    pub fn two_paths_a(&self, i: NodeId, j: NodeId) -> u32 {
        debug_assert!(self.in_mode_a(i) && self.in_mode_a(j));
        match &self.cache {
            TwoPathTables::Bipartite { a, .. } => a.get(i, j),
            _ => self.count_neighbours(&self.out_adj[i], i, j, |v| self.is_tie(v, j)),
        }
    }

    /// Count of shared mode-A neighbours of two mode-B nodes.
    #[must_use]
    pub fn two_paths_b(&self, i: NodeId, j: NodeId) -> u32 {
        debug_assert!(!self.in_mode_a(i) && !self.in_mode_a(j));
        match &self.cache {
            TwoPathTables::Bipartite { b, .. } => b.get(i, j),
            _ => self.count_neighbours(&self.out_adj[i], i, j, |v| self.is_tie(v, j)),
        }
    }

    /// Dispatches to the same-mode two-path count appropriate for the graph
    /// mode: undirected two-paths, or the per-mode bipartite count for two
    /// nodes of the mode `i` and `j` share.
    #[must_use]
    pub fn same_mode_two_paths(&self, i: NodeId, j: NodeId) -> u32 {
        match self.mode {
            GraphMode::Undirected => self.two_paths(i, j),
            GraphMode::Bipartite { .. } if self.in_mode_a(i) => self.two_paths_a(i, j),
            GraphMode::Bipartite { .. } => self.two_paths_b(i, j),
            GraphMode::Directed { .. } => {
                panic!("same-mode two-paths are only defined for undirected modes")
            }
        }
    }

    fn count_neighbours<F>(&self, list: &[NodeId], i: NodeId, j: NodeId, pred: F) -> u32
    where
        F: Fn(NodeId) -> bool,
    {
        let mut count = 0;
        for &v in list {
            if v != i && v != j && pred(v) {
                count += 1;
            }
        }
        count
    }

    /// Attaches snowball-zone structure for conditional estimation, deriving
    /// the inner-node and inner-tie lists and the previous-wave degrees from
    /// the current tie set.
    ///
    /// # Errors
    /// Rejects zone vectors of the wrong length, with gaps in the zone
    /// numbering, or inconsistent with the tie set (a tie spanning more than
    /// one wave).
    pub fn attach_snowball(&mut self, zones: Vec<u32>) -> Result<(), GraphError> {
        let sb = Snowball::build(zones, self)?;
        self.snowball = Some(sb);
        Ok(())
    }

    /// Attaches citation-term structure, deriving the latest-term node and
    /// sender-arc lists from the current tie set.
    ///
    /// # Errors
    /// Rejects term vectors whose length is not the node count.
    pub fn attach_terms(&mut self, term_of: Vec<u32>) -> Result<(), GraphError> {
        let terms = Terms::build(term_of, self)?;
        self.terms = Some(terms);
        Ok(())
    }

    /// Iterates the flat tie list.
    pub fn ties(&self) -> impl Iterator<Item = Tie> + '_ {
        self.ties.iter().copied()
    }

    /// The caching strategy this graph was built with.
    #[must_use]
    pub fn cache_kind(&self) -> TwoPathCacheKind {
        match &self.cache {
            TwoPathTables::Disabled => TwoPathCacheKind::None,
            TwoPathTables::Directed { mixed: table, .. }
            | TwoPathTables::Undirected { both: table }
            | TwoPathTables::Bipartite { a: table, .. } => match table {
                TwoPathTable::Dense { .. } => TwoPathCacheKind::Dense,
                TwoPathTable::Sparse(_) => TwoPathCacheKind::Sparse,
            },
        }
    }

    /// A tieless graph with the same node set, mode, and caching strategy.
    /// Snowball and term structure is not carried over.
    #[must_use]
    pub fn clone_empty(&self) -> Self {
        Self::with_mode(self.n, self.mode, self.cache_kind())
    }
}

fn swap_remove_value(list: &mut Vec<NodeId>, value: NodeId) {
    let pos = list
        .iter()
        .position(|&v| v == value)
        .unwrap_or_else(|| panic!("adjacency entry {value} missing"));
    list.swap_remove(pos);
}

#[cfg(test)]
mod tests;

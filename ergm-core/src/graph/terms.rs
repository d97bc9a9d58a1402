//! Time-term bookkeeping for citation-ERGM estimation.
//!
//! In a citation network nodes arrive in discrete terms and only the latest
//! term's outgoing ties are free; everything older is fixed data. The
//! structure here keeps the latest-term node list (the proposal pool for
//! adds) and the list of ties sent by latest-term nodes (the pool for
//! deletes).

use super::{Graph, GraphError, NodeId, Tie};

/// Term structure attached to a directed [`Graph`] for citation-ERGM runs.
#[derive(Clone, Debug)]
pub struct Terms {
    term: Vec<u32>,
    max_term: u32,
    maxterm_nodes: Vec<NodeId>,
    maxterm_ties: Vec<Tie>,
}

impl Terms {
    pub(super) fn build(term: Vec<u32>, g: &Graph) -> Result<Self, GraphError> {
        if term.len() != g.node_count() {
            return Err(GraphError::LengthMismatch {
                what: "term",
                got: term.len(),
                expected: g.node_count(),
            });
        }
        let max_term = term.iter().copied().max().unwrap_or(0);
        let maxterm_nodes: Vec<NodeId> =
            (0..term.len()).filter(|&v| term[v] == max_term).collect();
        let maxterm_ties: Vec<Tie> = g.ties().filter(|t| term[t.tail] == max_term).collect();
        Ok(Self {
            term,
            max_term,
            maxterm_nodes,
            maxterm_ties,
        })
    }

    /// Term of node `v`.
    #[must_use]
    pub fn term(&self, v: NodeId) -> u32 {
        self.term[v]
    }

    /// The latest term.
    #[must_use]
    pub const fn max_term(&self) -> u32 {
        self.max_term
    }

    /// Nodes in the latest term; the sender pool for add proposals.
    #[must_use]
    pub fn maxterm_nodes(&self) -> &[NodeId] {
        &self.maxterm_nodes
    }

    /// Ties sent by latest-term nodes; the restricted delete pool.
    #[must_use]
    pub fn maxterm_ties(&self) -> &[Tie] {
        &self.maxterm_ties
    }

    /// Whether `v` belongs to the latest term.
    #[must_use]
    pub fn in_max_term(&self, v: NodeId) -> bool {
        self.term[v] == self.max_term
    }

    pub(super) fn list_tie(&mut self, tie: Tie) {
        if self.in_max_term(tie.tail) {
            self.maxterm_ties.push(tie);
        }
    }

    pub(super) fn unlist_tie(&mut self, i: NodeId, j: NodeId, directed: bool) {
        if !self.in_max_term(i) {
            return;
        }
        let pos = self
            .maxterm_ties
            .iter()
            .position(|t| t.matches(i, j, directed))
            .unwrap_or_else(|| panic!("tie ({i}, {j}) missing from the latest-term list"));
        self.maxterm_ties.swap_remove(pos);
    }
}

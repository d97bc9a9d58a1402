//! Snowball-zone bookkeeping for conditional estimation.
//!
//! A snowball sample partitions the nodes into waves: zone 0 holds the seed
//! nodes, zone k the nodes first reached in wave k. Conditional estimation
//! fixes the outermost wave and only toggles ties between inner nodes in the
//! same or adjacent waves. The structure here tracks, per node, how many of
//! its neighbours sit exactly one wave closer to the seeds; a tie whose
//! removal would orphan a deeper node from its previous wave is never a legal
//! proposal.

use super::{Graph, GraphError, NodeId, Tie};

/// Zone structure attached to a [`Graph`] under conditional estimation.
#[derive(Clone, Debug)]
pub struct Snowball {
    zone: Vec<u32>,
    max_zone: u32,
    inner_nodes: Vec<NodeId>,
    inner_ties: Vec<Tie>,
    prev_wave_degree: Vec<u32>,
}

impl Snowball {
    pub(super) fn build(zone: Vec<u32>, g: &Graph) -> Result<Self, GraphError> {
        if zone.len() != g.node_count() {
            return Err(GraphError::LengthMismatch {
                what: "zone",
                got: zone.len(),
                expected: g.node_count(),
            });
        }
        let max_zone = zone.iter().copied().max().unwrap_or(0);
        for z in 0..=max_zone {
            if !zone.contains(&z) {
                return Err(GraphError::ZoneGap { zone: z, max_zone });
            }
        }
        let mut prev_wave_degree = vec![0u32; zone.len()];
        for tie in g.ties() {
            let (zt, zh) = (zone[tie.tail], zone[tie.head]);
            if zt.abs_diff(zh) > 1 {
                return Err(GraphError::ZoneSpan {
                    tail: tie.tail,
                    head: tie.head,
                    tail_zone: zt,
                    head_zone: zh,
                });
            }
            if zt + 1 == zh {
                prev_wave_degree[tie.head] += 1;
            } else if zh + 1 == zt {
                prev_wave_degree[tie.tail] += 1;
            }
        }
        let inner_nodes: Vec<NodeId> = (0..zone.len()).filter(|&v| zone[v] < max_zone).collect();
        let inner_ties: Vec<Tie> = g
            .ties()
            .filter(|t| zone[t.tail] < max_zone && zone[t.head] < max_zone)
            .collect();
        Ok(Self {
            zone,
            max_zone,
            inner_nodes,
            inner_ties,
            prev_wave_degree,
        })
    }

    /// Zone of node `v`; zone 0 is the seed wave.
    #[must_use]
    pub fn zone(&self, v: NodeId) -> u32 {
        self.zone[v]
    }

    /// The outermost wave.
    #[must_use]
    pub const fn max_zone(&self) -> u32 {
        self.max_zone
    }

    /// Nodes in waves before the outermost one.
    #[must_use]
    pub fn inner_nodes(&self) -> &[NodeId] {
        &self.inner_nodes
    }

    /// Whether both endpoints are inner nodes.
    #[must_use]
    pub fn both_inner(&self, i: NodeId, j: NodeId) -> bool {
        self.zone[i] < self.max_zone && self.zone[j] < self.max_zone
    }

    /// Ties with both endpoints inner; the restricted delete pool.
    #[must_use]
    pub fn inner_ties(&self) -> &[Tie] {
        &self.inner_ties
    }

    /// Number of neighbours of `v` in the wave immediately before `v`'s.
    #[must_use]
    pub fn prev_wave_degree(&self, v: NodeId) -> u32 {
        self.prev_wave_degree[v]
    }

    pub(super) fn tie_inserted(&mut self, i: NodeId, j: NodeId) {
        if self.zone[i] + 1 == self.zone[j] {
            self.prev_wave_degree[j] += 1;
        } else if self.zone[j] + 1 == self.zone[i] {
            self.prev_wave_degree[i] += 1;
        }
    }

    pub(super) fn tie_removed(&mut self, i: NodeId, j: NodeId) {
        if self.zone[i] + 1 == self.zone[j] {
            self.prev_wave_degree[j] -= 1;
        } else if self.zone[j] + 1 == self.zone[i] {
            self.prev_wave_degree[i] -= 1;
        }
    }

    pub(super) fn list_tie(&mut self, tie: Tie) {
        if self.both_inner(tie.tail, tie.head) {
            self.inner_ties.push(tie);
        }
    }

    pub(super) fn unlist_tie(&mut self, i: NodeId, j: NodeId, directed: bool) {
        if !self.both_inner(i, j) {
            return;
        }
        let pos = self
            .inner_ties
            .iter()
            .position(|t| t.matches(i, j, directed))
            .unwrap_or_else(|| panic!("tie ({i}, {j}) missing from the inner-tie list"));
        self.inner_ties.swap_remove(pos);
    }
}

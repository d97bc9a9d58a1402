//! Structural change statistics for bipartite graphs.
//!
//! Kernels take the toggled tie in either endpoint order and normalise to
//! `(a, b)` with `a` in mode A. The per-mode statistics mirror each other:
//! the A variant reads mode-A degrees and shared-B-neighbour counts, the B
//! variant the converse.

use crate::graph::{Graph, NodeId};
use crate::stats::undirected::choose_two;
use crate::stats::{alt_form, decay_pow, to_f64};

fn ab(g: &Graph, i: NodeId, j: NodeId) -> (NodeId, NodeId) {
    if g.in_mode_a(i) { (i, j) } else { (j, i) }
}

/// `TwoStarsA`: two-stars centred on mode-A nodes.
pub(crate) fn change_two_stars_a(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    let (a, _) = ab(g, i, j);
    to_f64(g.degree(a))
}

/// `TwoStarsB`: two-stars centred on mode-B nodes.
pub(crate) fn change_two_stars_b(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    let (_, b) = ab(g, i, j);
    to_f64(g.degree(b))
}

/// `ThreeStarsA`: three-stars centred on mode-A nodes.
pub(crate) fn change_three_stars_a(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    let (a, _) = ab(g, i, j);
    to_f64(choose_two(g.degree(a)))
}

/// `ThreeStarsB`: three-stars centred on mode-B nodes.
pub(crate) fn change_three_stars_b(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    let (_, b) = ab(g, i, j);
    to_f64(choose_two(g.degree(b)))
}

/// `AltStarsA`: alternating k-stars over mode-A degrees.
pub(crate) fn change_alt_stars_a(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    let (a, _) = ab(g, i, j);
    alt_form(lambda, g.degree(a))
}

/// `AltStarsB`: alternating k-stars over mode-B degrees.
pub(crate) fn change_alt_stars_b(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    let (_, b) = ab(g, i, j);
    alt_form(lambda, g.degree(b))
}

/// `AltKCyclesA`: alternating k-two-paths over mode-A pairs.
pub(crate) fn change_alt_k_cycles_a(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut delta = 0.0;
    for &v in g.out_neighbours(b) {
        if v != a {
            delta += decay_pow(lambda, g.two_paths_a(a, v));
        }
    }
    delta
}

/// `AltKCyclesB`: alternating k-two-paths over mode-B pairs.
pub(crate) fn change_alt_k_cycles_b(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut delta = 0.0;
    for &v in g.out_neighbours(a) {
        if v != b {
            delta += decay_pow(lambda, g.two_paths_b(b, v));
        }
    }
    delta
}

/// `AltK4CyclesA`: the four-cycle-anchored variant of `AltKCyclesA`; the
/// first shared neighbour carries no decay.
pub(crate) fn change_alt_k4_cycles_a(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut delta = 0.0;
    for &v in g.out_neighbours(b) {
        if v != a {
            delta += decay_pow(lambda, g.two_paths_a(a, v).saturating_sub(1));
        }
    }
    delta
}

/// `AltK4CyclesB`: the four-cycle-anchored variant of `AltKCyclesB`.
pub(crate) fn change_alt_k4_cycles_b(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut delta = 0.0;
    for &v in g.out_neighbours(a) {
        if v != b {
            delta += decay_pow(lambda, g.two_paths_b(b, v).saturating_sub(1));
        }
    }
    delta
}

/// `IsolatesA`: mode-A nodes with no ties.
pub(crate) fn change_isolates_a(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    let (a, _) = ab(g, i, j);
    if g.degree(a) == 0 { -1.0 } else { 0.0 }
}

/// `IsolatesB`: mode-B nodes with no ties.
pub(crate) fn change_isolates_b(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    let (_, b) = ab(g, i, j);
    if g.degree(b) == 0 { -1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TwoPathCacheKind;

    fn three_edge_fixture() -> Graph {
        let mut g = Graph::bipartite(2, 2, TwoPathCacheKind::Dense).expect("two non-empty modes");
        for &(a, b) in &[(0, 2), (0, 3), (1, 2)] {
            g.insert_updating_list(a, b);
        }
        g
    }

    #[test]
    fn per_mode_stars_read_the_right_endpoint() {
        let g = three_edge_fixture();
        assert!((change_two_stars_a(&g, 1, 3, 0.0) - 1.0).abs() < 1e-12);
        assert!((change_two_stars_b(&g, 1, 3, 0.0) - 1.0).abs() < 1e-12);
        assert!((change_alt_stars_a(&g, 1, 3, 2.0) - 1.0).abs() < 1e-12);
        // endpoint order must not matter
        assert!(
            (change_two_stars_a(&g, 3, 1, 0.0) - change_two_stars_a(&g, 1, 3, 0.0)).abs() < 1e-12
        );
    }

    #[test]
    fn k_cycles_weight_existing_shared_neighbours() {
        let g = three_edge_fixture();
        // adding 1-3: the A-pair (1, 0) already shares node 2, decay 0.5^1
        assert!((change_alt_k_cycles_a(&g, 1, 3, 2.0) - 0.5).abs() < 1e-12);
        // the K4 variant shifts the exponent down by one
        assert!((change_alt_k4_cycles_a(&g, 1, 3, 2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn isolates_only_count_the_matching_mode() {
        let g = three_edge_fixture();
        let mut fresh = Graph::bipartite(2, 2, TwoPathCacheKind::Dense).expect("two modes");
        fresh.insert_updating_list(0, 2);
        assert!((change_isolates_a(&g, 1, 3, 0.0) - 0.0).abs() < 1e-12);
        assert!((change_isolates_a(&fresh, 1, 3, 0.0) - (-1.0)).abs() < 1e-12);
        assert!((change_isolates_b(&fresh, 1, 3, 0.0) - (-1.0)).abs() < 1e-12);
    }
}

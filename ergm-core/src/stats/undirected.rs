//! Structural change statistics for one-mode undirected graphs.

use crate::graph::{Graph, NodeId};
use crate::stats::{alt_form, decay_pow, to_f64};

/// `Edge`: the density statistic.
pub(crate) fn change_edge(_g: &Graph, _i: NodeId, _j: NodeId, _lambda: f64) -> f64 {
    1.0
}

/// `TwoStars`: pairs of edges sharing an endpoint.
pub(crate) fn change_two_stars(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    to_f64(g.degree(i) + g.degree(j))
}

/// `ThreeStars`: triples of edges sharing an endpoint.
pub(crate) fn change_three_stars(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    to_f64(choose_two(g.degree(i)) + choose_two(g.degree(j)))
}

/// `AltStars`: alternating k-stars, symmetric in both endpoints.
pub(crate) fn change_alt_stars(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    alt_form(lambda, g.degree(i)) + alt_form(lambda, g.degree(j))
}

/// `AltTwoPaths`: alternating two-paths between the pairs the new edge
/// extends.
pub(crate) fn change_alt_two_paths(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    let mut delta = 0.0;
    for &v in g.out_neighbours(j) {
        if v != i && v != j {
            delta += decay_pow(lambda, g.two_paths(i, v));
        }
    }
    for &v in g.out_neighbours(i) {
        if v != i && v != j {
            delta += decay_pow(lambda, g.two_paths(j, v));
        }
    }
    delta
}

/// `AltKTriangles`: alternating k-triangles.
pub(crate) fn change_alt_k_triangles(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    let mut delta = lambda * (1.0 - decay_pow(lambda, g.two_paths(i, j)));
    for &v in g.out_neighbours(i) {
        if v != i && v != j && g.is_tie(v, j) {
            delta += decay_pow(lambda, g.two_paths(i, v)) + decay_pow(lambda, g.two_paths(v, j));
        }
    }
    delta
}

/// `FourCycles`: cycles on four nodes. Also serves bipartite models, where
/// the shared-neighbour lookup dispatches to the per-mode table.
pub(crate) fn change_four_cycles(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    let mut cycles = 0usize;
    for &v in g.out_neighbours(j) {
        if v != i && v != j {
            cycles += g.same_mode_two_paths(i, v) as usize;
        }
    }
    to_f64(cycles)
}

/// `ThreePaths`: simple paths on four nodes.
pub(crate) fn change_three_paths(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    let middle = to_f64(g.degree(i)) * to_f64(g.degree(j));
    let shared = f64::from(g.two_paths(i, j));
    let mut ends = 0.0;
    for &v in g.out_neighbours(i) {
        if v != j {
            ends += to_f64(g.degree(v)) - 1.0;
        }
    }
    for &v in g.out_neighbours(j) {
        if v != i {
            ends += to_f64(g.degree(v)) - 1.0;
        }
    }
    middle - 3.0 * shared + ends
}

/// `IsolateEdges`: components that are exactly one edge.
pub(crate) fn change_isolate_edges(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    let mut delta = 0.0;
    if g.degree(i) == 0 && g.degree(j) == 0 {
        delta += 1.0;
    }
    if g.degree(i) == 1 && g.degree(g.out_neighbours(i)[0]) == 1 {
        delta -= 1.0;
    }
    if g.degree(j) == 1 && g.degree(g.out_neighbours(j)[0]) == 1 {
        delta -= 1.0;
    }
    delta
}

/// `Isolates`: nodes with no edges.
pub(crate) fn change_isolates(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    let mut delta = 0.0;
    if g.degree(i) == 0 {
        delta -= 1.0;
    }
    if g.degree(j) == 0 {
        delta -= 1.0;
    }
    delta
}

pub(crate) fn choose_two(d: usize) -> usize {
    d * d.saturating_sub(1) / 2
}

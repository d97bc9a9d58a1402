//! Structural change statistics for directed graphs.
//!
//! Each kernel reports the change in its count when the absent arc `i -> j`
//! is added. The alternating kernels combine a closing term on the toggled
//! pair with side terms over the bases whose two-path counts the new arc
//! raises; the two-path lookups come from the graph's cached tables.

use crate::graph::{Graph, NodeId};
use crate::stats::{alt_form, decay_pow, to_f64};

fn loop_at(g: &Graph, v: NodeId) -> bool {
    g.allows_loops() && g.is_tie(v, v)
}

/// In-degree of `v` not counting a self-loop.
fn in_degree_simple(g: &Graph, v: NodeId) -> usize {
    g.in_degree(v) - usize::from(loop_at(g, v))
}

/// Out-degree of `v` not counting a self-loop.
fn out_degree_simple(g: &Graph, v: NodeId) -> usize {
    g.out_degree(v) - usize::from(loop_at(g, v))
}

/// `Arc`: the density statistic.
pub(crate) fn change_arc(_g: &Graph, _i: NodeId, _j: NodeId, _lambda: f64) -> f64 {
    1.0
}

/// `Reciprocity`: mutual dyads.
pub(crate) fn change_reciprocity(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i != j && g.is_tie(j, i) { 1.0 } else { 0.0 }
}

/// `Sink`: nodes with incoming but no outgoing arcs.
pub(crate) fn change_sink(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    if in_degree_simple(g, j) == 0 && out_degree_simple(g, j) == 0 {
        delta += 1.0;
    }
    if out_degree_simple(g, i) == 0 && in_degree_simple(g, i) > 0 {
        delta -= 1.0;
    }
    delta
}

/// `Source`: nodes with outgoing but no incoming arcs.
pub(crate) fn change_source(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    if out_degree_simple(g, i) == 0 && in_degree_simple(g, i) == 0 {
        delta += 1.0;
    }
    if in_degree_simple(g, j) == 0 && out_degree_simple(g, j) > 0 {
        delta -= 1.0;
    }
    delta
}

/// `Isolates`: nodes with no arcs at all.
pub(crate) fn change_isolates(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    if g.in_degree(i) == 0 && g.out_degree(i) == 0 {
        delta -= 1.0;
    }
    if g.in_degree(j) == 0 && g.out_degree(j) == 0 {
        delta -= 1.0;
    }
    delta
}

/// `TwoPath`: directed two-paths (mixed two-stars).
pub(crate) fn change_two_path(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let back = if g.is_tie(j, i) { 2.0 } else { 0.0 };
    to_f64(in_degree_simple(g, i) + out_degree_simple(g, j)) - back
}

/// `InTwoStars`: pairs of arcs sharing a receiver.
pub(crate) fn change_in_two_stars(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    to_f64(in_degree_simple(g, j))
}

/// `OutTwoStars`: pairs of arcs sharing a sender.
pub(crate) fn change_out_two_stars(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    to_f64(out_degree_simple(g, i))
}

/// `TransitiveTriad`: triads where `i -> j` closes or extends a transitive
/// configuration in any of its three roles.
pub(crate) fn change_transitive_triad(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    to_f64(
        g.mixed_two_paths(i, j) as usize
            + g.in_two_paths(i, j) as usize
            + g.out_two_paths(i, j) as usize,
    )
}

/// `CyclicTriad`: directed three-cycles.
pub(crate) fn change_cyclic_triad(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    f64::from(g.mixed_two_paths(j, i))
}

/// `AltInStars`: alternating in-stars (popularity spread).
pub(crate) fn change_alt_in_stars(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    alt_form(lambda, in_degree_simple(g, j))
}

/// `AltOutStars`: alternating out-stars (activity spread).
pub(crate) fn change_alt_out_stars(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    alt_form(lambda, out_degree_simple(g, i))
}

/// `AltKTrianglesT`: alternating transitive k-triangles (path closure).
pub(crate) fn change_alt_k_triangles_t(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = lambda * (1.0 - decay_pow(lambda, g.mixed_two_paths(i, j)));
    // New arc as the first leg of a two-path over base i -> v.
    for &v in g.out_neighbours(j) {
        if v != i && v != j && g.is_tie(i, v) {
            delta += decay_pow(lambda, g.mixed_two_paths(i, v));
        }
    }
    // New arc as the second leg of a two-path over base v -> j.
    for &v in g.in_neighbours(i) {
        if v != i && v != j && g.is_tie(v, j) {
            delta += decay_pow(lambda, g.mixed_two_paths(v, j));
        }
    }
    delta
}

/// `AltKTrianglesC`: alternating cyclic k-triangles.
pub(crate) fn change_alt_k_triangles_c(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = lambda * (1.0 - decay_pow(lambda, g.mixed_two_paths(j, i)));
    for &v in g.in_neighbours(i) {
        if v != i && v != j && g.is_tie(j, v) {
            delta += decay_pow(lambda, g.mixed_two_paths(i, v))
                + decay_pow(lambda, g.mixed_two_paths(v, j));
        }
    }
    delta
}

/// `AltKTrianglesD`: alternating shared-sender k-triangles (popularity
/// closure).
pub(crate) fn change_alt_k_triangles_d(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = lambda * (1.0 - decay_pow(lambda, g.out_two_paths(i, j)));
    for &v in g.out_neighbours(i) {
        if v == i || v == j {
            continue;
        }
        if g.is_tie(j, v) {
            delta += decay_pow(lambda, g.out_two_paths(j, v));
        }
        if g.is_tie(v, j) {
            delta += decay_pow(lambda, g.out_two_paths(v, j));
        }
    }
    delta
}

/// `AltKTrianglesU`: alternating shared-receiver k-triangles (activity
/// closure).
pub(crate) fn change_alt_k_triangles_u(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = lambda * (1.0 - decay_pow(lambda, g.in_two_paths(i, j)));
    for &v in g.out_neighbours(i) {
        if v != i && v != j && g.is_tie(v, j) {
            delta += decay_pow(lambda, g.in_two_paths(i, v));
        }
    }
    for &v in g.in_neighbours(i) {
        if v != i && v != j && g.is_tie(v, j) {
            delta += decay_pow(lambda, g.in_two_paths(v, i));
        }
    }
    delta
}

/// `AltTwoPathsT`: alternating mixed two-paths (the multiple-connectivity
/// companion of `AltKTrianglesT`).
pub(crate) fn change_alt_two_paths_t(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    for &v in g.out_neighbours(j) {
        if v != i && v != j {
            delta += decay_pow(lambda, g.mixed_two_paths(i, v));
        }
    }
    for &v in g.in_neighbours(i) {
        if v != i && v != j {
            delta += decay_pow(lambda, g.mixed_two_paths(v, j));
        }
    }
    delta
}

/// `AltTwoPathsD`: alternating shared-sender two-paths.
pub(crate) fn change_alt_two_paths_d(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    for &v in g.out_neighbours(i) {
        if v != i && v != j {
            delta += decay_pow(lambda, g.out_two_paths(j, v));
        }
    }
    delta
}

/// `AltTwoPathsU`: alternating shared-receiver two-paths.
pub(crate) fn change_alt_two_paths_u(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = 0.0;
    for &v in g.in_neighbours(j) {
        if v != i && v != j {
            delta += decay_pow(lambda, g.in_two_paths(i, v));
        }
    }
    delta
}

/// `AltTwoPathsTD`: the balanced average of the T and D variants.
pub(crate) fn change_alt_two_paths_td(g: &Graph, i: NodeId, j: NodeId, lambda: f64) -> f64 {
    0.5 * (change_alt_two_paths_t(g, i, j, lambda) + change_alt_two_paths_d(g, i, j, lambda))
}

/// `Loop`: self-ties.
pub(crate) fn change_loop(_g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i == j { 1.0 } else { 0.0 }
}

/// `LoopInteraction`: co-occurrence of a self-tie and an ordinary arc at the
/// same node.
pub(crate) fn change_loop_interaction(g: &Graph, i: NodeId, j: NodeId, _lambda: f64) -> f64 {
    if i == j {
        to_f64(in_degree_simple(g, i) + out_degree_simple(g, i))
    } else {
        to_f64(usize::from(loop_at(g, i)) + usize::from(loop_at(g, j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TwoPathCacheKind;

    fn path_graph() -> Graph {
        let mut g = Graph::directed(3, TwoPathCacheKind::Dense, false);
        g.insert_updating_list(0, 1);
        g.insert_updating_list(1, 2);
        g
    }

    #[test]
    fn transitive_closure_of_a_two_path() {
        let g = path_graph();
        assert!((change_transitive_triad(&g, 0, 2, 0.0) - 1.0).abs() < 1e-12);
        // lambda = 2: closing one two-path is worth 2 * (1 - 0.5) = 1.
        assert!((change_alt_k_triangles_t(&g, 0, 2, 2.0) - 1.0).abs() < 1e-12);
        assert!((change_cyclic_triad(&g, 0, 2, 0.0) - 0.0).abs() < 1e-12);
        assert!((change_cyclic_triad(&g, 2, 0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reciprocity_and_arc() {
        let mut g = Graph::directed(2, TwoPathCacheKind::Dense, false);
        g.insert_updating_list(0, 1);
        assert!((change_reciprocity(&g, 1, 0, 0.0) - 1.0).abs() < 1e-12);
        assert!((change_arc(&g, 1, 0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn isolates_drop_by_two_on_first_arc() {
        let g = Graph::directed(5, TwoPathCacheKind::Dense, false);
        assert!((change_isolates(&g, 0, 1, 0.0) - (-2.0)).abs() < 1e-12);
    }

    #[test]
    fn sink_and_source_track_degree_transitions() {
        let mut g = Graph::directed(3, TwoPathCacheKind::Dense, false);
        // 0 -> 1 makes 0 a source and 1 a sink.
        assert!((change_source(&g, 0, 1, 0.0) - 1.0).abs() < 1e-12);
        assert!((change_sink(&g, 0, 1, 0.0) - 1.0).abs() < 1e-12);
        g.insert_updating_list(0, 1);
        // 1 -> 2 stops 1 being a sink and makes 2 one.
        assert!((change_sink(&g, 1, 2, 0.0) - 0.0).abs() < 1e-12);
        // 2 -> 0 stops 0 being a source.
        assert!((change_source(&g, 2, 0, 0.0) - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn two_path_counts_stars_through_both_endpoints() {
        let g = path_graph();
        // Adding 2 -> 0 creates two-paths 1->2->0 and 2->0->1.
        assert!((change_two_path(&g, 2, 0, 0.0) - 2.0).abs() < 1e-12);
        assert!((change_in_two_stars(&g, 0, 2, 0.0) - 1.0).abs() < 1e-12);
        assert!((change_out_two_stars(&g, 1, 0, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn alternating_stars_follow_the_geometric_form() {
        let mut g = Graph::directed(4, TwoPathCacheKind::Dense, false);
        g.insert_updating_list(0, 3);
        g.insert_updating_list(1, 3);
        // receiver 3 already has in-degree 2: 2 * (1 - 0.5^2) = 1.5
        assert!((change_alt_in_stars(&g, 2, 3, 2.0) - 1.5).abs() < 1e-12);
        assert!((change_alt_out_stars(&g, 2, 3, 2.0) - 0.0).abs() < 1e-12);
    }
}

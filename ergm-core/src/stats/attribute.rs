//! Nodal attribute and attribute interaction change statistics.
//!
//! Missing data never contributes: a binary or categorical NA fails every
//! predicate, and a continuous NaN zeroes the term that references it.

use crate::attributes::{Attributes, SetMember};
use crate::graph::{Graph, NodeId};
use crate::stats::{indicator, pow0, to_f64};

fn bin(attrs: &Attributes, attr: usize, v: NodeId) -> bool {
    attrs.binary(attr, v) == Some(true)
}

fn matching(attrs: &Attributes, attr: usize, u: NodeId, v: NodeId) -> bool {
    match (attrs.categorical(attr, u), attrs.categorical(attr, v)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn mismatching(attrs: &Attributes, attr: usize, u: NodeId, v: NodeId) -> bool {
    match (attrs.categorical(attr, u), attrs.categorical(attr, v)) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    }
}

fn ab(g: &Graph, i: NodeId, j: NodeId) -> (NodeId, NodeId) {
    if g.in_mode_a(i) { (i, j) } else { (j, i) }
}

// --- binary ---------------------------------------------------------------

/// `Sender`: arcs sent by attribute-positive nodes.
pub(crate) fn change_sender(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    indicator(bin(attrs, attr, i))
}

/// `Receiver`: arcs received by attribute-positive nodes.
pub(crate) fn change_receiver(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    indicator(bin(attrs, attr, j))
}

/// `Interaction`: ties between two attribute-positive nodes.
pub(crate) fn change_interaction(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    indicator(bin(attrs, attr, i) && bin(attrs, attr, j))
}

/// `Activity`: undirected tie ends at attribute-positive nodes.
pub(crate) fn change_activity(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    indicator(bin(attrs, attr, i)) + indicator(bin(attrs, attr, j))
}

/// `ActivityA`: bipartite ties whose mode-A endpoint is attribute-positive.
pub(crate) fn change_activity_a(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, _) = ab(g, i, j);
    indicator(bin(attrs, attr, a))
}

/// `ActivityB`: bipartite ties whose mode-B endpoint is attribute-positive.
pub(crate) fn change_activity_b(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (_, b) = ab(g, i, j);
    indicator(bin(attrs, attr, b))
}

// --- categorical ----------------------------------------------------------

/// `Matching`: ties between same-category nodes.
pub(crate) fn change_matching(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    indicator(matching(attrs, attr, i, j))
}

/// `Mismatching`: ties between different-category nodes.
pub(crate) fn change_mismatching(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    indicator(mismatching(attrs, attr, i, j))
}

/// `MatchingReciprocity`: mutual dyads between same-category nodes.
pub(crate) fn change_matching_reciprocity(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    indicator(matching(attrs, attr, i, j) && g.is_tie(j, i))
}

/// `MismatchingReciprocity`: mutual dyads between different-category nodes.
pub(crate) fn change_mismatching_reciprocity(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    indicator(mismatching(attrs, attr, i, j) && g.is_tie(j, i))
}

/// `MismatchingTransitiveTriad`: transitive triads whose three dyads all
/// mismatch.
pub(crate) fn change_mismatching_transitive_triad(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j || !mismatching(attrs, attr, i, j) {
        return 0.0;
    }
    let mut count = 0usize;
    // closure of i -> v -> j
    for &v in g.out_neighbours(i) {
        if v != i
            && v != j
            && g.is_tie(v, j)
            && mismatching(attrs, attr, i, v)
            && mismatching(attrs, attr, v, j)
        {
            count += 1;
        }
    }
    // shared receiver: i -> j -> v with shortcut i -> v
    for &v in g.out_neighbours(j) {
        if v != i
            && v != j
            && g.is_tie(i, v)
            && mismatching(attrs, attr, j, v)
            && mismatching(attrs, attr, i, v)
        {
            count += 1;
        }
    }
    // shared sender: v -> i -> j with shortcut v -> j
    for &v in g.in_neighbours(i) {
        if v != i
            && v != j
            && g.is_tie(v, j)
            && mismatching(attrs, attr, v, i)
            && mismatching(attrs, attr, v, j)
        {
            count += 1;
        }
    }
    to_f64(count)
}

/// `MismatchingTransitiveTies`: mismatching arcs supported by at least one
/// transitive two-path. Unlike the other kernels this one counts support
/// transitions of *other* arcs too: a new arc can give an existing arc its
/// first two-path. The support tests below are phrased against the
/// toggled-tie-absent graph, so the same computation serves adds and
/// deletes.
pub(crate) fn change_mismatching_transitive_ties(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    let mut delta = 0usize;
    if mismatching(attrs, attr, i, j) && g.mixed_two_paths(i, j) > 0 {
        delta += 1;
    }
    for &w in g.out_neighbours(j) {
        if w != i
            && w != j
            && g.is_tie(i, w)
            && mismatching(attrs, attr, i, w)
            && g.mixed_two_paths(i, w) == 0
        {
            delta += 1;
        }
    }
    for &v in g.in_neighbours(i) {
        if v != i
            && v != j
            && g.is_tie(v, j)
            && mismatching(attrs, attr, v, j)
            && g.mixed_two_paths(v, j) == 0
        {
            delta += 1;
        }
    }
    to_f64(delta)
}

/// `TwoPathMatchingA`: bipartite two-paths joining same-category mode-A
/// nodes.
pub(crate) fn change_two_path_matching_a(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut count = 0usize;
    for &v in g.out_neighbours(b) {
        if v != a && matching(attrs, attr, a, v) {
            count += 1;
        }
    }
    to_f64(count)
}

/// `TwoPathMismatchingA`: bipartite two-paths joining different-category
/// mode-A nodes.
pub(crate) fn change_two_path_mismatching_a(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut count = 0usize;
    for &v in g.out_neighbours(b) {
        if v != a && mismatching(attrs, attr, a, v) {
            count += 1;
        }
    }
    to_f64(count)
}

/// `TwoPathMatchingB`: bipartite two-paths joining same-category mode-B
/// nodes.
pub(crate) fn change_two_path_matching_b(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut count = 0usize;
    for &v in g.out_neighbours(a) {
        if v != b && matching(attrs, attr, b, v) {
            count += 1;
        }
    }
    to_f64(count)
}

/// `TwoPathMismatchingB`: bipartite two-paths joining different-category
/// mode-B nodes.
pub(crate) fn change_two_path_mismatching_b(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut count = 0usize;
    for &v in g.out_neighbours(a) {
        if v != b && mismatching(attrs, attr, b, v) {
            count += 1;
        }
    }
    to_f64(count)
}

fn matching_neighbour_count(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    hub: NodeId,
    category: u32,
    skip: NodeId,
) -> usize {
    g.out_neighbours(hub)
        .iter()
        .filter(|&&v| v != skip && attrs.categorical(attr, v) == Some(category))
        .count()
}

/// `NodematchAlphaA`: alpha-based homophily on the mode-A attribute
/// (Bomiriya et al. 2023).
pub(crate) fn change_nodematch_alpha_a(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let Some(category) = attrs.categorical(attr, a) else {
        return 0.0;
    };
    let d = to_f64(matching_neighbour_count(g, attrs, attr, b, category, a));
    pow0(d + 1.0, exponent) - pow0(d, exponent)
}

/// `NodematchAlphaB`: alpha-based homophily on the mode-B attribute.
pub(crate) fn change_nodematch_alpha_b(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let Some(category) = attrs.categorical(attr, b) else {
        return 0.0;
    };
    let d = to_f64(matching_neighbour_count(g, attrs, attr, a, category, b));
    pow0(d + 1.0, exponent) - pow0(d, exponent)
}

fn matched_pairs_at(g: &Graph, attrs: &Attributes, attr: usize, hub: NodeId) -> usize {
    let mut pairs = 0usize;
    let neighbours = g.out_neighbours(hub);
    for (idx, &u) in neighbours.iter().enumerate() {
        for &v in &neighbours[idx + 1..] {
            if matching(attrs, attr, u, v) {
                pairs += 1;
            }
        }
    }
    pairs
}

/// `NodematchBetaA`: beta-based homophily on the mode-A attribute.
pub(crate) fn change_nodematch_beta_a(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let Some(category) = attrs.categorical(attr, a) else {
        return 0.0;
    };
    let existing = to_f64(matched_pairs_at(g, attrs, attr, b));
    let gained = to_f64(matching_neighbour_count(g, attrs, attr, b, category, a));
    pow0(existing + gained, exponent) - pow0(existing, exponent)
}

/// `NodematchBetaB`: beta-based homophily on the mode-B attribute.
pub(crate) fn change_nodematch_beta_b(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let Some(category) = attrs.categorical(attr, b) else {
        return 0.0;
    };
    let existing = to_f64(matched_pairs_at(g, attrs, attr, a));
    let gained = to_f64(matching_neighbour_count(g, attrs, attr, a, category, b));
    pow0(existing + gained, exponent) - pow0(existing, exponent)
}

// --- continuous -----------------------------------------------------------

fn finite_or_zero(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}

/// `ContinuousSender`: sum of sender values over arcs.
pub(crate) fn change_continuous_sender(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    finite_or_zero(attrs.continuous(attr, i))
}

/// `ContinuousReceiver`: sum of receiver values over arcs.
pub(crate) fn change_continuous_receiver(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    finite_or_zero(attrs.continuous(attr, j))
}

/// `ContinuousActivity`: sum of both endpoint values over undirected ties.
pub(crate) fn change_continuous_activity(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    finite_or_zero(attrs.continuous(attr, i)) + finite_or_zero(attrs.continuous(attr, j))
}

fn pair_values(attrs: &Attributes, attr: usize, i: NodeId, j: NodeId) -> Option<(f64, f64)> {
    let (x, y) = (attrs.continuous(attr, i), attrs.continuous(attr, j));
    if x.is_nan() || y.is_nan() { None } else { Some((x, y)) }
}

/// `Diff`: absolute endpoint difference.
pub(crate) fn change_diff(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    pair_values(attrs, attr, i, j).map_or(0.0, |(x, y)| (x - y).abs())
}

/// `Sum`: endpoint value sum over ties where both values are observed.
pub(crate) fn change_sum(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    pair_values(attrs, attr, i, j).map_or(0.0, |(x, y)| x + y)
}

/// `DiffReciprocity`: absolute difference over mutual dyads.
pub(crate) fn change_diff_reciprocity(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j || !g.is_tie(j, i) {
        return 0.0;
    }
    pair_values(attrs, attr, i, j).map_or(0.0, |(x, y)| (x - y).abs())
}

/// `DiffSign`: sign of sender minus receiver.
pub(crate) fn change_diff_sign(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    pair_values(attrs, attr, i, j).map_or(0.0, |(x, y)| {
        if x > y {
            1.0
        } else if x < y {
            -1.0
        } else {
            0.0
        }
    })
}

/// `DiffDirSR`: positive part of sender minus receiver.
pub(crate) fn change_diff_dir_sr(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    pair_values(attrs, attr, i, j).map_or(0.0, |(x, y)| if x > y { x - y } else { 0.0 })
}

/// `DiffDirRS`: positive part of receiver minus sender.
pub(crate) fn change_diff_dir_rs(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    pair_values(attrs, attr, i, j).map_or(0.0, |(x, y)| if y > x { y - x } else { 0.0 })
}

/// `TwoPathSumA`: value sums over new same-mode-A two-paths.
pub(crate) fn change_two_path_sum_a(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut delta = 0.0;
    for &v in g.out_neighbours(b) {
        if v != a {
            delta += pair_values(attrs, attr, a, v).map_or(0.0, |(x, y)| x + y);
        }
    }
    delta
}

/// `TwoPathDiffA`: absolute value differences over new same-mode-A
/// two-paths.
pub(crate) fn change_two_path_diff_a(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut delta = 0.0;
    for &v in g.out_neighbours(b) {
        if v != a {
            delta += pair_values(attrs, attr, a, v).map_or(0.0, |(x, y)| (x - y).abs());
        }
    }
    delta
}

/// `TwoPathSumB`: value sums over new same-mode-B two-paths.
pub(crate) fn change_two_path_sum_b(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut delta = 0.0;
    for &v in g.out_neighbours(a) {
        if v != b {
            delta += pair_values(attrs, attr, b, v).map_or(0.0, |(x, y)| x + y);
        }
    }
    delta
}

/// `TwoPathDiffB`: absolute value differences over new same-mode-B
/// two-paths.
pub(crate) fn change_two_path_diff_b(
    g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    let (a, b) = ab(g, i, j);
    let mut delta = 0.0;
    for &v in g.out_neighbours(a) {
        if v != b {
            delta += pair_values(attrs, attr, b, v).map_or(0.0, |(x, y)| (x - y).abs());
        }
    }
    delta
}

// --- set of categories ----------------------------------------------------

/// `JaccardSimilarity`: similarity of the endpoint category sets. Positions
/// unobserved on either side are ignored; two effectively empty sets count
/// as identical.
pub(crate) fn change_jaccard_similarity(
    _g: &Graph,
    attrs: &Attributes,
    attr: usize,
    i: NodeId,
    j: NodeId,
    _exponent: f64,
    _is_delete: bool,
) -> f64 {
    if i == j {
        return 0.0;
    }
    let (si, sj) = (attrs.set(attr, i), attrs.set(attr, j));
    let mut intersection = 0usize;
    let mut union = 0usize;
    for (a, b) in si.iter().zip(sj.iter()) {
        if *a == SetMember::Na || *b == SetMember::Na {
            continue;
        }
        let (pa, pb) = (*a == SetMember::Present, *b == SetMember::Present);
        if pa || pb {
            union += 1;
        }
        if pa && pb {
            intersection += 1;
        }
    }
    if union == 0 {
        1.0
    } else {
        to_f64(intersection) / to_f64(union)
    }
}

// --- attribute interactions ------------------------------------------------

/// `MatchingInteraction`: ties matching on two categorical attributes at
/// once.
pub(crate) fn change_matching_interaction(
    _g: &Graph,
    attrs: &Attributes,
    attr_a: usize,
    attr_b: usize,
    i: NodeId,
    j: NodeId,
) -> f64 {
    if i == j {
        return 0.0;
    }
    indicator(matching(attrs, attr_a, i, j) && matching(attrs, attr_b, i, j))
}

/// `BinaryPairInteraction`: bipartite ties whose mode-A endpoint is positive
/// on the first binary attribute and whose mode-B endpoint is positive on
/// the second.
pub(crate) fn change_binary_pair_interaction(
    g: &Graph,
    attrs: &Attributes,
    attr_a: usize,
    attr_b: usize,
    i: NodeId,
    j: NodeId,
) -> f64 {
    let (a, b) = ab(g, i, j);
    indicator(bin(attrs, attr_a, a) && bin(attrs, attr_b, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Column;
    use crate::graph::TwoPathCacheKind;

    fn continuous_fixture() -> (Graph, Attributes) {
        let g = Graph::directed(2, TwoPathCacheKind::Dense, false);
        let mut attrs = Attributes::empty();
        attrs.push_continuous(Column::new("wealth", vec![1.0, f64::NAN]));
        (g, attrs)
    }

    #[test]
    fn nan_zeroes_pairwise_continuous_terms() {
        let (g, attrs) = continuous_fixture();
        assert_eq!(change_diff(&g, &attrs, 0, 0, 1, 0.0, false), 0.0);
        assert_eq!(change_diff(&g, &attrs, 0, 1, 0, 0.0, false), 0.0);
        assert_eq!(change_sum(&g, &attrs, 0, 0, 1, 0.0, false), 0.0);
        assert!((change_continuous_sender(&g, &attrs, 0, 0, 1, 0.0, false) - 1.0).abs() < 1e-12);
        assert_eq!(change_continuous_sender(&g, &attrs, 0, 1, 0, 0.0, false), 0.0);
    }

    #[test]
    fn matching_ignores_missing_categories() {
        let g = Graph::directed(3, TwoPathCacheKind::Dense, false);
        let mut attrs = Attributes::empty();
        attrs.push_categorical(Column::new("class", vec![Some(1), Some(1), None]));
        assert!((change_matching(&g, &attrs, 0, 0, 1, 0.0, false) - 1.0).abs() < 1e-12);
        assert_eq!(change_matching(&g, &attrs, 0, 0, 2, 0.0, false), 0.0);
        assert_eq!(change_mismatching(&g, &attrs, 0, 0, 2, 0.0, false), 0.0);
    }

    #[test]
    fn jaccard_follows_the_empty_set_convention() {
        let g = Graph::undirected(2, TwoPathCacheKind::Dense);
        let mut attrs = Attributes::empty();
        attrs.push_set(Column::new(
            "interests",
            vec![
                vec![SetMember::Present, SetMember::Absent, SetMember::Na],
                vec![SetMember::Present, SetMember::Present, SetMember::Present],
            ],
        ));
        // position 2 is NA on one side and ignored: intersection 1, union 2
        assert!((change_jaccard_similarity(&g, &attrs, 0, 0, 1, 0.0, false) - 0.5).abs() < 1e-12);

        let mut empty = Attributes::empty();
        empty.push_set(Column::new(
            "interests",
            vec![
                vec![SetMember::Absent, SetMember::Na],
                vec![SetMember::Absent, SetMember::Present],
            ],
        ));
        assert!((change_jaccard_similarity(&g, &empty, 0, 0, 1, 0.0, false) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn transitive_ties_count_first_support_only() {
        let mut g = Graph::directed(4, TwoPathCacheKind::Dense, false);
        let mut attrs = Attributes::empty();
        attrs.push_categorical(Column::new(
            "class",
            vec![Some(0), Some(1), Some(2), Some(3)],
        ));
        // 0 -> 1 and 0 -> 2 exist; adding 1 -> 2 gives arc 0 -> 2 its first
        // support (0 -> 1 -> 2) and is itself unsupported.
        g.insert_updating_list(0, 1);
        g.insert_updating_list(0, 2);
        let delta = change_mismatching_transitive_ties(&g, &attrs, 0, 1, 2, 0.0, false);
        assert!((delta - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nodematch_alpha_counts_matching_neighbours() {
        let mut g = Graph::bipartite(3, 1, TwoPathCacheKind::Dense).expect("two modes");
        let mut attrs = Attributes::empty();
        attrs.push_categorical(Column::new("field", vec![Some(7), Some(7), Some(9), None]));
        g.insert_updating_list(0, 3);
        // hub 3 already has one neighbour matching node 1's category
        let delta = change_nodematch_alpha_a(&g, &attrs, 0, 1, 3, 0.5, false);
        assert!((delta - (2f64.sqrt() - 1.0)).abs() < 1e-12);
        // a category nobody shares gains pow0(1, 0.5) = 1
        let fresh = change_nodematch_alpha_a(&g, &attrs, 0, 2, 3, 0.5, false);
        assert!((fresh - 1.0).abs() < 1e-12);
    }
}

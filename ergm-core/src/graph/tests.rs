//! Unit tests for the graph store and its derived structure.

use rstest::rstest;

use super::{Graph, GraphError, Tie, TwoPathCacheKind};

fn brute_force_mixed(g: &Graph, i: usize, j: usize) -> u32 {
    let mut count = 0;
    for v in 0..g.node_count() {
        if v != i && v != j && g.is_tie(i, v) && g.is_tie(v, j) {
            count += 1;
        }
    }
    count
}

fn brute_force_shared_in(g: &Graph, i: usize, j: usize) -> u32 {
    let mut count = 0;
    for v in 0..g.node_count() {
        if v != i && v != j && g.is_tie(v, i) && g.is_tie(v, j) {
            count += 1;
        }
    }
    count
}

fn brute_force_shared_out(g: &Graph, i: usize, j: usize) -> u32 {
    let mut count = 0;
    for v in 0..g.node_count() {
        if v != i && v != j && g.is_tie(i, v) && g.is_tie(j, v) {
            count += 1;
        }
    }
    count
}

#[rstest]
#[case(TwoPathCacheKind::Dense)]
#[case(TwoPathCacheKind::Sparse)]
#[case(TwoPathCacheKind::None)]
fn directed_two_path_counts_match_brute_force(#[case] cache: TwoPathCacheKind) {
    let mut g = Graph::directed(6, cache, false);
    let arcs = [(0, 1), (1, 2), (0, 2), (2, 3), (3, 1), (4, 2), (1, 4), (5, 0)];
    for &(i, j) in &arcs {
        g.insert_updating_list(i, j);
    }
    g.remove_updating_list(2, 3);
    g.remove_updating_list(0, 1);
    g.insert_updating_list(0, 1);
    for i in 0..6 {
        for j in 0..6 {
            if i == j {
                continue;
            }
            assert_eq!(g.mixed_two_paths(i, j), brute_force_mixed(&g, i, j), "mixed {i}->{j}");
            assert_eq!(g.out_two_paths(i, j), brute_force_shared_in(&g, i, j), "out {i},{j}");
            assert_eq!(g.in_two_paths(i, j), brute_force_shared_out(&g, i, j), "in {i},{j}");
        }
    }
}

#[rstest]
#[case(TwoPathCacheKind::Dense)]
#[case(TwoPathCacheKind::Sparse)]
#[case(TwoPathCacheKind::None)]
fn undirected_two_path_counts_match_brute_force(#[case] cache: TwoPathCacheKind) {
    let mut g = Graph::undirected(5, cache);
    for &(i, j) in &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 0)] {
        g.insert_updating_list(i, j);
    }
    g.remove_updating_list(2, 0);
    for i in 0..5 {
        for j in 0..5 {
            if i == j {
                continue;
            }
            let mut expected = 0;
            for v in 0..5 {
                if v != i && v != j && g.is_tie(i, v) && g.is_tie(v, j) {
                    expected += 1;
                }
            }
            assert_eq!(g.two_paths(i, j), expected, "2p {i},{j}");
        }
    }
}

#[rstest]
#[case(TwoPathCacheKind::Dense)]
#[case(TwoPathCacheKind::Sparse)]
fn bipartite_two_path_counts_match_brute_force(#[case] cache: TwoPathCacheKind) {
    let mut g = Graph::bipartite(3, 3, cache).expect("two non-empty modes");
    for &(i, j) in &[(0, 3), (0, 4), (1, 3), (1, 5), (2, 4), (2, 5)] {
        g.insert_updating_list(i, j);
    }
    g.remove_updating_list(1, 3);
    for i in 0..3 {
        for j in 0..3 {
            if i == j {
                continue;
            }
            let mut expected = 0;
            for v in 3..6 {
                if g.is_tie(i, v) && g.is_tie(j, v) {
                    expected += 1;
                }
            }
            assert_eq!(g.two_paths_a(i, j), expected, "A2p {i},{j}");
        }
    }
    for i in 3..6 {
        for j in 3..6 {
            if i == j {
                continue;
            }
            let mut expected = 0;
            for v in 0..3 {
                if g.is_tie(v, i) && g.is_tie(v, j) {
                    expected += 1;
                }
            }
            assert_eq!(g.two_paths_b(i, j), expected, "B2p {i},{j}");
        }
    }
}

#[test]
fn flat_list_and_adjacency_stay_consistent() {
    let mut g = Graph::directed(4, TwoPathCacheKind::Sparse, false);
    g.insert_updating_list(0, 1);
    g.insert_updating_list(1, 2);
    g.insert_updating_list(2, 0);
    assert_eq!(g.tie_count(), 3);
    g.remove_updating_list(1, 2);
    assert_eq!(g.tie_count(), 2);
    assert!(!g.is_tie(1, 2));
    let listed: Vec<Tie> = g.ties().collect();
    assert_eq!(listed.len(), 2);
    for tie in listed {
        assert!(g.is_tie(tie.tail, tie.head));
    }
}

#[test]
fn remove_then_reinsert_restores_counts() {
    let mut g = Graph::directed(5, TwoPathCacheKind::Dense, false);
    for &(i, j) in &[(0, 1), (1, 2), (0, 2), (2, 3), (3, 4)] {
        g.insert_updating_list(i, j);
    }
    let before: Vec<u32> = (0..5)
        .flat_map(|i| (0..5).map(move |j| (i, j)))
        .filter(|&(i, j)| i != j)
        .map(|(i, j)| g.mixed_two_paths(i, j))
        .collect();
    g.remove(1, 2);
    g.insert(1, 2);
    let after: Vec<u32> = (0..5)
        .flat_map(|i| (0..5).map(move |j| (i, j)))
        .filter(|&(i, j)| i != j)
        .map(|(i, j)| g.mixed_two_paths(i, j))
        .collect();
    assert_eq!(before, after);
}

#[test]
#[should_panic(expected = "stays within one mode")]
fn bipartite_rejects_intra_mode_tie() {
    let mut g = Graph::bipartite(2, 2, TwoPathCacheKind::Sparse).expect("two non-empty modes");
    g.insert(0, 1);
}

#[test]
fn bipartite_rejects_empty_mode() {
    let err = Graph::bipartite(0, 4, TwoPathCacheKind::Sparse)
        .expect_err("mode A may not be empty");
    assert!(matches!(err, GraphError::BadBipartiteSplit { .. }));
}

#[test]
fn snowball_tracks_prev_wave_degrees() {
    let mut g = Graph::undirected(6, TwoPathCacheKind::Sparse);
    for &(i, j) in &[(0, 1), (1, 2), (1, 3), (3, 4), (2, 5)] {
        g.insert_updating_list(i, j);
    }
    // zones: 0 is the seed; 1,2 reached in wave 1; 3,5 in wave 2; 4 in wave 3
    g.attach_snowball(vec![0, 1, 1, 2, 3, 2]).expect("zones are consistent");
    let sb = g.snowball().expect("snowball attached");
    assert_eq!(sb.max_zone(), 3);
    assert_eq!(sb.prev_wave_degree(1), 1);
    assert_eq!(sb.prev_wave_degree(3), 1);
    assert_eq!(sb.prev_wave_degree(4), 1);
    assert_eq!(sb.prev_wave_degree(0), 0);
    assert_eq!(sb.inner_nodes(), &[0, 1, 2, 3, 5]);
    assert_eq!(sb.inner_ties().len(), 4);
}

#[test]
fn snowball_rejects_wave_spanning_tie() {
    let mut g = Graph::undirected(3, TwoPathCacheKind::Sparse);
    g.insert_updating_list(0, 2);
    let err = g
        .attach_snowball(vec![0, 1, 2])
        .expect_err("tie 0-2 spans two waves");
    assert!(matches!(err, GraphError::ZoneSpan { .. }));
}

#[test]
fn snowball_rejects_zone_gap() {
    let g_err = Graph::undirected(3, TwoPathCacheKind::Sparse)
        .attach_snowball(vec![0, 2, 2])
        .expect_err("zone 1 is empty");
    assert!(matches!(g_err, GraphError::ZoneGap { zone: 1, .. }));
}

#[test]
fn terms_track_latest_senders() {
    let mut g = Graph::directed(4, TwoPathCacheKind::Sparse, false);
    for &(i, j) in &[(0, 1), (2, 0), (3, 1), (3, 0)] {
        g.insert_updating_list(i, j);
    }
    g.attach_terms(vec![0, 0, 1, 1]).expect("term vector covers all nodes");
    let terms = g.terms().expect("terms attached");
    assert_eq!(terms.max_term(), 1);
    assert_eq!(terms.maxterm_nodes(), &[2, 3]);
    assert_eq!(terms.maxterm_ties().len(), 3);
    g.remove_updating_list(3, 1);
    assert_eq!(g.terms().expect("terms attached").maxterm_ties().len(), 2);
}

#[test]
fn loops_permitted_only_when_enabled() {
    let mut g = Graph::directed(3, TwoPathCacheKind::Sparse, true);
    g.insert_updating_list(1, 1);
    assert!(g.is_tie(1, 1));
    g.remove_updating_list(1, 1);
    assert!(!g.is_tie(1, 1));
}

#[test]
#[should_panic(expected = "is not permitted")]
fn loops_rejected_when_disabled() {
    let mut g = Graph::directed(3, TwoPathCacheKind::Sparse, false);
    g.insert(1, 1);
}

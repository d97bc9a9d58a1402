#![expect(clippy::expect_used, reason = "tests require contextual panics")]
//! Literal scenario tests for the change-statistic engine.

use ergm_core::{
    Attributes, Column, Graph, ModelRequests, NodalRequest, StructuralRequest, Tie,
    TwoPathCacheKind, build_model, calc_change_stats, replay_observed,
};

fn structural_requests(names: &[(&str, Option<f64>)]) -> ModelRequests {
    ModelRequests {
        structural: names
            .iter()
            .map(|&(name, lambda)| StructuralRequest {
                name: name.to_owned(),
                lambda,
                theta0: 0.0,
            })
            .collect(),
        ..ModelRequests::default()
    }
}

#[test]
fn adding_the_closing_arc_of_a_triangle() {
    let mut g = Graph::directed(3, TwoPathCacheKind::Dense, false);
    g.insert_updating_list(0, 1);
    g.insert_updating_list(1, 2);
    let requests = structural_requests(&[
        ("TransitiveTriad", None),
        ("AltKTrianglesT", Some(2.0)),
    ]);
    let model = build_model(&g, &Attributes::empty(), &requests).expect("statistics bind");
    let theta = vec![0.0; model.len()];
    let mut deltas = vec![0.0; model.len()];
    let _ = calc_change_stats(
        &g,
        &Attributes::empty(),
        &model,
        &theta,
        0,
        2,
        false,
        &mut deltas,
    );
    assert!((deltas[0] - 1.0).abs() < 1e-12, "transitive triad delta");
    // lambda = 2: 2 * (1 - (1/2)^1) = 1.0
    assert!((deltas[1] - 1.0).abs() < 1e-12, "alternating k-triangle delta");
}

#[test]
fn closing_a_mutual_dyad() {
    let mut g = Graph::directed(2, TwoPathCacheKind::Dense, false);
    g.insert_updating_list(0, 1);
    let requests = structural_requests(&[("Arc", None), ("Reciprocity", None)]);
    let model = build_model(&g, &Attributes::empty(), &requests).expect("statistics bind");
    let theta = vec![0.0; model.len()];
    let mut deltas = vec![0.0; model.len()];
    let _ = calc_change_stats(
        &g,
        &Attributes::empty(),
        &model,
        &theta,
        1,
        0,
        false,
        &mut deltas,
    );
    assert!((deltas[0] - 1.0).abs() < 1e-12);
    assert!((deltas[1] - 1.0).abs() < 1e-12);
}

#[test]
fn isolates_on_the_empty_five_node_graph() {
    let g = Graph::directed(5, TwoPathCacheKind::Dense, false);
    let requests = structural_requests(&[("Isolates", None)]);
    let model = build_model(&g, &Attributes::empty(), &requests).expect("statistics bind");
    assert_eq!(model.empty_graph_stats(&g), vec![5.0]);
    let theta = vec![0.0];
    let mut deltas = vec![0.0];
    let _ = calc_change_stats(
        &g,
        &Attributes::empty(),
        &model,
        &theta,
        0,
        1,
        false,
        &mut deltas,
    );
    assert!((deltas[0] - (-2.0)).abs() < 1e-12);
}

#[test]
fn bipartite_four_cycle_closure() {
    let mut g = Graph::bipartite(2, 2, TwoPathCacheKind::Dense).expect("two modes");
    for &(i, j) in &[(0, 2), (0, 3), (1, 2)] {
        g.insert_updating_list(i, j);
    }
    let requests = structural_requests(&[("FourCycles", None)]);
    let model = build_model(&g, &Attributes::empty(), &requests).expect("statistics bind");
    let theta = vec![0.0];
    let mut deltas = vec![0.0];
    let _ = calc_change_stats(
        &g,
        &Attributes::empty(),
        &model,
        &theta,
        1,
        3,
        false,
        &mut deltas,
    );
    assert!((deltas[0] - 1.0).abs() < 1e-12);
}

#[test]
fn continuous_difference_ignores_missing_values() {
    let g = Graph::directed(2, TwoPathCacheKind::Dense, false);
    let mut attrs = Attributes::empty();
    attrs.push_continuous(Column::new("wealth", vec![1.0, f64::NAN]));
    let requests = ModelRequests {
        nodal: vec![NodalRequest {
            name: "Diff".to_owned(),
            attr_name: "wealth".to_owned(),
            exponent: None,
            theta0: 0.0,
        }],
        ..ModelRequests::default()
    };
    let model = build_model(&g, &attrs, &requests).expect("statistics bind");
    let theta = vec![0.0];
    let mut deltas = vec![0.0];
    let _ = calc_change_stats(&g, &attrs, &model, &theta, 0, 1, false, &mut deltas);
    assert_eq!(deltas[0], 0.0);
    let _ = calc_change_stats(&g, &attrs, &model, &theta, 1, 0, false, &mut deltas);
    assert_eq!(deltas[0], 0.0);
}

#[test]
fn delete_direction_flips_the_log_ratio() {
    let mut g = Graph::directed(5, TwoPathCacheKind::Dense, false);
    for &(i, j) in &[(0, 1), (1, 2), (2, 0), (3, 0), (1, 3)] {
        g.insert_updating_list(i, j);
    }
    let requests = structural_requests(&[
        ("Arc", None),
        ("Reciprocity", None),
        ("TransitiveTriad", None),
        ("CyclicTriad", None),
        ("AltKTrianglesT", Some(2.0)),
        ("AltTwoPathsT", Some(2.0)),
        ("AltInStars", Some(2.0)),
        ("AltOutStars", Some(2.0)),
    ]);
    let model = build_model(&g, &Attributes::empty(), &requests).expect("statistics bind");
    let theta: Vec<f64> = (0..model.len()).map(|k| 0.1 * (k as f64 + 1.0)).collect();

    let mut add_deltas = vec![0.0; model.len()];
    let total_add = calc_change_stats(
        &g,
        &Attributes::empty(),
        &model,
        &theta,
        3,
        2,
        false,
        &mut add_deltas,
    );

    // Commit the add, then evaluate the delete of the same dyad: the caller
    // removes the tie first and flips the sign.
    g.insert_updating_list(3, 2);
    g.remove_updating_list(3, 2);
    let mut del_deltas = vec![0.0; model.len()];
    let total_del = calc_change_stats(
        &g,
        &Attributes::empty(),
        &model,
        &theta,
        3,
        2,
        true,
        &mut del_deltas,
    );

    assert!((total_add + total_del).abs() < 1e-12);
    for (a, d) in add_deltas.iter().zip(&del_deltas) {
        assert!((a - d).abs() < 1e-12, "add and delete deltas differ");
    }
}

#[test]
fn replayed_statistics_match_direct_counts() {
    // Build 0->1->2->0 plus 0->2: one transitive triad (0,1,2) and one
    // cyclic triad; replay from empty must see them through summed deltas.
    let mut g = Graph::directed(4, TwoPathCacheKind::Dense, false);
    let ties = [
        Tie::new(0, 1),
        Tie::new(1, 2),
        Tie::new(2, 0),
        Tie::new(0, 2),
    ];
    let requests = structural_requests(&[
        ("Arc", None),
        ("TransitiveTriad", None),
        ("CyclicTriad", None),
        ("Isolates", None),
    ]);
    let model = build_model(&g, &Attributes::empty(), &requests).expect("statistics bind");
    let observed = replay_observed(&mut g, &Attributes::empty(), &model, &ties);
    assert_eq!(observed[0], 4.0, "arcs");
    assert_eq!(observed[1], 1.0, "transitive triads");
    assert_eq!(observed[2], 1.0, "cyclic triads");
    assert_eq!(observed[3], 1.0, "node 3 stays isolated");
}

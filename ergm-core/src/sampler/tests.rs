//! Unit tests for the sampler kernels.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rstest::rstest;

use crate::attributes::Attributes;
use crate::graph::{Graph, TwoPathCacheKind};
use crate::registry::{ModelRequests, StructuralRequest, build_model};
use crate::sampler::{
    Conditionality, SamplerError, SamplerKind, SamplerOptions, SamplerState, run_batch,
};

fn arc_reciprocity_model(g: &Graph) -> crate::stats::Model {
    let requests = ModelRequests {
        structural: vec![
            StructuralRequest {
                name: "Arc".to_owned(),
                lambda: None,
                theta0: 0.0,
            },
            StructuralRequest {
                name: "Reciprocity".to_owned(),
                lambda: None,
                theta0: 0.0,
            },
        ],
        ..ModelRequests::default()
    };
    build_model(g, &Attributes::empty(), &requests).expect("directed statistics bind")
}

fn erdos_renyi(n: usize, arcs: usize, seed: u64) -> Graph {
    use rand::Rng;
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = Graph::directed(n, TwoPathCacheKind::Sparse, false);
    while g.tie_count() < arcs {
        let i = rng.gen_range(0..n);
        let j = rng.gen_range(0..n);
        if i != j && !g.is_tie(i, j) {
            g.insert_updating_list(i, j);
        }
    }
    g
}

#[rstest]
#[case(SamplerKind::Basic)]
#[case(SamplerKind::Tnt)]
fn flat_free_chains_keep_graph_consistent(#[case] kind: SamplerKind) {
    let mut g = erdos_renyi(12, 25, 7);
    let model = arc_reciprocity_model(&g);
    let theta = model.theta0();
    let opts = SamplerOptions {
        kind,
        ..SamplerOptions::default()
    };
    let mut state = SamplerState::new(&g, &opts, None).expect("options are compatible");
    let mut rng = SmallRng::seed_from_u64(99);
    let mut add = vec![0.0; model.len()];
    let mut del = vec![0.0; model.len()];
    let result = run_batch(
        &mut g,
        &Attributes::empty(),
        &model,
        &theta,
        &opts,
        &mut state,
        2000,
        &mut rng,
        &mut add,
        &mut del,
    );
    assert!(result.acceptance_rate > 0.0);
    // flat list and adjacency agree after the batch
    assert_eq!(g.ties().count(), g.tie_count());
    for tie in g.ties().collect::<Vec<_>>() {
        assert!(g.is_tie(tie.tail, tie.head));
    }
    // the Arc accumulator counts accepted moves exactly
    let arc_adds = add[0];
    let arc_dels = del[0];
    assert!(arc_adds >= 0.0 && arc_dels >= 0.0);
    let expected = 25.0 + arc_adds - arc_dels;
    assert!((g.tie_count() as f64 - expected).abs() < 1e-9);
}

#[test]
fn basic_sampler_accepts_everything_at_zero_theta() {
    let mut g = erdos_renyi(10, 15, 3);
    let model = arc_reciprocity_model(&g);
    let theta = vec![0.0; model.len()];
    let opts = SamplerOptions::default();
    let mut state = SamplerState::new(&g, &opts, None).expect("options are compatible");
    let mut rng = SmallRng::seed_from_u64(5);
    let mut add = vec![0.0; model.len()];
    let mut del = vec![0.0; model.len()];
    let result = run_batch(
        &mut g,
        &Attributes::empty(),
        &model,
        &theta,
        &opts,
        &mut state,
        500,
        &mut rng,
        &mut add,
        &mut del,
    );
    assert!((result.acceptance_rate - 1.0).abs() < 1e-12);
}

#[test]
fn ifd_holds_the_tie_count_and_starts_at_the_arc_correction() {
    let mut g = erdos_renyi(10, 20, 11);
    let model = arc_reciprocity_model(&g);
    let theta = vec![0.0; model.len()];
    let opts = SamplerOptions {
        kind: SamplerKind::Ifd,
        ..SamplerOptions::default()
    };
    let mut state = SamplerState::new(&g, &opts, Some(0.0)).expect("model carries Arc");
    // V starts at theta_Arc + ln((D - A) / (A + 1)) = ln(70 / 21)
    assert!((state.ifd_v() - (70.0f64 / 21.0).ln()).abs() < 1e-12);

    let mut rng = SmallRng::seed_from_u64(17);
    let mut ratios = Vec::new();
    for _ in 0..60 {
        let mut add = vec![0.0; model.len()];
        let mut del = vec![0.0; model.len()];
        let result = run_batch(
            &mut g,
            &Attributes::empty(),
            &model,
            &theta,
            &opts,
            &mut state,
            1000,
            &mut rng,
            &mut add,
            &mut del,
        );
        ratios.push(result.dz_arc.abs() / 1000.0);
        // strict alternation keeps the density within one tie of the start
        assert!((g.tie_count() as i64 - 20).abs() <= 1);
    }
    let tail_ratio = ratios[ratios.len() - 5..].iter().sum::<f64>() / 5.0;
    assert!(
        tail_ratio < 0.5,
        "IFD did not balance adds and deletes: {tail_ratio}"
    );
}

#[test]
fn tnt_on_sparse_graphs_moves_and_balances() {
    let mut g = erdos_renyi(12, 20, 23);
    let model = arc_reciprocity_model(&g);
    let theta = vec![0.0; model.len()];
    let opts = SamplerOptions {
        kind: SamplerKind::Tnt,
        ..SamplerOptions::default()
    };
    let mut state = SamplerState::new(&g, &opts, None).expect("options are compatible");
    let mut rng = SmallRng::seed_from_u64(31);
    let mut add = vec![0.0; model.len()];
    let mut del = vec![0.0; model.len()];
    let _ = run_batch(
        &mut g,
        &Attributes::empty(),
        &model,
        &theta,
        &opts,
        &mut state,
        5000,
        &mut rng,
        &mut add,
        &mut del,
    );
    // accepted toggles balance closely enough that the graph neither empties
    // nor saturates
    assert!(g.tie_count() > 0);
    assert!((g.tie_count() as f64) < state.admissible_dyads());
}

#[test]
fn forbid_reciprocity_never_creates_mutual_dyads() {
    let mut g = Graph::directed(8, TwoPathCacheKind::Sparse, false);
    let model = arc_reciprocity_model(&g);
    let theta = vec![0.5, 0.0];
    let opts = SamplerOptions {
        kind: SamplerKind::Basic,
        forbid_reciprocity: true,
        ..SamplerOptions::default()
    };
    let mut state = SamplerState::new(&g, &opts, None).expect("options are compatible");
    let mut rng = SmallRng::seed_from_u64(41);
    let mut add = vec![0.0; model.len()];
    let mut del = vec![0.0; model.len()];
    let _ = run_batch(
        &mut g,
        &Attributes::empty(),
        &model,
        &theta,
        &opts,
        &mut state,
        3000,
        &mut rng,
        &mut add,
        &mut del,
    );
    for tie in g.ties().collect::<Vec<_>>() {
        assert!(!g.is_tie(tie.head, tie.tail), "mutual dyad slipped through");
    }
}

#[test]
fn snowball_restriction_only_touches_inner_waves() {
    let mut g = Graph::directed(8, TwoPathCacheKind::Sparse, false);
    for &(i, j) in &[(0, 1), (1, 2), (2, 3), (0, 4), (4, 5), (1, 5), (5, 6), (2, 7)] {
        g.insert_updating_list(i, j);
    }
    g.attach_snowball(vec![0, 0, 1, 2, 1, 1, 2, 2])
        .expect("zones are consistent");
    let frozen: Vec<_> = g
        .ties()
        .filter(|t| {
            let sb = g.snowball().expect("snowball attached");
            !sb.both_inner(t.tail, t.head)
        })
        .collect();
    let model = arc_reciprocity_model(&g);
    let theta = vec![0.0, 0.0];
    let opts = SamplerOptions {
        kind: SamplerKind::Basic,
        conditional: Conditionality::Snowball,
        ..SamplerOptions::default()
    };
    let mut state = SamplerState::new(&g, &opts, None).expect("zones attached");
    let mut rng = SmallRng::seed_from_u64(53);
    let mut add = vec![0.0; model.len()];
    let mut del = vec![0.0; model.len()];
    let _ = run_batch(
        &mut g,
        &Attributes::empty(),
        &model,
        &theta,
        &opts,
        &mut state,
        2000,
        &mut rng,
        &mut add,
        &mut del,
    );
    // outermost-wave ties are fixed data
    for tie in frozen {
        assert!(g.is_tie(tie.tail, tie.head), "frozen tie was toggled");
    }
    // zone-span restriction held throughout
    let sb = g.snowball().expect("snowball attached");
    for tie in g.ties().collect::<Vec<_>>() {
        assert!(sb.zone(tie.tail).abs_diff(sb.zone(tie.head)) <= 1);
    }
}

#[test]
fn incompatible_option_combinations_are_rejected() {
    let g = Graph::directed(5, TwoPathCacheKind::Sparse, true);
    let opts = SamplerOptions {
        conditional: Conditionality::Snowball,
        ..SamplerOptions::default()
    };
    let err = SamplerState::new(&g, &opts, None).expect_err("loops exclude conditioning");
    assert!(matches!(err, SamplerError::IncompatibleOptions { .. }));

    let undirected = Graph::undirected(5, TwoPathCacheKind::Sparse);
    let opts = SamplerOptions {
        forbid_reciprocity: true,
        ..SamplerOptions::default()
    };
    let err = SamplerState::new(&undirected, &opts, None)
        .expect_err("reciprocity needs direction");
    assert!(matches!(err, SamplerError::IncompatibleOptions { .. }));

    let opts = SamplerOptions {
        conditional: Conditionality::Citation,
        ..SamplerOptions::default()
    };
    let err = SamplerState::new(&undirected, &opts, None).expect_err("citation needs direction");
    assert!(matches!(err, SamplerError::IncompatibleOptions { .. }));
}

#[test]
fn ifd_requires_the_density_parameter() {
    let g = erdos_renyi(6, 5, 2);
    let opts = SamplerOptions {
        kind: SamplerKind::Ifd,
        ..SamplerOptions::default()
    };
    let err = SamplerState::new(&g, &opts, None).expect_err("no density coefficient supplied");
    assert!(matches!(err, SamplerError::IfdWithoutDensity));
}

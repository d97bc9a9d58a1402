//! Simulation of graphs from a fixed coefficient vector.
//!
//! The simulator burns the chain in, then records one statistics row every
//! `interval` proposals. The initial state depends on the sampler: the
//! basic and TNT kernels start from the empty graph, the IFD kernel from an
//! Erdős–Rényi draw with the requested tie count (its alternation then
//! holds that density), and citation-ERGM runs keep the loaded graph with
//! the latest-term senders' arcs stripped and resimulated.

use std::io::Write;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::attributes::Attributes;
use crate::graph::Graph;
use crate::sampler::{
    Conditionality, SamplerError, SamplerKind, SamplerOptions, SamplerState, run_batch,
};
use crate::stats::Model;

/// Tunables of one simulation run.
#[derive(Clone, Copy, Debug)]
pub struct SimulationSettings {
    /// Proposals before the first recorded sample.
    pub burnin: u64,
    /// Number of recorded samples.
    pub sample_size: u64,
    /// Proposals between recorded samples.
    pub interval: u64,
    /// Tie count of the Erdős–Rényi start state (IFD only).
    pub num_arcs: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            burnin: 100_000,
            sample_size: 100,
            interval: 10_000,
            num_arcs: 0,
        }
    }
}

/// Errors raised while simulating.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The sampler configuration cannot drive this graph.
    #[error(transparent)]
    Sampler(#[from] SamplerError),
    /// The Erdős–Rényi start state asks for more ties than dyads exist.
    #[error("cannot place {requested} ties among {dyads} admissible dyads")]
    TooManyTies {
        /// Requested tie count.
        requested: usize,
        /// Admissible dyad count.
        dyads: usize,
    },
    /// Writing an output row failed.
    #[error("failed to write simulation output: {0}")]
    Io(#[from] std::io::Error),
}

/// A recorded sample handed to the caller, e.g. to persist the network.
#[derive(Clone, Copy, Debug)]
pub struct SampleInfo {
    /// Index of the sample, starting at zero.
    pub index: u64,
    /// Total proposals made when the sample was taken.
    pub iteration: u64,
    /// Acceptance rate of the preceding batch.
    pub acceptance_rate: f64,
}

/// Fills `g` with an Erdős–Rényi draw of exactly `num_arcs` ties.
///
/// # Errors
/// Returns [`SimulationError::TooManyTies`] when the request exceeds the
/// admissible dyad count.
pub fn erdos_renyi_fill<R: Rng>(
    g: &mut Graph,
    num_arcs: usize,
    rng: &mut R,
) -> Result<(), SimulationError> {
    let n = g.node_count();
    let dyads = match g.mode() {
        crate::graph::GraphMode::Directed { .. } => n * (n - 1),
        crate::graph::GraphMode::Undirected => n * (n - 1) / 2,
        crate::graph::GraphMode::Bipartite { .. } => g.mode_a_count() * g.mode_b_count(),
    };
    if num_arcs > dyads {
        return Err(SimulationError::TooManyTies {
            requested: num_arcs,
            dyads,
        });
    }
    while g.tie_count() < num_arcs {
        let (i, j) = match g.mode() {
            crate::graph::GraphMode::Bipartite { mode_a } => {
                (rng.gen_range(0..mode_a), rng.gen_range(mode_a..n))
            }
            _ => (rng.gen_range(0..n), rng.gen_range(0..n)),
        };
        if i != j && !g.is_tie(i, j) {
            g.insert_updating_list(i, j);
        }
    }
    Ok(())
}

/// Strips every latest-term sender's arc from a loaded citation graph,
/// returning the removed count; simulation then resimulates exactly that
/// free part of the graph.
pub fn strip_maxterm_ties(g: &mut Graph) -> usize {
    let free: Vec<_> = g
        .terms()
        .map(|t| t.maxterm_ties().to_vec())
        .unwrap_or_default();
    for tie in &free {
        g.remove_updating_list(tie.tail, tie.head);
    }
    free.len()
}

/// Runs burn-in plus the sampling loop, writing one statistics row per
/// sample and invoking `on_sample` after each row (for optional network
/// persistence).
///
/// The statistics row layout matches the estimation outputs:
/// `iteration z_1 .. z_P acceptance_rate`, after a header row of parameter
/// names. `initial_stats` must hold the statistics of `g`'s starting state.
///
/// # Errors
/// Returns [`SimulationError`] when the sampler options are incompatible
/// with the graph or output writing fails.
#[expect(clippy::too_many_arguments, reason = "the simulation contract names each input")]
pub fn simulate<R: Rng, W: Write, F>(
    g: &mut Graph,
    attrs: &Attributes,
    model: &Model,
    theta: &[f64],
    opts: &SamplerOptions,
    settings: &SimulationSettings,
    initial_stats: &[f64],
    rng: &mut R,
    stats_out: &mut W,
    mut on_sample: F,
) -> Result<(), SimulationError>
where
    F: FnMut(&Graph, SampleInfo) -> Result<(), SimulationError>,
{
    let p = model.len();
    let density_theta = model.density_index().map(|k| theta[k]);
    let mut state = SamplerState::new(g, opts, density_theta)?;
    let mut z: Vec<f64> = initial_stats.to_vec();
    let mut iteration = 0u64;

    write!(stats_out, "t")?;
    for label in model.labels() {
        write!(stats_out, " {label}")?;
    }
    writeln!(stats_out, " AcceptanceRate")?;

    info!(
        burnin = settings.burnin,
        samples = settings.sample_size,
        interval = settings.interval,
        "starting simulation"
    );

    let mut add = vec![0.0; p];
    let mut del = vec![0.0; p];
    if settings.burnin > 0 {
        let result = run_batch(
            g, attrs, model, theta, opts, &mut state, settings.burnin, rng, &mut add, &mut del,
        );
        iteration += settings.burnin;
        for k in 0..p {
            z[k] += add[k] - del[k];
        }
        debug!(acceptance = result.acceptance_rate, "burn-in finished");
    }

    for index in 0..settings.sample_size {
        add.iter_mut().for_each(|v| *v = 0.0);
        del.iter_mut().for_each(|v| *v = 0.0);
        let result = run_batch(
            g, attrs, model, theta, opts, &mut state, settings.interval, rng, &mut add, &mut del,
        );
        iteration += settings.interval;
        for k in 0..p {
            z[k] += add[k] - del[k];
        }
        write!(stats_out, "{iteration}")?;
        for value in &z {
            write!(stats_out, " {value}")?;
        }
        writeln!(stats_out, " {}", result.acceptance_rate)?;
        on_sample(
            g,
            SampleInfo {
                index,
                iteration,
                acceptance_rate: result.acceptance_rate,
            },
        )?;
    }
    Ok(())
}

/// Builds the simulation start state for the configured sampler and returns
/// its statistics vector.
///
/// # Errors
/// Returns [`SimulationError::TooManyTies`] when the IFD start state cannot
/// be placed.
pub fn initial_state<R: Rng>(
    g: &mut Graph,
    attrs: &Attributes,
    model: &Model,
    opts: &SamplerOptions,
    settings: &SimulationSettings,
    rng: &mut R,
) -> Result<Vec<f64>, SimulationError> {
    if opts.conditional == Conditionality::Citation {
        // The older-term part of the loaded graph stays fixed.
        let stripped = strip_maxterm_ties(g);
        debug!(stripped, "stripped latest-term ties for resimulation");
    } else if opts.kind == SamplerKind::Ifd {
        erdos_renyi_fill(g, settings.num_arcs, rng)?;
    }
    let mut stats = model.empty_graph_stats(g);
    let ties: Vec<_> = g.ties().collect();
    let mut replay = g.clone_empty();
    let mut scratch = vec![0.0; model.len()];
    let theta_zero = vec![0.0; model.len()];
    for tie in ties {
        let _ = crate::stats::calc_change_stats(
            &replay,
            attrs,
            model,
            &theta_zero,
            tie.tail,
            tie.head,
            false,
            &mut scratch,
        );
        for (acc, delta) in stats.iter_mut().zip(&scratch) {
            *acc += delta;
        }
        replay.insert_updating_list(tie.tail, tie.head);
    }
    Ok(stats)
}

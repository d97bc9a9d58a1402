//! Equilibrium-expectation estimation of the model coefficients.
//!
//! Estimation runs two stochastic-approximation phases over the coefficient
//! vector theta. Algorithm S takes large, dzA-scaled steps to reach the
//! basin of attraction cheaply; algorithm EE then takes small steps whose
//! size couples to the coefficient magnitude, either through the quadratic
//! rule or the Borisenko sign update. Both phases drive the same sampler
//! chain, which starts positioned at the observed graph, and track `dzA`,
//! the running difference between the chain's statistics and the observed
//! ones. At the estimate the chain is in equilibrium and `dzA` hovers
//! around zero.

use std::io::Write;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::attributes::Attributes;
use crate::graph::{Graph, Tie};
use crate::sampler::{
    BatchResult, SamplerError, SamplerKind, SamplerOptions, SamplerState, run_batch,
};
use crate::stats::{Model, calc_change_stats};

/// Tunables of the two estimation phases.
#[derive(Clone, Copy, Debug)]
pub struct EstimationSettings {
    /// Algorithm S step multiplier.
    pub aca_s: f64,
    /// Algorithm EE step multiplier.
    pub aca_ee: f64,
    /// Coefficient-of-variation bound for the per-parameter variance guard.
    pub comp_c: f64,
    /// Proposals per sampler batch.
    pub sampler_steps: u64,
    /// Algorithm S outer iterations.
    pub s_steps: u64,
    /// Algorithm EE outer iterations.
    pub ee_steps: u64,
    /// Algorithm EE inner iterations per outer step.
    pub ee_inner_steps: u64,
    /// Record every inner step instead of one row per outer step.
    pub output_all_steps: bool,
    /// Use the Borisenko sign update instead of the quadratic rule.
    pub use_borisenko: bool,
    /// Borisenko learning rate.
    pub learning_rate: f64,
    /// Coefficient-magnitude floor used by the step rules.
    pub min_theta: f64,
}

impl Default for EstimationSettings {
    fn default() -> Self {
        Self {
            aca_s: 0.1,
            aca_ee: 1e-9,
            comp_c: 1e-2,
            sampler_steps: 1000,
            s_steps: 100,
            ee_steps: 500,
            ee_inner_steps: 100,
            output_all_steps: false,
            use_borisenko: false,
            learning_rate: 0.001,
            min_theta: 0.01,
        }
    }
}

/// Errors raised while estimating.
#[derive(Debug, Error)]
pub enum EstimationError {
    /// The sampler configuration cannot drive this graph.
    #[error(transparent)]
    Sampler(#[from] SamplerError),
    /// Writing an output row failed.
    #[error("failed to write estimation output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of one estimation run.
#[derive(Clone, Debug)]
pub struct EstimationOutcome {
    /// Final coefficient vector.
    pub theta: Vec<f64>,
    /// Observed sufficient statistics of the loaded graph.
    pub observed_stats: Vec<f64>,
    /// Final `dzA` vector.
    pub dz_a: Vec<f64>,
    /// Acceptance rate of the last sampler batch.
    pub acceptance_rate: f64,
}

/// Replays the observed ties into the empty graph `g`, accumulating the
/// change statistics of every insertion. Returns the observed sufficient
/// statistics; on return `g` holds the observed graph, positioning the
/// chain at its equilibrium-expectation start state.
pub fn replay_observed(
    g: &mut Graph,
    attrs: &Attributes,
    model: &Model,
    ties: &[Tie],
) -> Vec<f64> {
    let mut observed = model.empty_graph_stats(g);
    let mut scratch = vec![0.0; model.len()];
    let theta_zero = vec![0.0; model.len()];
    for tie in ties {
        if g.is_tie(tie.tail, tie.head) {
            warn!(tail = tie.tail, head = tie.head, "duplicate tie in input ignored");
            continue;
        }
        let _ = calc_change_stats(
            g,
            attrs,
            model,
            &theta_zero,
            tie.tail,
            tie.head,
            false,
            &mut scratch,
        );
        for (acc, delta) in observed.iter_mut().zip(&scratch) {
            *acc += delta;
        }
        g.insert_updating_list(tie.tail, tie.head);
    }
    observed
}

/// Per-parameter running moments for the variance guard, reset at each
/// outer EE step.
struct VarianceGuard {
    count: u64,
    mean: Vec<f64>,
    m2: Vec<f64>,
}

impl VarianceGuard {
    fn new(p: usize) -> Self {
        Self {
            count: 0,
            mean: vec![0.0; p],
            m2: vec![0.0; p],
        }
    }

    fn reset(&mut self) {
        self.count = 0;
        self.mean.iter_mut().for_each(|m| *m = 0.0);
        self.m2.iter_mut().for_each(|m| *m = 0.0);
    }

    fn observe(&mut self, theta: &[f64]) {
        self.count += 1;
        for (k, &value) in theta.iter().enumerate() {
            let delta = value - self.mean[k];
            self.mean[k] += delta / self.count as f64;
            self.m2[k] += delta * (value - self.mean[k]);
        }
    }

    /// Pulls runaway coefficients back towards their recent mean when the
    /// coefficient of variation exceeds `comp_c`.
    fn clamp(&self, theta: &mut [f64], comp_c: f64) {
        if self.count < 10 {
            return;
        }
        for (k, value) in theta.iter_mut().enumerate() {
            let mean = self.mean[k];
            if mean.abs() < 1e-12 {
                continue;
            }
            let sd = (self.m2[k] / (self.count as f64 - 1.0)).sqrt();
            if sd / mean.abs() > comp_c {
                let bound = comp_c * mean.abs();
                let deviation = *value - mean;
                if deviation.abs() > bound {
                    *value = mean + deviation.signum() * bound;
                }
            }
        }
    }
}

struct Chain<'a> {
    g: &'a mut Graph,
    attrs: &'a Attributes,
    model: &'a Model,
    opts: &'a SamplerOptions,
    state: SamplerState,
    dz_a: Vec<f64>,
    proposals_done: u64,
    last: BatchResult,
    density_index: Option<usize>,
}

impl Chain<'_> {
    fn advance<R: Rng>(&mut self, theta: &[f64], steps: u64, rng: &mut R) {
        let p = self.model.len();
        let mut add = vec![0.0; p];
        let mut del = vec![0.0; p];
        self.last = run_batch(
            self.g,
            self.attrs,
            self.model,
            theta,
            self.opts,
            &mut self.state,
            steps,
            rng,
            &mut add,
            &mut del,
        );
        self.proposals_done += steps;
        let ifd = self.opts.kind == SamplerKind::Ifd;
        for k in 0..p {
            if ifd && Some(k) == self.density_index {
                self.dz_a[k] += self.last.dz_arc;
            } else {
                self.dz_a[k] += add[k] - del[k];
            }
        }
    }

    /// Whether coefficient `k` is pinned rather than estimated.
    fn is_pinned(&self, k: usize) -> bool {
        self.opts.kind == SamplerKind::Ifd && Some(k) == self.density_index
    }
}

fn write_header<W: Write>(out: &mut W, model: &Model) -> std::io::Result<()> {
    write!(out, "t")?;
    for label in model.labels() {
        write!(out, " {label}")?;
    }
    writeln!(out, " AcceptanceRate")
}

fn write_row<W: Write>(
    out: &mut W,
    iteration: u64,
    values: &[f64],
    acceptance: f64,
) -> std::io::Result<()> {
    write!(out, "{iteration}")?;
    for value in values {
        write!(out, " {value}")?;
    }
    writeln!(out, " {acceptance}")
}

/// Runs algorithm S followed by algorithm EE on a graph already positioned
/// at the observed network.
///
/// `theta_out` and `dza_out` receive one header row each, then one data row
/// per recorded step (`t theta_1 .. theta_P acceptance_rate` and the same
/// for `dzA`).
///
/// # Errors
/// Returns [`EstimationError`] when the sampler options are incompatible
/// with the graph or an output row cannot be written.
#[expect(clippy::too_many_arguments, reason = "the estimation contract names each input")]
pub fn estimate<R: Rng, W1: Write, W2: Write>(
    g: &mut Graph,
    attrs: &Attributes,
    model: &Model,
    opts: &SamplerOptions,
    settings: &EstimationSettings,
    observed_stats: &[f64],
    rng: &mut R,
    theta_out: &mut W1,
    dza_out: &mut W2,
) -> Result<EstimationOutcome, EstimationError> {
    let p = model.len();
    let mut theta = model.theta0();
    let density_index = model.density_index();
    let theta_density = density_index.map(|k| theta[k]);
    let state = SamplerState::new(g, opts, theta_density)?;

    let mut chain = Chain {
        g,
        attrs,
        model,
        opts,
        state,
        dz_a: vec![0.0; p],
        proposals_done: 0,
        last: BatchResult::default(),
        density_index,
    };

    write_header(theta_out, model)?;
    write_header(dza_out, model)?;

    info!(
        params = p,
        s_steps = settings.s_steps,
        ee_steps = settings.ee_steps,
        "starting equilibrium-expectation estimation"
    );

    // Algorithm S: large steps scaled by the magnitude of dzA.
    for _ in 0..settings.s_steps {
        chain.advance(&theta, settings.sampler_steps, rng);
        for k in 0..p {
            if chain.is_pinned(k) {
                continue;
            }
            theta[k] -= settings.aca_s * chain.dz_a[k] * chain.dz_a[k].abs();
        }
        write_row(theta_out, chain.proposals_done, &theta, chain.last.acceptance_rate)?;
        write_row(dza_out, chain.proposals_done, &chain.dz_a, chain.last.acceptance_rate)?;
    }

    // Algorithm EE: small steps coupled to the coefficient magnitude.
    let mut guard = VarianceGuard::new(p);
    for outer in 0..settings.ee_steps {
        guard.reset();
        for _ in 0..settings.ee_inner_steps {
            chain.advance(&theta, settings.sampler_steps, rng);
            for k in 0..p {
                if chain.is_pinned(k) {
                    continue;
                }
                if settings.use_borisenko {
                    let magnitude = theta[k].abs().max(settings.min_theta);
                    theta[k] -= settings.learning_rate * chain.dz_a[k].signum() * magnitude;
                } else {
                    let scale = theta[k] * theta[k];
                    let floored = scale.max(settings.min_theta * settings.min_theta);
                    theta[k] -= settings.aca_ee * floored * chain.dz_a[k];
                }
            }
            guard.observe(&theta);
            guard.clamp(&mut theta, settings.comp_c);
            if settings.output_all_steps {
                write_row(theta_out, chain.proposals_done, &theta, chain.last.acceptance_rate)?;
                write_row(dza_out, chain.proposals_done, &chain.dz_a, chain.last.acceptance_rate)?;
            }
        }
        if !settings.output_all_steps {
            write_row(theta_out, chain.proposals_done, &theta, chain.last.acceptance_rate)?;
            write_row(dza_out, chain.proposals_done, &chain.dz_a, chain.last.acceptance_rate)?;
        }
        if chain.opts.kind == SamplerKind::Ifd {
            debug!(
                outer,
                v = chain.state.ifd_v(),
                acceptance = chain.last.acceptance_rate,
                "EE outer step"
            );
        } else {
            debug!(outer, acceptance = chain.last.acceptance_rate, "EE outer step");
        }
    }

    info!(
        acceptance = chain.last.acceptance_rate,
        "estimation finished"
    );
    Ok(EstimationOutcome {
        theta,
        observed_stats: observed_stats.to_vec(),
        dz_a: chain.dz_a,
        acceptance_rate: chain.last.acceptance_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TwoPathCacheKind;
    use crate::registry::{ModelRequests, StructuralRequest, build_model};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn arc_model(g: &Graph, theta0: f64) -> Model {
        let requests = ModelRequests {
            structural: vec![StructuralRequest {
                name: "Arc".to_owned(),
                lambda: None,
                theta0,
            }],
            ..ModelRequests::default()
        };
        build_model(g, &Attributes::empty(), &requests).expect("Arc binds on directed graphs")
    }

    #[test]
    fn replay_reproduces_tie_count_in_arc_statistic() {
        let mut g = Graph::directed(6, TwoPathCacheKind::Sparse, false);
        let model = arc_model(&g, 0.0);
        let ties = vec![Tie::new(0, 1), Tie::new(1, 2), Tie::new(2, 0), Tie::new(3, 4)];
        let observed = replay_observed(&mut g, &Attributes::empty(), &model, &ties);
        assert_eq!(observed, vec![4.0]);
        assert_eq!(g.tie_count(), 4);
    }

    #[test]
    fn estimation_emits_headers_and_rows() {
        let mut g = Graph::directed(8, TwoPathCacheKind::Sparse, false);
        let model = arc_model(&g, -1.0);
        let ties = vec![Tie::new(0, 1), Tie::new(2, 3), Tie::new(4, 5)];
        let observed = replay_observed(&mut g, &Attributes::empty(), &model, &ties);
        let settings = EstimationSettings {
            sampler_steps: 50,
            s_steps: 3,
            ee_steps: 2,
            ee_inner_steps: 4,
            ..EstimationSettings::default()
        };
        let opts = SamplerOptions::default();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut theta_out = Vec::new();
        let mut dza_out = Vec::new();
        let outcome = estimate(
            &mut g,
            &Attributes::empty(),
            &model,
            &opts,
            &settings,
            &observed,
            &mut rng,
            &mut theta_out,
            &mut dza_out,
        )
        .expect("estimation runs");
        let text = String::from_utf8(theta_out).expect("output is UTF-8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("t Arc AcceptanceRate"));
        // 3 S rows + 2 EE outer rows
        assert_eq!(lines.count(), 5);
        assert_eq!(outcome.theta.len(), 1);
        let dza_text = String::from_utf8(dza_out).expect("output is UTF-8");
        assert!(dza_text.starts_with("t Arc AcceptanceRate"));
    }

    #[test]
    fn borisenko_update_moves_theta_against_dza() {
        // With a sparse observed graph and theta pushed positive the chain
        // adds ties, dzA goes positive, and the update pushes theta down.
        let mut g = Graph::directed(10, TwoPathCacheKind::Sparse, false);
        let model = arc_model(&g, 2.0);
        let ties = vec![Tie::new(0, 1)];
        let observed = replay_observed(&mut g, &Attributes::empty(), &model, &ties);
        let settings = EstimationSettings {
            sampler_steps: 200,
            s_steps: 0,
            ee_steps: 3,
            ee_inner_steps: 10,
            use_borisenko: true,
            learning_rate: 0.01,
            ..EstimationSettings::default()
        };
        let opts = SamplerOptions::default();
        let mut rng = SmallRng::seed_from_u64(9);
        let outcome = estimate(
            &mut g,
            &Attributes::empty(),
            &model,
            &opts,
            &settings,
            &observed,
            &mut rng,
            &mut Vec::new(),
            &mut Vec::new(),
        )
        .expect("estimation runs");
        assert!(outcome.theta[0] < 2.0);
        assert!(outcome.dz_a[0] > 0.0);
    }
}

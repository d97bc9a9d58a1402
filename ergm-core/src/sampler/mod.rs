//! Metropolis-Hastings samplers over graph space.
//!
//! Three proposal kernels drive the chain: the basic uniform-dyad sampler,
//! the Improved Fixed Density (IFD) sampler, and the Tie-No-Tie (TNT)
//! sampler. All three share one contract: a batch advances the graph by a
//! requested number of proposals, accumulates the add-direction change
//! statistics of accepted adds and accepted deletes separately, and reports
//! the acceptance rate. Move restrictions (snowball-conditional, forbidden
//! reciprocity, citation-ERGM, self-loops) shape the proposal distribution
//! and are rejected in incompatible combinations before any chain runs.

mod basic;
mod ifd;
mod tnt;

use rand::Rng;
use thiserror::Error;

use crate::attributes::Attributes;
use crate::graph::{Graph, GraphMode, NodeId, Tie};
use crate::stats::Model;

/// Proposal kernel selection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SamplerKind {
    /// Uniform dyad toggles.
    #[default]
    Basic,
    /// Improved Fixed Density: strictly alternating adds and deletes with an
    /// online auxiliary parameter.
    Ifd,
    /// Tie-No-Tie: adds and deletes proposed with equal probability, with an
    /// explicit proposal-asymmetry correction.
    Tnt,
}

/// Which conditional-estimation restriction applies to proposals.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Conditionality {
    /// No restriction.
    #[default]
    Unrestricted,
    /// Snowball-conditional: only inner-zone dyads spanning at most one
    /// wave, with last-link-to-previous-wave deletes forbidden.
    Snowball,
    /// Citation ERGM: only ties sent by latest-term nodes.
    Citation,
}

/// Sampler configuration shared by every kernel.
#[derive(Clone, Copy, Debug)]
pub struct SamplerOptions {
    /// The proposal kernel.
    pub kind: SamplerKind,
    /// Conditional-estimation restriction.
    pub conditional: Conditionality,
    /// Reject add proposals that would close a mutual dyad.
    pub forbid_reciprocity: bool,
    /// Step constant for the IFD auxiliary-parameter update.
    pub ifd_k: f64,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            kind: SamplerKind::Basic,
            conditional: Conditionality::Unrestricted,
            forbid_reciprocity: false,
            ifd_k: 0.1,
        }
    }
}

/// Errors raised when a sampler configuration cannot drive the given graph.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// Two restrictions that cannot hold at once.
    #[error("{first} cannot be combined with {second}")]
    IncompatibleOptions {
        /// One option name.
        first: &'static str,
        /// The other option name.
        second: &'static str,
    },
    /// A restriction needs structure the graph does not carry.
    #[error("{what} requires {requirement}")]
    MissingStructure {
        /// The restriction.
        what: &'static str,
        /// What it needs.
        requirement: &'static str,
    },
    /// The restricted proposal pool is empty, so no chain can move.
    #[error("no admissible dyads under the configured restrictions")]
    EmptyProposalPool,
    /// The IFD sampler needs the density (`Arc`/`Edge`) parameter in the
    /// model.
    #[error("the IFD sampler requires the Arc/Edge parameter in the model")]
    IfdWithoutDensity,
}

/// Mutable sampler state carried across batches of one chain.
#[derive(Clone, Debug)]
pub struct SamplerState {
    /// Admissible-dyad count under the configured restrictions.
    admissible_dyads: f64,
    /// IFD auxiliary parameter.
    pub(crate) ifd_v: f64,
    /// Whether the last accepted IFD move was a delete.
    pub(crate) ifd_last_accepted_delete: bool,
}

impl SamplerState {
    /// Validates the option combination against the graph and prepares the
    /// chain state. `theta_density` is the density coefficient, required by
    /// the IFD kernel for its auxiliary-parameter start value.
    ///
    /// # Errors
    /// Returns a [`SamplerError`] for incompatible or unsupported option
    /// combinations, missing snowball/term structure, an empty restricted
    /// proposal pool, or an IFD model without the density parameter.
    pub fn new(
        g: &Graph,
        opts: &SamplerOptions,
        theta_density: Option<f64>,
    ) -> Result<Self, SamplerError> {
        validate_options(g, opts)?;
        let admissible = admissible_dyads(g, opts)?;
        let ifd_v = if opts.kind == SamplerKind::Ifd {
            let theta = theta_density.ok_or(SamplerError::IfdWithoutDensity)?;
            theta + arc_correction(admissible, delete_pool_len(g, opts))
        } else {
            0.0
        };
        Ok(Self {
            admissible_dyads: admissible,
            ifd_v,
            ifd_last_accepted_delete: true,
        })
    }

    /// The IFD auxiliary parameter's current value.
    #[must_use]
    pub const fn ifd_v(&self) -> f64 {
        self.ifd_v
    }

    /// Admissible-dyad count under the configured restrictions.
    #[must_use]
    pub const fn admissible_dyads(&self) -> f64 {
        self.admissible_dyads
    }
}

/// Outcome of one sampler batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct BatchResult {
    /// Share of proposals that were accepted.
    pub acceptance_rate: f64,
    /// IFD only: proposed deletes minus proposed adds.
    pub dz_arc: f64,
}

/// Borrowed chain inputs shared by every kernel.
pub(crate) struct ChainInputs<'a> {
    pub g: &'a mut Graph,
    pub attrs: &'a Attributes,
    pub model: &'a Model,
    pub theta: &'a [f64],
    pub opts: &'a SamplerOptions,
}

/// Per-batch output accumulators.
pub(crate) struct BatchAccumulators<'a> {
    pub add_stats: &'a mut [f64],
    pub del_stats: &'a mut [f64],
    pub scratch: Vec<f64>,
}

/// Runs `steps` proposals of the configured kernel.
///
/// `add_stats[k]` and `del_stats[k]` receive the summed add-direction change
/// statistics of accepted adds and accepted deletes respectively; both must
/// have the model's length and are not cleared here.
#[expect(clippy::too_many_arguments, reason = "the sampler contract names each input")]
pub fn run_batch<R: Rng>(
    g: &mut Graph,
    attrs: &Attributes,
    model: &Model,
    theta: &[f64],
    opts: &SamplerOptions,
    state: &mut SamplerState,
    steps: u64,
    rng: &mut R,
    add_stats: &mut [f64],
    del_stats: &mut [f64],
) -> BatchResult {
    debug_assert_eq!(add_stats.len(), model.len());
    debug_assert_eq!(del_stats.len(), model.len());
    let scratch = vec![0.0; model.len()];
    let mut inputs = ChainInputs {
        g,
        attrs,
        model,
        theta,
        opts,
    };
    let mut accum = BatchAccumulators {
        add_stats,
        del_stats,
        scratch,
    };
    match opts.kind {
        SamplerKind::Basic => basic::batch(&mut inputs, state, steps, rng, &mut accum),
        SamplerKind::Ifd => ifd::batch(&mut inputs, state, steps, rng, &mut accum),
        SamplerKind::Tnt => tnt::batch(&mut inputs, state, steps, rng, &mut accum),
    }
}

fn validate_options(g: &Graph, opts: &SamplerOptions) -> Result<(), SamplerError> {
    if g.allows_loops() && opts.conditional != Conditionality::Unrestricted {
        return Err(SamplerError::IncompatibleOptions {
            first: "allowLoops",
            second: "conditional estimation",
        });
    }
    if opts.forbid_reciprocity && !g.is_directed() {
        return Err(SamplerError::IncompatibleOptions {
            first: "forbidReciprocity",
            second: "an undirected graph",
        });
    }
    match opts.conditional {
        Conditionality::Unrestricted => {}
        Conditionality::Snowball => {
            if matches!(g.mode(), GraphMode::Bipartite { .. }) {
                return Err(SamplerError::IncompatibleOptions {
                    first: "conditional estimation",
                    second: "a bipartite graph",
                });
            }
            if g.snowball().is_none() {
                return Err(SamplerError::MissingStructure {
                    what: "conditional estimation",
                    requirement: "a zone file",
                });
            }
        }
        Conditionality::Citation => {
            if !g.is_directed() {
                return Err(SamplerError::IncompatibleOptions {
                    first: "citationERGM",
                    second: "an undirected graph",
                });
            }
            if g.terms().is_none() {
                return Err(SamplerError::MissingStructure {
                    what: "citationERGM",
                    requirement: "a term file",
                });
            }
        }
    }
    Ok(())
}

/// Count of dyads the proposal distribution may toggle.
fn admissible_dyads(g: &Graph, opts: &SamplerOptions) -> Result<f64, SamplerError> {
    let count = match opts.conditional {
        Conditionality::Unrestricted => match g.mode() {
            GraphMode::Directed { .. } => {
                let n = g.node_count() as f64;
                let ordered = n * (n - 1.0);
                if opts.forbid_reciprocity { ordered / 2.0 } else { ordered }
            }
            GraphMode::Undirected => {
                let n = g.node_count() as f64;
                n * (n - 1.0) / 2.0
            }
            GraphMode::Bipartite { .. } => {
                g.mode_a_count() as f64 * g.mode_b_count() as f64
            }
        },
        Conditionality::Snowball => {
            let sb = g.snowball().ok_or(SamplerError::MissingStructure {
                what: "conditional estimation",
                requirement: "a zone file",
            })?;
            let inner_zones = sb.max_zone() as usize;
            let mut sizes = vec![0f64; inner_zones.max(1)];
            for &v in sb.inner_nodes() {
                sizes[sb.zone(v) as usize] += 1.0;
            }
            let mut ordered = 0.0;
            for (z, &c) in sizes.iter().enumerate() {
                ordered += c * (c - 1.0);
                if z + 1 < sizes.len() {
                    ordered += 2.0 * c * sizes[z + 1];
                }
            }
            let mut count = if g.is_directed() { ordered } else { ordered / 2.0 };
            if opts.forbid_reciprocity {
                count /= 2.0;
            }
            count
        }
        Conditionality::Citation => {
            let terms = g.terms().ok_or(SamplerError::MissingStructure {
                what: "citationERGM",
                requirement: "a term file",
            })?;
            terms.maxterm_nodes().len() as f64 * (g.node_count() as f64 - 1.0)
        }
    };
    if count < 1.0 {
        return Err(SamplerError::EmptyProposalPool);
    }
    Ok(count)
}

/// The IFD auxiliary-parameter start offset, `ln((D - A) / (A + 1))`.
fn arc_correction(admissible: f64, current: usize) -> f64 {
    ((admissible - current as f64) / (current as f64 + 1.0)).ln()
}

/// Size of the restricted delete pool.
pub(crate) fn delete_pool_len(g: &Graph, opts: &SamplerOptions) -> usize {
    match opts.conditional {
        Conditionality::Unrestricted => g.tie_count(),
        Conditionality::Snowball => {
            g.snowball().map_or(0, |sb| sb.inner_ties().len())
        }
        Conditionality::Citation => g.terms().map_or(0, |t| t.maxterm_ties().len()),
    }
}

/// The tie at `idx` in the restricted delete pool.
pub(crate) fn delete_pool_tie(g: &Graph, opts: &SamplerOptions, idx: usize) -> Tie {
    match opts.conditional {
        Conditionality::Unrestricted => g.tie_at(idx),
        Conditionality::Snowball => {
            g.snowball().map_or(Tie::new(0, 0), |sb| sb.inner_ties()[idx])
        }
        Conditionality::Citation => {
            g.terms().map_or(Tie::new(0, 0), |t| t.maxterm_ties()[idx])
        }
    }
}

/// Whether deleting `(i, j)` is legal under the snowball last-link rule:
/// the endpoint in the deeper wave must keep at least one other link to its
/// previous wave.
pub(crate) fn snowball_delete_allowed(g: &Graph, i: NodeId, j: NodeId) -> bool {
    let Some(sb) = g.snowball() else {
        return true;
    };
    let (zi, zj) = (sb.zone(i), sb.zone(j));
    if zi + 1 == zj {
        sb.prev_wave_degree(j) > 1
    } else if zj + 1 == zi {
        sb.prev_wave_degree(i) > 1
    } else {
        true
    }
}

/// Draws an endpoint pair admissible for the configured restrictions,
/// without regard to whether the tie exists.
pub(crate) fn draw_dyad<R: Rng>(g: &Graph, opts: &SamplerOptions, rng: &mut R) -> (NodeId, NodeId) {
    let n = g.node_count();
    loop {
        let (i, j) = match opts.conditional {
            Conditionality::Citation => match g.terms() {
                None => continue,
                Some(terms) => {
                    let pool = terms.maxterm_nodes();
                    let i = pool[rng.gen_range(0..pool.len())];
                    let j = rng.gen_range(0..n);
                    (i, j)
                }
            },
            Conditionality::Snowball => match g.snowball() {
                None => continue,
                Some(sb) => {
                    let pool = sb.inner_nodes();
                    let i = pool[rng.gen_range(0..pool.len())];
                    let j = pool[rng.gen_range(0..pool.len())];
                    if sb.zone(i).abs_diff(sb.zone(j)) > 1 {
                        continue;
                    }
                    (i, j)
                }
            },
            Conditionality::Unrestricted => match g.mode() {
                GraphMode::Bipartite { mode_a } => {
                    let i = rng.gen_range(0..mode_a);
                    let j = rng.gen_range(mode_a..n);
                    (i, j)
                }
                _ => (rng.gen_range(0..n), rng.gen_range(0..n)),
            },
        };
        if i == j && !g.allows_loops() {
            continue;
        }
        return (i, j);
    }
}

/// Draws an admissible dyad whose tie is currently absent; applies the
/// forbidden-reciprocity restriction to the would-be add.
pub(crate) fn draw_absent_dyad<R: Rng>(
    g: &Graph,
    opts: &SamplerOptions,
    rng: &mut R,
) -> (NodeId, NodeId) {
    loop {
        let (i, j) = draw_dyad(g, opts, rng);
        if g.is_tie(i, j) {
            continue;
        }
        if opts.forbid_reciprocity && i != j && g.is_tie(j, i) {
            continue;
        }
        return (i, j);
    }
}

#[cfg(test)]
mod tests;

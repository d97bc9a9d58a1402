//! The Improved Fixed Density kernel.
//!
//! Accepted moves strictly alternate between adds and deletes, holding the
//! tie count within one of its starting value. A single auxiliary parameter
//! V stands in for the density coefficient: it enters every acceptance
//! ratio and is nudged after each batch towards the value that balances
//! proposed adds against proposed deletes (Byshkin et al. 2016).

use rand::Rng;
use tracing::warn;

use crate::sampler::{
    BatchAccumulators, BatchResult, ChainInputs, Conditionality, SamplerState, delete_pool_len,
    delete_pool_tie, draw_absent_dyad, snowball_delete_allowed,
};
use crate::stats::calc_change_stats;

/// Imbalance ratio beyond which the auxiliary parameter is clearly failing
/// to hold the density.
const IMBALANCE_WARNING: f64 = 0.8;

pub(crate) fn batch<R: Rng>(
    inputs: &mut ChainInputs<'_>,
    state: &mut SamplerState,
    steps: u64,
    rng: &mut R,
    accum: &mut BatchAccumulators<'_>,
) -> BatchResult {
    let dyads = state.admissible_dyads();
    let mut accepted = 0u64;
    let mut proposed_adds = 0u64;
    let mut proposed_dels = 0u64;
    for _ in 0..steps {
        let pool = delete_pool_len(inputs.g, inputs.opts);
        let propose_add = if pool == 0 {
            true
        } else if pool as f64 >= dyads {
            false
        } else {
            state.ifd_last_accepted_delete
        };

        if propose_add {
            proposed_adds += 1;
            let (i, j) = draw_absent_dyad(inputs.g, inputs.opts, rng);
            let total = calc_change_stats(
                inputs.g,
                inputs.attrs,
                inputs.model,
                inputs.theta,
                i,
                j,
                false,
                &mut accum.scratch,
            ) + state.ifd_v;
            if rng.r#gen::<f64>() < total.exp() {
                accepted += 1;
                inputs.g.insert_updating_list(i, j);
                for (acc, delta) in accum.add_stats.iter_mut().zip(&accum.scratch) {
                    *acc += delta;
                }
                state.ifd_last_accepted_delete = false;
            }
        } else {
            proposed_dels += 1;
            let tie = loop {
                let candidate = delete_pool_tie(inputs.g, inputs.opts, rng.gen_range(0..pool));
                if inputs.opts.conditional == Conditionality::Snowball
                    && !snowball_delete_allowed(inputs.g, candidate.tail, candidate.head)
                {
                    continue;
                }
                break candidate;
            };
            inputs.g.remove(tie.tail, tie.head);
            let total = calc_change_stats(
                inputs.g,
                inputs.attrs,
                inputs.model,
                inputs.theta,
                tie.tail,
                tie.head,
                true,
                &mut accum.scratch,
            ) - state.ifd_v;
            if rng.r#gen::<f64>() < total.exp() {
                accepted += 1;
                inputs.g.strip_from_lists(tie.tail, tie.head);
                for (acc, delta) in accum.del_stats.iter_mut().zip(&accum.scratch) {
                    *acc += delta;
                }
                state.ifd_last_accepted_delete = true;
            } else {
                inputs.g.insert(tie.tail, tie.head);
            }
        }
    }

    let imbalance = proposed_dels as f64 - proposed_adds as f64;
    let volume = (proposed_dels + proposed_adds) as f64;
    if volume > 0.0 {
        let step = inputs.opts.ifd_k * (imbalance / volume).powi(2);
        if proposed_dels > proposed_adds {
            state.ifd_v -= step;
        } else {
            state.ifd_v += step;
        }
        if (imbalance / volume).abs() > IMBALANCE_WARNING {
            warn!(
                v = state.ifd_v,
                ratio = imbalance / volume,
                "IFD auxiliary parameter is not holding the density"
            );
        }
    }

    BatchResult {
        acceptance_rate: accepted as f64 / steps as f64,
        dz_arc: imbalance,
    }
}

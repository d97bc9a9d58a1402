//! The basic uniform-dyad Metropolis-Hastings kernel.

use rand::Rng;

use crate::sampler::{
    BatchAccumulators, BatchResult, ChainInputs, Conditionality, SamplerState, draw_dyad,
    snowball_delete_allowed,
};
use crate::stats::calc_change_stats;

pub(crate) fn batch<R: Rng>(
    inputs: &mut ChainInputs<'_>,
    _state: &mut SamplerState,
    steps: u64,
    rng: &mut R,
    accum: &mut BatchAccumulators<'_>,
) -> BatchResult {
    let mut accepted = 0u64;
    for _ in 0..steps {
        // Redraw until the toggle is legal under the configured restrictions.
        let (i, j, is_delete) = loop {
            let (i, j) = draw_dyad(inputs.g, inputs.opts, rng);
            let is_delete = inputs.g.is_tie(i, j);
            if !is_delete && inputs.opts.forbid_reciprocity && i != j && inputs.g.is_tie(j, i) {
                continue;
            }
            if is_delete
                && inputs.opts.conditional == Conditionality::Snowball
                && !snowball_delete_allowed(inputs.g, i, j)
            {
                continue;
            }
            break (i, j, is_delete);
        };

        if is_delete {
            inputs.g.remove(i, j);
        }
        let total = calc_change_stats(
            inputs.g,
            inputs.attrs,
            inputs.model,
            inputs.theta,
            i,
            j,
            is_delete,
            &mut accum.scratch,
        );
        if rng.r#gen::<f64>() < total.exp() {
            accepted += 1;
            if is_delete {
                inputs.g.strip_from_lists(i, j);
                for (acc, delta) in accum.del_stats.iter_mut().zip(&accum.scratch) {
                    *acc += delta;
                }
            } else {
                inputs.g.insert_updating_list(i, j);
                for (acc, delta) in accum.add_stats.iter_mut().zip(&accum.scratch) {
                    *acc += delta;
                }
            }
        } else if is_delete {
            inputs.g.insert(i, j);
        }
    }
    BatchResult {
        acceptance_rate: accepted as f64 / steps as f64,
        dz_arc: 0.0,
    }
}

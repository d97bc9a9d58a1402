//! The Tie-No-Tie kernel.
//!
//! Adds and deletes are proposed with equal probability (a forced add on an
//! empty graph), so sparse graphs propose deletes far more often per tie
//! than uniform dyad selection would. The acceptance ratio carries an
//! explicit Metropolis-Hastings correction for that asymmetry.

use rand::Rng;

use crate::sampler::{
    BatchAccumulators, BatchResult, ChainInputs, Conditionality, SamplerState, delete_pool_len,
    delete_pool_tie, draw_absent_dyad, snowball_delete_allowed,
};
use crate::stats::calc_change_stats;

/// Log proposal correction for deleting a tie from a graph of `ties` ties
/// and `dyads` admissible dyads.
fn delete_correction(ties: f64, dyads: f64) -> f64 {
    if ties <= 1.0 {
        (1.0 / (0.5 * dyads + 0.5)).ln()
    } else {
        (ties / (dyads + ties)).ln()
    }
}

/// Log proposal correction for adding a tie to a graph of `ties` ties.
fn add_correction(ties: f64, dyads: f64) -> f64 {
    if ties <= 0.0 {
        (0.5 * dyads + 0.5).ln()
    } else {
        (1.0 + dyads / (ties + 1.0)).ln()
    }
}

pub(crate) fn batch<R: Rng>(
    inputs: &mut ChainInputs<'_>,
    state: &mut SamplerState,
    steps: u64,
    rng: &mut R,
    accum: &mut BatchAccumulators<'_>,
) -> BatchResult {
    let dyads = state.admissible_dyads();
    let mut accepted = 0u64;
    for _ in 0..steps {
        let pool = delete_pool_len(inputs.g, inputs.opts);
        let do_delete = pool > 0 && rng.gen_bool(0.5);
        if do_delete {
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
            ) + delete_correction(pool as f64, dyads);
            if rng.r#gen::<f64>() < total.exp() {
                accepted += 1;
                inputs.g.strip_from_lists(tie.tail, tie.head);
                for (acc, delta) in accum.del_stats.iter_mut().zip(&accum.scratch) {
                    *acc += delta;
                }
            } else {
                inputs.g.insert(tie.tail, tie.head);
            }
        } else {
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
            ) + add_correction(pool as f64, dyads);
            if rng.r#gen::<f64>() < total.exp() {
                accepted += 1;
                inputs.g.insert_updating_list(i, j);
                for (acc, delta) in accum.add_stats.iter_mut().zip(&accum.scratch) {
                    *acc += delta;
                }
            }
        }
    }
    BatchResult {
        acceptance_rate: accepted as f64 / steps as f64,
        dz_arc: 0.0,
    }
}

//! Adaptive sub-stepping scheduler.
//!
//! Fast-moving close encounters tunnel through each other under a fixed
//! step. This scheduler divides each tick into sub-steps sized so that no
//! pair closes more than `sqrt(ratio_thresh)` of its current separation in
//! one step.

use crate::integrator::integrate;
use crate::interaction::{interact, Interaction};
use crate::store::ParticleStore;

/// Floor on the sub-step, as a fraction of the full tick length. Bounds
/// the sub-step count when a pair sits at near-zero separation.
const MIN_STEP_FRACTION: f64 = 1e-6;

/// Advances the store by one tick of length `dt`, in adaptive sub-steps.
///
/// For each pair the admissible squared step is
/// `ratio_thresh · dist² / rel_vel²`; the sub-step is the minimum over all
/// pairs, clamped to the time left in the tick and to a small floor.
pub fn tick(store: &mut ParticleStore, dt: f64, ratio_thresh: f64, merge: bool) {
    let mut remaining = dt;
    while remaining > 0.0 {
        let mut step_sq = remaining * remaining;
        let mut i = 0;
        while i < store.len() {
            let mut j = i + 1;
            while j < store.len() {
                let (a, b) = store.pair_mut(i, j);
                match interact(a, b, merge) {
                    Interaction::Merged => {
                        log::debug!("merged particle {j} into {i}");
                        store.remove(j);
                    }
                    Interaction::Separated(dist_sq) => {
                        let rel_sq = (b.velocity - a.velocity).norm_squared();
                        if rel_sq > 0.0 {
                            step_sq = step_sq.min(ratio_thresh * dist_sq / rel_sq);
                        }
                        j += 1;
                    }
                }
            }
            i += 1;
        }
        let step = step_sq.sqrt().max(dt * MIN_STEP_FRACTION).min(remaining);
        for particle in store.iter_mut() {
            integrate(particle, step);
        }
        if step >= remaining {
            break;
        }
        remaining -= step;
    }
}

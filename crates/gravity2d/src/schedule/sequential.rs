//! Single-threaded fixed-step scheduler.

use crate::integrator::integrate;
use crate::interaction::{interact, Interaction};
use crate::store::ParticleStore;

/// Advances the store by one tick of length `dt`.
///
/// Every unordered pair is interacted exactly once, then every particle is
/// integrated. When a merge removes a particle, the element shifted into
/// its slot is re-tested against the current `i`.
pub fn tick(store: &mut ParticleStore, dt: f64, merge: bool) {
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
                Interaction::Separated(_) => j += 1,
            }
        }
        i += 1;
    }
    for particle in store.iter_mut() {
        integrate(particle, dt);
    }
}

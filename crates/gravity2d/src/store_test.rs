use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::body::Particle;
use crate::store::ParticleStore;

fn make_store() -> ParticleStore {
    ParticleStore::from_particles(vec![
        Particle::new(1.0, 1.0, Point2::new(0.0, 0.0), Vector2::new(1.0, 0.0)),
        Particle::new(2.0, 1.0, Point2::new(10.0, 0.0), Vector2::new(0.0, 2.0)),
        Particle::new(3.0, 1.0, Point2::new(0.0, 10.0), Vector2::new(-1.0, 0.0)),
    ])
}

#[test]
fn test_push_and_remove() {
    let mut store = make_store();
    assert_eq!(store.len(), 3);

    store.push(Particle::default());
    assert_eq!(store.len(), 4);

    let removed = store.remove(1);
    assert_eq!(removed.mass, 2.0);
    assert_eq!(store.len(), 3);
    // The later particles shifted down.
    assert_eq!(store.particle_mut(1).mass, 3.0);
}

#[test]
fn test_pair_mut_borrows_distinct_cells() {
    let mut store = make_store();

    let (a, b) = store.pair_mut(0, 2);
    a.mass = 100.0;
    b.mass = 200.0;

    assert_eq!(store.particle_mut(0).mass, 100.0);
    assert_eq!(store.particle_mut(2).mass, 200.0);
}

#[test]
fn test_snapshot_clones_state() {
    let mut store = make_store();
    let snapshot = store.snapshot();

    store.particle_mut(0).mass = 42.0;

    assert_eq!(snapshot[0].mass, 1.0);
    assert_eq!(snapshot.len(), 3);
}

#[test]
fn test_diagnostics() {
    let store = make_store();

    assert_eq!(store.total_mass(), 6.0);
    // p = (1*1 - 3*1, 2*2) = (-2, 4)
    let momentum = store.total_momentum();
    assert_relative_eq!(momentum.x, -2.0);
    assert_relative_eq!(momentum.y, 4.0);
    // KE = 0.5*1*1 + 0.5*2*4 + 0.5*3*1 = 6
    assert_relative_eq!(store.kinetic_energy(), 6.0);
}

#[test]
fn test_lock_by_cell() {
    let store = make_store();
    {
        let mut p = store.lock(1);
        p.mass = 7.0;
    }
    assert_eq!(store.lock(1).mass, 7.0);
}

#[test]
fn test_extend_and_clear() {
    let mut store = ParticleStore::new();
    assert!(store.is_empty());

    store.extend(vec![Particle::default(); 5]);
    assert_eq!(store.len(), 5);

    store.clear();
    assert!(store.is_empty());
}

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::body::Particle;
use crate::scenario::random_disk;
use crate::schedule::multi_thread::WorkerPool;
use crate::schedule::sequential;
use crate::store::ParticleStore;

fn pool_with(particles: Vec<Particle>) -> WorkerPool {
    WorkerPool::new(Arc::new(RwLock::new(ParticleStore::from_particles(
        particles,
    ))))
}

#[test]
fn test_matches_sequential_without_merging() {
    let particles = random_disk(40, 99);
    let mut reference = ParticleStore::from_particles(particles.clone());
    let store = Arc::new(RwLock::new(ParticleStore::from_particles(particles)));
    let pool = WorkerPool::new(Arc::clone(&store));

    for _ in 0..10 {
        sequential::tick(&mut reference, 0.01, false);
        pool.tick(4, 0.01, false);
    }

    let expected = reference.snapshot();
    let actual = store.read().unwrap().snapshot();
    assert_eq!(expected.len(), actual.len());
    for (e, a) in expected.iter().zip(&actual) {
        // Pair order differs between schedulers, so float sums can differ
        // in the last bits.
        assert_relative_eq!(e.position.x, a.position.x, max_relative = 1e-9, epsilon = 1e-12);
        assert_relative_eq!(e.position.y, a.position.y, max_relative = 1e-9, epsilon = 1e-12);
        assert_relative_eq!(e.velocity.x, a.velocity.x, max_relative = 1e-9, epsilon = 1e-12);
        assert_relative_eq!(e.velocity.y, a.velocity.y, max_relative = 1e-9, epsilon = 1e-12);
    }
}

#[test]
fn test_merges_are_compacted() {
    let pool = pool_with(vec![
        Particle::new(1.0, 1.0, Point2::new(0.0, 0.0), Vector2::zeros()),
        Particle::new(1.0, 1.0, Point2::new(1.5, 0.0), Vector2::zeros()),
        Particle::new(1.0, 1.0, Point2::new(100.0, 0.0), Vector2::zeros()),
    ]);

    pool.tick(2, 0.001, true);

    let snapshot = pool_snapshot(&pool);
    assert_eq!(snapshot.len(), 2);
    let total: f64 = snapshot.iter().map(|p| p.mass).sum();
    assert_relative_eq!(total, 3.0);
}

#[test]
fn test_overlapping_cluster_collapses() {
    // Five mutually overlapping particles; repeated ticks must fold them
    // into one body without losing mass.
    let particles = (0..5)
        .map(|i| Particle::new(1.0, 2.0, Point2::new(i as f64 * 0.5, 0.0), Vector2::zeros()))
        .collect();
    let pool = pool_with(particles);

    for _ in 0..5 {
        pool.tick(3, 0.001, true);
    }

    let snapshot = pool_snapshot(&pool);
    assert_eq!(snapshot.len(), 1);
    assert_relative_eq!(snapshot[0].mass, 5.0);
}

#[test]
fn test_zero_threads_still_ticks() {
    let pool = pool_with(vec![
        Particle::new(1.0, 0.1, Point2::new(-50.0, 0.0), Vector2::zeros()),
        Particle::new(1.0, 0.1, Point2::new(50.0, 0.0), Vector2::zeros()),
    ]);

    pool.tick(0, 0.1, false);

    let snapshot = pool_snapshot(&pool);
    assert!(snapshot[0].position.x > -50.0);
    assert_eq!(pool.active_workers(), 0);
}

#[test]
fn test_workers_retire_when_target_shrinks() {
    let pool = pool_with(random_disk(10, 5));

    pool.tick(4, 0.01, false);
    pool.tick(1, 0.01, false);

    // Surplus workers notice the lower target within a few polls.
    let deadline = Instant::now() + Duration::from_secs(2);
    while pool.active_workers() > 1 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(pool.active_workers() <= 1);
}

#[test]
fn test_shutdown_joins_workers() {
    let pool = pool_with(random_disk(10, 6));
    pool.tick(4, 0.01, false);

    // Join happens inside shutdown, so the count is already settled.
    pool.shutdown();
    assert_eq!(pool.active_workers(), 0);
}

fn pool_snapshot(pool: &WorkerPool) -> Vec<Particle> {
    // Ticks are synchronous, so an idle pool's store is safe to read.
    pool.store().read().unwrap().snapshot()
}

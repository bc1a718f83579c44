//! Shared particle storage.
//!
//! Particles live in a dense `Vec` of per-particle mutexes so the
//! multi-threaded scheduler can lock individual cells while the sequential
//! schedulers use `&mut` access and never touch a lock.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use nalgebra::Vector2;

use crate::body::Particle;

/// Locks a mutex, recovering the guard if a previous holder panicked.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read-locks an `RwLock`, recovering from poisoning.
pub(crate) fn read<T>(l: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    l.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write-locks an `RwLock`, recovering from poisoning.
pub(crate) fn write<T>(l: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    l.write().unwrap_or_else(PoisonError::into_inner)
}

/// Dense particle storage with per-cell locking.
#[derive(Debug, Default)]
pub struct ParticleStore {
    cells: Vec<Mutex<Particle>>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self {
            cells: particles.into_iter().map(Mutex::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn push(&mut self, particle: Particle) {
        self.cells.push(Mutex::new(particle));
    }

    pub fn extend(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.cells.extend(particles.into_iter().map(Mutex::new));
    }

    /// Removes the particle at `idx`, shifting later particles down.
    pub fn remove(&mut self, idx: usize) -> Particle {
        self.cells
            .remove(idx)
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn particle_mut(&mut self, idx: usize) -> &mut Particle {
        self.cells[idx].get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutable access to a pair of distinct cells. Requires `i < j`.
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut Particle, &mut Particle) {
        debug_assert!(i < j);
        let (left, right) = self.cells.split_at_mut(j);
        (
            left[i].get_mut().unwrap_or_else(PoisonError::into_inner),
            right[0].get_mut().unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// The raw cell, for schedulers that lock particles individually.
    pub fn cell(&self, idx: usize) -> &Mutex<Particle> {
        &self.cells[idx]
    }

    /// Locks a single particle.
    pub fn lock(&self, idx: usize) -> MutexGuard<'_, Particle> {
        lock(&self.cells[idx])
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.cells
            .iter_mut()
            .map(|cell| cell.get_mut().unwrap_or_else(PoisonError::into_inner))
    }

    /// Clones the current particle set.
    pub fn snapshot(&self) -> Vec<Particle> {
        self.cells.iter().map(|cell| lock(cell).clone()).collect()
    }

    pub fn total_mass(&self) -> f64 {
        self.cells.iter().map(|cell| lock(cell).mass).sum()
    }

    pub fn total_momentum(&self) -> Vector2<f64> {
        self.cells
            .iter()
            .fold(Vector2::zeros(), |acc, cell| acc + lock(cell).momentum())
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.cells.iter().map(|cell| lock(cell).kinetic_energy()).sum()
    }
}

impl From<Vec<Particle>> for ParticleStore {
    fn from(particles: Vec<Particle>) -> Self {
        Self::from_particles(particles)
    }
}

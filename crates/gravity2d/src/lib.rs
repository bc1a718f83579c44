//! Two-dimensional gravitational N-body simulation.
//!
//! Particles attract each other by Newtonian gravity in a plane and merge
//! on contact, conserving mass and momentum. Ticks can run sequentially,
//! across a worker pool, or with adaptive sub-stepping that keeps fast
//! close encounters from tunneling.
//!
//! The [`Environment`] owns the particle store and an optional driver
//! thread; [`scenario`] reads, writes and generates particle sets.
//!
//! State is normalized to earth masses, earth radii and days; see [`units`].

pub mod body;
pub mod environment;
pub mod error;
pub mod integrator;
pub mod interaction;
pub mod partition;
pub mod scenario;
pub mod schedule;
pub mod store;
pub mod units;

#[cfg(test)]
mod interaction_test;
#[cfg(test)]
mod store_test;

pub use body::Particle;
pub use environment::{Environment, SimulationClock, SimulationConfig};
pub use error::{Error, Result};
pub use schedule::Strategy;
pub use store::ParticleStore;

//! Scenario files and procedural system generators.
//!
//! Scenarios are JSON arrays of particle records. The generators build the
//! built-in demo systems: a five-body inner solar system, a random
//! planetary disk and a uniform cluster.

use std::io::{Read, Write};

use nalgebra::{Point2, Vector2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::body::Particle;
use crate::error::Result;
use crate::units::{au_to_earth_radii, G};

/// Serialized form of a [`Particle`].
///
/// Accelerations are transient state and are not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_color")]
    pub color: u32,
    pub mass: f64,
    pub radius: f64,
    pub position: [f64; 2],
    pub velocity: [f64; 2],
}

fn default_color() -> u32 {
    Particle::default().color
}

impl From<&Particle> for ParticleRecord {
    fn from(p: &Particle) -> Self {
        Self {
            name: p.name.clone(),
            color: p.color,
            mass: p.mass,
            radius: p.radius,
            position: [p.position.x, p.position.y],
            velocity: [p.velocity.x, p.velocity.y],
        }
    }
}

impl From<ParticleRecord> for Particle {
    fn from(r: ParticleRecord) -> Self {
        Self {
            name: r.name,
            color: r.color,
            mass: r.mass,
            radius: r.radius,
            position: Point2::new(r.position[0], r.position[1]),
            velocity: Vector2::new(r.velocity[0], r.velocity[1]),
            accel: Vector2::zeros(),
        }
    }
}

/// Writes the particle set as pretty-printed JSON.
pub fn save_scenario<W: Write>(particles: &[Particle], writer: W) -> Result<()> {
    let records: Vec<ParticleRecord> = particles.iter().map(ParticleRecord::from).collect();
    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

/// Reads a particle set from JSON.
pub fn load_scenario<R: Read>(reader: R) -> Result<Vec<Particle>> {
    let records: Vec<ParticleRecord> = serde_json::from_reader(reader)?;
    Ok(records.into_iter().map(Particle::from).collect())
}

/// The Sun and the four inner planets on circular orbits.
pub fn default_system() -> Vec<Particle> {
    let mut sun = Particle::named(
        "Sun",
        0xFFFF_D700,
        333_000.0,
        109.2,
        Point2::origin(),
        Vector2::zeros(),
    );
    let planets = [
        ("Mercury", 0xFF9E_9E9E, 0.055, 0.383, 0.387, 0.0_f64),
        ("Venus", 0xFFE8_C28A, 0.815, 0.950, 0.723, 1.7),
        ("Earth", 0xFF3B_7BDB, 1.0, 1.0, 1.0, 3.5),
        ("Mars", 0xFFC1_4F27, 0.107, 0.532, 1.524, 5.0),
    ];
    let mut system = Vec::with_capacity(planets.len() + 1);
    for (name, color, mass, radius, orbit_au, angle) in planets {
        let dist = au_to_earth_radii(orbit_au);
        let position = Point2::new(dist * angle.cos(), dist * angle.sin());
        let mut planet = Particle::named(name, color, mass, radius, position, Vector2::zeros());
        // Eccentricity 0 always satisfies the orbit preconditions.
        let _ = Particle::orbit(&mut sun, &mut planet, 0.0);
        system.push(planet);
    }
    system.insert(0, sun);
    system
}

/// Mass/radius relation for randomly generated planets.
///
/// Below ~5.3 earth masses radius grows as a weak power of mass; above it
/// the relation flattens toward gas-giant radii.
fn planet_radius(mass: f64, rng: &mut impl Rng) -> f64 {
    let base = if mass < 5.288 {
        mass.powf(0.27)
    } else {
        (0.0046 * mass + 0.3832).powf(-2.5) + 11.0
    };
    base * rng.random_range(0.9..1.1)
}

/// A random planetary disk around a solar-mass star.
///
/// Planets get masses from a heavy-tailed distribution, random orbital
/// radii between 0.2 and 5 AU and circular Keplerian velocities with
/// random orbital direction. Deterministic for a given seed.
pub fn random_disk(count: usize, seed: u64) -> Vec<Particle> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let star_mass = 333_000.0;
    let mut system = vec![Particle::named(
        "Star",
        0xFFFF_D700,
        star_mass,
        109.2,
        Point2::origin(),
        Vector2::zeros(),
    )];
    for _ in 0..count {
        let mass = 0.3 / (rng.random_range(0.0..1.0_f64) + 0.00009) - 0.25;
        let mass = mass.max(0.01);
        let radius = planet_radius(mass, &mut rng);
        let dist = au_to_earth_radii(rng.random_range(0.2..5.0));
        let angle = rng.random_range(0.0..std::f64::consts::TAU);
        let position = Point2::new(dist * angle.cos(), dist * angle.sin());
        let speed = (G * star_mass / dist).sqrt();
        let direction = if rng.random_range(0.0..1.0) < 0.5 { 1.0 } else { -1.0 };
        let velocity = Vector2::new(-angle.sin(), angle.cos()) * (speed * direction);
        system.push(Particle::new(mass, radius, position, velocity));
    }
    system
}

/// A disk-shaped cluster of unit-mass particles.
///
/// Particles are distributed uniformly over a disk of the given radius and
/// given a rigid rotation plus thermal velocity jitter.
pub fn cluster(
    center: Point2<f64>,
    count: usize,
    spread: f64,
    temperature: f64,
    angular_veloc: f64,
    seed: u64,
) -> Vec<Particle> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            // sqrt of a uniform sample gives uniform density over the disk.
            let dist = rng.random_range(0.0..1.0_f64).sqrt() * spread;
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            let x = dist * angle.cos();
            let y = dist * angle.sin();
            let velocity = Vector2::new(
                y * angular_veloc + (rng.random_range(0.0..1.0) - 0.5) * temperature,
                -x * angular_veloc + (rng.random_range(0.0..1.0) - 0.5) * temperature,
            );
            Particle::new(1.0, 1.0, center + Vector2::new(x, y), velocity)
        })
        .collect()
}

use nalgebra::{Point2, Vector2};

use crate::error::{Error, Result};
use crate::units::G;

/// A point mass in the 2D simulation plane.
///
/// Positions are in earth radii, velocities in earth radii per day and
/// masses in earth masses. The acceleration accumulator is filled during
/// the interaction phase of a tick and consumed (then cleared) by the
/// integration phase.
///
/// # Examples
///
/// ```
/// use nalgebra::{Point2, Vector2};
/// use gravity2d::Particle;
///
/// let earth = Particle::new(1.0, 1.0, Point2::origin(), Vector2::zeros());
/// assert_eq!(earth.mass, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Optional display name, shown in scenario files and demos.
    pub name: Option<String>,
    /// Packed ARGB display color.
    pub color: u32,
    /// Mass in earth masses. A mass of exactly zero marks a removed body.
    pub mass: f64,
    /// Collision radius in earth radii.
    pub radius: f64,
    /// Position in earth radii.
    pub position: Point2<f64>,
    /// Velocity in earth radii per day.
    pub velocity: Vector2<f64>,
    /// Acceleration accumulated during the current interaction phase.
    pub accel: Vector2<f64>,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            name: None,
            color: 0xFF7F_7F7F,
            mass: 1.0,
            radius: 1.0,
            position: Point2::origin(),
            velocity: Vector2::zeros(),
            accel: Vector2::zeros(),
        }
    }
}

impl Particle {
    /// Creates an anonymous particle.
    pub fn new(mass: f64, radius: f64, position: Point2<f64>, velocity: Vector2<f64>) -> Self {
        Self {
            mass,
            radius,
            position,
            velocity,
            ..Self::default()
        }
    }

    /// Creates a named, colored particle.
    pub fn named(
        name: impl Into<String>,
        color: u32,
        mass: f64,
        radius: f64,
        position: Point2<f64>,
        velocity: Vector2<f64>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            color,
            mass,
            radius,
            position,
            velocity,
            accel: Vector2::zeros(),
        }
    }

    /// Linear momentum, `m · v`.
    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    /// Kinetic energy, `½ m v²`.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }

    /// Distance to another particle's position.
    pub fn distance_to(&self, other: &Particle) -> f64 {
        (other.position - self.position).norm()
    }

    /// Speed, the magnitude of the velocity.
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Name to show in logs and demos.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed")
    }

    /// True once the particle has been merged away. Removed particles keep
    /// their slot inert (zero mass exerts and feels no force) until the
    /// scheduler compacts the store.
    pub fn is_removed(&self) -> bool {
        self.mass == 0.0
    }

    /// Places two particles on a mutual orbit around their barycenter.
    ///
    /// Both particles keep their positions; their velocities are adjusted so
    /// that, relative to `a`'s current velocity, they trace an orbit with the
    /// given eccentricity (`0.0` is circular). Pair momentum relative to the
    /// incoming frame is preserved.
    ///
    /// Returns an error when the eccentricity is outside `[0, 1)` or the
    /// particles occupy the same position.
    pub fn orbit(a: &mut Particle, b: &mut Particle, eccentricity: f64) -> Result<()> {
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(Error::InvalidParam(format!(
                "orbit eccentricity must be in [0, 1), got {eccentricity}"
            )));
        }
        let dr = b.position - a.position;
        let dist = dr.norm();
        if dist <= 0.0 {
            return Err(Error::InvalidParam(
                "orbiting particles must not coincide".into(),
            ));
        }
        let total_mass = a.mass + b.mass;
        let ecc = (1.0 - eccentricity).sqrt();
        // Speed of each particle scales with the opposite mass, so the pair
        // momentum in a's incoming frame is unchanged.
        let moment = (total_mass / dist * G).sqrt() / total_mass * ecc;
        let dir = dr / dist;
        let perp = Vector2::new(-dir.y, dir.x);
        let base_vel = a.velocity;
        a.velocity = base_vel + perp * (moment * b.mass);
        b.velocity = base_vel - perp * (moment * a.mass);
        Ok(())
    }
}

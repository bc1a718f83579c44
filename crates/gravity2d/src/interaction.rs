//! Pairwise gravitational interaction and collision merging.

use nalgebra::Point2;

use crate::body::Particle;
use crate::units::G;

/// Outcome of evaluating one particle pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// The pair stayed apart; carries the squared distance between them.
    Separated(f64),
    /// The pair collided and was merged into the first particle.
    Merged,
}

/// Accumulates the mutual gravitational acceleration of a pair, or merges
/// the pair when `merge` is set and the particles are in contact.
///
/// Contact means the center distance is at most the sum of the radii. After
/// a merge the combined body lives in `a` and `b` is tombstoned with zero
/// mass; tombstones neither exert nor feel force.
pub fn interact(a: &mut Particle, b: &mut Particle, merge: bool) -> Interaction {
    let dr = b.position - a.position;
    let dist_sq = dr.norm_squared();
    if a.mass == 0.0 || b.mass == 0.0 {
        return Interaction::Separated(dist_sq);
    }
    let dist = dist_sq.sqrt();
    if merge && dist <= a.radius + b.radius {
        merge_into(a, b);
        return Interaction::Merged;
    }
    if dist_sq == 0.0 {
        // Coincident but not merging; no defined force direction.
        return Interaction::Separated(dist_sq);
    }
    let f = G / (dist_sq * dist);
    a.accel += dr * (f * b.mass);
    b.accel -= dr * (f * a.mass);
    Interaction::Separated(dist_sq)
}

/// Merges `b` into `a`, conserving mass and momentum.
///
/// The merged position is the mass-weighted centroid and the merged radius
/// assumes volume addition, `(ra³ + rb³)^⅓`. The heavier particle's name and
/// color survive. `b` is left with zero mass.
fn merge_into(a: &mut Particle, b: &mut Particle) {
    let new_mass = a.mass + b.mass;
    let momentum = a.momentum() + b.momentum();
    if b.mass > a.mass {
        a.name = b.name.take();
        a.color = b.color;
    }
    a.position = Point2::from(
        (a.position.coords * a.mass + b.position.coords * b.mass) / new_mass,
    );
    a.velocity = momentum / new_mass;
    a.radius = (a.radius.powi(3) + b.radius.powi(3)).cbrt();
    a.mass = new_mass;
    b.mass = 0.0;
}

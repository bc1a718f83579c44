//! Semi-implicit Euler integration.

use nalgebra::Vector2;

use crate::body::Particle;

/// Advances a particle by `dt` using the accumulated acceleration.
///
/// Velocity is updated first and the new velocity moves the position
/// (semi-implicit Euler). The acceleration accumulator is cleared so the
/// next interaction phase starts from zero.
pub fn integrate(p: &mut Particle, dt: f64) {
    p.velocity += p.accel * dt;
    p.position += p.velocity * dt;
    p.accel = Vector2::zeros();
}

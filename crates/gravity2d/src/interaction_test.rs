use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use crate::body::Particle;
use crate::interaction::{interact, Interaction};
use crate::units::G;

fn pair(dist: f64) -> (Particle, Particle) {
    (
        Particle::new(2.0, 1.0, Point2::new(0.0, 0.0), Vector2::zeros()),
        Particle::new(3.0, 1.0, Point2::new(dist, 0.0), Vector2::zeros()),
    )
}

#[test]
fn test_accelerations_obey_third_law() {
    let (mut a, mut b) = pair(10.0);

    let result = interact(&mut a, &mut b, true);

    assert_eq!(result, Interaction::Separated(100.0));
    // Force is equal and opposite, so m_a * a_a = -m_b * a_b.
    let force_a = a.accel * a.mass;
    let force_b = b.accel * b.mass;
    assert_relative_eq!(force_a.x, -force_b.x, max_relative = 1e-12);
    assert_relative_eq!(force_a.y, -force_b.y, max_relative = 1e-12);
    // a accelerates toward b.
    assert!(a.accel.x > 0.0);
    assert!(b.accel.x < 0.0);
}

#[test]
fn test_acceleration_magnitude() {
    let (mut a, mut b) = pair(10.0);

    interact(&mut a, &mut b, false);

    // |a_a| = G * m_b / d²
    assert_relative_eq!(a.accel.norm(), G * 3.0 / 100.0, max_relative = 1e-12);
    assert_relative_eq!(b.accel.norm(), G * 2.0 / 100.0, max_relative = 1e-12);
}

#[test]
fn test_contact_merges_when_enabled() {
    // Radii sum to 2.0, centers 1.5 apart.
    let (mut a, mut b) = pair(1.5);

    assert_eq!(interact(&mut a, &mut b, true), Interaction::Merged);
    assert!(b.is_removed());
}

#[test]
fn test_contact_without_merge_flag() {
    let (mut a, mut b) = pair(1.5);

    let result = interact(&mut a, &mut b, false);

    assert_eq!(result, Interaction::Separated(2.25));
    assert!(!b.is_removed());
    assert!(a.accel.x > 0.0);
}

#[test]
fn test_merge_conserves_mass_and_momentum() {
    let mut a = Particle::new(2.0, 1.0, Point2::new(0.0, 0.0), Vector2::new(1.0, 0.0));
    let mut b = Particle::new(3.0, 1.0, Point2::new(1.0, 0.0), Vector2::new(-1.0, 2.0));
    let momentum = a.momentum() + b.momentum();

    interact(&mut a, &mut b, true);

    assert_eq!(a.mass, 5.0);
    assert_eq!(b.mass, 0.0);
    assert_relative_eq!(a.momentum().x, momentum.x, max_relative = 1e-12);
    assert_relative_eq!(a.momentum().y, momentum.y, max_relative = 1e-12);
}

#[test]
fn test_merge_position_is_mass_weighted() {
    let mut a = Particle::new(1.0, 1.0, Point2::new(0.0, 0.0), Vector2::zeros());
    let mut b = Particle::new(3.0, 1.0, Point2::new(1.0, 0.0), Vector2::zeros());

    interact(&mut a, &mut b, true);

    assert_relative_eq!(a.position.x, 0.75, max_relative = 1e-12);
}

#[test]
fn test_merge_radius_sums_volumes() {
    let (mut a, mut b) = pair(0.5);

    interact(&mut a, &mut b, true);

    // (1³ + 1³)^(1/3)
    assert_relative_eq!(a.radius, 2.0_f64.cbrt(), max_relative = 1e-12);
}

#[test]
fn test_merge_keeps_heavier_identity() {
    let mut light = Particle::named(
        "Light",
        0xFF11_1111,
        1.0,
        1.0,
        Point2::new(0.0, 0.0),
        Vector2::zeros(),
    );
    let mut heavy = Particle::named(
        "Heavy",
        0xFF22_2222,
        2.0,
        1.0,
        Point2::new(1.0, 0.0),
        Vector2::zeros(),
    );

    interact(&mut light, &mut heavy, true);

    assert_eq!(light.name.as_deref(), Some("Heavy"));
    assert_eq!(light.color, 0xFF22_2222);
}

#[test]
fn test_merge_keeps_first_identity_on_tie() {
    let mut a = Particle::named("A", 1, 2.0, 1.0, Point2::new(0.0, 0.0), Vector2::zeros());
    let mut b = Particle::named("B", 2, 2.0, 1.0, Point2::new(1.0, 0.0), Vector2::zeros());

    interact(&mut a, &mut b, true);

    assert_eq!(a.name.as_deref(), Some("A"));
    assert_eq!(a.color, 1);
}

#[test]
fn test_merge_is_symmetric_in_argument_order() {
    let heavy = Particle::named(
        "Heavy",
        0xFFAA_AAAA,
        3.0,
        1.2,
        Point2::new(0.0, 0.0),
        Vector2::new(1.0, 0.0),
    );
    let light = Particle::named(
        "Light",
        0xFF55_5555,
        1.0,
        0.8,
        Point2::new(1.0, 0.5),
        Vector2::new(-2.0, 1.0),
    );

    let (mut a1, mut b1) = (heavy.clone(), light.clone());
    let (mut a2, mut b2) = (light, heavy);
    assert_eq!(interact(&mut a1, &mut b1, true), Interaction::Merged);
    assert_eq!(interact(&mut a2, &mut b2, true), Interaction::Merged);

    // The survivor slot differs, but the merged state must not.
    assert_eq!(a1.mass, a2.mass);
    assert_eq!(a1.position, a2.position);
    assert_eq!(a1.velocity, a2.velocity);
    assert_eq!(a1.radius, a2.radius);
    assert_eq!(a1.name, a2.name);
    assert_eq!(a1.color, a2.color);
}

#[test]
fn test_tombstone_is_inert() {
    let mut tombstone = Particle::new(0.0, 1.0, Point2::new(0.0, 0.0), Vector2::zeros());
    let mut live = Particle::new(1.0, 1.0, Point2::new(0.5, 0.0), Vector2::zeros());

    let result = interact(&mut tombstone, &mut live, true);

    assert_eq!(result, Interaction::Separated(0.25));
    assert_eq!(tombstone.accel, Vector2::zeros());
    assert_eq!(live.accel, Vector2::zeros());
    assert!(!live.is_removed());
}

#[test]
fn test_coincident_particles_produce_no_force() {
    let mut a = Particle::new(1.0, 1.0, Point2::new(2.0, 2.0), Vector2::zeros());
    let mut b = Particle::new(1.0, 1.0, Point2::new(2.0, 2.0), Vector2::zeros());

    let result = interact(&mut a, &mut b, false);

    assert_eq!(result, Interaction::Separated(0.0));
    assert!(a.accel.x.is_finite() && a.accel.y.is_finite());
    assert_eq!(a.accel, Vector2::zeros());
    assert_eq!(b.accel, Vector2::zeros());
}

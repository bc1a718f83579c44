//! Two-body circular orbit example
//!
//! Places a planet on a circular orbit around a star and runs one orbital
//! period, printing the separation and energy as the orbit progresses.
//!
//! Run with: cargo run --package gravity2d --example simple_orbit

use nalgebra::{Point2, Vector2};

use gravity2d::units::G;
use gravity2d::{Environment, Particle};

fn main() {
    env_logger::init();

    println!("Two-Body Circular Orbit\n");
    println!("{}", "=".repeat(60));

    let dist = 23_455.0; // 1 AU in earth radii
    let star_mass = 333_000.0;

    let mut star = Particle::named(
        "Star",
        0xFFFF_D700,
        star_mass,
        109.2,
        Point2::origin(),
        Vector2::zeros(),
    );
    let mut planet = Particle::named(
        "Planet",
        0xFF3B_7BDB,
        1.0,
        1.0,
        Point2::new(dist, 0.0),
        Vector2::zeros(),
    );
    Particle::orbit(&mut star, &mut planet, 0.0).expect("valid orbit parameters");

    println!("\nInitial conditions:");
    println!("  Separation: {dist:.0} earth radii (1 AU)");
    println!("  Orbital speed: {:.1} earth radii/day", planet.speed());

    let env = Environment::with_particles(vec![star, planet]);
    env.set_time_step(0.1).expect("positive time step");

    // T = 2π sqrt(d³ / G M)
    let period = std::f64::consts::TAU * (dist.powi(3) / (G * (star_mass + 1.0))).sqrt();
    let ticks = (period / 0.1).ceil() as usize;
    println!("  Orbital period: {period:.1} days ({ticks} ticks)\n");

    for tick in 0..=ticks {
        if tick % (ticks / 8).max(1) == 0 {
            let snapshot = env.snapshot();
            let separation = (snapshot[1].position - snapshot[0].position).norm();
            println!(
                "  t = {:7.1} days  separation = {:9.1}  planet speed = {:6.1}",
                env.clock().time_passed,
                separation,
                (snapshot[1].velocity - snapshot[0].velocity).norm(),
            );
        }
        env.step();
    }

    let snapshot = env.snapshot();
    let final_separation = (snapshot[1].position - snapshot[0].position).norm();
    let drift = (final_separation - dist).abs() / dist * 100.0;
    println!("\nAfter one period the separation drifted {drift:.3}%");
}

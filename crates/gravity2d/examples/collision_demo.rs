//! Collision merging example
//!
//! Runs a random planetary disk with merging enabled and reports how the
//! body count falls while mass and momentum stay put.
//!
//! Run with: cargo run --package gravity2d --example collision_demo

use nalgebra::Vector2;

use gravity2d::scenario::random_disk;
use gravity2d::{Environment, Particle, Strategy};

fn main() {
    env_logger::init();

    println!("Collision Demo: Disk Accretion\n");
    println!("{}", "=".repeat(60));

    let particles = random_disk(60, 12);
    let initial_count = particles.len();
    let initial_mass: f64 = particles.iter().map(|p| p.mass).sum();
    let initial_momentum = particles
        .iter()
        .fold(Vector2::zeros(), |acc, p: &Particle| acc + p.momentum());

    println!("\nInitial disk: {initial_count} bodies, {initial_mass:.1} earth masses");

    let env = Environment::with_particles(particles);
    env.set_strategy(Strategy::MultiThreaded { threads: 4 })
        .expect("valid strategy");
    env.set_time_step(0.05).expect("positive time step");

    let total_days = 2_000.0;
    let ticks = (total_days / 0.05) as usize;
    for tick in 0..ticks {
        env.step();
        if tick % (ticks / 10) == 0 {
            let snapshot = env.snapshot();
            println!(
                "  t = {:7.1} days  bodies = {:3}  largest = {:8.2} earth masses",
                env.clock().time_passed,
                snapshot.len(),
                snapshot.iter().map(|p| p.mass).fold(0.0, f64::max),
            );
        }
    }

    let snapshot = env.snapshot();
    let final_mass: f64 = snapshot.iter().map(|p| p.mass).sum();
    let final_momentum = snapshot
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.momentum());

    println!("\n{}", "=".repeat(60));
    println!("Final system: {} bodies (started with {initial_count})", snapshot.len());
    println!("Mass: {initial_mass:.6} -> {final_mass:.6} earth masses");
    println!(
        "Momentum drift: {:.3e}",
        (final_momentum - initial_momentum).norm()
    );
    for body in snapshot.iter().filter(|p| p.mass > 1000.0) {
        println!(
            "  {} at ({:.0}, {:.0}): {:.1} earth masses",
            body.display_name(),
            body.position.x,
            body.position.y,
            body.mass
        );
    }
}

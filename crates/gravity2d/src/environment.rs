//! Simulation environment: owns the store, the scheduler and the driver
//! thread, and serializes outside mutation through an operation queue.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::body::Particle;
use crate::error::{Error, Result};
use crate::schedule::multi_thread::WorkerPool;
use crate::schedule::{sequential, stable, Strategy};
use crate::store::{self, ParticleStore};

/// A deferred mutation of the particle store.
///
/// Operations submitted while the simulation runs are queued and applied
/// between ticks, so callers never contend with a tick in progress.
pub type StoreOp = Box<dyn FnOnce(&mut ParticleStore) + Send + 'static>;

/// Tick timing state.
#[derive(Debug, Clone, Copy)]
pub struct SimulationClock {
    /// Simulated time per tick, in days.
    pub time_step: f64,
    /// Total simulated time elapsed, in days.
    pub time_passed: f64,
    /// Minimum wall-clock interval between ticks.
    pub tick_interval: Duration,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 24.0,
            time_passed: 0.0,
            tick_interval: Duration::from_millis(8),
        }
    }
}

/// Scheduler selection and collision handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub strategy: Strategy,
    /// When set, contacting particles merge; otherwise they pass through
    /// each other.
    pub collisions: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            collisions: true,
        }
    }
}

struct EnvShared {
    store: Arc<RwLock<ParticleStore>>,
    queue: Mutex<VecDeque<StoreOp>>,
    clock: Mutex<SimulationClock>,
    config: Mutex<SimulationConfig>,
    running: AtomicBool,
}

/// A running (or pausable) N-body simulation.
///
/// # Examples
///
/// ```
/// use gravity2d::{Environment, Particle};
/// use nalgebra::{Point2, Vector2};
///
/// let mut env = Environment::with_particles(vec![
///     Particle::new(1.0, 1.0, Point2::new(-5.0, 0.0), Vector2::zeros()),
///     Particle::new(1.0, 1.0, Point2::new(5.0, 0.0), Vector2::zeros()),
/// ]);
/// env.step();
/// assert_eq!(env.snapshot().len(), 2);
/// ```
pub struct Environment {
    shared: Arc<EnvShared>,
    pool: Arc<WorkerPool>,
    driver: Option<JoinHandle<()>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::with_particles(Vec::new())
    }

    pub fn with_particles(particles: Vec<Particle>) -> Self {
        let store = Arc::new(RwLock::new(ParticleStore::from_particles(particles)));
        let shared = Arc::new(EnvShared {
            store: Arc::clone(&store),
            queue: Mutex::new(VecDeque::new()),
            clock: Mutex::new(SimulationClock::default()),
            config: Mutex::new(SimulationConfig::default()),
            running: AtomicBool::new(false),
        });
        Self {
            shared,
            pool: Arc::new(WorkerPool::new(store)),
            driver: None,
        }
    }

    /// True while the driver thread is ticking.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Submits a store mutation.
    ///
    /// While the simulation runs the operation is queued and applied before
    /// the next tick; otherwise it is applied immediately.
    pub fn submit(&self, op: StoreOp) {
        if self.is_running() {
            store::lock(&self.shared.queue).push_back(op);
        } else {
            apply_op(&self.pool, op);
        }
    }

    /// Clones the current particle set.
    pub fn snapshot(&self) -> Vec<Particle> {
        store::read(&self.shared.store).snapshot()
    }

    pub fn clock(&self) -> SimulationClock {
        *store::lock(&self.shared.clock)
    }

    pub fn config(&self) -> SimulationConfig {
        *store::lock(&self.shared.config)
    }

    /// Sets the simulated time per tick, in days.
    pub fn set_time_step(&self, time_step: f64) -> Result<()> {
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(Error::InvalidParam(format!(
                "time step must be finite and positive, got {time_step}"
            )));
        }
        store::lock(&self.shared.clock).time_step = time_step;
        Ok(())
    }

    /// Sets the minimum wall-clock interval between ticks.
    pub fn set_tick_interval(&self, interval: Duration) {
        store::lock(&self.shared.clock).tick_interval = interval;
    }

    pub fn set_strategy(&self, strategy: Strategy) -> Result<()> {
        if let Strategy::StabilityBounded { ratio_thresh } = strategy {
            if !ratio_thresh.is_finite() || ratio_thresh <= 0.0 {
                return Err(Error::InvalidParam(format!(
                    "step-ratio threshold must be finite and positive, got {ratio_thresh}"
                )));
            }
        }
        store::lock(&self.shared.config).strategy = strategy;
        Ok(())
    }

    pub fn set_collisions(&self, collisions: bool) {
        store::lock(&self.shared.config).collisions = collisions;
    }

    /// Runs a single tick on the calling thread.
    ///
    /// Intended for stopped environments; a driver started with
    /// [`start`](Environment::start) calls the same tick internally.
    pub fn step(&self) {
        run_tick(&self.shared, &self.pool);
    }

    /// Starts the driver thread. Does nothing when already started.
    pub fn start(&mut self) {
        if self.driver.is_some() {
            return;
        }
        self.shared.running.store(true, Ordering::SeqCst);
        let shared = Arc::clone(&self.shared);
        let pool = Arc::clone(&self.pool);
        let spawned = thread::Builder::new()
            .name("gravity2d-driver".into())
            .spawn(move || driver_loop(shared, pool));
        match spawned {
            Ok(handle) => {
                log::info!("simulation started");
                self.driver = Some(handle);
            }
            Err(err) => {
                self.shared.running.store(false, Ordering::SeqCst);
                log::error!("failed to spawn driver: {err}");
            }
        }
    }

    /// Stops the driver thread and joins it. Idempotent.
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.driver.take() {
            if handle.join().is_err() {
                log::error!("driver thread panicked");
            }
            log::info!("simulation stopped");
        }
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        self.stop();
    }
}

fn driver_loop(shared: Arc<EnvShared>, pool: Arc<WorkerPool>) {
    let mut next_tick = Instant::now();
    while shared.running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now < next_tick {
            thread::sleep((next_tick - now).min(Duration::from_millis(1)));
            continue;
        }
        run_tick(&shared, &pool);
        let interval = store::lock(&shared.clock).tick_interval;
        next_tick = now + interval;
    }
}

fn run_tick(shared: &EnvShared, pool: &WorkerPool) {
    drain_queue(shared, pool);
    let dt = store::lock(&shared.clock).time_step;
    let config = *store::lock(&shared.config);
    match config.strategy {
        Strategy::Sequential | Strategy::MultiThreaded { threads: 0 } => {
            sequential::tick(&mut store::write(&shared.store), dt, config.collisions);
        }
        Strategy::MultiThreaded { threads } => {
            pool.tick(threads, dt, config.collisions);
        }
        Strategy::StabilityBounded { ratio_thresh } => {
            stable::tick(
                &mut store::write(&shared.store),
                dt,
                ratio_thresh,
                config.collisions,
            );
        }
    }
    store::lock(&shared.clock).time_passed += dt;
}

/// Drains queued operations in submission order. A panicking operation is
/// logged and dropped; the rest of the queue still runs.
fn drain_queue(shared: &EnvShared, pool: &WorkerPool) {
    loop {
        // The queue lock is released while the operation runs, so an
        // operation can submit further operations without deadlocking.
        let op = match store::lock(&shared.queue).pop_front() {
            Some(op) => op,
            None => return,
        };
        apply_op(pool, op);
    }
}

/// Applies one operation between passes. The pool serializes the access
/// against any tick in flight, so a structural mutation never interleaves
/// with an interaction or integration phase.
fn apply_op(pool: &WorkerPool, op: StoreOp) {
    pool.with_store_mut(|store| {
        if catch_unwind(AssertUnwindSafe(|| op(store))).is_err() {
            log::error!("queued store operation panicked; continuing");
        }
    });
}

//! Worker-pool scheduler.
//!
//! A tick is split into two task phases separated by a barrier: first every
//! pair task runs [`interact`], then every integration task runs
//! [`integrate`]. Tasks are claimed in blocks from generation-tagged
//! counters, and the driver thread participates alongside the workers, so a
//! pool with zero live workers still makes progress.
//!
//! Merges are recorded as pending removals and compacted in descending
//! index order after both phases finish, once the driver holds the store
//! write lock exclusively.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::integrator::integrate;
use crate::interaction::{interact, Interaction};
use crate::partition::{pair_count, triangle_pair, TaskCounter};
use crate::store::{self, ParticleStore};

const POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, Default)]
struct TickParams {
    n: usize,
    dt: f64,
    merge: bool,
}

/// State shared between the driver and the workers.
#[derive(Debug)]
struct PoolShared {
    /// Unclaimed pair tasks for the current generation.
    pair_tasks: TaskCounter,
    /// Countdown of unfinished pair tasks; the phase barrier waits on it.
    pairs_left: AtomicI64,
    /// Unclaimed integration tasks for the current generation.
    integ_tasks: TaskCounter,
    /// Countdown of unfinished integration tasks.
    integ_left: AtomicI64,
    /// Bumped once per tick, after the parameters and counters are armed,
    /// to wake the workers. A worker that observes the new value is
    /// guaranteed to see the armed state.
    generation: AtomicU64,
    /// Desired worker count; workers above it retire themselves.
    target: AtomicUsize,
    /// Live worker count.
    active: AtomicUsize,
    running: AtomicBool,
    params: Mutex<TickParams>,
    /// Indices merged away this tick, kept sorted and deduplicated.
    removals: Mutex<Vec<usize>>,
}

/// Pool of worker threads driving multi-threaded ticks over a shared store.
#[derive(Debug)]
pub struct WorkerPool {
    store: Arc<RwLock<ParticleStore>>,
    shared: Arc<PoolShared>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    /// Serializes ticks; only one driver may arm the counters at a time.
    tick_lock: Mutex<()>,
}

impl WorkerPool {
    pub fn new(store: Arc<RwLock<ParticleStore>>) -> Self {
        Self {
            store,
            shared: Arc::new(PoolShared {
                pair_tasks: TaskCounter::new(),
                pairs_left: AtomicI64::new(0),
                integ_tasks: TaskCounter::new(),
                integ_left: AtomicI64::new(0),
                generation: AtomicU64::new(0),
                target: AtomicUsize::new(0),
                active: AtomicUsize::new(0),
                running: AtomicBool::new(true),
                params: Mutex::new(TickParams::default()),
                removals: Mutex::new(Vec::new()),
            }),
            handles: Mutex::new(Vec::new()),
            tick_lock: Mutex::new(()),
        }
    }

    /// The shared store this pool ticks over.
    pub fn store(&self) -> &Arc<RwLock<ParticleStore>> {
        &self.store
    }

    /// Runs `f` with exclusive access to the store, serialized against
    /// ticks. Structural mutations go through here so they land between
    /// passes, never in the middle of one.
    pub fn with_store_mut<R>(&self, f: impl FnOnce(&mut ParticleStore) -> R) -> R {
        let _tick = store::lock(&self.tick_lock);
        let mut guard = store::write(&self.store);
        f(&mut guard)
    }

    /// Number of live worker threads.
    pub fn active_workers(&self) -> usize {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Runs one tick of length `dt` across `threads` workers.
    ///
    /// The pool grows or shrinks toward `threads` lazily; the tick runs to
    /// completion regardless because the caller participates in the work.
    pub fn tick(&self, threads: usize, dt: f64, merge: bool) {
        let _tick = store::lock(&self.tick_lock);
        let shared = &self.shared;
        shared.target.store(threads, Ordering::SeqCst);
        self.spawn_missing(threads);

        let n = store::read(&self.store).len();
        let pairs = pair_count(n);
        {
            let mut params = store::lock(&shared.params);
            *params = TickParams { n, dt, merge };
        }
        let generation = shared.generation.load(Ordering::SeqCst) + 1;
        shared.pairs_left.store(pairs as i64, Ordering::SeqCst);
        shared.integ_left.store(n as i64, Ordering::SeqCst);
        shared.pair_tasks.arm(generation, pairs);
        shared.integ_tasks.arm(generation, n);
        shared.generation.store(generation, Ordering::SeqCst);

        do_tasks(&self.store, shared, generation);

        // Store write lock before the removals mutex; workers only take the
        // removals mutex while holding the store read lock.
        let mut store = store::write(&self.store);
        let mut removals = store::lock(&shared.removals);
        for idx in removals.drain(..).rev() {
            store.remove(idx);
        }
    }

    fn spawn_missing(&self, target: usize) {
        let mut handles = store::lock(&self.handles);
        handles.retain(|handle| !handle.is_finished());
        while self.shared.active.load(Ordering::SeqCst) < target {
            let index = self.shared.active.fetch_add(1, Ordering::SeqCst);
            let store = Arc::clone(&self.store);
            let shared = Arc::clone(&self.shared);
            let spawned = thread::Builder::new()
                .name(format!("gravity2d-worker-{index}"))
                .spawn(move || worker_loop(store, shared, index));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    self.shared.active.fetch_sub(1, Ordering::SeqCst);
                    log::error!("failed to spawn worker {index}: {err}");
                    break;
                }
            }
        }
    }

    /// Stops the workers and joins them.
    pub fn shutdown(&self) {
        self.shared.running.store(false, Ordering::SeqCst);
        let handles = {
            let mut handles = store::lock(&self.handles);
            std::mem::take(&mut *handles)
        };
        for handle in handles {
            if handle.join().is_err() {
                log::error!("worker thread panicked");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(store: Arc<RwLock<ParticleStore>>, shared: Arc<PoolShared>, index: usize) {
    let mut seen = shared.generation.load(Ordering::SeqCst);
    while shared.running.load(Ordering::SeqCst) && index < shared.target.load(Ordering::SeqCst) {
        let current = shared.generation.load(Ordering::SeqCst);
        if current == seen {
            thread::sleep(POLL_INTERVAL);
            continue;
        }
        seen = current;
        do_tasks(&store, &shared, current);
    }
    shared.active.fetch_sub(1, Ordering::SeqCst);
}

/// Works through the task counters for `generation`, then waits on the
/// phase barriers until every claimed task has completed.
///
/// Bails out without touching the barriers when the counters have moved on
/// to a newer generation; claimed ranges are only ever interpreted against
/// the parameters armed for the same generation.
fn do_tasks(store: &RwLock<ParticleStore>, shared: &PoolShared, generation: u64) {
    let params = *store::lock(&shared.params);
    let pairs = pair_count(params.n);
    let claimants = shared.target.load(Ordering::SeqCst).max(1) + 1;
    let block = (pairs / (claimants * 4)).max(1);

    while let Some(range) = shared.pair_tasks.claim(generation, block) {
        let done = range.len() as i64;
        let guard = store::read(store);
        for k in range {
            let (i, j) = triangle_pair(params.n, k);
            // Lock order is ascending by index, so pair lockers never cycle.
            let mut a = guard.lock(i);
            let mut b = guard.lock(j);
            if let Interaction::Merged = interact(&mut a, &mut b, params.merge) {
                log::debug!("merged particle {j} into {i}");
                record_removal(shared, j);
            }
        }
        drop(guard);
        shared.pairs_left.fetch_sub(done, Ordering::SeqCst);
    }
    if !shared.pair_tasks.matches(generation) {
        return;
    }
    while shared.pairs_left.load(Ordering::SeqCst) > 0 {
        thread::sleep(POLL_INTERVAL);
    }

    let integ_block = (params.n / (claimants * 4)).max(1);
    while let Some(range) = shared.integ_tasks.claim(generation, integ_block) {
        let done = range.len() as i64;
        let guard = store::read(store);
        for idx in range {
            integrate(&mut guard.lock(idx), params.dt);
        }
        drop(guard);
        shared.integ_left.fetch_sub(done, Ordering::SeqCst);
    }
    if !shared.integ_tasks.matches(generation) {
        return;
    }
    while shared.integ_left.load(Ordering::SeqCst) > 0 {
        thread::sleep(POLL_INTERVAL);
    }
}

/// Records a merged-away index, skipping indices already recorded.
fn record_removal(shared: &PoolShared, idx: usize) {
    let mut removals = store::lock(&shared.removals);
    if let Err(pos) = removals.binary_search(&idx) {
        removals.insert(pos, idx);
    }
}

//! Tick schedulers.
//!
//! A tick evaluates every unordered particle pair, then integrates every
//! particle. The schedulers differ in how that work is ordered:
//!
//! * [`sequential`] walks pairs on the calling thread.
//! * [`stable`] splits the tick into sub-steps sized so no pair closes more
//!   than a bounded fraction of its separation per step.
//! * [`multi_thread`] fans pair and integration tasks out to a worker pool.

pub mod multi_thread;
pub mod sequential;
pub mod stable;

#[cfg(test)]
mod multi_thread_test;

/// Which scheduler drives the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Single-threaded fixed-step ticks.
    Sequential,
    /// Worker-pool ticks with the given thread count. A count of zero falls
    /// back to the sequential scheduler.
    MultiThreaded { threads: usize },
    /// Adaptive sub-stepping bounded by the given step-ratio threshold; see
    /// [`stable::tick`].
    StabilityBounded { ratio_thresh: f64 },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Sequential
    }
}

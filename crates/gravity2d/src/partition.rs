//! Pair-index partitioning for the multi-threaded scheduler.
//!
//! The `n·(n-1)/2` unordered pairs of an `n`-particle store are flattened
//! into a single index range so workers can claim contiguous blocks from a
//! shared counter without coordination. Counters carry the tick generation
//! alongside the remaining count, so a thread that slept through a tick
//! boundary cannot claim work it would interpret with stale parameters.

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of unordered pairs among `n` particles.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

const fn tri(m: usize) -> usize {
    m * (m + 1) / 2
}

/// Maps a flat pair index `k` back to the pair `(i, j)` with `i < j < n`.
///
/// Pairs are ordered row-major: `(0,1), (0,2), …, (0,n-1), (1,2), …`.
/// `k` must be below [`pair_count`]`(n)`.
pub fn triangle_pair(n: usize, k: usize) -> (usize, usize) {
    debug_assert!(k < pair_count(n));
    // Count from the tail of the sequence, where row lengths grow 1, 2, 3…
    // and the row index is the inverse triangular number of the offset.
    let r = pair_count(n) - 1 - k;
    let mut m = (((8 * r + 1) as f64).sqrt() as usize).saturating_sub(1) / 2;
    while tri(m + 1) <= r {
        m += 1;
    }
    while tri(m) > r {
        m -= 1;
    }
    let i = n - 2 - m;
    let j = n - 1 - (r - tri(m));
    (i, j)
}

const COUNT_BITS: u32 = 32;
const COUNT_MASK: u64 = (1 << COUNT_BITS) - 1;

/// Shared countdown of task indices, tagged with the generation it was
/// armed for.
///
/// [`claim`](TaskCounter::claim) hands out disjoint half-open index ranges
/// counting down from the armed total. A claim presents the generation the
/// caller is working; claims against a counter armed for a different
/// generation fail, so ranges are only ever interpreted against the
/// parameters they were armed with.
///
/// Counts are capped at `u32::MAX` (about 92 000 particles' worth of
/// pairs, far past what an O(n²) pass can sustain). The 32-bit generation
/// tag wraps after 2³² ticks, so a thread would have to stall across an
/// exact multiple of 2³² tick boundaries to alias a stale claim.
#[derive(Debug, Default)]
pub struct TaskCounter(AtomicU64);

impl TaskCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn pack(generation: u64, count: usize) -> u64 {
        debug_assert!((count as u64) <= COUNT_MASK);
        (generation << COUNT_BITS) | count as u64
    }

    /// Arms the counter with `count` tasks for `generation`.
    pub fn arm(&self, generation: u64, count: usize) {
        self.0.store(Self::pack(generation, count), Ordering::SeqCst);
    }

    /// True when the counter is armed for `generation`.
    pub fn matches(&self, generation: u64) -> bool {
        self.0.load(Ordering::SeqCst) >> COUNT_BITS == generation & (u64::MAX >> COUNT_BITS)
    }

    /// Claims up to `block` task indices for `generation`.
    ///
    /// Returns `None` when the counter is exhausted or armed for a
    /// different generation.
    pub fn claim(&self, generation: u64, block: usize) -> Option<Range<usize>> {
        let tag = (generation & (u64::MAX >> COUNT_BITS)) << COUNT_BITS;
        let mut current = self.0.load(Ordering::SeqCst);
        loop {
            if current & !COUNT_MASK != tag {
                return None;
            }
            let count = (current & COUNT_MASK) as usize;
            if count == 0 {
                return None;
            }
            let take = block.min(count);
            let next = tag | (count - take) as u64;
            match self
                .0
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Some(count - take..count),
                Err(observed) => current = observed,
            }
        }
    }
}

// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Heavy-hitters tracking with hysteresis on top of the sketch.

use core::cmp::Reverse;
use core::hash::Hash;
use std::collections::BinaryHeap;

use hashbrown::HashSet;
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cms::{CountMinSketch, SketchError};

/// The set of keys whose estimated frequency currently clears `m / k`.
///
/// `HotSet` feeds every observed event into a [`CountMinSketch`] and
/// maintains membership incrementally: a key is admitted the moment its
/// estimate reaches `m / k` (with `m` the number of events observed so far)
/// and retained until its estimate falls below the retention floor
/// `m / (k * (1 + leeway))`. The gap between the two thresholds is the
/// hysteresis band that keeps borderline keys from oscillating.
///
/// Eviction is lazy. Members sit in a min-heap keyed by the estimate they
/// had when pushed; only the heap top is ever examined, and a stale top
/// (its estimate has since grown) is re-pushed with the current value
/// rather than triggering a re-heapify.
///
/// Callers are expected to de-duplicate events upstream: one `observe` per
/// key per interval of interest, not one per raw mutation.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use repaint_sketch::HotSet;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let mut hot = HotSet::with_rng(2, 0.01, 0.1, &mut rng).unwrap();
///
/// hot.observe(5_u32);
/// assert!(hot.contains(5)); // estimate 1 >= m/k = 0.5
/// ```
pub struct HotSet<K>
where
    K: Copy + Eq + Hash + Ord + Into<u64>,
{
    sketch: CountMinSketch,
    k: usize,
    leeway: f64,
    /// Total events observed (`m`).
    stream_len: u64,
    members: HashSet<K>,
    /// Min-heap of `(estimate-at-push, key)`; priorities refreshed lazily.
    queue: BinaryHeap<Reverse<(u64, K)>>,
}

impl<K> HotSet<K>
where
    K: Copy + Eq + Hash + Ord + Into<u64>,
{
    /// Creates a tracker for roughly `k` heavy hitters.
    ///
    /// `delta` is forwarded to the sketch; `leeway` widens the retention
    /// band below the admission threshold.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError`] for `k == 0`, `delta` outside `(0, 1)`, or a
    /// negative / non-finite `leeway`.
    pub fn new(k: usize, delta: f64, leeway: f64) -> Result<Self, SketchError> {
        Self::with_rng(k, delta, leeway, &mut StdRng::from_entropy())
    }

    /// Creates a tracker using the caller's RNG for the sketch hash family.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError`] under the same conditions as [`new`](Self::new).
    pub fn with_rng<R: Rng + ?Sized>(
        k: usize,
        delta: f64,
        leeway: f64,
        rng: &mut R,
    ) -> Result<Self, SketchError> {
        if !(leeway.is_finite() && leeway >= 0.0) {
            return Err(SketchError::LeewayOutOfRange);
        }
        Ok(Self {
            sketch: CountMinSketch::with_rng(k, delta, rng)?,
            k,
            leeway,
            stream_len: 0,
            members: HashSet::new(),
            queue: BinaryHeap::new(),
        })
    }

    /// The number of events observed so far (`m`).
    #[must_use]
    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    /// The underlying sketch, read-only.
    #[must_use]
    pub fn sketch(&self) -> &CountMinSketch {
        &self.sketch
    }

    /// Records one event for `key` and updates membership.
    ///
    /// Admission and eviction both happen here: the key is admitted when its
    /// fresh estimate clears `m / k`, then every member whose estimate has
    /// fallen below the retention floor is evicted off the heap top.
    pub fn observe(&mut self, key: K) {
        self.sketch.increment(key);
        self.stream_len += 1;

        let estimate = self.sketch.estimate(key);
        if estimate as f64 >= self.admission_threshold() && self.members.insert(key) {
            self.queue.push(Reverse((estimate, key)));
        }
        self.evict_cooled();
    }

    /// Returns `true` if `key` is currently a heavy hitter.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.members.contains(&key)
    }

    /// Read-only view of the current heavy hitters.
    #[must_use]
    pub fn hitters(&self) -> &HashSet<K> {
        &self.members
    }

    /// Number of current heavy hitters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if no key is currently hot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn admission_threshold(&self) -> f64 {
        self.stream_len as f64 / self.k as f64
    }

    /// Estimates below this leave the set; strictly below the admission
    /// threshold whenever `leeway > 0`.
    fn retention_floor(&self) -> f64 {
        self.stream_len as f64 / (self.k as f64 * (1.0 + self.leeway))
    }

    /// Pops cooled members off the heap top.
    ///
    /// A top entry whose recorded priority is stale is re-pushed with its
    /// current estimate first; estimates only grow between calls, so each
    /// entry is refreshed at most once per pass and the loop terminates.
    fn evict_cooled(&mut self) {
        let floor = self.retention_floor();
        while let Some(&Reverse((recorded, key))) = self.queue.peek() {
            let current = self.sketch.estimate(key);
            if current != recorded {
                self.queue.pop();
                self.queue.push(Reverse((current, key)));
                continue;
            }
            if (current as f64) < floor {
                self.queue.pop();
                self.members.remove(&key);
            } else {
                break;
            }
        }
    }
}

impl<K> core::fmt::Debug for HotSet<K>
where
    K: Copy + Eq + Hash + Ord + Into<u64> + core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HotSet")
            .field("k", &self.k)
            .field("leeway", &self.leeway)
            .field("stream_len", &self.stream_len)
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

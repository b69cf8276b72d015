// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Count-Min Sketch over integer-keyed event streams.

use core::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Error returned when sketch parameters are out of range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SketchError {
    /// `k` must be at least 1.
    ZeroHitters,
    /// `delta` must lie strictly between 0 and 1.
    DeltaOutOfRange,
    /// `leeway` must be a finite non-negative fraction.
    LeewayOutOfRange,
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroHitters => write!(f, "heavy-hitter count k must be at least 1"),
            Self::DeltaOutOfRange => {
                write!(f, "error probability delta must lie strictly between 0 and 1")
            }
            Self::LeewayOutOfRange => {
                write!(f, "hysteresis leeway must be a finite non-negative fraction")
            }
        }
    }
}

impl core::error::Error for SketchError {}

/// A Count-Min Sketch: approximate frequencies for a stream of integer keys.
///
/// The sketch is a `depth x width` matrix of counters. Each row hashes the
/// key through its own member of a universal hash family
/// (`((a * x + b) mod p) mod width` for a fixed random prime `p`) and
/// increments one cell; an estimate is the minimum cell across rows. Hash
/// collisions can only inflate counts, so the estimate never undercounts.
///
/// Dimensions are derived from the caller's accuracy targets rather than
/// given directly: `epsilon = 1 / (2k)` bounds the additive error at
/// `epsilon * m` for a stream of length `m`, `width = ceil(e / epsilon)`,
/// and `depth = ceil(ln(1 / delta))` drives the failure probability below
/// `delta`.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use repaint_sketch::CountMinSketch;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut sketch = CountMinSketch::with_rng(10, 0.01, &mut rng).unwrap();
///
/// for _ in 0..5 {
///     sketch.increment(42_u32);
/// }
/// assert!(sketch.estimate(42_u32) >= 5);
/// ```
pub struct CountMinSketch {
    /// Row-major `depth x width` counter matrix.
    cells: Vec<u64>,
    width: usize,
    depth: usize,
    epsilon: f64,
    delta: f64,
    /// Shared hash-family prime; exceeds every 31-bit key.
    prime: u64,
    /// Per-row `(a, b)` coefficients, `1 <= a <= p - 2`, `0 <= b <= p - 1`.
    rows: Vec<(u64, u64)>,
}

impl CountMinSketch {
    /// Creates a sketch sized for `k` heavy hitters and failure probability
    /// `delta`, seeding its hash family from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError`] when `k` is zero or `delta` is outside `(0, 1)`.
    pub fn new(k: usize, delta: f64) -> Result<Self, SketchError> {
        Self::with_rng(k, delta, &mut StdRng::from_entropy())
    }

    /// Creates a sketch using the caller's RNG for the prime and the per-row
    /// hash coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError`] when `k` is zero or `delta` is outside `(0, 1)`.
    pub fn with_rng<R: Rng + ?Sized>(
        k: usize,
        delta: f64,
        rng: &mut R,
    ) -> Result<Self, SketchError> {
        if k == 0 {
            return Err(SketchError::ZeroHitters);
        }
        if !(delta > 0.0 && delta < 1.0) {
            return Err(SketchError::DeltaOutOfRange);
        }

        let epsilon = 1.0 / (2 * k) as f64;
        let width = (core::f64::consts::E / epsilon).ceil() as usize;
        let depth = (1.0 / delta).ln().ceil() as usize;

        let prime = u64::from(random_prime(rng));
        let rows = (0..depth)
            .map(|_| (rng.gen_range(1..=prime - 2), rng.gen_range(0..=prime - 1)))
            .collect();

        Ok(Self {
            cells: vec![0; width * depth],
            width,
            depth,
            epsilon,
            delta,
            prime,
            rows,
        })
    }

    /// Number of counter rows (independent hash functions).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of counters per row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// The additive error factor `epsilon = 1 / (2k)`.
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The target failure probability.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Cell index for `key` in `row`.
    fn cell(&self, row: usize, key: u64) -> usize {
        let (a, b) = self.rows[row];
        // 128-bit intermediate: a and b are below 2^32, key is arbitrary u64.
        let hashed = ((u128::from(a) * u128::from(key) + u128::from(b))
            % u128::from(self.prime)) as u64;
        row * self.width + (hashed % self.width as u64) as usize
    }

    /// Records one occurrence of `key`.
    pub fn increment(&mut self, key: impl Into<u64>) {
        let key = key.into();
        for row in 0..self.depth {
            let cell = self.cell(row, key);
            self.cells[cell] += 1;
        }
    }

    /// Returns the estimated occurrence count of `key`.
    ///
    /// The estimate is at least the true count, and exceeds it by more than
    /// `epsilon * m` (for a stream of `m` increments) with probability at
    /// most [`delta`](Self::delta).
    #[must_use]
    pub fn estimate(&self, key: impl Into<u64>) -> u64 {
        let key = key.into();
        (0..self.depth)
            .map(|row| self.cells[self.cell(row, key)])
            .min()
            .unwrap_or(0)
    }
}

impl fmt::Debug for CountMinSketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountMinSketch")
            .field("depth", &self.depth)
            .field("width", &self.width)
            .field("epsilon", &self.epsilon)
            .field("delta", &self.delta)
            .field("prime", &self.prime)
            .finish_non_exhaustive()
    }
}

/// Draws a uniform random prime from the upper half of the 32-bit range.
///
/// Rejection sampling with trial division; construction happens once per
/// sketch, so throughput is irrelevant.
fn random_prime<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    loop {
        let candidate = rng.gen_range(1_u32 << 31..u32::MAX) | 1;
        if is_prime(candidate) {
            return candidate;
        }
    }
}

fn is_prime(x: u32) -> bool {
    if x < 2 {
        return false;
    }
    if x % 2 == 0 {
        return x == 2;
    }
    let mut i = 3;
    while i <= x.isqrt() {
        if x % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

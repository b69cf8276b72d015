// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint Sketch: sublinear frequency estimation for update streams.
//!
//! This crate decides, in sublinear space, which identifiers in a stream of
//! update events are "hot". It provides two layers:
//!
//! - **Count-Min Sketch** ([`CountMinSketch`]): a matrix of counters behind a
//!   universal hash family, answering "roughly how often has this key been
//!   seen?" The estimate never undercounts, and overcounts by at most
//!   `epsilon * m` (with `m` the stream length) with probability `1 - delta`.
//! - **Heavy hitters** ([`HotSet`]): the set of keys whose estimated frequency
//!   currently clears the `m / k` threshold, maintained incrementally with
//!   hysteresis so borderline keys do not flap in and out.
//!
//! ## Quick Start
//!
//! ```rust
//! use repaint_sketch::HotSet;
//!
//! // Track the ~4 hottest keys, 1% error probability, 10% hysteresis.
//! let mut hot = HotSet::new(4, 0.01, 0.1).unwrap();
//!
//! for _ in 0..100 {
//!     hot.observe(7_u32);
//! }
//! hot.observe(3_u32);
//!
//! assert!(hot.contains(7));
//! ```
//!
//! ## Choosing parameters
//!
//! `k` is the number of heavy hitters you intend to track: the sketch width is
//! derived from `epsilon = 1 / (2k)`, so larger `k` means a wider, more
//! precise sketch. `delta` bounds the probability that any single estimate
//! exceeds its error budget. `leeway` widens the retention band: a key is
//! admitted when its estimate reaches `m / k` and retained until it falls
//! below `m / (k * (1 + leeway))`.
//!
//! Construction draws a random prime and per-row hash coefficients; seed the
//! RNG ([`CountMinSketch::with_rng`], [`HotSet::with_rng`]) for reproducible
//! behavior in tests.

mod cms;
mod hot;

pub use cms::{CountMinSketch, SketchError};
pub use hot::HotSet;

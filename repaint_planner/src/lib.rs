// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint Planner: decides, per frame, what to render and what to serve
//! from cache.
//!
//! A frame is two passes over a [`repaint_scene::SceneGraph`]:
//!
//! 1. **Evaluation** ([`evaluate`]): every node receives its mark for the
//!    frame: non-cacheable when its id is currently a heavy hitter or it
//!    is the root, cacheable otherwise. Its dirty flag is latched and
//!    cleared.
//! 2. **Refresh** ([`Planner::refresh`]): a breadth-first walk from the
//!    root renders what changed, installs or refreshes cache entries for
//!    cacheable nodes, restores unchanged cacheable nodes from their
//!    entries, and prunes entries whose nodes disappeared or went
//!    non-cacheable. The highest cacheable ancestor wins: once a node is
//!    served from (or into) the cache, its subtree is not visited and any
//!    stale descendant entries are reaped.
//!
//! An idle frame (no updates since the previous one) performs no render
//! calls and leaves the cache table untouched.
//!
//! Rendering itself is opaque to this crate: the planner drives a
//! [`Renderer`] the caller supplies and reports what it did in a
//! [`FrameReport`].
//!
//! ## Quick Start
//!
//! ```rust
//! use repaint_planner::Planner;
//! use repaint_scene::{NodeId, NodeKind, SceneGraph};
//!
//! let mut scene = SceneGraph::new();
//! scene.add(NodeId::ROOT, NodeId::new(1), NodeKind::Widget).unwrap();
//! scene.add(NodeId::new(1), NodeId::new(2), NodeKind::text("a")).unwrap();
//!
//! let mut planner = Planner::new();
//! let mut rendered = Vec::new();
//!
//! // No heavy hitters: everything below the root is cacheable.
//! let report = planner.run_frame(&mut scene, |_| false, &mut |node: &repaint_scene::Node| {
//!     rendered.push(node.id());
//! });
//! assert_eq!(rendered, vec![NodeId::ROOT, NodeId::new(1)]);
//! assert_eq!(report.rendered.len(), 2);
//!
//! // Second frame, nothing changed: zero renders.
//! rendered.clear();
//! planner.run_frame(&mut scene, |_| false, &mut |node: &repaint_scene::Node| {
//!     rendered.push(node.id());
//! });
//! assert!(rendered.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod evaluate;
mod plan;

pub use evaluate::evaluate;
pub use plan::{FrameReport, Planner, Renderer};

// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint Scene: the HMI scene graph the repaint optimizer operates on.
//!
//! A scene is a rooted acyclic graph of typed nodes: one `View` root,
//! `Widget` interiors, and `Text` leaves carrying string content. A node may
//! be shared by several parents; it lives for as long as at least one parent
//! edge points at it. The graph tracks the per-frame state the optimizer
//! needs (a `dirty` flag raised by updates and a cacheable/non-cacheable
//! mark assigned each frame), and every node can snapshot itself into a
//! [`CacheEntry`] and be restored from one.
//!
//! ## Quick Start
//!
//! ```rust
//! use repaint_scene::{NodeId, NodeKind, SceneGraph};
//!
//! let mut scene = SceneGraph::new();
//! let widget = scene
//!     .add(NodeId::ROOT, NodeId::new(1), NodeKind::Widget)
//!     .unwrap();
//! scene
//!     .add(widget, NodeId::new(2), NodeKind::text("hello"))
//!     .unwrap();
//!
//! // Updating a clean node reports the clean -> dirty transition.
//! let became_dirty = scene.update(NodeId::new(2), &["hi".into()]).unwrap();
//! assert!(became_dirty);
//!
//! // Breadth-first traversal from the root, each node once.
//! let order: Vec<NodeId> = scene.bfs().collect();
//! assert_eq!(order.len(), 3);
//! ```
//!
//! ## Structure and ownership
//!
//! Nodes are addressed by [`NodeId`] and stored centrally; edges are id
//! lists kept consistent in both directions (`child` appears in
//! `parent`'s children iff `parent` appears in `child`'s parents). There
//! are no back-pointers to chase and no reference counting: removing the
//! last parent edge of a node destroys it, along with any descendants
//! orphaned by the removal.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cache;
mod graph;
mod id;
mod node;
mod traverse;

pub use cache::CacheEntry;
pub use graph::{SceneError, SceneGraph};
pub use id::NodeId;
pub use node::{Node, NodeKind};
pub use traverse::{Bfs, Dfs};

// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identifiers.

use core::fmt;

/// Identifier of a node in a [`SceneGraph`](crate::SceneGraph).
///
/// Identifiers are plain unsigned integers chosen by the caller; id `0` is
/// reserved for the root and always present. Uniqueness within a graph is
/// the caller's responsibility;
/// [`SceneGraph::lease_id`](crate::SceneGraph::lease_id) helps pick a free one.
///
/// `NodeId` converts into `u64` so it can key a frequency sketch directly.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The root identifier, `0`.
    pub const ROOT: Self = Self(0);

    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` for the root identifier.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        u64::from(id.0)
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.0).finish()
    }
}

// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node variants and per-node frame state.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::cache::CacheEntry;
use crate::id::NodeId;

/// The variant of a node, with its type-specific payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// The root of the scene. Never cacheable, exactly one per graph.
    View,
    /// An interior grouping node.
    Widget,
    /// A leaf carrying string content.
    Text {
        /// The current content.
        content: String,
    },
}

impl NodeKind {
    /// Builds a `Text` kind from anything stringy.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// The variant letter used in dumps and in the wire protocol.
    #[must_use]
    pub fn letter(&self) -> char {
        match self {
            Self::View => 'V',
            Self::Widget => 'W',
            Self::Text { .. } => 'T',
        }
    }
}

/// One node of a [`SceneGraph`](crate::SceneGraph).
///
/// Besides its variant, a node carries the bidirectional edge lists and the
/// per-frame repaint state:
///
/// - `dirty`: raised by [`SceneGraph::update`](crate::SceneGraph::update)
///   on the clean→dirty transition, lowered once per frame by the
///   evaluator's [`mark`](Self::mark).
/// - the cacheable mark, assigned by `mark` each frame; the root reports
///   non-cacheable whatever its mark says.
/// - `recently_updated`: the dirty flag as it stood when the current
///   frame's mark was assigned; this is what the refresh planner reads to
///   tell "updated during this frame" apart from "merely hot".
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parents: Vec<NodeId>,
    dirty: bool,
    cacheable: bool,
    recently_updated: bool,
    update_count: u64,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            children: Vec::new(),
            parents: Vec::new(),
            dirty: false,
            // Nothing is cacheable before the first evaluation pass.
            cacheable: false,
            recently_updated: false,
            update_count: 0,
        }
    }

    /// This node's identifier.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// This node's variant and payload.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The `Text` content, if this is a `Text` node.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Direct children, in insertion order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().copied()
    }

    /// Direct parents, in insertion order.
    pub fn parents(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.parents.iter().copied()
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Number of direct parents.
    #[must_use]
    pub fn parent_count(&self) -> usize {
        self.parents.len()
    }

    /// Returns `true` if `id` is a direct child.
    #[must_use]
    pub fn has_child(&self, id: NodeId) -> bool {
        self.children.contains(&id)
    }

    /// Returns `true` if `id` is a direct parent.
    #[must_use]
    pub fn has_parent(&self, id: NodeId) -> bool {
        self.parents.contains(&id)
    }

    /// Returns `true` if the node has been updated since the last
    /// evaluation pass.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns `true` if the node was dirty when the current frame's mark
    /// was assigned.
    #[must_use]
    pub fn recently_updated(&self) -> bool {
        self.recently_updated
    }

    /// Returns `true` if the current frame's mark allows serving this node
    /// from cache. The root is never cacheable.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        !matches!(self.kind, NodeKind::View) && self.cacheable
    }

    /// Number of clean→dirty transitions this node has seen.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Assigns this frame's mark, latching and clearing the dirty flag.
    ///
    /// Called by the evaluator exactly once per node per frame. After the
    /// call the node is clean, `recently_updated` reports whether it was
    /// dirty coming in, and [`is_cacheable`](Self::is_cacheable) reflects
    /// `cacheable` (except for the root, which stays non-cacheable).
    pub fn mark(&mut self, cacheable: bool) {
        self.recently_updated = self.dirty;
        self.dirty = false;
        self.cacheable = cacheable;
    }

    /// Applies a variant-specific update; `Text` takes its new content from
    /// the first argument, the other variants ignore the arguments.
    ///
    /// Returns `true` on the clean→dirty transition.
    pub(crate) fn update(&mut self, args: &[String]) -> Result<bool, MissingContent> {
        if let NodeKind::Text { content } = &mut self.kind {
            let new_content = args.first().ok_or(MissingContent)?;
            content.clone_from(new_content);
        }
        if self.dirty {
            Ok(false)
        } else {
            self.dirty = true;
            self.update_count += 1;
            Ok(true)
        }
    }

    /// Snapshots this node's renderable state into a fresh cache entry.
    #[must_use]
    pub fn to_cache_entry(&self) -> CacheEntry {
        match &self.kind {
            NodeKind::View => CacheEntry::View,
            NodeKind::Widget => CacheEntry::Widget,
            NodeKind::Text { content } => CacheEntry::Text {
                content: content.clone(),
            },
        }
    }

    /// Restores renderable state from a cache entry.
    ///
    /// The entry must have been produced by a node of the same variant; a
    /// mismatch is a caller bug and trips a debug assertion.
    pub fn apply_cache_entry(&mut self, entry: &CacheEntry) {
        debug_assert_eq!(
            self.kind.letter(),
            entry.letter(),
            "cache entry variant does not match node {}",
            self.id
        );
        if let (NodeKind::Text { content }, CacheEntry::Text { content: cached }) =
            (&mut self.kind, entry)
        {
            content.clone_from(cached);
        }
    }
}

/// Internal marker: a `Text` update arrived without a content argument.
#[derive(Debug)]
pub(crate) struct MissingContent;

impl fmt::Display for Node {
    /// The single-node dump form: `*{W|7|par:1|ch:3}`, `{T|9|'txt'}`, with a
    /// leading `*` while the node is dirty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dirty {
            f.write_str("*")?;
        }
        match &self.kind {
            NodeKind::View => write!(f, "{{V|{}|ch:{}}}", self.id, self.children.len()),
            NodeKind::Widget => write!(
                f,
                "{{W|{}|par:{}|ch:{}}}",
                self.id,
                self.parents.len(),
                self.children.len()
            ),
            NodeKind::Text { content } => write!(f, "{{T|{}|'{}'}}", self.id, content),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("children", &self.children)
            .field("parents", &self.parents)
            .field("dirty", &self.dirty)
            .field("cacheable", &self.cacheable)
            .field("recently_updated", &self.recently_updated)
            .field("update_count", &self.update_count)
            .finish()
    }
}

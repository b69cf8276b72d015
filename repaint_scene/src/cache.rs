// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cache entries: per-variant snapshots of renderable state.

use alloc::string::String;
use core::fmt;

/// A snapshot of one node's renderable state.
///
/// Entries are produced by [`Node::to_cache_entry`](crate::Node::to_cache_entry)
/// and consumed by [`Node::apply_cache_entry`](crate::Node::apply_cache_entry).
/// The variant tags match the node variants: `View` and `Widget` nodes have
/// no renderable payload of their own, so their entries are empty markers;
/// a `Text` entry captures the content string.
///
/// An entry applied to a node of a different variant is a logic bug in the
/// caller, not a runtime condition.
#[derive(Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// Snapshot of a `View` node (no payload).
    View,
    /// Snapshot of a `Widget` node (no payload).
    Widget,
    /// Snapshot of a `Text` node: the content at capture time.
    Text {
        /// The captured string content.
        content: String,
    },
}

impl CacheEntry {
    /// The variant letter, matching the node dump format.
    #[must_use]
    pub fn letter(&self) -> char {
        match self {
            Self::View => 'V',
            Self::Widget => 'W',
            Self::Text { .. } => 'T',
        }
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View => f.write_str("CacheEntry::View"),
            Self::Widget => f.write_str("CacheEntry::Widget"),
            Self::Text { content } => write!(f, "CacheEntry::Text({content:?})"),
        }
    }
}

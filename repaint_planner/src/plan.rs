// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The refresh planner: render decisions and the cache table.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use repaint_scene::{CacheEntry, Node, NodeId, SceneGraph};

use crate::evaluate::evaluate;

/// The render primitive, supplied by the caller.
///
/// Rendering is modeled as an opaque synchronous effect; the planner only
/// decides *when* it happens. Implemented for any `FnMut(&Node)` closure.
pub trait Renderer {
    /// Renders one node.
    fn render(&mut self, node: &Node);
}

impl<F> Renderer for F
where
    F: FnMut(&Node),
{
    fn render(&mut self, node: &Node) {
        self(node);
    }
}

/// What one refresh pass did, in visit order.
///
/// The report is the planner's observable output, in the spirit of a
/// commit/damage summary: enough to audit a frame without instrumenting
/// the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Nodes that were rendered this frame.
    pub rendered: Vec<NodeId>,
    /// Nodes whose cache entry was installed or replaced.
    pub cached: Vec<NodeId>,
    /// Nodes served from an existing cache entry without rendering.
    pub reused: Vec<NodeId>,
    /// Cache entries dropped (non-cacheable nodes and post-frame pruning).
    pub evicted: Vec<NodeId>,
}

impl FrameReport {
    /// Returns `true` if the frame neither rendered nor touched the table.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.rendered.is_empty() && self.cached.is_empty() && self.evicted.is_empty()
    }
}

/// The cache-aware refresh planner.
///
/// Owns the cache table (`NodeId` → [`CacheEntry`]) across frames. Each
/// [`refresh`](Self::refresh) walks the graph breadth-first from the root
/// and, per node:
///
/// - **Cacheable, no entry:** render and install a fresh snapshot.
/// - **Cacheable, entry present, node or a direct child updated this
///   frame:** render and replace the snapshot.
/// - **Cacheable, entry present, untouched:** restore from the snapshot,
///   no render.
/// - **Non-cacheable:** drop any entry, render only if the frame touched
///   the node or its immediate children, and keep walking into the
///   children.
///
/// Children of a cacheable node are never visited: the highest cacheable
/// ancestor's entry stands in for the whole subtree, and the post-frame
/// prune removes any entries its descendants left behind.
#[derive(Debug, Default)]
pub struct Planner {
    table: HashMap<NodeId, CacheEntry>,
}

impl Planner {
    /// Creates a planner with an empty cache table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Number of live cache entries.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if `id` currently has a cache entry.
    #[must_use]
    pub fn is_cached(&self, id: NodeId) -> bool {
        self.table.contains_key(&id)
    }

    /// Iterates over the ids with live cache entries, in unspecified order.
    pub fn cached_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.table.keys().copied()
    }

    /// Runs a whole frame: [`evaluate`] with `is_hot`, then
    /// [`refresh`](Self::refresh).
    pub fn run_frame(
        &mut self,
        graph: &mut SceneGraph,
        is_hot: impl Fn(NodeId) -> bool,
        renderer: &mut impl Renderer,
    ) -> FrameReport {
        evaluate(graph, is_hot);
        self.refresh(graph, renderer)
    }

    /// Runs the refresh pass over an already-evaluated graph.
    ///
    /// Total: the graph invariants make every step infallible, so the only
    /// outputs are renderer calls, table mutations, and the report.
    pub fn refresh(&mut self, graph: &mut SceneGraph, renderer: &mut impl Renderer) -> FrameReport {
        let mut report = FrameReport::default();
        let mut served: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        let mut seen: HashSet<NodeId> = HashSet::new();
        queue.push_back(NodeId::ROOT);
        seen.insert(NodeId::ROOT);

        while let Some(id) = queue.pop_front() {
            let Ok(node) = graph.get(id) else { continue };
            let children: Vec<NodeId> = node.children().collect();
            let child_updated = children
                .iter()
                .any(|&c| graph.get(c).is_ok_and(Node::recently_updated));

            if node.is_cacheable() {
                let stale = node.recently_updated() || child_updated;
                if !self.table.contains_key(&id) || stale {
                    renderer.render(node);
                    report.rendered.push(id);
                    self.table.insert(id, node.to_cache_entry());
                    report.cached.push(id);
                } else {
                    let entry = self.table[&id].clone();
                    if let Ok(node) = graph.get_mut(id) {
                        node.apply_cache_entry(&entry);
                    }
                    report.reused.push(id);
                }
                // The subtree is represented by this entry; do not descend.
                served.insert(id);
            } else {
                if self.table.remove(&id).is_some() {
                    report.evicted.push(id);
                }
                let first_paint_below = children.iter().any(|&c| {
                    graph
                        .get(c)
                        .is_ok_and(|child| child.is_cacheable() && !self.table.contains_key(&c))
                });
                if node.recently_updated() || child_updated || first_paint_below {
                    renderer.render(node);
                    report.rendered.push(id);
                }
                for child in children {
                    if seen.insert(child) {
                        queue.push_back(child);
                    }
                }
            }
        }

        // Prune entries for nodes that were not served this frame: gone from
        // the graph, gone non-cacheable, or subsumed under a cached ancestor.
        let stale: Vec<NodeId> = self
            .table
            .keys()
            .copied()
            .filter(|id| !served.contains(id))
            .collect();
        for id in stale {
            self.table.remove(&id);
            report.evicted.push(id);
        }

        report
    }

    /// Drops every cache entry; the shutdown path.
    ///
    /// Returns the number of entries released.
    pub fn clear_cache(&mut self) -> usize {
        let released = self.table.len();
        self.table.clear();
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    use repaint_scene::NodeKind;

    fn id(raw: u32) -> NodeId {
        NodeId::new(raw)
    }

    /// root(0) -> W(1) -> T(2, "a").
    fn chain() -> SceneGraph {
        let mut scene = SceneGraph::new();
        scene.add(NodeId::ROOT, id(1), NodeKind::Widget).unwrap();
        scene.add(id(1), id(2), NodeKind::text("a")).unwrap();
        scene
    }

    struct Recorder {
        calls: Vec<NodeId>,
    }

    impl Recorder {
        fn new() -> Self {
            Self { calls: Vec::new() }
        }
    }

    impl Renderer for Recorder {
        fn render(&mut self, node: &Node) {
            self.calls.push(node.id());
        }
    }

    #[test]
    fn first_frame_paints_and_caches_the_highest_ancestor() {
        let mut scene = chain();
        let mut planner = Planner::new();
        let mut renderer = Recorder::new();

        let report = planner.run_frame(&mut scene, |_| false, &mut renderer);

        // The widget subsumes the text leaf; the root is painted because its
        // subtree saw first paint.
        assert_eq!(renderer.calls, vec![id(0), id(1)]);
        assert_eq!(report.cached, vec![id(1)]);
        assert!(planner.is_cached(id(1)));
        assert!(!planner.is_cached(id(0)));
        assert!(!planner.is_cached(id(2)));
    }

    #[test]
    fn idle_frame_renders_nothing_and_keeps_the_table() {
        let mut scene = chain();
        let mut planner = Planner::new();
        planner.run_frame(&mut scene, |_| false, &mut Recorder::new());
        let before: Vec<NodeId> = {
            let mut ids: Vec<NodeId> = planner.cached_ids().collect();
            ids.sort();
            ids
        };

        let mut renderer = Recorder::new();
        let report = planner.run_frame(&mut scene, |_| false, &mut renderer);

        assert!(renderer.calls.is_empty());
        assert!(report.is_idle());
        assert_eq!(report.reused, vec![id(1)]);
        let after: Vec<NodeId> = {
            let mut ids: Vec<NodeId> = planner.cached_ids().collect();
            ids.sort();
            ids
        };
        assert_eq!(before, after);
    }

    #[test]
    fn hot_leaf_keeps_its_cacheable_parent_rendering() {
        // S2: the text leaf is a heavy hitter; its parent stays cacheable
        // and refreshes its entry in the frame the update landed.
        let mut scene = chain();
        let mut planner = Planner::new();

        scene.update(id(2), &["b".to_string()]).unwrap();
        let mut renderer = Recorder::new();
        let report = planner.run_frame(&mut scene, |n| n == id(2), &mut renderer);

        assert_eq!(renderer.calls, vec![id(0), id(1)]);
        assert_eq!(report.cached, vec![id(1)]);
        assert!(planner.is_cached(id(1)));
        assert!(!planner.is_cached(id(2)));
    }

    #[test]
    fn cacheable_update_refreshes_the_entry() {
        // A cold update to a visited cacheable node must not be clobbered
        // by a stale entry.
        let mut scene = chain();
        let mut planner = Planner::new();
        // Make the widget hot so the text leaf is visited directly.
        planner.run_frame(&mut scene, |n| n == id(1), &mut Recorder::new());
        assert!(planner.is_cached(id(2)));

        scene.update(id(2), &["b".to_string()]).unwrap();
        let mut renderer = Recorder::new();
        planner.run_frame(&mut scene, |n| n == id(1), &mut renderer);

        assert!(renderer.calls.contains(&id(2)));
        assert_eq!(scene.get(id(2)).unwrap().content(), Some("b"));
    }

    #[test]
    fn going_cold_promotes_the_parent_and_reaps_the_leaf_entry() {
        let mut scene = chain();
        let mut planner = Planner::new();
        // Frame 1: widget hot, so the leaf gets its own entry.
        scene.update(id(1), &[]).unwrap();
        planner.run_frame(&mut scene, |n| n == id(1), &mut Recorder::new());
        assert!(planner.is_cached(id(2)));
        assert!(!planner.is_cached(id(1)));

        // Frame 2: widget cooled down; it becomes the highest cacheable
        // ancestor and the leaf's entry is subsumed away.
        let report = planner.run_frame(&mut scene, |_| false, &mut Recorder::new());
        assert!(planner.is_cached(id(1)));
        assert!(!planner.is_cached(id(2)));
        assert!(report.evicted.contains(&id(2)));
    }

    #[test]
    fn clear_cache_releases_everything() {
        let mut scene = chain();
        let mut planner = Planner::new();
        planner.run_frame(&mut scene, |_| false, &mut Recorder::new());
        assert!(planner.cache_len() > 0);

        let released = planner.clear_cache();
        assert!(released > 0);
        assert_eq!(planner.cache_len(), 0);
        assert!(planner.cached_ids().next().is_none());
    }

    #[test]
    fn removed_nodes_lose_their_entries_on_the_next_frame() {
        let mut scene = SceneGraph::new();
        scene.add(NodeId::ROOT, id(1), NodeKind::Widget).unwrap();
        scene.add(NodeId::ROOT, id(2), NodeKind::Widget).unwrap();
        let mut planner = Planner::new();
        planner.run_frame(&mut scene, |_| false, &mut Recorder::new());
        assert!(planner.is_cached(id(1)));
        assert!(planner.is_cached(id(2)));

        scene.remove(id(2)).unwrap();
        let report = planner.run_frame(&mut scene, |_| false, &mut Recorder::new());
        assert!(!planner.is_cached(id(2)));
        assert!(report.evicted.contains(&id(2)));
    }
}

// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene graph: node storage, edges, and structural operations.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use rand::Rng;

use crate::id::NodeId;
use crate::node::{Node, NodeKind};
use crate::traverse::{Bfs, Dfs};

/// Error returned by structural and update operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// The referenced node id is not in the graph.
    UnknownNode(NodeId),
    /// A node with this id already exists.
    DuplicateNode(NodeId),
    /// `View` is the root variant; it cannot be added elsewhere.
    ViewNotRoot(NodeId),
    /// The root cannot gain a parent or be detached.
    RootEdge,
    /// Linking these nodes would create a cycle.
    Cycle {
        /// The would-be parent.
        parent: NodeId,
        /// The would-be child.
        child: NodeId,
    },
    /// A `Text` update arrived without a content argument.
    MissingContent(NodeId),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node {id}"),
            Self::DuplicateNode(id) => write!(f, "node {id} already exists"),
            Self::ViewNotRoot(id) => {
                write!(f, "node {id}: the View variant is reserved for the root")
            }
            Self::RootEdge => write!(f, "the root cannot gain a parent or be detached"),
            Self::Cycle { parent, child } => {
                write!(f, "linking {parent} -> {child} would create a cycle")
            }
            Self::MissingContent(id) => {
                write!(f, "text node {id} updated without a content argument")
            }
        }
    }
}

impl core::error::Error for SceneError {}

/// A rooted acyclic scene graph with shared children.
///
/// The graph owns every node, keyed by [`NodeId`]; edges are kept consistent
/// in both directions. The root (`View`, id 0) is created with the graph and
/// can never be removed. Every other node is kept alive by its parent edges
/// and destroyed, together with any descendants this orphans, when the
/// last one disappears.
///
/// # Example
///
/// ```
/// use repaint_scene::{NodeId, NodeKind, SceneGraph};
///
/// let mut scene = SceneGraph::new();
/// scene.add(NodeId::ROOT, NodeId::new(1), NodeKind::Widget).unwrap();
/// scene.add(NodeId::ROOT, NodeId::new(2), NodeKind::Widget).unwrap();
///
/// // Node 3 is shared by widgets 1 and 2.
/// scene.add(NodeId::new(1), NodeId::new(3), NodeKind::text("shared")).unwrap();
/// scene.link(NodeId::new(2), NodeId::new(3)).unwrap();
///
/// scene.unlink(NodeId::new(1), NodeId::new(3)).unwrap();
/// assert!(scene.contains(NodeId::new(3))); // still owned by 2
///
/// scene.unlink(NodeId::new(2), NodeId::new(3)).unwrap();
/// assert!(!scene.contains(NodeId::new(3))); // last parent gone
/// ```
pub struct SceneGraph {
    nodes: HashMap<NodeId, Node>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Creates a graph containing only the root `View`.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(NodeId::ROOT, Node::new(NodeId::ROOT, NodeKind::View));
        Self { nodes }
    }

    /// Number of nodes, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root is permanent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if a node with this id exists.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[&NodeId::ROOT]
    }

    /// Looks up a node.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownNode`] if no node has this id.
    pub fn get(&self, id: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(&id).ok_or(SceneError::UnknownNode(id))
    }

    /// Looks up a node mutably.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownNode`] if no node has this id.
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))
    }

    /// Iterates over all node ids in unspecified order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Constructs a node and attaches it under `parent`.
    ///
    /// Returns the new node's id.
    ///
    /// # Errors
    ///
    /// - [`SceneError::ViewNotRoot`] for a `View` kind: the root already
    ///   exists and is the only `View`.
    /// - [`SceneError::DuplicateNode`] if the id is taken.
    /// - [`SceneError::UnknownNode`] if the parent does not exist.
    ///
    /// The graph is unchanged on error.
    pub fn add(&mut self, parent: NodeId, id: NodeId, kind: NodeKind) -> Result<NodeId, SceneError> {
        if matches!(kind, NodeKind::View) {
            return Err(SceneError::ViewNotRoot(id));
        }
        if self.nodes.contains_key(&id) {
            return Err(SceneError::DuplicateNode(id));
        }
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }

        let mut node = Node::new(id, kind);
        node.parents.push(parent);
        self.nodes.insert(id, node);
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        Ok(id)
    }

    /// Adds an edge making `child` a (shared) child of `parent`.
    ///
    /// Returns `Ok(true)` if the edge was new, `Ok(false)` if it already
    /// existed.
    ///
    /// # Errors
    ///
    /// - [`SceneError::RootEdge`] when `child` is the root.
    /// - [`SceneError::UnknownNode`] when either end is missing.
    /// - [`SceneError::Cycle`] when `parent` is reachable from `child`.
    pub fn link(&mut self, parent: NodeId, child: NodeId) -> Result<bool, SceneError> {
        if child.is_root() {
            return Err(SceneError::RootEdge);
        }
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !self.nodes.contains_key(&child) {
            return Err(SceneError::UnknownNode(child));
        }
        if self.nodes[&parent].children.contains(&child) {
            return Ok(false);
        }
        if parent == child || self.reaches(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(&child) {
            child_node.parents.push(parent);
        }
        Ok(true)
    }

    /// Removes the `parent -> child` edge.
    ///
    /// Returns `Ok(true)` if the edge existed. If this was the child's last
    /// parent edge, the child is destroyed, cascading into any descendants
    /// left without a parent.
    ///
    /// # Errors
    ///
    /// - [`SceneError::RootEdge`] when `child` is the root.
    /// - [`SceneError::UnknownNode`] when either end is missing.
    pub fn unlink(&mut self, parent: NodeId, child: NodeId) -> Result<bool, SceneError> {
        if child.is_root() {
            return Err(SceneError::RootEdge);
        }
        if !self.nodes.contains_key(&child) {
            return Err(SceneError::UnknownNode(child));
        }

        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return Err(SceneError::UnknownNode(parent));
        };
        let Some(pos) = parent_node.children.iter().position(|&c| c == child) else {
            return Ok(false);
        };
        parent_node.children.swap_remove(pos);

        let mut orphaned = false;
        if let Some(child_node) = self.nodes.get_mut(&child) {
            if let Some(pos) = child_node.parents.iter().position(|&p| p == parent) {
                child_node.parents.swap_remove(pos);
            }
            orphaned = child_node.parents.is_empty();
        }
        if orphaned {
            self.destroy(child);
        }
        Ok(true)
    }

    /// Detaches `id` from every parent, destroying it and any descendants
    /// this orphans.
    ///
    /// # Errors
    ///
    /// - [`SceneError::RootEdge`] for the root.
    /// - [`SceneError::UnknownNode`] if the node does not exist.
    pub fn remove(&mut self, id: NodeId) -> Result<(), SceneError> {
        if id.is_root() {
            return Err(SceneError::RootEdge);
        }
        let node = self.nodes.get(&id).ok_or(SceneError::UnknownNode(id))?;
        let parents: Vec<NodeId> = node.parents.clone();
        for parent in parents {
            if let Some(parent_node) = self.nodes.get_mut(&parent)
                && let Some(pos) = parent_node.children.iter().position(|&c| c == id)
            {
                parent_node.children.swap_remove(pos);
            }
        }
        self.destroy(id);
        Ok(())
    }

    /// Destroys a parentless node and cascades into orphaned descendants.
    fn destroy(&mut self, id: NodeId) {
        let mut doomed = Vec::new();
        doomed.push(id);
        while let Some(current) = doomed.pop() {
            let Some(node) = self.nodes.remove(&current) else {
                continue;
            };
            for child in node.children {
                if let Some(child_node) = self.nodes.get_mut(&child) {
                    if let Some(pos) = child_node.parents.iter().position(|&p| p == current) {
                        child_node.parents.swap_remove(pos);
                    }
                    if child_node.parents.is_empty() {
                        doomed.push(child);
                    }
                }
            }
        }
    }

    /// Returns `true` if `to` is reachable from `from` along child edges.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut stack = Vec::new();
        let mut visited = hashbrown::HashSet::new();
        stack.push(from);
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().copied());
            }
        }
        false
    }

    /// Applies a variant-specific update to the node.
    ///
    /// Returns `Ok(true)` on the clean→dirty transition (the caller's cue
    /// to record a stream event) and `Ok(false)` when the node was already
    /// dirty.
    ///
    /// # Errors
    ///
    /// - [`SceneError::UnknownNode`] for a missing id.
    /// - [`SceneError::MissingContent`] for a `Text` update without content.
    pub fn update(&mut self, id: NodeId, args: &[String]) -> Result<bool, SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))?;
        node.update(args).map_err(|_| SceneError::MissingContent(id))
    }

    /// Returns `preferred` if no node uses it, otherwise a random unused id.
    ///
    /// The id is not reserved: it is taken only once a node is added with it.
    pub fn lease_id<R: Rng + ?Sized>(&self, preferred: NodeId, rng: &mut R) -> NodeId {
        if !self.contains(preferred) {
            return preferred;
        }
        loop {
            let candidate = NodeId::new(rng.r#gen::<u32>());
            if !self.contains(candidate) {
                return candidate;
            }
        }
    }

    /// Breadth-first traversal from the root; each reachable node once.
    #[must_use]
    pub fn bfs(&self) -> Bfs<'_> {
        Bfs::new(self)
    }

    /// Depth-first traversal from the root; each reachable node once.
    #[must_use]
    pub fn dfs(&self) -> Dfs<'_> {
        Dfs::new(self)
    }
}

impl fmt::Display for SceneGraph {
    /// Indented tree dump. Shared nodes are printed under each of their
    /// parents; acyclicity bounds the walk.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        stack.push((NodeId::ROOT, 0));
        while let Some((id, depth)) = stack.pop() {
            let Ok(node) = self.get(id) else { continue };
            for _ in 0..depth {
                f.write_str("  ")?;
            }
            writeln!(f, "{node}")?;
            // Reverse so the first child prints first.
            for &child in node.children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraph")
            .field("len", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

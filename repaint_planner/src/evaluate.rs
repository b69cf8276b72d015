// Copyright 2025 the Repaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dirtiness evaluator: assigns per-frame marks.

use alloc::vec::Vec;

use repaint_scene::{NodeId, SceneGraph};

/// Marks every node for the coming frame and clears its dirty flag.
///
/// A node is marked non-cacheable when `is_hot` says its id is currently a
/// heavy hitter; everything else is marked cacheable. The root ignores its
/// mark and stays non-cacheable. Each node's dirty flag is latched into
/// [`recently_updated`](repaint_scene::Node::recently_updated) before being
/// cleared, so the refresh pass can still tell which nodes the elapsed
/// frame touched.
///
/// Nodes are visited children-before-parents (the breadth-first order
/// replayed back-to-front). The marks themselves are per-node and
/// order-independent; the ordering guarantees the planner may consult a
/// child's fresh mark while deciding about its parent.
pub fn evaluate(graph: &mut SceneGraph, is_hot: impl Fn(NodeId) -> bool) {
    let order: Vec<NodeId> = graph.bfs().collect();
    for id in order.into_iter().rev() {
        let hot = is_hot(id);
        if let Ok(node) = graph.get_mut(id) {
            node.mark(!hot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    use hashbrown::HashSet;
    use repaint_scene::NodeKind;

    fn id(raw: u32) -> NodeId {
        NodeId::new(raw)
    }

    fn sample() -> SceneGraph {
        let mut scene = SceneGraph::new();
        scene.add(NodeId::ROOT, id(1), NodeKind::Widget).unwrap();
        scene.add(id(1), id(2), NodeKind::text("a")).unwrap();
        scene.add(id(1), id(3), NodeKind::text("b")).unwrap();
        scene
    }

    #[test]
    fn clears_dirty_and_marks_by_hot_set() {
        let mut scene = sample();
        scene.update(id(2), &["x".to_string()]).unwrap();
        let hot: HashSet<NodeId> = [id(2)].into_iter().collect();

        evaluate(&mut scene, |n| hot.contains(&n));

        for node_id in [id(0), id(1), id(2), id(3)] {
            let node = scene.get(node_id).unwrap();
            assert!(!node.is_dirty(), "node {node_id} still dirty");
            let expect_cacheable = node_id != NodeId::ROOT && !hot.contains(&node_id);
            assert_eq!(node.is_cacheable(), expect_cacheable, "mark of {node_id}");
        }
    }

    #[test]
    fn latches_the_updated_flag() {
        let mut scene = sample();
        scene.update(id(3), &["y".to_string()]).unwrap();

        evaluate(&mut scene, |_| false);

        assert!(scene.get(id(3)).unwrap().recently_updated());
        assert!(!scene.get(id(2)).unwrap().recently_updated());

        // A second evaluation with no updates in between resets the latch.
        evaluate(&mut scene, |_| false);
        assert!(!scene.get(id(3)).unwrap().recently_updated());
    }

    #[test]
    fn root_is_marked_non_cacheable_even_when_cold() {
        let mut scene = sample();
        evaluate(&mut scene, |_| false);
        assert!(!scene.root().is_cacheable());
    }

    #[test]
    fn hot_membership_changes_flip_marks_between_frames() {
        let mut scene = sample();
        evaluate(&mut scene, |n| n == id(1));
        assert!(!scene.get(id(1)).unwrap().is_cacheable());

        evaluate(&mut scene, |_| false);
        assert!(scene.get(id(1)).unwrap().is_cacheable());
    }

    #[test]
    fn visits_every_node_in_a_shared_child_graph() {
        let mut scene = sample();
        scene.link(NodeId::ROOT, id(3)).unwrap();
        scene.update(id(3), &["z".to_string()]).unwrap();

        evaluate(&mut scene, |_| false);

        let marked: Vec<NodeId> = scene
            .bfs()
            .filter(|&n| !scene.get(n).unwrap().is_dirty())
            .collect();
        assert_eq!(marked, vec![id(0), id(1), id(3), id(2)]);
        assert!(scene.get(id(3)).unwrap().recently_updated());
    }
}

use super::*;
use crate::shapes::Shape;
use log::debug;
use smallvec::SmallVec;

impl KdTree {
    // Take the item out of its leaf via the back-reference, then tidy up the
    // leaf's neighbourhood. Membership is the caller's business.
    pub(crate) fn detach(&mut self, item: ItemId) {
        let Some(leaf_id) = self.items[item].leaf.take() else {
            return;
        };
        if let NodeKind::Leaf(leaf) = &mut self.nodes[leaf_id].kind {
            if let Some(position) = leaf.items.iter().position(|stored| *stored == item) {
                leaf.items.remove(position);
            }
        } else {
            debug_assert!(false, "item back-reference points at an internal node");
        }
        self.merge_upwards(leaf_id);
    }

    fn merge_upwards(&mut self, mut leaf_id: NodeId) {
        loop {
            let Some(parent_id) = self.nodes[leaf_id].parent else {
                return;
            };
            let sibling_id = match &self.nodes[parent_id].kind {
                NodeKind::Internal(internal) => internal.sibling_of(leaf_id),
                NodeKind::Leaf(_) => return,
            };

            let leaf_len = self.leaf_len(leaf_id);
            if leaf_len == 0 {
                self.collapse_into_sibling(parent_id, leaf_id, sibling_id);
                if !self.nodes[sibling_id].is_leaf() {
                    return;
                }
                leaf_id = sibling_id;
                continue;
            }

            if !self.nodes[sibling_id].is_leaf()
                || leaf_len + self.leaf_len(sibling_id) > self.config.merge_threshold
            {
                return;
            }
            self.merge_leaves(parent_id);
            leaf_id = parent_id;
        }
    }

    // The sibling subtree takes the parent's place; the empty leaf and the
    // parent go back to the pool.
    fn collapse_into_sibling(&mut self, parent_id: NodeId, empty_id: NodeId, sibling_id: NodeId) {
        let (grandparent, region, depth) = {
            let parent = &self.nodes[parent_id];
            (parent.parent, parent.region, parent.depth)
        };

        match grandparent {
            Some(grandparent_id) => {
                if let NodeKind::Internal(internal) = &mut self.nodes[grandparent_id].kind {
                    if internal.low == parent_id {
                        internal.low = sibling_id;
                    } else {
                        internal.high = sibling_id;
                    }
                }
            }
            None => self.root = Some(sibling_id),
        }

        let sibling = &mut self.nodes[sibling_id];
        sibling.parent = grandparent;
        sibling.region = region;
        sibling.depth = depth;
        // A shallower leaf splits on a different axis and has depth to spare
        if let NodeKind::Leaf(leaf) = &mut sibling.kind {
            leaf.blocked = None;
        }
        self.refresh_subtree(sibling_id);

        self.nodes.release(empty_id);
        self.nodes.release(parent_id);
        debug!("collapsed empty leaf at depth {} into its sibling", depth + 1);
    }

    // Both children are leaves; move their items up and drop them
    fn merge_leaves(&mut self, parent_id: NodeId) {
        let (low, high) = match &self.nodes[parent_id].kind {
            NodeKind::Internal(internal) => (internal.low, internal.high),
            NodeKind::Leaf(_) => return,
        };

        let mut items: SmallVec<[ItemId; LEAF_INLINE]> = SmallVec::new();
        for child in [low, high] {
            if let NodeKind::Leaf(leaf) = &self.nodes[child].kind {
                items.extend(leaf.items.iter().copied());
            }
            self.nodes.release(child);
        }

        let mut reach = 0.0f32;
        for item in &items {
            let tracked = &mut self.items[*item];
            tracked.leaf = Some(parent_id);
            reach = reach.max(tracked.shape.reach());
        }

        debug!(
            "merged sibling leaves at depth {} ({} items)",
            self.nodes[parent_id].depth + 1,
            items.len()
        );
        let parent = &mut self.nodes[parent_id];
        parent.reach = reach;
        parent.kind = NodeKind::Leaf(Leaf::with_items(items));
    }

    // Recompute regions and depths below a node whose own region just grew
    fn refresh_subtree(&mut self, node_id: NodeId) {
        let mut stack: SmallVec<[NodeId; QUERY_STACK_INLINE]> = SmallVec::new();
        stack.push(node_id);
        while let Some(current) = stack.pop() {
            let (region, depth, internal) = {
                let node = &self.nodes[current];
                match &node.kind {
                    NodeKind::Internal(internal) => (node.region, node.depth, *internal),
                    NodeKind::Leaf(_) => continue,
                }
            };
            let (low_region, high_region) = region.split(internal.axis, internal.split);
            let children = [(internal.low, low_region), (internal.high, high_region)];
            for (child, child_region) in children {
                let node = &mut self.nodes[child];
                node.region = child_region;
                node.depth = depth + 1;
                stack.push(child);
            }
        }
    }
}

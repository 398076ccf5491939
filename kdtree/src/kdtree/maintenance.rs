use super::*;
use crate::shapes::{Shape, ShapeEnum};
use log::debug;
use smallvec::SmallVec;

impl KdTree {
    /// Releases every node and detaches every item. Items stay allocated and
    /// can be added again after the next [`KdTree::init`].
    pub fn destroy_tree(&mut self) -> KdTreeResult<()> {
        self.root.take().ok_or(KdTreeError::NotInitialized)?;
        for item in &self.members {
            if let Some(tracked) = self.items.get_mut(*item) {
                tracked.leaf = None;
            }
        }
        let released = self.nodes.len();
        self.nodes.clear();
        debug!(
            "destroyed kd-tree: {} nodes released, {} items detached",
            released,
            self.members.len()
        );
        self.members.clear();
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // Deepest leaf, counting the root as depth 0
    pub fn depth(&self) -> KdTreeResult<usize> {
        let root = self.root_id()?;
        let mut depth = 0;
        self.for_each_node(root, |_, node| depth = depth.max(node.depth));
        Ok(depth)
    }

    pub fn all_leaf_regions(&self, regions: &mut Vec<RectExtent>) -> KdTreeResult<()> {
        let root = self.root_id()?;
        self.for_each_node(root, |_, node| {
            if node.is_leaf() {
                regions.push(node.region);
            }
        });
        Ok(())
    }

    pub fn all_shapes(&self, shapes: &mut Vec<ShapeEnum>) -> KdTreeResult<()> {
        let root = self.root_id()?;
        self.for_each_node(root, |_, node| {
            if let NodeKind::Leaf(leaf) = &node.kind {
                shapes.extend(leaf.items.iter().map(|item| self.items[*item].shape));
            }
        });
        Ok(())
    }

    fn for_each_node<F>(&self, root: NodeId, mut f: F)
    where
        F: FnMut(NodeId, &Node),
    {
        let mut stack: SmallVec<[NodeId; QUERY_STACK_INLINE]> = SmallVec::new();
        stack.push(root);
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            if let NodeKind::Internal(internal) = &node.kind {
                stack.push(internal.high);
                stack.push(internal.low);
            }
            f(node_id, node);
        }
    }

    /// Walks the whole tree and checks the structural invariants: parent
    /// links, region partitioning, reach bounds, single-leaf storage, anchor
    /// containment and agreement with the membership set.
    pub fn check_invariants(&self) -> KdTreeResult<()> {
        let root = self.root_id()?;
        if self.nodes[root].parent.is_some() {
            return Err(corrupt("root has a parent"));
        }
        if self.nodes[root].region != RectExtent::EVERYWHERE {
            return Err(corrupt("root region is bounded"));
        }

        let mut visited_nodes = 0usize;
        let mut stored = FxHashSet::default();
        let mut stack: SmallVec<[NodeId; QUERY_STACK_INLINE]> = SmallVec::new();
        stack.push(root);

        while let Some(node_id) = stack.pop() {
            visited_nodes += 1;
            let node = &self.nodes[node_id];
            match &node.kind {
                NodeKind::Internal(internal) => {
                    let (low_region, high_region) =
                        node.region.split(internal.axis, internal.split);
                    for (child_id, child_region) in
                        [(internal.low, low_region), (internal.high, high_region)]
                    {
                        let child = self
                            .nodes
                            .get(child_id)
                            .ok_or(corrupt("internal node points at a released child"))?;
                        if child.parent != Some(node_id) {
                            return Err(corrupt("child does not point back at its parent"));
                        }
                        if child.region != child_region {
                            return Err(corrupt("child region does not match its parent split"));
                        }
                        if child.depth != node.depth + 1 {
                            return Err(corrupt("child depth is not parent depth + 1"));
                        }
                        if child.reach > node.reach {
                            return Err(corrupt("child reach exceeds its parent's"));
                        }
                        stack.push(child_id);
                    }
                }
                NodeKind::Leaf(leaf) => {
                    for item in &leaf.items {
                        let tracked = self
                            .items
                            .get(*item)
                            .ok_or(corrupt("leaf holds a released item"))?;
                        if !stored.insert(*item) {
                            return Err(corrupt("item stored more than once"));
                        }
                        if tracked.leaf != Some(node_id) {
                            return Err(corrupt("item back-reference does not match its leaf"));
                        }
                        if !self.members.contains(item) {
                            return Err(corrupt("stored item is missing from the membership set"));
                        }
                        if !node.region.contains_anchor(tracked.anchor()) {
                            return Err(corrupt("item anchor lies outside its leaf region"));
                        }
                        if tracked.shape.reach() > node.reach {
                            return Err(corrupt("item reach exceeds its leaf's"));
                        }
                    }
                }
            }
        }

        if stored.len() != self.members.len() {
            return Err(corrupt("membership set lists items that are not stored"));
        }
        for (item, tracked) in self.items.iter() {
            if tracked.leaf.is_some() != self.members.contains(&item) {
                return Err(corrupt("detached item still points at a leaf"));
            }
        }
        if visited_nodes != self.nodes.len() {
            return Err(corrupt("node pool holds unreachable nodes"));
        }
        Ok(())
    }
}

fn corrupt(reason: &'static str) -> KdTreeError {
    KdTreeError::CorruptTree { reason }
}

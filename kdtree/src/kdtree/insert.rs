use super::*;
use crate::shapes::{Shape, Vec2};
use log::{debug, warn};
use smallvec::SmallVec;

impl KdTree {
    // Descend by anchor to the owning leaf, widening reach on the way down
    pub(crate) fn insert_from(&mut self, root: NodeId, item: ItemId) {
        let (anchor, reach) = {
            let tracked = &self.items[item];
            (tracked.anchor(), tracked.shape.reach())
        };

        let mut node_id = root;
        loop {
            let node = &mut self.nodes[node_id];
            node.reach = node.reach.max(reach);
            match &mut node.kind {
                NodeKind::Internal(internal) => {
                    node_id = internal.child_for(anchor);
                }
                NodeKind::Leaf(leaf) => {
                    debug_assert!(node.region.contains_anchor(anchor));
                    leaf.items.push(item);
                    break;
                }
            }
        }
        self.items[item].leaf = Some(node_id);

        if self.leaf_len(node_id) > self.config.leaf_capacity
            && !self.split_still_blocked(node_id, anchor)
        {
            self.split_leaf(node_id);
        }
    }

    // A blocked leaf stays blocked until an anchor off the shared coordinate arrives
    fn split_still_blocked(&self, leaf_id: NodeId, anchor: Vec2) -> bool {
        let node = &self.nodes[leaf_id];
        match &node.kind {
            NodeKind::Leaf(leaf) => match leaf.blocked {
                Some(SplitBlock::MaxDepth) => true,
                Some(SplitBlock::Coincident(coord)) => {
                    Axis::for_depth(node.depth).of(anchor) == coord
                }
                None => false,
            },
            NodeKind::Internal(_) => true,
        }
    }

    pub(crate) fn leaf_len(&self, node_id: NodeId) -> usize {
        match &self.nodes[node_id].kind {
            NodeKind::Leaf(leaf) => leaf.items.len(),
            NodeKind::Internal(_) => 0,
        }
    }

    fn split_leaf(&mut self, leaf_id: NodeId) {
        let (region, depth) = {
            let node = &self.nodes[leaf_id];
            (node.region, node.depth)
        };
        if depth >= self.config.max_depth {
            warn!(
                "leaf at max depth {} holds {} items; leaving it unsplit",
                depth,
                self.leaf_len(leaf_id)
            );
            self.block_split(leaf_id, SplitBlock::MaxDepth);
            return;
        }

        let axis = Axis::for_depth(depth);
        let items = match &self.nodes[leaf_id].kind {
            NodeKind::Leaf(leaf) => leaf.items.clone(),
            NodeKind::Internal(_) => return,
        };
        let mut coords: Vec<f32> = items
            .iter()
            .map(|item| axis.of(self.items[*item].anchor()))
            .collect();
        coords.sort_unstable_by(f32::total_cmp);

        let Some(split) = median_split(&coords) else {
            warn!(
                "leaf at depth {} holds {} items sharing one {:?} coordinate; leaving it unsplit",
                depth,
                items.len(),
                axis
            );
            self.block_split(leaf_id, SplitBlock::Coincident(coords[0]));
            return;
        };

        let (low_region, high_region) = region.split(axis, split);
        let low = self.nodes.acquire();
        let high = self.nodes.acquire();
        self.nodes[low].init_leaf(Some(leaf_id), low_region, depth + 1);
        self.nodes[high].init_leaf(Some(leaf_id), high_region, depth + 1);

        let mut low_items: SmallVec<[ItemId; LEAF_INLINE]> = SmallVec::new();
        let mut high_items: SmallVec<[ItemId; LEAF_INLINE]> = SmallVec::new();
        let mut low_reach = 0.0f32;
        let mut high_reach = 0.0f32;
        for item in items {
            let tracked = &mut self.items[item];
            let reach = tracked.shape.reach();
            if axis.of(tracked.anchor()) < split {
                tracked.leaf = Some(low);
                low_reach = low_reach.max(reach);
                low_items.push(item);
            } else {
                tracked.leaf = Some(high);
                high_reach = high_reach.max(reach);
                high_items.push(item);
            }
        }

        debug!(
            "split leaf at depth {} along {:?} at {}: {} low / {} high",
            depth,
            axis,
            split,
            low_items.len(),
            high_items.len()
        );

        let (low_len, high_len) = (low_items.len(), high_items.len());
        self.fill_leaf(low, low_items, low_reach);
        self.fill_leaf(high, high_items, high_reach);

        let node = &mut self.nodes[leaf_id];
        node.reach = low_reach.max(high_reach);
        node.kind = NodeKind::Internal(Internal {
            axis,
            split,
            low,
            high,
        });

        // Duplicated coordinates can leave one side over capacity
        if low_len > self.config.leaf_capacity {
            self.split_leaf(low);
        }
        if high_len > self.config.leaf_capacity {
            self.split_leaf(high);
        }
    }

    fn fill_leaf(&mut self, node_id: NodeId, items: SmallVec<[ItemId; LEAF_INLINE]>, reach: f32) {
        let node = &mut self.nodes[node_id];
        node.reach = reach;
        node.kind = NodeKind::Leaf(Leaf::with_items(items));
    }

    fn block_split(&mut self, leaf_id: NodeId, block: SplitBlock) {
        if let NodeKind::Leaf(leaf) = &mut self.nodes[leaf_id].kind {
            leaf.blocked = Some(block);
        }
    }
}

// Split value that leaves both halves non-empty: the median, or the next
// distinct coordinate when the median equals the minimum.
pub(crate) fn median_split(sorted: &[f32]) -> Option<f32> {
    let first = *sorted.first()?;
    let median = sorted[sorted.len() / 2];
    if first < median {
        return Some(median);
    }
    sorted.iter().copied().find(|coord| *coord > median)
}
